//! Integration tests for the interaction of [`signkey::KeyPair`] with engines.

use rstest::rstest;
use signkey::{
    CryptoEngine,
    Error,
    KeyPair,
    SoftwareEngine,
    engine::{GeneratedKeys, InterchangeFormat},
    scheme::{GenerationParams, HashAlgorithm, KeyUsage, NamedCurve, Scheme, SignatureParams},
};
use testresult::TestResult;

/// An error of the [`RejectingEngine`].
#[derive(Debug, thiserror::Error)]
#[error("The engine rejects {0}")]
struct Rejected(&'static str);

/// An engine that rejects every operation.
#[derive(Debug)]
struct RejectingEngine;

impl CryptoEngine for RejectingEngine {
    type PrivateKey = ();
    type PublicKey = ();
    type Error = Rejected;

    async fn generate_key_pair(
        &self,
        _params: &GenerationParams,
        _usages: &[KeyUsage],
    ) -> Result<GeneratedKeys<(), ()>, Self::Error> {
        Err(Rejected("key generation"))
    }

    async fn sign(
        &self,
        _params: &SignatureParams,
        _private_key: &(),
        _message: &[u8],
    ) -> Result<Vec<u8>, Self::Error> {
        Err(Rejected("signing"))
    }

    async fn verify(
        &self,
        _params: &SignatureParams,
        _public_key: &(),
        _signature: &[u8],
        _message: &[u8],
    ) -> Result<bool, Self::Error> {
        Err(Rejected("verifying"))
    }

    async fn export_pkcs8(&self, _private_key: &()) -> Result<Vec<u8>, Self::Error> {
        Err(Rejected("exporting"))
    }

    async fn export_spki(&self, _public_key: &()) -> Result<Vec<u8>, Self::Error> {
        Err(Rejected("exporting"))
    }
}

#[rstest]
#[case(Scheme::RsaPss)]
#[case(Scheme::Ecdsa)]
#[case(Scheme::RsaSsaPkcs1v15)]
#[tokio::test]
async fn rejected_generation_yields_no_key_pair(#[case] scheme: Scheme) {
    let result = match scheme {
        Scheme::RsaPss => KeyPair::pss(RejectingEngine, HashAlgorithm::Sha256, None, None).await,
        Scheme::Ecdsa => {
            KeyPair::ecdsa(RejectingEngine, HashAlgorithm::Sha256, NamedCurve::P256).await
        }
        Scheme::RsaSsaPkcs1v15 => {
            KeyPair::pkcs1(RejectingEngine, HashAlgorithm::Sha256, None).await
        }
    };

    match result {
        Err(Error::Generation {
            scheme: actual,
            source,
        }) => {
            assert_eq!(actual, scheme);
            assert_eq!(source.to_string(), "The engine rejects key generation");
        }
        result => panic!("Expected a generation error, but got {result:?}"),
    }
}

#[tokio::test]
async fn unsupported_modulus_length_is_a_generation_error() {
    let result = KeyPair::pss(
        SoftwareEngine::default(),
        HashAlgorithm::Sha256,
        None,
        Some(512),
    )
    .await;

    assert!(matches!(
        result,
        Err(Error::Generation {
            scheme: Scheme::RsaPss,
            ..
        })
    ));
}

#[tokio::test]
async fn oversized_salt_is_a_key_usage_error() -> TestResult {
    let key_pair = KeyPair::pss(
        SoftwareEngine::default(),
        HashAlgorithm::Sha512,
        Some(1024),
        Some(2048),
    )
    .await?;

    assert!(matches!(
        key_pair.sign("hello").await,
        Err(Error::KeyUsage {
            scheme: Scheme::RsaPss,
            context: "signing a message",
            ..
        })
    ));
    Ok(())
}

#[rstest]
#[case(Scheme::Ecdsa)]
#[case(Scheme::RsaSsaPkcs1v15)]
#[tokio::test]
async fn non_extractable_key_pair_refuses_export(#[case] scheme: Scheme) -> TestResult {
    let engine = SoftwareEngine::non_extractable();
    let key_pair = match scheme {
        Scheme::RsaSsaPkcs1v15 => KeyPair::pkcs1(engine, HashAlgorithm::Sha256, None).await?,
        _ => KeyPair::ecdsa(engine, HashAlgorithm::Sha256, NamedCurve::P256).await?,
    };

    // the key pair remains usable for signatures
    let signature = key_pair.sign("hello").await?;
    assert!(key_pair.verify("hello", &signature).await?);

    for result in [
        key_pair.export_raw().await.map(|_| ()),
        key_pair.export_string().await.map(|_| ()),
        key_pair.export_pem().await.map(|_| ()),
    ] {
        assert!(matches!(
            result,
            Err(Error::Export {
                format: InterchangeFormat::Pkcs8,
                ..
            })
        ));
    }
    Ok(())
}
