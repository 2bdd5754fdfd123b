//! A [`CryptoEngine`] implemented in software.
//!
//! RSA keys are handled by [`rsa`], elliptic curve keys by [`p256`], [`p384`] and [`p521`] and
//! digests by [`sha2`].
//! Randomness is drawn from the operating system using [`OsRng`].
//!
//! Key generation, signing and verification are CPU-bound and run on the blocking thread pool of
//! the current [`tokio`] runtime, so the futures returned by [`SoftwareEngine`] must be polled
//! from within a [`tokio`] runtime.

use std::{fmt::Debug, sync::Arc};

use log::debug;
use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use rand::rngs::OsRng;
use rsa::{
    BigUint,
    Pkcs1v15Sign,
    Pss,
    RsaPrivateKey,
    RsaPublicKey,
    pkcs8::{EncodePrivateKey, EncodePublicKey},
    traits::PublicKeyParts,
};
use sha2::{Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

use crate::{
    engine::{CryptoEngine, GeneratedKeys},
    scheme::{
        GenerationParams,
        HashAlgorithm,
        KeyUsage,
        NamedCurve,
        PUBLIC_EXPONENT,
        RsaHashedKeyGenParams,
        Scheme,
        SignatureParams,
    },
};

/// The minimum bit length of an RSA modulus.
pub const MIN_RSA_BIT_LENGTH: u32 = 2048;

/// The maximum bit length of an RSA modulus.
pub const MAX_RSA_BIT_LENGTH: u32 = RsaPublicKey::MAX_SIZE as u32;

const REDACTED: &&str = &"[REDACTED]";

/// An error that may occur when using a [`SoftwareEngine`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An RSA operation failed.
    #[error("RSA error: {0}")]
    Rsa(#[from] rsa::Error),

    /// An ECDSA operation failed.
    #[error("ECDSA error: {0}")]
    Ecdsa(#[from] p256::ecdsa::Error),

    /// Serializing a private key in PKCS#8 framing failed.
    #[error("PKCS#8 error: {0}")]
    Pkcs8(#[from] rsa::pkcs8::Error),

    /// Serializing a public key in SPKI framing failed.
    #[error("SPKI error: {0}")]
    Spki(#[from] rsa::pkcs8::spki::Error),

    /// The RSA modulus length is not supported.
    #[error(
        "The RSA modulus length {modulus_length} is not supported (must be between {MIN_RSA_BIT_LENGTH} and {MAX_RSA_BIT_LENGTH} bits and a multiple of 8)"
    )]
    InvalidModulusLength {
        /// The requested modulus length in bits.
        modulus_length: u32,
    },

    /// The RSA public exponent is not supported.
    #[error("The RSA public exponent {exponent:?} is not supported (must be {PUBLIC_EXPONENT:?})")]
    InvalidPublicExponent {
        /// The requested public exponent as big-endian bytes.
        exponent: Vec<u8>,
    },

    /// A key is used for an operation it has not been created for.
    #[error("The key has not been created for the {usage} usage")]
    UsageNotPermitted {
        /// The usage that is not permitted.
        usage: KeyUsage,
    },

    /// A key is used with parameters of another scheme.
    #[error("The {actual} key can not be used with parameters for {expected}")]
    KeyMismatch {
        /// The scheme of the parameters.
        expected: Scheme,
        /// The scheme of the key.
        actual: Scheme,
    },

    /// A key can not be exported.
    #[error("The key is not extractable")]
    NotExtractable,

    /// A blocking operation did not run to completion.
    #[error("A blocking key operation failed to complete: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// The requested usages grant no capability to the private key.
    #[error("The requested usages {usages:?} grant no capability to the private key")]
    NoPrivateKeyUsage {
        /// The requested usages.
        usages: Vec<KeyUsage>,
    },
}

/// Private key material of a [`SoftwarePrivateKey`].
enum PrivateKeyMaterial {
    Rsa {
        scheme: Scheme,
        hash: HashAlgorithm,
        key: RsaPrivateKey,
    },
    P256(p256::SecretKey),
    P384(p384::SecretKey),
    P521(p521::SecretKey),
}

impl PrivateKeyMaterial {
    /// Generates new key material for `params`.
    fn generate(params: &GenerationParams) -> Result<(Self, PublicKeyMaterial), Error> {
        Ok(match params {
            GenerationParams::RsaPss(rsa_params) | GenerationParams::RsaSsaPkcs1v15(rsa_params) => {
                let key = generate_rsa(rsa_params)?;
                let scheme = params.scheme();
                let hash = rsa_params.hash;
                let public_key = key.to_public_key();
                (
                    Self::Rsa { scheme, hash, key },
                    PublicKeyMaterial::Rsa {
                        scheme,
                        hash,
                        key: public_key,
                    },
                )
            }
            GenerationParams::Ecdsa(ec_params) => match ec_params.named_curve {
                NamedCurve::P256 => {
                    let secret = p256::SecretKey::random(&mut OsRng);
                    let public = secret.public_key();
                    (Self::P256(secret), PublicKeyMaterial::P256(public))
                }
                NamedCurve::P384 => {
                    let secret = p384::SecretKey::random(&mut OsRng);
                    let public = secret.public_key();
                    (Self::P384(secret), PublicKeyMaterial::P384(public))
                }
                NamedCurve::P521 => {
                    let secret = p521::SecretKey::random(&mut OsRng);
                    let public = secret.public_key();
                    (Self::P521(secret), PublicKeyMaterial::P521(public))
                }
            },
        })
    }

    fn scheme(&self) -> Scheme {
        match self {
            Self::Rsa { scheme, .. } => *scheme,
            Self::P256(_) | Self::P384(_) | Self::P521(_) => Scheme::Ecdsa,
        }
    }

    /// Signs `message` using `params`.
    ///
    /// Both RSA schemes blind the private key operation using [`OsRng`].
    fn sign(&self, params: &SignatureParams, message: &[u8]) -> Result<Vec<u8>, Error> {
        Ok(match (params, self) {
            (
                SignatureParams::RsaPss { salt_length },
                Self::Rsa {
                    scheme: Scheme::RsaPss,
                    hash,
                    key,
                },
            ) => key.sign_with_rng(
                &mut OsRng,
                pss_padding(*hash, *salt_length),
                &hash.digest(message),
            )?,
            (
                SignatureParams::RsaSsaPkcs1v15,
                Self::Rsa {
                    scheme: Scheme::RsaSsaPkcs1v15,
                    hash,
                    key,
                },
            ) => key.sign_with_rng(&mut OsRng, pkcs1v15_padding(*hash), &hash.digest(message))?,
            (SignatureParams::Ecdsa { hash }, Self::P256(secret)) => {
                let signature: p256::ecdsa::Signature = p256::ecdsa::SigningKey::from(secret)
                    .sign_prehash(&ecdsa_prehash(*hash, NamedCurve::P256, message))?;
                signature.to_bytes().to_vec()
            }
            (SignatureParams::Ecdsa { hash }, Self::P384(secret)) => {
                let signature: p384::ecdsa::Signature = p384::ecdsa::SigningKey::from(secret)
                    .sign_prehash(&ecdsa_prehash(*hash, NamedCurve::P384, message))?;
                signature.to_bytes().to_vec()
            }
            (SignatureParams::Ecdsa { hash }, Self::P521(secret)) => {
                let scalar = Zeroizing::new(secret.to_bytes());
                let signature: p521::ecdsa::Signature =
                    p521::ecdsa::SigningKey::from_bytes(&scalar)?
                        .sign_prehash(&ecdsa_prehash(*hash, NamedCurve::P521, message))?;
                signature.to_bytes().to_vec()
            }
            (params, material) => {
                return Err(Error::KeyMismatch {
                    expected: params.scheme(),
                    actual: material.scheme(),
                });
            }
        })
    }
}

/// Public key material of a [`SoftwarePublicKey`].
#[derive(Debug)]
enum PublicKeyMaterial {
    Rsa {
        scheme: Scheme,
        hash: HashAlgorithm,
        key: RsaPublicKey,
    },
    P256(p256::PublicKey),
    P384(p384::PublicKey),
    P521(p521::PublicKey),
}

impl PublicKeyMaterial {
    fn scheme(&self) -> Scheme {
        match self {
            Self::Rsa { scheme, .. } => *scheme,
            Self::P256(_) | Self::P384(_) | Self::P521(_) => Scheme::Ecdsa,
        }
    }

    /// Verifies `signature` over `message` using `params`.
    ///
    /// Signatures that can not be decoded are reported as invalid.
    fn verify(
        &self,
        params: &SignatureParams,
        signature: &[u8],
        message: &[u8],
    ) -> Result<bool, Error> {
        Ok(match (params, self) {
            (
                SignatureParams::RsaPss { salt_length },
                Self::Rsa {
                    scheme: Scheme::RsaPss,
                    hash,
                    key,
                },
            ) => key
                .verify(
                    pss_padding(*hash, *salt_length),
                    &hash.digest(message),
                    signature,
                )
                .is_ok(),
            (
                SignatureParams::RsaSsaPkcs1v15,
                Self::Rsa {
                    scheme: Scheme::RsaSsaPkcs1v15,
                    hash,
                    key,
                },
            ) => key
                .verify(pkcs1v15_padding(*hash), &hash.digest(message), signature)
                .is_ok(),
            (SignatureParams::Ecdsa { hash }, Self::P256(public)) => {
                match p256::ecdsa::Signature::from_slice(signature) {
                    Ok(signature) => p256::ecdsa::VerifyingKey::from(public)
                        .verify_prehash(
                            &ecdsa_prehash(*hash, NamedCurve::P256, message),
                            &signature,
                        )
                        .is_ok(),
                    Err(_) => false,
                }
            }
            (SignatureParams::Ecdsa { hash }, Self::P384(public)) => {
                match p384::ecdsa::Signature::from_slice(signature) {
                    Ok(signature) => p384::ecdsa::VerifyingKey::from(public)
                        .verify_prehash(
                            &ecdsa_prehash(*hash, NamedCurve::P384, message),
                            &signature,
                        )
                        .is_ok(),
                    Err(_) => false,
                }
            }
            (SignatureParams::Ecdsa { hash }, Self::P521(public)) => {
                match p521::ecdsa::Signature::from_slice(signature) {
                    Ok(signature) => p521::ecdsa::VerifyingKey::from_affine(*public.as_affine())?
                        .verify_prehash(
                            &ecdsa_prehash(*hash, NamedCurve::P521, message),
                            &signature,
                        )
                        .is_ok(),
                    Err(_) => false,
                }
            }
            (params, material) => {
                return Err(Error::KeyMismatch {
                    expected: params.scheme(),
                    actual: material.scheme(),
                });
            }
        })
    }
}

/// A handle to a private key held by a [`SoftwareEngine`].
pub struct SoftwarePrivateKey {
    material: Arc<PrivateKeyMaterial>,
    usages: Vec<KeyUsage>,
    extractable: bool,
}

impl SoftwarePrivateKey {
    /// Returns the [`Scheme`] the key has been created for.
    pub fn scheme(&self) -> Scheme {
        self.material.scheme()
    }

    /// Returns the usages the key has been created for.
    pub fn usages(&self) -> &[KeyUsage] {
        &self.usages
    }

    /// Returns whether the key can be exported.
    pub fn extractable(&self) -> bool {
        self.extractable
    }

    fn require(&self, usage: KeyUsage) -> Result<(), Error> {
        if self.usages.contains(&usage) {
            Ok(())
        } else {
            Err(Error::UsageNotPermitted { usage })
        }
    }
}

impl Debug for SoftwarePrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwarePrivateKey")
            .field("scheme", &self.scheme())
            .field("material", REDACTED)
            .field("usages", &self.usages)
            .field("extractable", &self.extractable)
            .finish()
    }
}

/// A handle to a public key held by a [`SoftwareEngine`].
#[derive(Debug)]
pub struct SoftwarePublicKey {
    material: Arc<PublicKeyMaterial>,
    usages: Vec<KeyUsage>,
    extractable: bool,
}

impl SoftwarePublicKey {
    /// Returns the [`Scheme`] the key has been created for.
    pub fn scheme(&self) -> Scheme {
        self.material.scheme()
    }

    /// Returns the usages the key has been created for.
    pub fn usages(&self) -> &[KeyUsage] {
        &self.usages
    }

    /// Returns whether the key can be exported.
    pub fn extractable(&self) -> bool {
        self.extractable
    }

    fn require(&self, usage: KeyUsage) -> Result<(), Error> {
        if self.usages.contains(&usage) {
            Ok(())
        } else {
            Err(Error::UsageNotPermitted { usage })
        }
    }
}

/// A [`CryptoEngine`] that keeps all key material in memory.
///
/// # Examples
///
/// ```
/// use signkey::{
///     engine::{CryptoEngine, software::SoftwareEngine},
///     scheme::{
///         EcKeyGenParams,
///         GenerationParams,
///         HashAlgorithm,
///         KeyUsage,
///         NamedCurve,
///         SignatureParams,
///     },
/// };
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> testresult::TestResult {
/// let engine = SoftwareEngine::default();
/// let keys = engine
///     .generate_key_pair(
///         &GenerationParams::Ecdsa(EcKeyGenParams {
///             named_curve: NamedCurve::P256,
///         }),
///         &[KeyUsage::Sign, KeyUsage::Verify],
///     )
///     .await?;
///
/// let params = SignatureParams::Ecdsa {
///     hash: HashAlgorithm::Sha256,
/// };
/// let signature = engine.sign(&params, &keys.private_key, b"hello").await?;
/// assert!(
///     engine
///         .verify(&params, &keys.public_key, &signature, b"hello")
///         .await?
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SoftwareEngine {
    extractable: bool,
}

impl SoftwareEngine {
    /// Creates a new [`SoftwareEngine`] that creates keys which can not be exported.
    pub fn non_extractable() -> Self {
        Self { extractable: false }
    }

    /// Returns whether keys created by the engine can be exported.
    pub fn extractable(&self) -> bool {
        self.extractable
    }

    /// Splits `usages` into the usages of the private and the public key.
    fn split_usages(usages: &[KeyUsage]) -> Result<(Vec<KeyUsage>, Vec<KeyUsage>), Error> {
        let private: Vec<KeyUsage> = usages
            .iter()
            .copied()
            .filter(|usage| *usage == KeyUsage::Sign)
            .collect();
        let public: Vec<KeyUsage> = usages
            .iter()
            .copied()
            .filter(|usage| *usage == KeyUsage::Verify)
            .collect();

        if private.is_empty() {
            return Err(Error::NoPrivateKeyUsage {
                usages: usages.to_vec(),
            });
        }

        Ok((private, public))
    }
}

impl Default for SoftwareEngine {
    fn default() -> Self {
        Self { extractable: true }
    }
}

/// Generates an RSA private key.
fn generate_rsa(params: &RsaHashedKeyGenParams) -> Result<RsaPrivateKey, Error> {
    if !(MIN_RSA_BIT_LENGTH..=MAX_RSA_BIT_LENGTH).contains(&params.modulus_length)
        || params.modulus_length % 8 != 0
    {
        return Err(Error::InvalidModulusLength {
            modulus_length: params.modulus_length,
        });
    }
    if params.public_exponent != PUBLIC_EXPONENT {
        return Err(Error::InvalidPublicExponent {
            exponent: params.public_exponent.clone(),
        });
    }

    Ok(RsaPrivateKey::new_with_exp(
        &mut OsRng,
        params.modulus_length as usize,
        &BigUint::from_bytes_be(&params.public_exponent),
    )?)
}

/// Returns the prehash of `message` for an ECDSA signature on `curve`.
///
/// Digests shorter than a field element of `curve` are left-padded with zeros, which retains
/// their integer value.
fn ecdsa_prehash(hash: HashAlgorithm, curve: NamedCurve, message: &[u8]) -> Vec<u8> {
    let digest = hash.digest(message);
    let field_size = curve.field_size();
    if digest.len() >= field_size {
        return digest;
    }

    let mut prehash = vec![0; field_size - digest.len()];
    prehash.extend_from_slice(&digest);
    prehash
}

/// Returns the RSA-PSS padding for `hash` with a salt of `salt_length` bytes.
fn pss_padding(hash: HashAlgorithm, salt_length: usize) -> Pss {
    match hash {
        HashAlgorithm::Sha256 => Pss::new_with_salt::<Sha256>(salt_length),
        HashAlgorithm::Sha384 => Pss::new_with_salt::<Sha384>(salt_length),
        HashAlgorithm::Sha512 => Pss::new_with_salt::<Sha512>(salt_length),
    }
}

/// Returns the RSASSA-PKCS1-v1_5 padding for `hash`.
fn pkcs1v15_padding(hash: HashAlgorithm) -> Pkcs1v15Sign {
    match hash {
        HashAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        HashAlgorithm::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        HashAlgorithm::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
    }
}

/// Runs the CPU-bound `operation` on the blocking thread pool of the current [`tokio`] runtime.
async fn offload<T, F>(operation: F) -> Result<T, Error>
where
    F: FnOnce() -> Result<T, Error> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(operation).await?
}

impl CryptoEngine for SoftwareEngine {
    type PrivateKey = SoftwarePrivateKey;
    type PublicKey = SoftwarePublicKey;
    type Error = Error;

    async fn generate_key_pair(
        &self,
        params: &GenerationParams,
        usages: &[KeyUsage],
    ) -> Result<GeneratedKeys<Self::PrivateKey, Self::PublicKey>, Self::Error> {
        let (private_usages, public_usages) = Self::split_usages(usages)?;
        debug!("Generating a key pair in software: {params}");

        let params = params.clone();
        let (private, public) = offload(move || PrivateKeyMaterial::generate(&params)).await?;

        Ok(GeneratedKeys {
            private_key: SoftwarePrivateKey {
                material: Arc::new(private),
                usages: private_usages,
                extractable: self.extractable,
            },
            public_key: SoftwarePublicKey {
                material: Arc::new(public),
                usages: public_usages,
                extractable: self.extractable,
            },
        })
    }

    async fn sign(
        &self,
        params: &SignatureParams,
        private_key: &Self::PrivateKey,
        message: &[u8],
    ) -> Result<Vec<u8>, Self::Error> {
        private_key.require(KeyUsage::Sign)?;

        let params = *params;
        let material = Arc::clone(&private_key.material);
        let message = message.to_vec();
        offload(move || material.sign(&params, &message)).await
    }

    async fn verify(
        &self,
        params: &SignatureParams,
        public_key: &Self::PublicKey,
        signature: &[u8],
        message: &[u8],
    ) -> Result<bool, Self::Error> {
        public_key.require(KeyUsage::Verify)?;

        let params = *params;
        let material = Arc::clone(&public_key.material);
        let signature = signature.to_vec();
        let message = message.to_vec();
        offload(move || material.verify(&params, &signature, &message)).await
    }

    async fn export_pkcs8(&self, private_key: &Self::PrivateKey) -> Result<Vec<u8>, Self::Error> {
        if !private_key.extractable {
            return Err(Error::NotExtractable);
        }

        let document = match private_key.material.as_ref() {
            PrivateKeyMaterial::Rsa { key, .. } => key.to_pkcs8_der()?,
            PrivateKeyMaterial::P256(secret) => secret.to_pkcs8_der()?,
            PrivateKeyMaterial::P384(secret) => secret.to_pkcs8_der()?,
            PrivateKeyMaterial::P521(secret) => secret.to_pkcs8_der()?,
        };

        Ok(document.as_bytes().to_vec())
    }

    async fn export_spki(&self, public_key: &Self::PublicKey) -> Result<Vec<u8>, Self::Error> {
        if !public_key.extractable {
            return Err(Error::NotExtractable);
        }

        let document = match public_key.material.as_ref() {
            PublicKeyMaterial::Rsa { key, .. } => {
                debug!("Exporting RSA public key of {} bits", key.size() * 8);
                key.to_public_key_der()?
            }
            PublicKeyMaterial::P256(public) => public.to_public_key_der()?,
            PublicKeyMaterial::P384(public) => public.to_public_key_der()?,
            PublicKeyMaterial::P521(public) => public.to_public_key_der()?,
        };

        Ok(document.as_bytes().to_vec())
    }
}
