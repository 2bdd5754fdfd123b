//! Signature schemes and their parameter shapes.

mod setup;

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};
use strum::{EnumIter, EnumString, IntoStaticStr};

pub use setup::KeyPairSetup;

/// The default salt length (in bytes) of RSA-PSS signatures.
pub const DEFAULT_SALT_LENGTH: usize = 32;

/// The default modulus length (in bits) of RSA keys.
pub const DEFAULT_MODULUS_LENGTH: u32 = 2048;

/// The public exponent used for RSA keys (65537) as big-endian bytes.
pub const PUBLIC_EXPONENT: [u8; 3] = [1, 0, 1];

/// A signature algorithm family
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    strum::Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Scheme {
    /// RSA signing following a "probabilistic signature scheme" (PSS)
    #[serde(rename = "RSA-PSS", alias = "pss")]
    #[strum(to_string = "RSA-PSS", serialize = "pss")]
    RsaPss,

    /// Signing following the Elliptic Curve Digital Signature Algorithm (ECDSA)
    #[serde(rename = "ECDSA", alias = "ecdsa")]
    #[strum(to_string = "ECDSA")]
    Ecdsa,

    /// RSA signing following the PKCS#1 v1.5 standard
    #[serde(rename = "RSASSA-PKCS1-v1_5", alias = "pkcs1")]
    #[strum(to_string = "RSASSA-PKCS1-v1_5", serialize = "pkcs1")]
    RsaSsaPkcs1v15,
}

/// A digest function used by a [`Scheme`]
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    strum::Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[strum(ascii_case_insensitive)]
pub enum HashAlgorithm {
    /// SHA-2 with a 256 bit digest
    #[default]
    #[serde(rename = "SHA-256", alias = "sha256")]
    #[strum(to_string = "SHA-256", serialize = "sha256")]
    Sha256,

    /// SHA-2 with a 384 bit digest
    #[serde(rename = "SHA-384", alias = "sha384")]
    #[strum(to_string = "SHA-384", serialize = "sha384")]
    Sha384,

    /// SHA-2 with a 512 bit digest
    #[serde(rename = "SHA-512", alias = "sha512")]
    #[strum(to_string = "SHA-512", serialize = "sha512")]
    Sha512,
}

impl HashAlgorithm {
    /// Returns the length of a digest in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Creates the digest of `data`.
    ///
    /// # Examples
    ///
    /// ```
    /// use signkey::scheme::HashAlgorithm;
    ///
    /// assert_eq!(HashAlgorithm::Sha384.digest(b"hello").len(), 48);
    /// ```
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha384 => Sha384::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

/// A named elliptic curve for ECDSA keys
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    strum::Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[strum(ascii_case_insensitive)]
pub enum NamedCurve {
    /// NIST curve over a prime field for a prime of size 256 bit
    #[default]
    #[serde(rename = "P-256", alias = "prime256v1", alias = "secp256r1")]
    #[strum(to_string = "P-256", serialize = "prime256v1", serialize = "secp256r1")]
    P256,

    /// NIST curve over a prime field for a prime of size 384 bit
    #[serde(rename = "P-384", alias = "secp384r1")]
    #[strum(to_string = "P-384", serialize = "secp384r1")]
    P384,

    /// NIST curve over a prime field for a prime of size 521 bit
    #[serde(rename = "P-521", alias = "secp521r1")]
    #[strum(to_string = "P-521", serialize = "secp521r1")]
    P521,
}

impl NamedCurve {
    /// Returns the size of a field element (and of a private scalar) in bytes.
    pub fn field_size(&self) -> usize {
        match self {
            Self::P256 => 32,
            Self::P384 => 48,
            Self::P521 => 66,
        }
    }
}

/// A capability of a key handle
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    strum::Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum KeyUsage {
    /// Creating signatures with a private key
    Sign,

    /// Verifying signatures with a public key
    Verify,
}

/// The per-operation parameters of a signature scheme.
///
/// These are stored once on a key pair and replayed for every sign and verify operation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SignatureParams {
    /// RSA-PSS with a salt of `salt_length` bytes
    RsaPss {
        /// The length of the salt in bytes.
        salt_length: usize,
    },

    /// ECDSA over the digest created by `hash`
    Ecdsa {
        /// The digest function applied to the message.
        hash: HashAlgorithm,
    },

    /// RSASSA-PKCS1-v1_5, which requires no parameters
    RsaSsaPkcs1v15,
}

impl SignatureParams {
    /// Returns the [`Scheme`] the parameters belong to.
    pub fn scheme(&self) -> Scheme {
        match self {
            Self::RsaPss { .. } => Scheme::RsaPss,
            Self::Ecdsa { .. } => Scheme::Ecdsa,
            Self::RsaSsaPkcs1v15 => Scheme::RsaSsaPkcs1v15,
        }
    }
}

impl Display for SignatureParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RsaPss { salt_length } => {
                write!(f, "{} (salt length: {salt_length})", Scheme::RsaPss)
            }
            Self::Ecdsa { hash } => write!(f, "{} (hash: {hash})", Scheme::Ecdsa),
            Self::RsaSsaPkcs1v15 => write!(f, "{}", Scheme::RsaSsaPkcs1v15),
        }
    }
}

/// Generation parameters for RSA keys bound to a digest function.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct RsaHashedKeyGenParams {
    /// The length of the modulus in bits.
    pub modulus_length: u32,

    /// The public exponent as big-endian bytes.
    pub public_exponent: Vec<u8>,

    /// The digest function the key is bound to.
    pub hash: HashAlgorithm,
}

impl RsaHashedKeyGenParams {
    /// Creates new [`RsaHashedKeyGenParams`] using [`PUBLIC_EXPONENT`].
    pub fn new(modulus_length: u32, hash: HashAlgorithm) -> Self {
        Self {
            modulus_length,
            public_exponent: PUBLIC_EXPONENT.to_vec(),
            hash,
        }
    }
}

/// Generation parameters for elliptic curve keys.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct EcKeyGenParams {
    /// The curve the key is created on.
    pub named_curve: NamedCurve,
}

/// The parameters handed to an engine for generating a key pair.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum GenerationParams {
    /// An RSA key pair for RSA-PSS signatures
    RsaPss(RsaHashedKeyGenParams),

    /// An elliptic curve key pair for ECDSA signatures
    Ecdsa(EcKeyGenParams),

    /// An RSA key pair for RSASSA-PKCS1-v1_5 signatures
    RsaSsaPkcs1v15(RsaHashedKeyGenParams),
}

impl GenerationParams {
    /// Returns the [`Scheme`] the parameters belong to.
    pub fn scheme(&self) -> Scheme {
        match self {
            Self::RsaPss(_) => Scheme::RsaPss,
            Self::Ecdsa(_) => Scheme::Ecdsa,
            Self::RsaSsaPkcs1v15(_) => Scheme::RsaSsaPkcs1v15,
        }
    }
}

impl Display for GenerationParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RsaPss(params) | Self::RsaSsaPkcs1v15(params) => write!(
                f,
                "{} (modulus length: {}; hash: {})",
                self.scheme(),
                params.modulus_length,
                params.hash
            ),
            Self::Ecdsa(params) => {
                write!(f, "{} (curve: {})", self.scheme(), params.named_curve)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;
    use testresult::TestResult;

    use super::*;

    #[rstest]
    #[case("RSA-PSS", Some(Scheme::RsaPss))]
    #[case("rsa-pss", Some(Scheme::RsaPss))]
    #[case("pss", Some(Scheme::RsaPss))]
    #[case("ECDSA", Some(Scheme::Ecdsa))]
    #[case("ecdsa", Some(Scheme::Ecdsa))]
    #[case("RSASSA-PKCS1-v1_5", Some(Scheme::RsaSsaPkcs1v15))]
    #[case("pkcs1", Some(Scheme::RsaSsaPkcs1v15))]
    #[case("ECDH", None)]
    fn scheme_fromstr(#[case] input: &str, #[case] expected: Option<Scheme>) -> TestResult {
        if let Some(expected) = expected {
            assert_eq!(Scheme::from_str(input)?, expected);
        } else {
            assert!(Scheme::from_str(input).is_err());
        }
        Ok(())
    }

    #[rstest]
    #[case(Scheme::RsaPss, "RSA-PSS")]
    #[case(Scheme::Ecdsa, "ECDSA")]
    #[case(Scheme::RsaSsaPkcs1v15, "RSASSA-PKCS1-v1_5")]
    fn scheme_display(#[case] scheme: Scheme, #[case] expected: &str) {
        assert_eq!(scheme.to_string(), expected);
    }

    #[rstest]
    #[case("SHA-256", Some(HashAlgorithm::Sha256))]
    #[case("sha256", Some(HashAlgorithm::Sha256))]
    #[case("SHA-384", Some(HashAlgorithm::Sha384))]
    #[case("sha-512", Some(HashAlgorithm::Sha512))]
    #[case("SHA-1", None)]
    fn hashalgorithm_fromstr(
        #[case] input: &str,
        #[case] expected: Option<HashAlgorithm>,
    ) -> TestResult {
        if let Some(expected) = expected {
            assert_eq!(HashAlgorithm::from_str(input)?, expected);
        } else {
            assert!(HashAlgorithm::from_str(input).is_err());
        }
        Ok(())
    }

    #[rstest]
    #[case("P-256", Some(NamedCurve::P256))]
    #[case("prime256v1", Some(NamedCurve::P256))]
    #[case("secp256r1", Some(NamedCurve::P256))]
    #[case("P-384", Some(NamedCurve::P384))]
    #[case("secp384r1", Some(NamedCurve::P384))]
    #[case("p-521", Some(NamedCurve::P521))]
    #[case("secp521r1", Some(NamedCurve::P521))]
    #[case("P-224", None)]
    fn namedcurve_fromstr(
        #[case] input: &str,
        #[case] expected: Option<NamedCurve>,
    ) -> TestResult {
        if let Some(expected) = expected {
            assert_eq!(NamedCurve::from_str(input)?, expected);
        } else {
            assert!(NamedCurve::from_str(input).is_err());
        }
        Ok(())
    }

    #[rstest]
    #[case(HashAlgorithm::Sha256)]
    #[case(HashAlgorithm::Sha384)]
    #[case(HashAlgorithm::Sha512)]
    fn digest_matches_output_len(#[case] hash: HashAlgorithm) {
        assert_eq!(hash.digest(b"Hello World!").len(), hash.output_len());
    }

    #[test]
    fn params_report_their_scheme() {
        assert_eq!(
            SignatureParams::RsaPss { salt_length: 32 }.scheme(),
            Scheme::RsaPss
        );
        assert_eq!(
            GenerationParams::Ecdsa(EcKeyGenParams {
                named_curve: NamedCurve::P384
            })
            .scheme(),
            Scheme::Ecdsa
        );
        assert_eq!(
            GenerationParams::RsaSsaPkcs1v15(RsaHashedKeyGenParams::new(
                2048,
                HashAlgorithm::Sha256
            ))
            .to_string(),
            "RSASSA-PKCS1-v1_5 (modulus length: 2048; hash: SHA-256)"
        );
    }
}
