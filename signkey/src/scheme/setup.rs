//! Setup for key pairs.

use serde::{Deserialize, Serialize};

use crate::scheme::{
    DEFAULT_MODULUS_LENGTH,
    DEFAULT_SALT_LENGTH,
    EcKeyGenParams,
    GenerationParams,
    HashAlgorithm,
    NamedCurve,
    RsaHashedKeyGenParams,
    Scheme,
    SignatureParams,
};

fn default_salt_length() -> usize {
    DEFAULT_SALT_LENGTH
}

fn default_modulus_length() -> u32 {
    DEFAULT_MODULUS_LENGTH
}

/// The setup of a signature key pair.
///
/// Describes one of the supported schemes together with its digest function and
/// scheme-specific options.
/// The setup can be (de)serialized, which allows to keep it in configuration files.
///
/// # Examples
///
/// ```
/// use signkey::scheme::{HashAlgorithm, KeyPairSetup, NamedCurve};
///
/// # fn main() -> testresult::TestResult {
/// let setup: KeyPairSetup = toml::from_str(
///     r#"
/// scheme = "ECDSA"
/// hash = "SHA-384"
/// named_curve = "P-384"
/// "#,
/// )?;
///
/// assert_eq!(
///     setup,
///     KeyPairSetup::Ecdsa {
///         hash: HashAlgorithm::Sha384,
///         named_curve: NamedCurve::P384,
///     }
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(tag = "scheme")]
pub enum KeyPairSetup {
    /// An RSA key pair for RSA-PSS signatures
    #[serde(rename = "RSA-PSS", alias = "pss")]
    RsaPss {
        /// The digest function.
        #[serde(default)]
        hash: HashAlgorithm,

        /// The salt length in bytes.
        #[serde(default = "default_salt_length")]
        salt_length: usize,

        /// The modulus length in bits.
        #[serde(default = "default_modulus_length")]
        modulus_length: u32,
    },

    /// An elliptic curve key pair for ECDSA signatures
    #[serde(rename = "ECDSA", alias = "ecdsa")]
    Ecdsa {
        /// The digest function.
        #[serde(default)]
        hash: HashAlgorithm,

        /// The curve the key is created on.
        #[serde(default)]
        named_curve: NamedCurve,
    },

    /// An RSA key pair for RSASSA-PKCS1-v1_5 signatures
    #[serde(rename = "RSASSA-PKCS1-v1_5", alias = "pkcs1")]
    RsaSsaPkcs1v15 {
        /// The digest function.
        #[serde(default)]
        hash: HashAlgorithm,

        /// The modulus length in bits.
        #[serde(default = "default_modulus_length")]
        modulus_length: u32,
    },
}

impl KeyPairSetup {
    /// Creates a new [`KeyPairSetup`] for `scheme`.
    ///
    /// Options that do not apply to `scheme` are ignored, options that are [`None`] fall back to
    /// their defaults ([`DEFAULT_SALT_LENGTH`], [`DEFAULT_MODULUS_LENGTH`] and
    /// [`NamedCurve::P256`]).
    ///
    /// # Examples
    ///
    /// ```
    /// use signkey::scheme::{HashAlgorithm, KeyPairSetup, Scheme};
    ///
    /// let setup = KeyPairSetup::new(
    ///     Scheme::RsaPss,
    ///     HashAlgorithm::Sha512,
    ///     None,
    ///     None,
    ///     Some(3072),
    /// );
    ///
    /// assert_eq!(
    ///     setup,
    ///     KeyPairSetup::RsaPss {
    ///         hash: HashAlgorithm::Sha512,
    ///         salt_length: 32,
    ///         modulus_length: 3072,
    ///     }
    /// );
    /// ```
    pub fn new(
        scheme: Scheme,
        hash: HashAlgorithm,
        named_curve: Option<NamedCurve>,
        salt_length: Option<usize>,
        modulus_length: Option<u32>,
    ) -> Self {
        match scheme {
            Scheme::RsaPss => Self::RsaPss {
                hash,
                salt_length: salt_length.unwrap_or(DEFAULT_SALT_LENGTH),
                modulus_length: modulus_length.unwrap_or(DEFAULT_MODULUS_LENGTH),
            },
            Scheme::Ecdsa => Self::Ecdsa {
                hash,
                named_curve: named_curve.unwrap_or_default(),
            },
            Scheme::RsaSsaPkcs1v15 => Self::RsaSsaPkcs1v15 {
                hash,
                modulus_length: modulus_length.unwrap_or(DEFAULT_MODULUS_LENGTH),
            },
        }
    }

    /// Returns the [`Scheme`].
    pub fn scheme(&self) -> Scheme {
        match self {
            Self::RsaPss { .. } => Scheme::RsaPss,
            Self::Ecdsa { .. } => Scheme::Ecdsa,
            Self::RsaSsaPkcs1v15 { .. } => Scheme::RsaSsaPkcs1v15,
        }
    }

    /// Returns the [`HashAlgorithm`].
    pub fn hash(&self) -> HashAlgorithm {
        match self {
            Self::RsaPss { hash, .. }
            | Self::Ecdsa { hash, .. }
            | Self::RsaSsaPkcs1v15 { hash, .. } => *hash,
        }
    }

    /// Returns the [`SignatureParams`] replayed for every signature operation.
    pub fn signature_params(&self) -> SignatureParams {
        match self {
            Self::RsaPss { salt_length, .. } => SignatureParams::RsaPss {
                salt_length: *salt_length,
            },
            Self::Ecdsa { hash, .. } => SignatureParams::Ecdsa { hash: *hash },
            Self::RsaSsaPkcs1v15 { .. } => SignatureParams::RsaSsaPkcs1v15,
        }
    }

    /// Returns the [`GenerationParams`] handed to an engine.
    pub fn generation_params(&self) -> GenerationParams {
        match self {
            Self::RsaPss {
                hash,
                modulus_length,
                ..
            } => GenerationParams::RsaPss(RsaHashedKeyGenParams::new(*modulus_length, *hash)),
            Self::Ecdsa { named_curve, .. } => GenerationParams::Ecdsa(EcKeyGenParams {
                named_curve: *named_curve,
            }),
            Self::RsaSsaPkcs1v15 {
                hash,
                modulus_length,
            } => GenerationParams::RsaSsaPkcs1v15(RsaHashedKeyGenParams::new(
                *modulus_length,
                *hash,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use testresult::TestResult;

    use super::*;
    use crate::scheme::PUBLIC_EXPONENT;

    #[rstest]
    #[case(
        "scheme = \"RSA-PSS\"",
        KeyPairSetup::RsaPss { hash: HashAlgorithm::Sha256, salt_length: 32, modulus_length: 2048 }
    )]
    #[case(
        "scheme = \"pss\"\nhash = \"sha512\"\nsalt_length = 64\nmodulus_length = 4096",
        KeyPairSetup::RsaPss { hash: HashAlgorithm::Sha512, salt_length: 64, modulus_length: 4096 }
    )]
    #[case(
        "scheme = \"ECDSA\"\nnamed_curve = \"secp521r1\"\nhash = \"SHA-512\"",
        KeyPairSetup::Ecdsa { hash: HashAlgorithm::Sha512, named_curve: NamedCurve::P521 }
    )]
    #[case(
        "scheme = \"RSASSA-PKCS1-v1_5\"\nhash = \"SHA-384\"",
        KeyPairSetup::RsaSsaPkcs1v15 { hash: HashAlgorithm::Sha384, modulus_length: 2048 }
    )]
    fn keypairsetup_from_toml(#[case] input: &str, #[case] expected: KeyPairSetup) -> TestResult {
        assert_eq!(toml::from_str::<KeyPairSetup>(input)?, expected);
        Ok(())
    }

    #[rstest]
    #[case("scheme = \"ECDH\"")]
    #[case("hash = \"SHA-256\"")]
    #[case("scheme = \"ECDSA\"\nnamed_curve = \"P-224\"")]
    fn keypairsetup_from_invalid_toml(#[case] input: &str) {
        assert!(toml::from_str::<KeyPairSetup>(input).is_err());
    }

    #[test]
    fn rsa_setup_uses_fixed_public_exponent() {
        let setup = KeyPairSetup::new(
            Scheme::RsaSsaPkcs1v15,
            HashAlgorithm::Sha256,
            None,
            None,
            None,
        );

        match setup.generation_params() {
            GenerationParams::RsaSsaPkcs1v15(params) => {
                assert_eq!(params.public_exponent, PUBLIC_EXPONENT);
                assert_eq!(params.modulus_length, DEFAULT_MODULUS_LENGTH);
                assert_eq!(params.hash, HashAlgorithm::Sha256);
            }
            params => panic!("Unexpected generation parameters: {params}"),
        }
        assert_eq!(setup.signature_params(), SignatureParams::RsaSsaPkcs1v15);
    }

    #[test]
    fn ecdsa_setup_keeps_hash_in_signature_params() {
        let setup = KeyPairSetup::new(
            Scheme::Ecdsa,
            HashAlgorithm::Sha384,
            Some(NamedCurve::P384),
            Some(99),
            Some(4096),
        );

        assert_eq!(
            setup,
            KeyPairSetup::Ecdsa {
                hash: HashAlgorithm::Sha384,
                named_curve: NamedCurve::P384
            }
        );
        assert_eq!(
            setup.signature_params(),
            SignatureParams::Ecdsa {
                hash: HashAlgorithm::Sha384
            }
        );
        assert_eq!(
            setup.generation_params(),
            GenerationParams::Ecdsa(EcKeyGenParams {
                named_curve: NamedCurve::P384
            })
        );
    }

    #[test]
    fn pss_setup_keeps_salt_length_in_signature_params() {
        let setup = KeyPairSetup::new(Scheme::RsaPss, HashAlgorithm::Sha256, None, Some(20), None);

        assert_eq!(
            setup.signature_params(),
            SignatureParams::RsaPss { salt_length: 20 }
        );
        assert_eq!(setup.scheme(), Scheme::RsaPss);
        assert_eq!(setup.hash(), HashAlgorithm::Sha256);
    }
}
