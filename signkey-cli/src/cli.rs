//! Command line interface for `signkey`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use signkey::{
    export::ExportFormat,
    scheme::{HashAlgorithm, KeyPairSetup, NamedCurve, Scheme},
};

/// Command line arguments of `signkey`.
#[derive(Debug, Parser)]
#[command(about, author, name = "signkey", version)]
pub struct Cli {
    #[arg(
        env = "SIGNKEY_CONFIG",
        global = true,
        help = "The path to a configuration file",
        long_help = "The path to a configuration file

The TOML file may describe a key pair in a \"key_pair\" table and set a default \"export_format\".
Options provided on the command line take precedence over the configuration file.",
        long,
        short
    )]
    /// The path to a configuration file.
    pub config: Option<PathBuf>,

    /// Global log verbosity.
    #[command(flatten)]
    pub verbosity: Verbosity,

    /// The command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// The commands of `signkey`.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a key pair and print its export.
    Generate(GenerateCommand),

    /// Generate a key pair and create and verify a signature with it.
    Roundtrip(RoundtripCommand),
}

/// Options describing a key pair.
#[derive(Args, Debug, Default)]
pub struct KeyPairOptions {
    #[arg(
        env = "SIGNKEY_SCHEME",
        help = "The signature scheme of the key pair",
        long_help = format!("The signature scheme of the key pair

One of \"{}\", \"{}\" or \"{}\".", Scheme::RsaPss, Scheme::Ecdsa, Scheme::RsaSsaPkcs1v15),
        long,
        short
    )]
    /// The signature scheme.
    pub scheme: Option<Scheme>,

    #[arg(
        env = "SIGNKEY_HASH",
        help = "The digest function of the key pair",
        long_help = format!("The digest function of the key pair

One of \"{}\", \"{}\" or \"{}\".",
            HashAlgorithm::Sha256,
            HashAlgorithm::Sha384,
            HashAlgorithm::Sha512,
        ),
        long
    )]
    /// The digest function.
    pub hash: Option<HashAlgorithm>,

    #[arg(
        env = "SIGNKEY_CURVE",
        help = "The named curve of an ECDSA key pair",
        long_help = format!("The named curve of an ECDSA key pair

One of \"{}\", \"{}\" or \"{}\".
Ignored for RSA key pairs.", NamedCurve::P256, NamedCurve::P384, NamedCurve::P521),
        long
    )]
    /// The named curve.
    pub curve: Option<NamedCurve>,

    #[arg(
        env = "SIGNKEY_SALT_LENGTH",
        help = "The salt length (in bytes) of RSA-PSS signatures",
        long_help = "The salt length (in bytes) of RSA-PSS signatures

Ignored for other schemes.",
        long
    )]
    /// The salt length in bytes.
    pub salt_length: Option<usize>,

    #[arg(
        env = "SIGNKEY_MODULUS_LENGTH",
        help = "The modulus length (in bits) of an RSA key pair",
        long_help = "The modulus length (in bits) of an RSA key pair

Ignored for ECDSA key pairs.",
        long
    )]
    /// The modulus length in bits.
    pub modulus_length: Option<u32>,
}

impl KeyPairOptions {
    /// Applies the options on top of `base`.
    ///
    /// Each option that is provided replaces the respective value of `base`.
    /// If a different scheme is selected, options of `base` that apply to both schemes are
    /// retained.
    ///
    /// # Examples
    ///
    /// ```
    /// use signkey::scheme::{HashAlgorithm, KeyPairSetup, NamedCurve, Scheme};
    /// use signkey_cli::cli::KeyPairOptions;
    ///
    /// let base = KeyPairSetup::RsaPss {
    ///     hash: HashAlgorithm::Sha384,
    ///     salt_length: 48,
    ///     modulus_length: 3072,
    /// };
    /// let options = KeyPairOptions {
    ///     scheme: Some(Scheme::RsaSsaPkcs1v15),
    ///     ..Default::default()
    /// };
    ///
    /// assert_eq!(
    ///     options.apply(&base),
    ///     KeyPairSetup::RsaSsaPkcs1v15 {
    ///         hash: HashAlgorithm::Sha384,
    ///         modulus_length: 3072,
    ///     }
    /// );
    /// ```
    pub fn apply(&self, base: &KeyPairSetup) -> KeyPairSetup {
        let (base_curve, base_salt_length, base_modulus_length) = match base {
            KeyPairSetup::RsaPss {
                salt_length,
                modulus_length,
                ..
            } => (None, Some(*salt_length), Some(*modulus_length)),
            KeyPairSetup::Ecdsa { named_curve, .. } => (Some(*named_curve), None, None),
            KeyPairSetup::RsaSsaPkcs1v15 { modulus_length, .. } => {
                (None, None, Some(*modulus_length))
            }
        };

        KeyPairSetup::new(
            self.scheme.unwrap_or(base.scheme()),
            self.hash.unwrap_or(base.hash()),
            self.curve.or(base_curve),
            self.salt_length.or(base_salt_length),
            self.modulus_length.or(base_modulus_length),
        )
    }
}

/// Generate a key pair and print its export.
#[derive(Debug, Parser)]
#[command(
    about = "Generate a key pair and print its export",
    long_about = "Generate a key pair and print its export

The \"raw\" export is printed as hexadecimal, the \"string\" export with non-printable characters escaped and the \"pem\" export as is.
The private key is printed before the public key."
)]
pub struct GenerateCommand {
    /// Options describing the key pair.
    #[command(flatten)]
    pub key_pair: KeyPairOptions,

    #[arg(
        env = "SIGNKEY_EXPORT_FORMAT",
        help = "The format in which the key pair is exported",
        long_help = "The format in which the key pair is exported

One of \"raw\", \"string\" or \"pem\" (\"rsa\" is accepted as an alias for \"pem\").",
        long,
        short
    )]
    /// The export format.
    pub format: Option<ExportFormat>,
}

/// Generate a key pair and create and verify a signature with it.
#[derive(Debug, Parser)]
#[command(
    about = "Generate a key pair and create and verify a signature with it",
    long_about = "Generate a key pair and create and verify a signature with it

Prints the Base64 encoded signature over MESSAGE, the result of its verification and the public key as PEM block.
Each character of MESSAGE must fit in a single byte (U+0000 to U+00FF)."
)]
pub struct RoundtripCommand {
    /// The message to sign.
    #[arg(help = "The message to sign")]
    pub message: String,

    /// Options describing the key pair.
    #[command(flatten)]
    pub key_pair: KeyPairOptions,
}
