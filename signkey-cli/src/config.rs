//! Configuration file handling.

use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use signkey::{
    export::ExportFormat,
    scheme::{HashAlgorithm, KeyPairSetup, NamedCurve},
};

/// An error that may occur when loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred for a file.
    #[error("I/O error for file {path} while {context}: {source}")]
    IoPath {
        /// The path to the file for which the error occurred.
        path: PathBuf,
        /// The context in which the error occurs.
        ///
        /// This is meant to complete the sentence "I/O error for file {path} while ".
        context: &'static str,
        /// The error source.
        source: std::io::Error,
    },

    /// A TOML file can not be read.
    #[error("TOML read error for file {path} while {context}: {source}")]
    TomlRead {
        /// The path to the file that fails to be read.
        path: PathBuf,
        /// The context in which the error occurs.
        ///
        /// This is meant to complete the sentence "TOML read error for file {path} while ".
        context: &'static str,
        /// The error source.
        source: Box<toml::de::Error>,
    },
}

fn default_key_pair() -> KeyPairSetup {
    KeyPairSetup::Ecdsa {
        hash: HashAlgorithm::default(),
        named_curve: NamedCurve::default(),
    }
}

/// The configuration of the `signkey` executable.
///
/// # Examples
///
/// ```
/// use signkey::{export::ExportFormat, scheme::{HashAlgorithm, KeyPairSetup}};
/// use signkey_cli::config::Config;
///
/// # fn main() -> testresult::TestResult {
/// let config: Config = toml::from_str(
///     r#"
/// export_format = "raw"
///
/// [key_pair]
/// scheme = "RSASSA-PKCS1-v1_5"
/// modulus_length = 3072
/// "#,
/// )?;
///
/// assert_eq!(config.export_format, ExportFormat::Raw);
/// assert_eq!(
///     config.key_pair,
///     KeyPairSetup::RsaSsaPkcs1v15 {
///         hash: HashAlgorithm::Sha256,
///         modulus_length: 3072,
///     }
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The key pair to generate.
    ///
    /// Defaults to an ECDSA key pair on P-256 using SHA-256.
    #[serde(default = "default_key_pair")]
    pub key_pair: KeyPairSetup,

    /// The format in which key pairs are exported.
    #[serde(default)]
    pub export_format: ExportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_pair: default_key_pair(),
            export_format: ExportFormat::default(),
        }
    }
}

impl Config {
    /// Loads a [`Config`] from the TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if
    ///
    /// - the file at `path` can not be read,
    /// - or the file contents are not a valid [`Config`].
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        toml::from_str(&read_to_string(path).map_err(|source| Error::IoPath {
            path: path.to_path_buf(),
            context: "reading it to string",
            source,
        })?)
        .map_err(|source| Error::TomlRead {
            path: path.to_path_buf(),
            context: "reading it as a signkey config",
            source: Box::new(source),
        })
    }

    /// Loads a [`Config`] from the TOML file at `path` or returns the default [`Config`].
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is provided and [`Config::from_file`] fails.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        if let Some(path) = path {
            log::debug!("Loading configuration from {path:?}");
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}
