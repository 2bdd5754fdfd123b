//! Error handling.

use crate::{engine::InterchangeFormat, scheme::Scheme};

/// A boxed error originating from a cryptographic engine.
pub type EngineError = Box<dyn std::error::Error + 'static + Send + Sync>;

/// An error that may occur when working with key pairs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The engine rejected the generation of a key pair.
    #[error("Generating a {scheme} key pair failed:\n{source}")]
    Generation {
        /// The scheme for which a key pair was requested.
        scheme: Scheme,
        /// The source error.
        source: EngineError,
    },

    /// The engine rejected the use of a key for an operation.
    #[error("Using the {scheme} key pair failed while {context}:\n{source}")]
    KeyUsage {
        /// The scheme of the key pair.
        scheme: Scheme,
        /// The context in which the error occurred.
        ///
        /// This is meant to complete the sentence "Using the key pair failed while ".
        context: &'static str,
        /// The source error.
        source: EngineError,
    },

    /// The engine failed to export a key.
    #[error("Exporting a key in {format} format failed:\n{source}")]
    Export {
        /// The interchange format the key was supposed to be exported in.
        format: InterchangeFormat,
        /// The source error.
        source: EngineError,
    },

    /// A character can not be represented by a single byte.
    #[error("The character {character:?} at position {position} does not fit in a single byte")]
    Encoding {
        /// The offending character.
        character: char,
        /// The position of `character` in the text (counted in characters).
        position: usize,
    },

    /// An export format is not supported.
    #[error("Unsupported export format: {0}")]
    UnsupportedExportFormat(String),

    /// A PEM block can not be parsed.
    #[error("Invalid PEM block: {context}")]
    InvalidPem {
        /// The reason for the PEM block being invalid.
        context: String,
    },

    /// A Base64 encoded string can not be decoded.
    #[error("Decoding Base64 string failed: {0}")]
    Base64Decode(#[from] base64ct::Error),
}
