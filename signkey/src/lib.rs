#![doc = include_str!("../README.md")]

pub mod engine;
mod error;
pub mod export;
mod key_pair;
pub mod pem;
pub mod scheme;
pub mod text;

pub use engine::{CryptoEngine, software::SoftwareEngine};
pub use error::{EngineError, Error};
pub use key_pair::KeyPair;
