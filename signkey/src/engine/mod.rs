//! Traits and associated structures for cryptographic engines.
//!
//! An engine provides the cryptographic primitives (key generation, signing, verification and
//! export of key material) on which a [`KeyPair`][`crate::KeyPair`] is built.
//! Key material stays inside the engine and is only referenced by opaque handles, which carry the
//! usages they have been created for.

pub mod software;

use std::{fmt::Debug, future::Future};

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::scheme::{GenerationParams, KeyUsage, SignatureParams};

/// A standardized binary framing for exported key material
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
pub enum InterchangeFormat {
    /// PKCS#8 framing for private keys, ASN.1 DER encoded
    Pkcs8,

    /// SubjectPublicKeyInfo framing for public keys, ASN.1 DER encoded
    Spki,
}

/// The handles of a freshly generated key pair.
///
/// Both handles are always the result of a single generation call.
#[derive(Debug)]
pub struct GeneratedKeys<S, P> {
    /// The handle of the private key.
    pub private_key: S,

    /// The handle of the public key.
    pub public_key: P,
}

/// A provider of cryptographic primitives for signature key pairs.
///
/// Implementations own the key material and only hand out opaque handles to it.
/// All operations are asynchronous and must not share mutable state between calls.
/// CPU-bound work must not block the polling thread (e.g. it is offloaded to a blocking pool).
pub trait CryptoEngine: Debug + Send + Sync {
    /// The opaque handle of a private key.
    type PrivateKey: Debug + Send + Sync;

    /// The opaque handle of a public key.
    type PublicKey: Debug + Send + Sync;

    /// The error returned by the engine.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generates a new key pair.
    ///
    /// The private key handle is granted the [`KeyUsage::Sign`] capability and the public key
    /// handle the [`KeyUsage::Verify`] capability, if requested in `usages`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine does not support `params` (e.g. an unsupported modulus
    /// length or curve) or if `usages` grants no capability to the private key.
    fn generate_key_pair(
        &self,
        params: &GenerationParams,
        usages: &[KeyUsage],
    ) -> impl Future<Output = Result<GeneratedKeys<Self::PrivateKey, Self::PublicKey>, Self::Error>>
    + Send;

    /// Signs `message` using `private_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if `private_key` lacks the [`KeyUsage::Sign`] capability or if `params`
    /// do not match the key.
    fn sign(
        &self,
        params: &SignatureParams,
        private_key: &Self::PrivateKey,
        message: &[u8],
    ) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send;

    /// Verifies `signature` over `message` using `public_key`.
    ///
    /// Returns `false` if the signature does not match.
    ///
    /// # Errors
    ///
    /// Returns an error if `public_key` lacks the [`KeyUsage::Verify`] capability or if `params`
    /// do not match the key.
    fn verify(
        &self,
        params: &SignatureParams,
        public_key: &Self::PublicKey,
        signature: &[u8],
        message: &[u8],
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Exports `private_key` in [`InterchangeFormat::Pkcs8`].
    ///
    /// # Errors
    ///
    /// Returns an error if `private_key` is not extractable or can not be serialized.
    fn export_pkcs8(
        &self,
        private_key: &Self::PrivateKey,
    ) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send;

    /// Exports `public_key` in [`InterchangeFormat::Spki`].
    ///
    /// # Errors
    ///
    /// Returns an error if `public_key` is not extractable or can not be serialized.
    fn export_spki(
        &self,
        public_key: &Self::PublicKey,
    ) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send;
}
