//! Rendering of command results.

use base64ct::{Base64, Encoding as _};
use signkey::{export::ExportedKeys, pem::LINE_ENDING};

/// Renders `keys` for printing.
///
/// The private key is rendered before the public key, separated by a line break.
/// The raw export is rendered as lowercase hexadecimal, the string export with non-printable
/// characters escaped and the PEM export as is.
///
/// # Examples
///
/// ```
/// use signkey::export::{ExportedKeys, RawKeys};
/// use signkey_cli::output::render_keys;
///
/// let keys = ExportedKeys::Raw(RawKeys::new(vec![0x30, 0x01], vec![0xff]));
///
/// assert_eq!(render_keys(&keys), "3001\nff");
/// ```
pub fn render_keys(keys: &ExportedKeys) -> String {
    match keys {
        ExportedKeys::Raw(raw) => format!(
            "{}\n{}",
            hex::encode(raw.private_key()),
            hex::encode(raw.public_key())
        ),
        ExportedKeys::String(text) => format!(
            "{}\n{}",
            text.private_key().escape_default(),
            text.public_key().escape_default()
        ),
        ExportedKeys::Pem(pem) => format!(
            "{}{LINE_ENDING}{}",
            pem.private_key(),
            pem.public_key()
        ),
    }
}

/// Renders the result of a sign and verify round trip for printing.
///
/// # Examples
///
/// ```
/// use signkey_cli::output::render_roundtrip;
///
/// assert_eq!(
///     render_roundtrip(b"sig", true, "PEM"),
///     "signature: c2ln\nverified: true\nPEM"
/// );
/// ```
pub fn render_roundtrip(signature: &[u8], verified: bool, public_key_pem: &str) -> String {
    format!(
        "signature: {}\nverified: {verified}\n{public_key_pem}",
        Base64::encode_string(signature)
    )
}
