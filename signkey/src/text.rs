//! Conversion between text and bytes.
//!
//! Each character of a text maps to exactly one byte (its code point) and vice versa.
//! This allows to carry arbitrary binary data (e.g. signatures or exported keys) in a [`String`]
//! and to pass text to a cryptographic engine.
//! Only characters in the range `U+0000` to `U+00FF` can be represented.

use crate::Error;

/// Converts `text` to bytes, one byte per character.
///
/// # Errors
///
/// Returns an [`Error::Encoding`] if `text` contains a character with a code point above `0xFF`.
///
/// # Examples
///
/// ```
/// use signkey::text::encode;
///
/// # fn main() -> testresult::TestResult {
/// assert_eq!(encode("hello")?, b"hello");
/// assert_eq!(encode("\u{00ff}\u{0000}")?, [0xff, 0x00]);
///
/// // this fails because U+20AC does not fit in a single byte
/// assert!(encode("\u{20ac}").is_err());
/// # Ok(())
/// # }
/// ```
pub fn encode(text: &str) -> Result<Vec<u8>, Error> {
    text.chars()
        .enumerate()
        .map(|(position, character)| {
            u8::try_from(character).map_err(|_| Error::Encoding {
                character,
                position,
            })
        })
        .collect()
}

/// Converts `bytes` to text, one character per byte.
///
/// # Examples
///
/// ```
/// use signkey::text::decode;
///
/// assert_eq!(decode(&[0x68, 0x69, 0xff]), "hi\u{00ff}");
/// ```
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use testresult::TestResult;

    use super::*;

    #[rstest]
    #[case("")]
    #[case("hello")]
    #[case("\u{0000}\u{0001}\u{007f}\u{0080}\u{00ff}")]
    #[case("Grüße, naïve café")]
    fn decode_reverses_encode(#[case] text: &str) -> TestResult {
        let bytes = encode(text)?;

        assert_eq!(bytes.len(), text.chars().count());
        assert_eq!(decode(&bytes), text);
        Ok(())
    }

    #[test]
    fn encode_reverses_decode_for_all_bytes() -> TestResult {
        let bytes: Vec<u8> = (0..=u8::MAX).collect();
        let text = decode(&bytes);

        assert_eq!(text.chars().count(), 256);
        assert_eq!(encode(&text)?, bytes);
        Ok(())
    }

    #[rstest]
    #[case("\u{0100}", '\u{0100}', 0)]
    #[case("ab€", '€', 2)]
    #[case("signature 🔑", '🔑', 10)]
    fn encode_rejects_wide_characters(
        #[case] text: &str,
        #[case] expected_character: char,
        #[case] expected_position: usize,
    ) {
        match encode(text) {
            Err(Error::Encoding {
                character,
                position,
            }) => {
                assert_eq!(character, expected_character);
                assert_eq!(position, expected_position);
            }
            result => panic!("Expected an encoding error, but got {result:?}"),
        }
    }
}
