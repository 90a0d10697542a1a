use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use tracing::debug;

use super::detector::sniff_utf16;
use crate::error::EncodingConversionError;


/// Converts text of an unknown, non-UTF-8 encoding into UTF-8.
///
/// The sniffing strategy lives behind this trait so the normalization
/// pipeline does not depend on a particular detection library.
pub trait Transcoder {
    /// Guesses the encoding of `data` from its content alone and decodes it.
    fn guess_and_decode(&self, data: &[u8]) -> Result<Vec<u8>, EncodingConversionError>;
}


/// Default [`Transcoder`]: a byte-lane sniff for BOM-less UTF-16, then
/// statistical detection over ASCII-compatible legacy encodings with `chardetng`.
///
/// A guess is only trusted if it decodes without errors into plausible plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SniffingTranscoder;

impl Transcoder for SniffingTranscoder {
    fn guess_and_decode(&self, data: &[u8]) -> Result<Vec<u8>, EncodingConversionError> {
        let encoding = sniff_utf16(data).unwrap_or_else(|| sniff_legacy(data));
        debug!(charset = encoding.name(), "Guessed source charset.");

        let decoded = decode_strictly(encoding, data)?;
        if !is_plausible_text(&decoded) {
            return Err(EncodingConversionError::UnrecognizedCharset {
                candidate: encoding.name(),
            });
        }

        Ok(decoded.into_owned().into_bytes())
    }
}


/// Decodes `data` as `encoding`, failing on the first malformed sequence.
/// A leading byte-order mark is not treated specially.
pub(crate) fn decode_strictly<'a>(
    encoding: &'static Encoding,
    data: &'a [u8],
) -> Result<Cow<'a, str>, EncodingConversionError> {
    encoding
        .decode_without_bom_handling_and_without_replacement(data)
        .ok_or(EncodingConversionError::MalformedInput {
            encoding: encoding.name(),
        })
}

fn sniff_legacy(data: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(data, true);

    detector.guess(None, false)
}

/// Text may contain any character except control characters other than
/// tab, line feed, form feed and carriage return.
fn is_plausible_text(text: &str) -> bool {
    !text
        .chars()
        .any(|character| character.is_control() && !matches!(character, '\t' | '\n' | '\u{0C}' | '\r'))
}
