//! Encoding normalization: raw configuration bytes in, canonical UTF-8 out.
//!
//! The pipeline looks for a leading byte-order mark ([`detect_bom`]) and strips
//! it ([`strip_bom`]). A UTF-16 mark decides the decoder outright. Anything else
//! is checked for being UTF-8 already ([`is_utf8`]) and otherwise handed to a
//! [`Transcoder`]. It holds no state, so it can be called concurrently on
//! independent inputs.
//!
//! No fallback encoding is ever substituted: if the source charset cannot be
//! determined, the caller gets an error instead of silently corrupted text.

use std::borrow::Cow;

use tracing::trace;

pub use self::bom::{detect_bom, strip_bom, ByteOrderMark};
pub use self::detector::is_utf8;
pub use self::transcoder::{SniffingTranscoder, Transcoder};
use self::transcoder::decode_strictly;
use crate::error::NormalizeError;

mod bom;
mod detector;
mod transcoder;


/// U+FEFF encoded as UTF-8.
const ENCODED_BYTE_ORDER_MARK: &[u8] = &[0xEF, 0xBB, 0xBF];


/// Normalizes `raw` into UTF-8 without a leading BOM, using [`SniffingTranscoder`].
///
/// Input that is already UTF-8 is borrowed, not copied.
pub fn normalize(raw: &[u8]) -> Result<Cow<'_, [u8]>, NormalizeError> {
    normalize_with(raw, &SniffingTranscoder)
}

/// Like [`normalize`], but with an explicit [`Transcoder`] for unmarked non-UTF-8 input.
///
/// The transcoder is never consulted for input carrying a UTF-16 byte-order mark.
pub fn normalize_with<'a, T>(raw: &'a [u8], transcoder: &T) -> Result<Cow<'a, [u8]>, NormalizeError>
where
    T: Transcoder + ?Sized,
{
    let mark = detect_bom(raw);
    let body = strip_bom(raw);

    let normalized = match mark {
        Some(mark @ (ByteOrderMark::Utf16LittleEndian | ByteOrderMark::Utf16BigEndian)) => {
            trace!(encoding = mark.encoding_name(), "Decoding by byte-order mark.");

            let decoded = decode_strictly(mark.encoding(), body)
                .map_err(|source| NormalizeError::Decode { source })?;
            Cow::Owned(decoded.into_owned().into_bytes())
        }
        _ if is_utf8(body) => {
            trace!(length = body.len(), "Input is already UTF-8.");
            Cow::Borrowed(body)
        }
        _ => {
            trace!(length = body.len(), "Input is not UTF-8, transcoding.");

            let decoded = transcoder
                .guess_and_decode(body)
                .map_err(|source| NormalizeError::Transcode { source })?;
            Cow::Owned(decoded)
        }
    };

    Ok(without_leading_marks(normalized))
}

/// Drops U+FEFF characters left at the start of the output, e.g. by a doubled mark.
fn without_leading_marks(normalized: Cow<'_, [u8]>) -> Cow<'_, [u8]> {
    let leading = normalized
        .chunks_exact(ENCODED_BYTE_ORDER_MARK.len())
        .take_while(|chunk| *chunk == ENCODED_BYTE_ORDER_MARK)
        .count()
        * ENCODED_BYTE_ORDER_MARK.len();

    if leading == 0 {
        return normalized;
    }

    trace!(length = leading, "Dropping repeated byte-order marks.");
    match normalized {
        Cow::Borrowed(bytes) => Cow::Borrowed(&bytes[leading..]),
        Cow::Owned(mut bytes) => {
            bytes.drain(..leading);
            Cow::Owned(bytes)
        }
    }
}
