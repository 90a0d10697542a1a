use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};


/// A recognized byte-order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrderMark {
    Utf8,
    Utf16BigEndian,
    Utf16LittleEndian,
}

impl ByteOrderMark {
    /// Number of bytes the mark occupies.
    pub const fn byte_len(self) -> usize {
        match self {
            ByteOrderMark::Utf8 => 3,
            ByteOrderMark::Utf16BigEndian | ByteOrderMark::Utf16LittleEndian => 2,
        }
    }

    pub const fn encoding_name(self) -> &'static str {
        match self {
            ByteOrderMark::Utf8 => "UTF-8",
            ByteOrderMark::Utf16BigEndian => "UTF-16BE",
            ByteOrderMark::Utf16LittleEndian => "UTF-16LE",
        }
    }

    /// The encoding the mark announces.
    pub fn encoding(self) -> &'static Encoding {
        match self {
            ByteOrderMark::Utf8 => UTF_8,
            ByteOrderMark::Utf16BigEndian => UTF_16BE,
            ByteOrderMark::Utf16LittleEndian => UTF_16LE,
        }
    }
}


/// Returns the byte-order mark `data` starts with, if any.
///
/// Inputs shorter than three bytes never carry a mark. The three-byte UTF-8
/// mark is checked before the two-byte UTF-16 marks.
pub fn detect_bom(data: &[u8]) -> Option<ByteOrderMark> {
    match data {
        [] | [_] | [_, _] => None,
        [0xEF, 0xBB, 0xBF, ..] => Some(ByteOrderMark::Utf8),
        [0xFE, 0xFF, ..] => Some(ByteOrderMark::Utf16BigEndian),
        [0xFF, 0xFE, ..] => Some(ByteOrderMark::Utf16LittleEndian),
        _ => None,
    }
}

/// Removes a leading byte-order mark, returning the rest of `data` unchanged.
pub fn strip_bom(data: &[u8]) -> &[u8] {
    match detect_bom(data) {
        Some(mark) => {
            tracing::trace!(encoding = mark.encoding_name(), "Stripping byte-order mark.");
            &data[mark.byte_len()..]
        }
        None => data,
    }
}
