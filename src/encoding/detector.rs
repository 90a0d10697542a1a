use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};


/// Decides whether unmarked `data` can be used as UTF-8 as-is.
///
/// This is a sniffing heuristic rather than a strict validator. Wide (UTF-16)
/// text carrying mostly ASCII is also well-formed UTF-8, so input whose zero
/// bytes line up like UTF-16 code units is turned away even when it validates.
/// A stray NUL in otherwise ordinary text does not.
///
/// Legacy 8-bit text that happens to form valid UTF-8 sequences is accepted
/// as UTF-8. Malformed input simply yields `false`.
pub fn is_utf8(data: &[u8]) -> bool {
    Encoding::utf8_valid_up_to(data) == data.len() && sniff_utf16(data).is_none()
}


/// Recognizes BOM-less UTF-16 by where its zero bytes fall: text that is
/// mostly ASCII has a zero high byte in most code units.
///
/// One lane must hold zeros in at least an eighth of all code units and more
/// than twice as many as the other lane.
pub(crate) fn sniff_utf16(data: &[u8]) -> Option<&'static Encoding> {
    if data.len() < 2 || data.len() % 2 != 0 {
        return None;
    }

    let code_units = data.len() / 2;
    let (even_zeros, odd_zeros) = data
        .chunks_exact(2)
        .fold((0usize, 0usize), |(even, odd), unit| {
            (even + usize::from(unit[0] == 0), odd + usize::from(unit[1] == 0))
        });

    let dominates = |lane: usize, other: usize| lane * 8 >= code_units && lane > other * 2;

    if dominates(odd_zeros, even_zeros) {
        Some(UTF_16LE)
    } else if dominates(even_zeros, odd_zeros) {
        Some(UTF_16BE)
    } else {
        None
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    #[test]
    fn accepts_plain_and_multibyte_utf8() {
        assert!(is_utf8(b"name = \"svc\"\n"));
        assert!(is_utf8("title = \"Grüße, 世界\"".as_bytes()));
        assert!(is_utf8(b""));
    }

    #[test]
    fn rejects_malformed_sequences() {
        // Windows-1252 "café".
        assert!(!is_utf8(&[0x63, 0x61, 0x66, 0xE9]));
        // Truncated three-byte sequence.
        assert!(!is_utf8(&[0x61, 0xE4, 0xB8]));
        // Lone continuation byte.
        assert!(!is_utf8(&[0x80]));
    }

    #[test]
    fn rejects_wide_text_without_its_mark() {
        assert!(!is_utf8(&utf16le("a = 1")));
    }

    #[test]
    fn accepts_utf8_with_a_stray_nul() {
        assert!(is_utf8(b"name = \"svc\"\n# note\0\nport = 8080\n"));
    }

    #[test]
    fn legacy_bytes_forming_valid_utf8_are_accepted() {
        // Known heuristic limitation: Windows-1252 "Ã©" is byte-identical to UTF-8 "é".
        let (windows_1252, _, _) = encoding_rs::WINDOWS_1252.encode("Ã©");
        assert!(is_utf8(&windows_1252));
        assert_eq!(std::str::from_utf8(&windows_1252).ok(), Some("é"));
    }

    #[test]
    fn utf16_sniff_ignores_odd_lengths_and_sparse_zeros() {
        assert_eq!(sniff_utf16(&[0x61, 0x00, 0x62]), None);
        assert_eq!(sniff_utf16(b"abcdefgh\0ijklmnopqrstuvwxyz01234"), None);
        assert_eq!(sniff_utf16(&utf16le("ab")), Some(UTF_16LE));
        assert_eq!(
            sniff_utf16(&"ab".encode_utf16().flat_map(u16::to_be_bytes).collect::<Vec<_>>()),
            Some(UTF_16BE)
        );
    }
}
