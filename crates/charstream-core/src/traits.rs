//! Character traits.
//!
//! The classic character-type abstraction: a character domain, a wider
//! integer domain able to hold every character plus an end-of-file
//! sentinel, and the comparison/search primitives streams need. The rest
//! of the crate is written concretely over bytes; buffer hooks report
//! end-of-file as `Option<u8>`, and [`ByteTraits`] provides the
//! integer-domain view for callers that want the classic `-1` sentinel.

use core::cmp::Ordering;

/// Operations a character type must supply to the stream stack.
pub trait CharTraits {
    type Char: Copy + Eq;
    type Int: Copy + Eq;

    /// The end-of-file value in the integer domain. Never equal to
    /// `to_int(c)` for any valid character.
    const EOF: Self::Int;

    fn to_int(c: Self::Char) -> Self::Int;

    /// Inverse of `to_int`. Only meaningful for non-EOF values.
    fn to_char(i: Self::Int) -> Self::Char;

    fn lt(a: Self::Char, b: Self::Char) -> bool;

    /// A value that compares unequal to EOF: `i` itself unless `i` is
    /// EOF, in which case some arbitrary valid character value.
    fn not_eof(i: Self::Int) -> Self::Int;

    fn eq(a: Self::Char, b: Self::Char) -> bool {
        a == b
    }

    fn eq_int(a: Self::Int, b: Self::Int) -> bool {
        a == b
    }

    /// Lexicographic comparison over `lt`/`eq`, shorter run first on a tie.
    fn compare(a: &[Self::Char], b: &[Self::Char]) -> Ordering {
        for (&x, &y) in a.iter().zip(b.iter()) {
            if Self::lt(x, y) {
                return Ordering::Less;
            }
            if !Self::eq(x, y) {
                return Ordering::Greater;
            }
        }
        a.len().cmp(&b.len())
    }

    fn find(hay: &[Self::Char], needle: Self::Char) -> Option<usize> {
        hay.iter().position(|&c| Self::eq(c, needle))
    }

    /// Copy characters between slices. Panics on length mismatch, like
    /// `copy_from_slice`.
    fn copy(dst: &mut [Self::Char], src: &[Self::Char]) {
        dst.copy_from_slice(src);
    }

    fn assign(dst: &mut [Self::Char], c: Self::Char) {
        dst.fill(c);
    }
}

/// Byte characters with `i32` as the integer domain and `-1` as EOF.
pub struct ByteTraits;

impl CharTraits for ByteTraits {
    type Char = u8;
    type Int = i32;

    const EOF: i32 = -1;

    fn to_int(c: u8) -> i32 {
        i32::from(c)
    }

    fn to_char(i: i32) -> u8 {
        (i & 0xff) as u8
    }

    fn lt(a: u8, b: u8) -> bool {
        a < b
    }

    fn not_eof(i: i32) -> i32 {
        if i == Self::EOF { 0 } else { i }
    }
}

impl ByteTraits {
    /// Map a buffer-level result into the integer domain.
    pub fn to_int_opt(c: Option<u8>) -> i32 {
        match c {
            Some(c) => i32::from(c),
            None => Self::EOF,
        }
    }

    /// Map an integer-domain value back to a buffer-level result.
    pub fn from_int(i: i32) -> Option<u8> {
        u8::try_from(i).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eof_is_outside_char_range() {
        for c in [0u8, 1, b'a', 0xff] {
            assert_ne!(ByteTraits::to_int(c), ByteTraits::EOF);
        }
    }

    #[test]
    fn test_int_round_trip() {
        for c in [0u8, b'x', 0x80, 0xff] {
            assert_eq!(ByteTraits::to_char(ByteTraits::to_int(c)), c);
        }
        assert_eq!(ByteTraits::to_int_opt(None), -1);
        assert_eq!(ByteTraits::from_int(-1), None);
        assert_eq!(ByteTraits::from_int(65), Some(b'A'));
    }

    #[test]
    fn test_not_eof_never_returns_eof() {
        assert_eq!(ByteTraits::not_eof(-1), 0);
        assert_eq!(ByteTraits::not_eof(7), 7);
    }

    #[test]
    fn test_compare_is_lexicographic() {
        assert_eq!(ByteTraits::compare(b"abc", b"abd"), Ordering::Less);
        assert_eq!(ByteTraits::compare(b"abc", b"ab"), Ordering::Greater);
        assert_eq!(ByteTraits::compare(b"abc", b"abc"), Ordering::Equal);
    }

    #[test]
    fn test_find() {
        assert_eq!(ByteTraits::find(b"hello", b'l'), Some(2));
        assert_eq!(ByteTraits::find(b"hello", b'z'), None);
    }

    #[test]
    fn test_copy_and_assign() {
        let mut buf = [0u8; 5];
        ByteTraits::copy(&mut buf, b"abcde");
        assert_eq!(&buf, b"abcde");
        ByteTraits::assign(&mut buf[1..4], b'.');
        assert_eq!(&buf, b"a...e");
    }
}
