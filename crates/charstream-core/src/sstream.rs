//! In-memory string buffer and string-backed streams.
//!
//! `StringBuf` keeps both areas over one growable byte vector. The put
//! area is kept collapsed so every write lands in `overflow`, which
//! grows storage as needed and re-synchronizes the get end to the
//! high-water write mark; characters written through one stream become
//! readable through another sharing the buffer, with no stale
//! availability in between.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ios::{BufHandle, OpenMode, SeekDir};
use crate::stream::{InputStream, OutputStream, Stream};
use crate::streambuf::{BufAreas, StreamBuf};

/// Minimum allocation when the put area first grows.
const GROW_FLOOR: usize = 512;

pub struct StringBuf {
    storage: Vec<u8>,
    /// Committed character count; the live high-water mark also folds
    /// in the current write position.
    used: usize,
    mode: OpenMode,
    areas: BufAreas,
}

impl StringBuf {
    /// An empty buffer open in `mode`.
    pub fn new(mode: OpenMode) -> Self {
        Self::from_bytes(b"", mode)
    }

    /// A buffer seeded with `initial`. `ATE` and `APP` start the write
    /// position at the end instead of overwriting from the front.
    pub fn from_bytes(initial: &[u8], mode: OpenMode) -> Self {
        let storage = initial.to_vec();
        let used = storage.len();
        let mut buf = Self {
            storage,
            used,
            mode,
            areas: BufAreas::default(),
        };
        buf.reset_areas();
        buf
    }

    /// Read-only buffer over `initial`.
    pub fn reader(initial: &[u8]) -> Self {
        Self::from_bytes(initial, OpenMode::IN)
    }

    /// Empty write buffer.
    pub fn writer() -> Self {
        Self::new(OpenMode::OUT)
    }

    pub fn shared(self) -> Rc<RefCell<StringBuf>> {
        Rc::new(RefCell::new(self))
    }

    /// Type-erased handle for stream attachment.
    pub fn handle(self) -> BufHandle {
        Rc::new(RefCell::new(self))
    }

    /// The characters written or seeded so far.
    pub fn contents(&self) -> &[u8] {
        &self.storage[..self.high_water()]
    }

    /// Replace the controlled sequence, repositioning per the open mode.
    pub fn set_contents(&mut self, bytes: &[u8]) {
        self.storage = bytes.to_vec();
        self.used = self.storage.len();
        self.areas = BufAreas::default();
        self.reset_areas();
    }

    fn reset_areas(&mut self) {
        if self.mode.contains(OpenMode::IN) {
            self.areas.get.beg = 0;
            self.areas.get.cur = 0;
            self.areas.get.end = self.used;
        }
        if self.mode.contains(OpenMode::OUT) {
            self.areas.put.beg = 0;
            self.areas.put.cur = if self.mode.intersects(OpenMode::ATE | OpenMode::APP) {
                self.used
            } else {
                0
            };
            // No put window: write fast paths would bypass the get-end
            // resync in overflow.
            self.areas.put.end = self.areas.put.cur;
        }
    }

    fn high_water(&self) -> usize {
        self.used.max(self.areas.put.cur)
    }

    /// Pull the committed count and the reader's end marker up to the
    /// write position.
    fn sync_get_end(&mut self) {
        self.used = self.high_water();
        if self.mode.contains(OpenMode::IN) {
            self.areas.get.end = self.used;
        }
    }
}

impl StreamBuf for StringBuf {
    fn areas(&self) -> &BufAreas {
        &self.areas
    }

    fn areas_mut(&mut self) -> &mut BufAreas {
        &mut self.areas
    }

    fn read_window(&self) -> &[u8] {
        &self.storage
    }

    fn write_window(&mut self) -> &mut [u8] {
        &mut self.storage
    }

    fn underflow(&mut self) -> Option<u8> {
        if !self.mode.contains(OpenMode::IN) {
            return None;
        }
        self.sync_get_end();
        let g = self.areas.get;
        if g.cur < g.end {
            Some(self.storage[g.cur])
        } else {
            None
        }
    }

    fn overflow(&mut self, c: u8) -> Option<u8> {
        if !self.mode.contains(OpenMode::OUT) {
            return None;
        }
        self.used = self.high_water();
        if self.areas.put.cur == self.storage.len() {
            let new_cap = (self.storage.len() * 2).max(GROW_FLOOR);
            self.storage.resize(new_cap, 0);
        }
        let cur = self.areas.put.cur;
        self.storage[cur] = c;
        self.areas.put.cur = cur + 1;
        self.areas.put.end = self.areas.put.cur;
        if self.mode.contains(OpenMode::IN) {
            self.areas.get.end = self.high_water();
        }
        Some(c)
    }

    fn pbackfail(&mut self, c: Option<u8>) -> Option<u8> {
        if !self.mode.contains(OpenMode::IN) || self.areas.get.cur == self.areas.get.beg {
            return None;
        }
        let pos = self.areas.get.cur - 1;
        match c {
            None => {
                self.areas.get.cur = pos;
                Some(self.storage[pos])
            }
            Some(c) if self.storage[pos] == c => {
                self.areas.get.cur = pos;
                Some(c)
            }
            Some(c) if self.mode.contains(OpenMode::OUT) => {
                // Writable sequence: replace the character in place.
                self.areas.get.cur = pos;
                self.storage[pos] = c;
                Some(c)
            }
            Some(_) => None,
        }
    }

    fn showmanyc(&mut self) -> isize {
        if !self.mode.contains(OpenMode::IN) {
            return 0;
        }
        self.sync_get_end();
        self.areas.get.remaining() as isize
    }

    fn seekoff(&mut self, off: i64, dir: SeekDir, which: OpenMode) -> Option<u64> {
        let testin = which.contains(OpenMode::IN) && self.mode.contains(OpenMode::IN);
        let testout = which.contains(OpenMode::OUT) && self.mode.contains(OpenMode::OUT);
        if !testin && !testout {
            return None;
        }
        // Seeking both cursors relative to "current" is ambiguous.
        if testin && testout && dir == SeekDir::Cur {
            return None;
        }
        self.sync_get_end();
        let limit = self.used as i64;
        let base = match dir {
            SeekDir::Beg => 0,
            SeekDir::End => limit,
            SeekDir::Cur => {
                if testin {
                    self.areas.get.cur as i64
                } else {
                    self.areas.put.cur as i64
                }
            }
        };
        let target = base.checked_add(off)?;
        if target < 0 || target > limit {
            return None;
        }
        if testin {
            self.areas.get.cur = target as usize;
        }
        if testout {
            self.areas.put.cur = target as usize;
            self.areas.put.end = self.areas.put.cur;
        }
        Some(target as u64)
    }

    fn seekpos(&mut self, pos: u64, which: OpenMode) -> Option<u64> {
        self.seekoff(i64::try_from(pos).ok()?, SeekDir::Beg, which)
    }
}

// ---------------------------------------------------------------------------
// Stream constructors
// ---------------------------------------------------------------------------

/// Input stream over a copy of `s`. The typed handle gives later access
/// to the buffer.
pub fn input_string(s: &str) -> (InputStream, Rc<RefCell<StringBuf>>) {
    let sb = StringBuf::reader(s.as_bytes()).shared();
    let handle: BufHandle = sb.clone();
    (InputStream::new(handle), sb)
}

/// Output stream over a fresh buffer.
pub fn output_string() -> (OutputStream, Rc<RefCell<StringBuf>>) {
    let sb = StringBuf::writer().shared();
    let handle: BufHandle = sb.clone();
    (OutputStream::new(handle), sb)
}

/// Bidirectional stream over `initial` in `mode`.
pub fn string_stream(initial: &[u8], mode: OpenMode) -> (Stream, Rc<RefCell<StringBuf>>) {
    let sb = StringBuf::from_bytes(initial, mode).shared();
    let handle: BufHandle = sb.clone();
    (Stream::new(handle), sb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ios::Iostate;

    fn rw(initial: &[u8]) -> StringBuf {
        StringBuf::from_bytes(initial, OpenMode::IN | OpenMode::OUT)
    }

    #[test]
    fn test_read_seeded_contents() {
        let mut sb = StringBuf::reader(b"abc");
        assert_eq!(sb.sbumpc(), Some(b'a'));
        assert_eq!(sb.sbumpc(), Some(b'b'));
        assert_eq!(sb.sbumpc(), Some(b'c'));
        assert_eq!(sb.sbumpc(), None);
    }

    #[test]
    fn test_write_grows_storage() {
        let mut sb = StringBuf::writer();
        for _ in 0..2000 {
            assert_eq!(sb.sputc(b'x'), Some(b'x'));
        }
        assert_eq!(sb.contents().len(), 2000);
        assert!(sb.contents().iter().all(|&c| c == b'x'));
    }

    #[test]
    fn test_first_growth_uses_floor() {
        let mut sb = StringBuf::writer();
        sb.sputc(b'a');
        assert!(sb.read_window().len() >= GROW_FLOOR);
    }

    #[test]
    fn test_written_chars_become_readable() {
        let mut sb = rw(b"");
        assert_eq!(sb.sgetc(), None);
        sb.sputn(b"hi");
        assert_eq!(sb.sgetc(), Some(b'h'));
        assert_eq!(sb.sbumpc(), Some(b'h'));
        assert_eq!(sb.sbumpc(), Some(b'i'));
        assert_eq!(sb.sbumpc(), None);
        sb.sputc(b'!');
        assert_eq!(sb.sbumpc(), Some(b'!'));
    }

    #[test]
    fn test_out_only_denies_reads() {
        let mut sb = StringBuf::writer();
        sb.sputn(b"data");
        assert_eq!(sb.sgetc(), None);
    }

    #[test]
    fn test_in_only_denies_writes() {
        let mut sb = StringBuf::reader(b"data");
        assert_eq!(sb.sputc(b'x'), None);
    }

    #[test]
    fn test_ate_positions_write_at_end() {
        let mut sb = StringBuf::from_bytes(b"abc", OpenMode::IN | OpenMode::OUT | OpenMode::ATE);
        sb.sputc(b'd');
        assert_eq!(sb.contents(), b"abcd");
    }

    #[test]
    fn test_out_without_ate_overwrites_from_front() {
        let mut sb = rw(b"abc");
        sb.sputc(b'X');
        assert_eq!(sb.contents(), b"Xbc");
    }

    #[test]
    fn test_pbackfail_rewrites_when_writable() {
        let mut sb = rw(b"abc");
        sb.sbumpc();
        assert_eq!(sb.sputbackc(b'Z'), Some(b'Z'));
        assert_eq!(sb.sbumpc(), Some(b'Z'));
        assert_eq!(sb.contents(), b"Zbc");
    }

    #[test]
    fn test_pbackfail_rejects_mismatch_when_read_only() {
        let mut sb = StringBuf::reader(b"abc");
        sb.sbumpc();
        assert_eq!(sb.sputbackc(b'Z'), None);
        assert_eq!(sb.sputbackc(b'a'), Some(b'a'));
    }

    #[test]
    fn test_seek_get_and_put_independently() {
        let mut sb = rw(b"hello");
        assert_eq!(sb.pubseekoff(1, SeekDir::Beg, OpenMode::IN), Some(1));
        assert_eq!(sb.sgetc(), Some(b'e'));
        assert_eq!(sb.pubseekoff(4, SeekDir::Beg, OpenMode::OUT), Some(4));
        sb.sputc(b'!');
        assert_eq!(sb.contents(), b"hell!");
        // get cursor unaffected by the put seek
        assert_eq!(sb.sgetc(), Some(b'e'));
    }

    #[test]
    fn test_seek_end_and_cur() {
        let mut sb = StringBuf::reader(b"hello");
        assert_eq!(sb.pubseekoff(-2, SeekDir::End, OpenMode::IN), Some(3));
        assert_eq!(sb.sgetc(), Some(b'l'));
        assert_eq!(sb.pubseekoff(1, SeekDir::Cur, OpenMode::IN), Some(4));
        assert_eq!(sb.sgetc(), Some(b'o'));
    }

    #[test]
    fn test_seek_rejects_out_of_range() {
        let mut sb = StringBuf::reader(b"hello");
        assert_eq!(sb.pubseekoff(-1, SeekDir::Beg, OpenMode::IN), None);
        assert_eq!(sb.pubseekoff(6, SeekDir::Beg, OpenMode::IN), None);
        // failed seek leaves the cursor alone
        assert_eq!(sb.sgetc(), Some(b'h'));
    }

    #[test]
    fn test_seek_both_cur_is_rejected() {
        let mut sb = rw(b"hello");
        assert_eq!(
            sb.pubseekoff(1, SeekDir::Cur, OpenMode::IN | OpenMode::OUT),
            None
        );
        assert_eq!(
            sb.pubseekoff(2, SeekDir::Beg, OpenMode::IN | OpenMode::OUT),
            Some(2)
        );
    }

    #[test]
    fn test_seek_end_sees_unsynced_writes() {
        let mut sb = rw(b"");
        sb.sputn(b"abcdef");
        assert_eq!(sb.pubseekoff(0, SeekDir::End, OpenMode::IN), Some(6));
    }

    #[test]
    fn test_showmanyc_counts_unread() {
        let mut sb = rw(b"");
        sb.sputn(b"abc");
        assert_eq!(sb.in_avail(), 3);
        sb.sbumpc();
        assert_eq!(sb.in_avail(), 2);
    }

    #[test]
    fn test_in_avail_tracks_interleaved_writes() {
        let mut sb = rw(b"");
        sb.sputc(b'a');
        assert_eq!(sb.in_avail(), 1);
        sb.sputn(b"bcd");
        assert_eq!(sb.in_avail(), 4);
        sb.sbumpc();
        sb.sputc(b'e');
        assert_eq!(sb.in_avail(), 4);
    }

    #[test]
    fn test_set_contents_repositions() {
        let mut sb = rw(b"old");
        sb.sbumpc();
        sb.set_contents(b"new!");
        assert_eq!(sb.sbumpc(), Some(b'n'));
        assert_eq!(sb.contents(), b"new!");
    }

    #[test]
    fn test_stream_constructors() {
        use crate::stream::{ReadStream, StreamBase, WriteStream};

        let (mut is, _) = input_string("42");
        let mut v = 0i32;
        is.extract(&mut v);
        assert_eq!(v, 42);

        let (mut os, sb) = output_string();
        os.write(b"out");
        assert_eq!(sb.borrow().contents(), b"out");

        let (mut s, sb) = string_stream(b"", OpenMode::IN | OpenMode::OUT);
        s.write(b"7 ");
        let mut v = 0i32;
        s.extract(&mut v);
        assert_eq!(v, 7);
        assert_eq!(sb.borrow().contents(), b"7 ");
        assert_eq!(s.ios().rdstate(), Iostate::GOOD);
    }
}
