//! Stream buffer abstraction.
//!
//! A stream buffer mediates between character-level callers and a
//! backend transport. It exposes two optional windows into backend
//! storage, a get area and a put area, each tracked by offset cursors
//! rather than raw pointers. Fast paths run entirely inside a window;
//! when a window is exhausted the public operations delegate to the
//! backend's overridable hooks (`underflow`, `overflow`, and friends).
//!
//! End-of-file and failure are reported as `None`; there is no in-band
//! sentinel character.

use crate::ios::{OpenMode, SeekDir};

/// Offset cursors for one transfer direction.
///
/// Invariant: `beg <= cur <= end`, and `end` never exceeds the length of
/// the storage slice the owning buffer exposes for this direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursors {
    pub beg: usize,
    pub cur: usize,
    pub end: usize,
}

impl Cursors {
    /// Number of positions left before the window is exhausted.
    pub fn remaining(&self) -> usize {
        self.end - self.cur
    }

    /// Place all three cursors at `pos` (an empty window).
    pub fn collapse(&mut self, pos: usize) {
        self.beg = pos;
        self.cur = pos;
        self.end = pos;
    }
}

/// Get and put cursor pairs for a buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufAreas {
    pub get: Cursors,
    pub put: Cursors,
}

/// The buffer contract.
///
/// Implementors supply storage access and override the hooks their
/// backend needs; the public `s*` operations are final in spirit and
/// should not be reimplemented.
pub trait StreamBuf {
    // ---- storage access ----

    fn areas(&self) -> &BufAreas;

    fn areas_mut(&mut self) -> &mut BufAreas;

    /// Backend storage the get cursors index into. May be empty for
    /// unbuffered backends.
    fn read_window(&self) -> &[u8];

    /// Backend storage the put cursors index into. May be empty for
    /// unbuffered backends.
    fn write_window(&mut self) -> &mut [u8];

    // ---- overridable hooks ----

    /// Make at least one character available in the get area without
    /// consuming it. `None` means end of input.
    fn underflow(&mut self) -> Option<u8> {
        None
    }

    /// Like `underflow` but consumes the character. The default refills
    /// via `underflow` and advances the cursor; windowless backends
    /// override both.
    fn uflow(&mut self) -> Option<u8> {
        let c = self.underflow()?;
        self.areas_mut().get.cur += 1;
        Some(c)
    }

    /// Consume `c` when the put area is full. `None` means the
    /// character could not be written.
    fn overflow(&mut self, _c: u8) -> Option<u8> {
        None
    }

    /// Recover from a failed putback. `Some(c)` asks the backend to
    /// make `c` the next character read; `None` asks only for a step
    /// back. Default: failure.
    fn pbackfail(&mut self, _c: Option<u8>) -> Option<u8> {
        None
    }

    /// Estimate of characters obtainable beyond the get area: a count,
    /// or -1 when end of input is certain.
    fn showmanyc(&mut self) -> isize {
        0
    }

    /// Bulk read. The default copies window chunks and falls back to
    /// `uflow` one character at a time, which makes it equivalent to a
    /// naive `sbumpc` loop.
    fn xsgetn(&mut self, dst: &mut [u8]) -> usize {
        let mut n = 0;
        while n < dst.len() {
            let (cur, avail) = {
                let g = &self.areas().get;
                (g.cur, g.remaining())
            };
            if avail > 0 {
                let take = avail.min(dst.len() - n);
                dst[n..n + take].copy_from_slice(&self.read_window()[cur..cur + take]);
                self.areas_mut().get.cur += take;
                n += take;
            } else {
                match self.uflow() {
                    Some(c) => {
                        dst[n] = c;
                        n += 1;
                    }
                    None => break,
                }
            }
        }
        n
    }

    /// Bulk write, symmetric with `xsgetn`: window chunks plus an
    /// `overflow` fallback per character.
    fn xsputn(&mut self, src: &[u8]) -> usize {
        let mut n = 0;
        while n < src.len() {
            let (cur, room) = {
                let p = &self.areas().put;
                (p.cur, p.remaining())
            };
            if room > 0 {
                let take = room.min(src.len() - n);
                self.write_window()[cur..cur + take].copy_from_slice(&src[n..n + take]);
                self.areas_mut().put.cur += take;
                n += take;
            } else {
                if self.overflow(src[n]).is_none() {
                    break;
                }
                n += 1;
            }
        }
        n
    }

    /// Reposition relative to `dir`. `None` means seeking is not
    /// supported or the position is out of range.
    fn seekoff(&mut self, _off: i64, _dir: SeekDir, _which: OpenMode) -> Option<u64> {
        None
    }

    /// Reposition to an absolute position.
    fn seekpos(&mut self, _pos: u64, _which: OpenMode) -> Option<u64> {
        None
    }

    /// Flush buffered output to the backend. `false` reports failure.
    fn sync(&mut self) -> bool {
        true
    }

    // ---- public operations ----

    /// Peek at the next character.
    fn sgetc(&mut self) -> Option<u8> {
        let (cur, end) = {
            let g = &self.areas().get;
            (g.cur, g.end)
        };
        if cur < end {
            Some(self.read_window()[cur])
        } else {
            self.underflow()
        }
    }

    /// Consume and return the next character.
    fn sbumpc(&mut self) -> Option<u8> {
        let (cur, end) = {
            let g = &self.areas().get;
            (g.cur, g.end)
        };
        if cur < end {
            let c = self.read_window()[cur];
            self.areas_mut().get.cur += 1;
            Some(c)
        } else {
            self.uflow()
        }
    }

    /// Consume the current character, then peek at the one after it.
    fn snextc(&mut self) -> Option<u8> {
        self.sbumpc()?;
        self.sgetc()
    }

    /// Bulk read into `dst`; returns the number of characters stored.
    fn sgetn(&mut self, dst: &mut [u8]) -> usize {
        self.xsgetn(dst)
    }

    /// Write one character.
    fn sputc(&mut self, c: u8) -> Option<u8> {
        let (cur, end) = {
            let p = &self.areas().put;
            (p.cur, p.end)
        };
        if cur < end {
            self.write_window()[cur] = c;
            self.areas_mut().put.cur += 1;
            Some(c)
        } else {
            self.overflow(c)
        }
    }

    /// Bulk write from `src`; returns the number of characters consumed.
    fn sputn(&mut self, src: &[u8]) -> usize {
        self.xsputn(src)
    }

    /// Push `c` back into the input sequence. Succeeds directly only if
    /// the previous window character equals `c`.
    fn sputbackc(&mut self, c: u8) -> Option<u8> {
        let (beg, cur) = {
            let g = &self.areas().get;
            (g.beg, g.cur)
        };
        if cur > beg && self.read_window()[cur - 1] == c {
            self.areas_mut().get.cur -= 1;
            Some(c)
        } else {
            self.pbackfail(Some(c))
        }
    }

    /// Step back one position, re-exposing the last consumed character.
    fn sungetc(&mut self) -> Option<u8> {
        let (beg, cur) = {
            let g = &self.areas().get;
            (g.beg, g.cur)
        };
        if cur > beg {
            self.areas_mut().get.cur -= 1;
            Some(self.read_window()[cur - 1])
        } else {
            self.pbackfail(None)
        }
    }

    /// Characters readable without the backend blocking: get-area count
    /// if nonzero, otherwise the backend's `showmanyc` estimate.
    fn in_avail(&mut self) -> isize {
        let avail = self.areas().get.remaining();
        if avail > 0 {
            avail as isize
        } else {
            self.showmanyc()
        }
    }

    fn pubseekoff(&mut self, off: i64, dir: SeekDir, which: OpenMode) -> Option<u64> {
        self.seekoff(off, dir, which)
    }

    fn pubseekpos(&mut self, pos: u64, which: OpenMode) -> Option<u64> {
        self.seekpos(pos, which)
    }

    fn pubsync(&mut self) -> bool {
        self.sync()
    }
}

/// Drain `src` into `dst` until end of input or `dst` refuses a
/// character. Returns the number of characters transferred. The
/// refusing character is left unconsumed in `src`.
pub fn copy_buffered(src: &mut dyn StreamBuf, dst: &mut dyn StreamBuf) -> usize {
    let mut n = 0;
    while let Some(c) = src.sgetc() {
        if dst.sputc(c).is_none() {
            break;
        }
        src.sbumpc();
        n += 1;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal fixed-window buffer: reads from one slice, writes into
    /// another, no refill and no flush.
    struct FixedBuf {
        input: Vec<u8>,
        output: Vec<u8>,
        areas: BufAreas,
    }

    impl FixedBuf {
        fn new(input: &[u8], capacity: usize) -> Self {
            let mut areas = BufAreas::default();
            areas.get.end = input.len();
            areas.put.end = capacity;
            Self {
                input: input.to_vec(),
                output: vec![0; capacity],
                areas,
            }
        }

        fn written(&self) -> &[u8] {
            &self.output[..self.areas.put.cur]
        }
    }

    impl StreamBuf for FixedBuf {
        fn areas(&self) -> &BufAreas {
            &self.areas
        }

        fn areas_mut(&mut self) -> &mut BufAreas {
            &mut self.areas
        }

        fn read_window(&self) -> &[u8] {
            &self.input
        }

        fn write_window(&mut self) -> &mut [u8] {
            &mut self.output
        }
    }

    #[test]
    fn test_sgetc_peeks_without_consuming() {
        let mut buf = FixedBuf::new(b"ab", 0);
        assert_eq!(buf.sgetc(), Some(b'a'));
        assert_eq!(buf.sgetc(), Some(b'a'));
        assert_eq!(buf.sbumpc(), Some(b'a'));
        assert_eq!(buf.sgetc(), Some(b'b'));
    }

    #[test]
    fn test_sbumpc_hits_eof_past_window() {
        let mut buf = FixedBuf::new(b"x", 0);
        assert_eq!(buf.sbumpc(), Some(b'x'));
        assert_eq!(buf.sbumpc(), None);
        assert_eq!(buf.sgetc(), None);
    }

    #[test]
    fn test_snextc_consumes_then_peeks() {
        let mut buf = FixedBuf::new(b"ab", 0);
        assert_eq!(buf.snextc(), Some(b'b'));
        assert_eq!(buf.sgetc(), Some(b'b'));
        assert_eq!(buf.snextc(), None);
    }

    #[test]
    fn test_sgetn_equals_naive_loop() {
        let mut a = FixedBuf::new(b"hello world", 0);
        let mut dst = [0u8; 16];
        let n = a.sgetn(&mut dst);
        assert_eq!(n, 11);
        assert_eq!(&dst[..n], b"hello world");

        let mut b = FixedBuf::new(b"hello world", 0);
        let mut naive = Vec::new();
        while naive.len() < 16 {
            match b.sbumpc() {
                Some(c) => naive.push(c),
                None => break,
            }
        }
        assert_eq!(&dst[..n], naive.as_slice());
    }

    #[test]
    fn test_sputn_stops_when_overflow_refuses() {
        let mut buf = FixedBuf::new(b"", 4);
        assert_eq!(buf.sputn(b"abcdef"), 4);
        assert_eq!(buf.written(), b"abcd");
        assert_eq!(buf.sputc(b'x'), None);
    }

    #[test]
    fn test_putback_within_window() {
        let mut buf = FixedBuf::new(b"ab", 0);
        assert_eq!(buf.sbumpc(), Some(b'a'));
        assert_eq!(buf.sputbackc(b'a'), Some(b'a'));
        assert_eq!(buf.sgetc(), Some(b'a'));
        // mismatched character goes through pbackfail, which fails here
        buf.sbumpc();
        assert_eq!(buf.sputbackc(b'z'), None);
    }

    #[test]
    fn test_sungetc_steps_back() {
        let mut buf = FixedBuf::new(b"ab", 0);
        assert_eq!(buf.sungetc(), None);
        buf.sbumpc();
        assert_eq!(buf.sungetc(), Some(b'a'));
        assert_eq!(buf.sbumpc(), Some(b'a'));
    }

    #[test]
    fn test_in_avail_reports_window() {
        let mut buf = FixedBuf::new(b"abc", 0);
        assert_eq!(buf.in_avail(), 3);
        buf.sbumpc();
        assert_eq!(buf.in_avail(), 2);
        buf.sbumpc();
        buf.sbumpc();
        // empty window falls back to showmanyc default
        assert_eq!(buf.in_avail(), 0);
    }

    #[test]
    fn test_default_seek_is_unsupported() {
        let mut buf = FixedBuf::new(b"abc", 0);
        assert_eq!(buf.pubseekoff(0, SeekDir::Cur, OpenMode::IN), None);
        assert_eq!(buf.pubseekpos(0, OpenMode::IN), None);
        assert!(buf.pubsync());
    }

    #[test]
    fn test_copy_buffered_drains_source() {
        let mut src = FixedBuf::new(b"payload", 0);
        let mut dst = FixedBuf::new(b"", 16);
        assert_eq!(copy_buffered(&mut src, &mut dst), 7);
        assert_eq!(dst.written(), b"payload");
        assert_eq!(src.sgetc(), None);
    }

    #[test]
    fn test_copy_buffered_leaves_refused_char() {
        let mut src = FixedBuf::new(b"abcdef", 0);
        let mut dst = FixedBuf::new(b"", 3);
        assert_eq!(copy_buffered(&mut src, &mut dst), 3);
        assert_eq!(src.sgetc(), Some(b'd'));
    }
}
