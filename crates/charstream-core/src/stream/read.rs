//! Input stream operations.
//!
//! Formatted extraction goes through the [`Extract`] trait; everything
//! else is the unformatted family, which always runs the no-skip sentry
//! and records its transfer count in `gcount`.

use crate::ctype;
use crate::ios::{Ios, Iostate, OpenMode, SeekDir};
use crate::num::get;
use crate::stream::StreamBase;
use crate::streambuf::{StreamBuf, copy_buffered};

/// A type formatted extraction knows how to read.
pub trait Extract {
    /// Parse a value from the stream's buffer under its format flags,
    /// storing into `out` and raising condition bits on `ios`. `out` is
    /// only modified on the terms each implementation documents.
    fn extract(ios: &mut Ios, out: &mut Self);
}

/// Input capability.
pub trait ReadStream: StreamBase {
    /// Characters transferred by the last unformatted operation.
    fn gcount(&self) -> usize;

    #[doc(hidden)]
    fn set_gcount(&mut self, n: usize);

    /// The input sentry: fail out unless good, flush the tie, and skip
    /// whitespace when asked to and skipws is set. Running dry while
    /// skipping raises EOF and FAIL.
    fn input_ready(&mut self, skip: bool) -> bool {
        if !self.ios().good() {
            self.ios_mut().setstate(Iostate::FAIL);
            return false;
        }
        self.flush_tie();
        if skip && self.ios().flags().contains(crate::ios::FmtFlags::SKIPWS) {
            let Some(buf) = self.ios().buffer() else {
                self.ios_mut().setstate(Iostate::BAD | Iostate::FAIL);
                return false;
            };
            let hit_end = {
                let mut b = buf.borrow_mut();
                loop {
                    match b.sgetc() {
                        None => break true,
                        Some(c) if ctype::is_space(c) => {
                            b.sbumpc();
                        }
                        Some(_) => break false,
                    }
                }
            };
            if hit_end {
                self.ios_mut().setstate(Iostate::EOF | Iostate::FAIL);
                return false;
            }
        }
        true
    }

    /// Formatted extraction into `out`. Chains.
    fn extract<T: Extract>(&mut self, out: &mut T) -> &mut Self {
        if self.input_ready(true) {
            T::extract(self.ios_mut(), out);
        }
        self
    }

    /// Extract one character, skipping nothing.
    fn get(&mut self) -> Option<u8> {
        self.set_gcount(0);
        if !self.input_ready(false) {
            return None;
        }
        let Some(buf) = self.ios().buffer() else {
            self.ios_mut().setstate(Iostate::BAD | Iostate::FAIL);
            return None;
        };
        let c = buf.borrow_mut().sbumpc();
        match c {
            Some(c) => {
                self.set_gcount(1);
                Some(c)
            }
            None => {
                self.ios_mut().setstate(Iostate::EOF | Iostate::FAIL);
                None
            }
        }
    }

    /// `get` into an out-parameter, for chaining.
    fn get_char(&mut self, out: &mut u8) -> &mut Self {
        if let Some(c) = self.get() {
            *out = c;
        }
        self
    }

    /// `get` in the integer domain: the character value, or the classic
    /// `-1` sentinel at end of input.
    fn get_int(&mut self) -> i32 {
        crate::traits::ByteTraits::to_int_opt(self.get())
    }

    /// Read up to `dst.len() - 1` characters, stopping before `delim`
    /// (which stays in the stream). Always NUL-terminates the stored
    /// run. Storing nothing raises FAIL.
    fn get_until(&mut self, dst: &mut [u8], delim: u8) -> &mut Self {
        self.set_gcount(0);
        if dst.is_empty() {
            self.ios_mut().setstate(Iostate::FAIL);
            return self;
        }
        if !self.input_ready(false) {
            dst[0] = 0;
            return self;
        }
        let Some(buf) = self.ios().buffer() else {
            dst[0] = 0;
            self.ios_mut().setstate(Iostate::BAD | Iostate::FAIL);
            return self;
        };
        let max = dst.len() - 1;
        let mut n = 0;
        let mut err = Iostate::GOOD;
        {
            let mut b = buf.borrow_mut();
            while n < max {
                match b.sgetc() {
                    None => {
                        err |= Iostate::EOF;
                        break;
                    }
                    Some(c) if c == delim => break,
                    Some(c) => {
                        dst[n] = c;
                        n += 1;
                        b.sbumpc();
                    }
                }
            }
        }
        dst[n] = 0;
        self.set_gcount(n);
        if n == 0 {
            err |= Iostate::FAIL;
        }
        if !err.is_empty() {
            self.ios_mut().setstate(err);
        }
        self
    }

    /// Read a line: like `get_until`, but the delimiter is consumed and
    /// counted in `gcount` without being stored. Filling `dst` before
    /// reaching the delimiter raises FAIL.
    fn getline(&mut self, dst: &mut [u8], delim: u8) -> &mut Self {
        self.set_gcount(0);
        if dst.is_empty() {
            self.ios_mut().setstate(Iostate::FAIL);
            return self;
        }
        if !self.input_ready(false) {
            dst[0] = 0;
            return self;
        }
        let Some(buf) = self.ios().buffer() else {
            dst[0] = 0;
            self.ios_mut().setstate(Iostate::BAD | Iostate::FAIL);
            return self;
        };
        let max = dst.len() - 1;
        let mut stored = 0;
        let mut count = 0;
        let mut err = Iostate::GOOD;
        {
            let mut b = buf.borrow_mut();
            loop {
                match b.sgetc() {
                    None => {
                        err |= Iostate::EOF;
                        break;
                    }
                    Some(c) if c == delim => {
                        b.sbumpc();
                        count += 1;
                        break;
                    }
                    Some(c) => {
                        if stored >= max {
                            err |= Iostate::FAIL;
                            break;
                        }
                        dst[stored] = c;
                        stored += 1;
                        count += 1;
                        b.sbumpc();
                    }
                }
            }
        }
        dst[stored] = 0;
        self.set_gcount(count);
        if count == 0 {
            err |= Iostate::FAIL;
        }
        if !err.is_empty() {
            self.ios_mut().setstate(err);
        }
        self
    }

    /// Discard up to `n` characters, stopping after `delim` when given.
    /// `usize::MAX` means no count limit. The consumed delimiter is
    /// counted in `gcount`.
    fn ignore(&mut self, n: usize, delim: Option<u8>) -> &mut Self {
        self.set_gcount(0);
        if !self.input_ready(false) {
            return self;
        }
        let Some(buf) = self.ios().buffer() else {
            self.ios_mut().setstate(Iostate::BAD | Iostate::FAIL);
            return self;
        };
        let unlimited = n == usize::MAX;
        let mut count = 0;
        let mut err = Iostate::GOOD;
        {
            let mut b = buf.borrow_mut();
            while unlimited || count < n {
                match b.sbumpc() {
                    None => {
                        err |= Iostate::EOF;
                        break;
                    }
                    Some(c) => {
                        count += 1;
                        if Some(c) == delim {
                            break;
                        }
                    }
                }
            }
        }
        self.set_gcount(count);
        if !err.is_empty() {
            self.ios_mut().setstate(err);
        }
        self
    }

    /// Peek at the next character without consuming it.
    fn peek(&mut self) -> Option<u8> {
        self.set_gcount(0);
        if !self.input_ready(false) {
            return None;
        }
        let Some(buf) = self.ios().buffer() else {
            self.ios_mut().setstate(Iostate::BAD | Iostate::FAIL);
            return None;
        };
        let c = buf.borrow_mut().sgetc();
        if c.is_none() {
            self.ios_mut().setstate(Iostate::EOF);
        }
        c
    }

    /// Read exactly `dst.len()` characters or fail trying: a short read
    /// raises EOF and FAIL.
    fn read(&mut self, dst: &mut [u8]) -> &mut Self {
        self.set_gcount(0);
        if !self.input_ready(false) {
            return self;
        }
        let Some(buf) = self.ios().buffer() else {
            self.ios_mut().setstate(Iostate::BAD | Iostate::FAIL);
            return self;
        };
        let n = buf.borrow_mut().sgetn(dst);
        self.set_gcount(n);
        if n < dst.len() {
            self.ios_mut().setstate(Iostate::EOF | Iostate::FAIL);
        }
        self
    }

    /// Read only what is immediately available, never blocking the
    /// backend. A certain-end estimate raises EOF.
    fn readsome(&mut self, dst: &mut [u8]) -> usize {
        self.set_gcount(0);
        if !self.input_ready(false) {
            return 0;
        }
        let Some(buf) = self.ios().buffer() else {
            self.ios_mut().setstate(Iostate::BAD | Iostate::FAIL);
            return 0;
        };
        let n = {
            let mut b = buf.borrow_mut();
            let avail = b.in_avail();
            if avail < 0 {
                None
            } else {
                let take = (avail as usize).min(dst.len());
                Some(b.sgetn(&mut dst[..take]))
            }
        };
        match n {
            None => {
                self.ios_mut().setstate(Iostate::EOF);
                0
            }
            Some(n) => {
                self.set_gcount(n);
                n
            }
        }
    }

    /// Push `c` back into the stream. Clears EOF first; a buffer that
    /// refuses raises BAD.
    fn putback(&mut self, c: u8) -> &mut Self {
        self.set_gcount(0);
        let cleared = self.ios().rdstate() & !Iostate::EOF;
        self.ios_mut().clear(cleared);
        if self.input_ready(false) {
            let ok = match self.ios().buffer() {
                Some(buf) => buf.borrow_mut().sputbackc(c).is_some(),
                None => false,
            };
            if !ok {
                self.ios_mut().setstate(Iostate::BAD);
            }
        }
        self
    }

    /// Step back one character. Clears EOF first; refusal raises BAD.
    fn unget(&mut self) -> &mut Self {
        self.set_gcount(0);
        let cleared = self.ios().rdstate() & !Iostate::EOF;
        self.ios_mut().clear(cleared);
        if self.input_ready(false) {
            let ok = match self.ios().buffer() {
                Some(buf) => buf.borrow_mut().sungetc().is_some(),
                None => false,
            };
            if !ok {
                self.ios_mut().setstate(Iostate::BAD);
            }
        }
        self
    }

    /// Synchronize the buffer with its backend. `false` when there is
    /// no buffer or the buffer reports failure (which also raises BAD).
    fn sync(&mut self) -> bool {
        match self.ios().buffer() {
            None => false,
            Some(buf) => {
                let ok = buf.borrow_mut().pubsync();
                if !ok {
                    self.ios_mut().setstate(Iostate::BAD);
                }
                ok
            }
        }
    }

    /// Current read position, or `None` after failure or on an
    /// unseekable buffer. Clears EOF like the seeks do.
    fn tellg(&mut self) -> Option<u64> {
        let cleared = self.ios().rdstate() & !Iostate::EOF;
        self.ios_mut().clear(cleared);
        if self.ios().fail() {
            return None;
        }
        let buf = self.ios().buffer()?;
        let pos = buf.borrow_mut().pubseekoff(0, SeekDir::Cur, OpenMode::IN);
        pos
    }

    /// Seek the read position. Clears EOF first; a refused seek raises
    /// FAIL. No-op on an already-failed stream.
    fn seekg(&mut self, pos: u64) -> &mut Self {
        let cleared = self.ios().rdstate() & !Iostate::EOF;
        self.ios_mut().clear(cleared);
        if !self.ios().fail() {
            let ok = match self.ios().buffer() {
                Some(buf) => buf.borrow_mut().pubseekpos(pos, OpenMode::IN).is_some(),
                None => false,
            };
            if !ok {
                self.ios_mut().setstate(Iostate::FAIL);
            }
        }
        self
    }

    /// Relative form of `seekg`.
    fn seekg_off(&mut self, off: i64, dir: SeekDir) -> &mut Self {
        let cleared = self.ios().rdstate() & !Iostate::EOF;
        self.ios_mut().clear(cleared);
        if !self.ios().fail() {
            let ok = match self.ios().buffer() {
                Some(buf) => buf
                    .borrow_mut()
                    .pubseekoff(off, dir, OpenMode::IN)
                    .is_some(),
                None => false,
            };
            if !ok {
                self.ios_mut().setstate(Iostate::FAIL);
            }
        }
        self
    }

    /// Drain the rest of this stream into another buffer. Transferring
    /// nothing raises FAIL.
    fn get_streambuf(&mut self, dst: &mut dyn StreamBuf) -> &mut Self {
        self.set_gcount(0);
        if !self.input_ready(false) {
            return self;
        }
        let Some(buf) = self.ios().buffer() else {
            self.ios_mut().setstate(Iostate::BAD | Iostate::FAIL);
            return self;
        };
        let n = {
            let mut b = buf.borrow_mut();
            copy_buffered(&mut *b, dst)
        };
        self.set_gcount(n);
        if n == 0 {
            self.ios_mut().setstate(Iostate::FAIL);
        }
        self
    }

    /// Eat whitespace. Running dry raises EOF only.
    fn ws(&mut self) -> &mut Self {
        if !self.input_ready(false) {
            return self;
        }
        let Some(buf) = self.ios().buffer() else {
            self.ios_mut().setstate(Iostate::BAD | Iostate::FAIL);
            return self;
        };
        let hit_end = {
            let mut b = buf.borrow_mut();
            loop {
                match b.sgetc() {
                    None => break true,
                    Some(c) if ctype::is_space(c) => {
                        b.sbumpc();
                    }
                    Some(_) => break false,
                }
            }
        };
        if hit_end {
            self.ios_mut().setstate(Iostate::EOF);
        }
        self
    }

    /// Apply a manipulator on the input side (flag and width forms).
    fn apply(&mut self, m: crate::stream::Manip) -> &mut Self {
        m.apply_ios(self.ios_mut());
        self
    }
}

// ---------------------------------------------------------------------------
// Extract implementations
// ---------------------------------------------------------------------------

macro_rules! extract_via {
    ($t:ty, $getter:path) => {
        impl Extract for $t {
            fn extract(ios: &mut Ios, out: &mut Self) {
                let flags = ios.flags();
                let Some(buf) = ios.buffer() else {
                    ios.setstate(Iostate::BAD | Iostate::FAIL);
                    return;
                };
                let (v, err) = {
                    let mut b = buf.borrow_mut();
                    $getter(&mut *b, flags)
                };
                *out = v;
                if !err.is_empty() {
                    ios.setstate(err);
                }
            }
        }
    };
}

extract_via!(bool, get::get_bool);
extract_via!(i16, get::get_i16);
extract_via!(u16, get::get_u16);
extract_via!(i32, get::get_i32);
extract_via!(u32, get::get_u32);
extract_via!(i64, get::get_i64);
extract_via!(u64, get::get_u64);
extract_via!(f32, get::get_f32);
extract_via!(f64, get::get_f64);
extract_via!(usize, get::get_ptr);

impl Extract for u8 {
    /// A single character; the sentry has already skipped whitespace.
    fn extract(ios: &mut Ios, out: &mut Self) {
        let Some(buf) = ios.buffer() else {
            ios.setstate(Iostate::BAD | Iostate::FAIL);
            return;
        };
        let c = buf.borrow_mut().sbumpc();
        match c {
            Some(c) => *out = c,
            None => ios.setstate(Iostate::EOF | Iostate::FAIL),
        }
    }
}

impl Extract for String {
    /// One whitespace-delimited word, truncated to the field width when
    /// one is set. Width is consumed. An empty word raises FAIL.
    fn extract(ios: &mut Ios, out: &mut Self) {
        out.clear();
        let limit = match ios.width() {
            0 => usize::MAX,
            w => w,
        };
        let Some(buf) = ios.buffer() else {
            ios.set_width(0);
            ios.setstate(Iostate::BAD | Iostate::FAIL);
            return;
        };
        let mut err = Iostate::GOOD;
        {
            let mut b = buf.borrow_mut();
            while out.len() < limit {
                match b.sgetc() {
                    None => {
                        err |= Iostate::EOF;
                        break;
                    }
                    Some(c) if ctype::is_space(c) => break,
                    Some(c) => {
                        out.push(c as char);
                        b.sbumpc();
                    }
                }
            }
        }
        ios.set_width(0);
        if out.is_empty() {
            err |= Iostate::FAIL;
        }
        if !err.is_empty() {
            ios.setstate(err);
        }
    }
}
