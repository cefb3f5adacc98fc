//! Output stream operations.
//!
//! Formatted insertion renders through the numeric put layer and writes
//! the finished field in one bulk put. Width is consumed by every
//! formatted insertion; a short write raises BAD. Under unitbuf, every
//! operation ends by syncing the buffer directly — not by calling
//! `flush`, which would re-run the sentry.

use crate::ios::{FmtFlags, Ios, Iostate, OpenMode, SeekDir};
use crate::num::put;
use crate::stream::StreamBase;
use crate::streambuf::{StreamBuf, copy_buffered};

/// A type formatted insertion knows how to render.
pub trait Insert {
    /// Render under the stream's format state and write through its
    /// buffer, raising condition bits on failure.
    fn insert(&self, ios: &mut Ios);
}

/// Output capability.
pub trait WriteStream: StreamBase {
    /// The output sentry: flush the tie, then refuse unless good.
    fn output_ready(&mut self) -> bool {
        self.flush_tie();
        if !self.ios().good() {
            self.ios_mut().setstate(Iostate::FAIL);
            return false;
        }
        true
    }

    /// The sentry epilogue: under unitbuf, sync the buffer in place.
    fn output_epilogue(&mut self) {
        if self.ios().flags().contains(FmtFlags::UNITBUF) && self.ios().good() {
            let ok = match self.ios().buffer() {
                Some(buf) => buf.borrow_mut().pubsync(),
                None => false,
            };
            if !ok {
                self.ios_mut().setstate(Iostate::BAD);
            }
        }
    }

    /// Formatted insertion. Chains.
    fn insert<T: Insert + ?Sized>(&mut self, v: &T) -> &mut Self {
        if self.output_ready() {
            v.insert(self.ios_mut());
        }
        self.output_epilogue();
        self
    }

    /// Write one character, unformatted.
    fn put(&mut self, c: u8) -> &mut Self {
        if self.output_ready() {
            let ok = match self.ios().buffer() {
                Some(buf) => buf.borrow_mut().sputc(c).is_some(),
                None => false,
            };
            if !ok {
                self.ios_mut().setstate(Iostate::BAD);
            }
        }
        self.output_epilogue();
        self
    }

    /// Write a run of characters, unformatted and unpadded.
    fn write(&mut self, src: &[u8]) -> &mut Self {
        if self.output_ready() {
            let n = match self.ios().buffer() {
                Some(buf) => buf.borrow_mut().sputn(src),
                None => 0,
            };
            if n < src.len() {
                self.ios_mut().setstate(Iostate::BAD);
            }
        }
        self.output_epilogue();
        self
    }

    /// Flush buffered output to the backend. Failure raises BAD.
    fn flush(&mut self) -> &mut Self {
        if !self.ios().bad()
            && let Some(buf) = self.ios().buffer()
        {
            let ok = buf.borrow_mut().pubsync();
            if !ok {
                self.ios_mut().setstate(Iostate::BAD);
            }
        }
        self
    }

    /// Current write position, or `None` after failure or on an
    /// unseekable buffer. Clears EOF like the seeks do.
    fn tellp(&mut self) -> Option<u64> {
        let cleared = self.ios().rdstate() & !Iostate::EOF;
        self.ios_mut().clear(cleared);
        if self.ios().fail() {
            return None;
        }
        let buf = self.ios().buffer()?;
        let pos = buf.borrow_mut().pubseekoff(0, SeekDir::Cur, OpenMode::OUT);
        pos
    }

    /// Seek the write position. Clears EOF first; a refused seek raises
    /// FAIL. No-op on an already-failed stream.
    fn seekp(&mut self, pos: u64) -> &mut Self {
        let cleared = self.ios().rdstate() & !Iostate::EOF;
        self.ios_mut().clear(cleared);
        if !self.ios().fail() {
            let ok = match self.ios().buffer() {
                Some(buf) => buf.borrow_mut().pubseekpos(pos, OpenMode::OUT).is_some(),
                None => false,
            };
            if !ok {
                self.ios_mut().setstate(Iostate::FAIL);
            }
        }
        self
    }

    /// Relative form of `seekp`.
    fn seekp_off(&mut self, off: i64, dir: SeekDir) -> &mut Self {
        let cleared = self.ios().rdstate() & !Iostate::EOF;
        self.ios_mut().clear(cleared);
        if !self.ios().fail() {
            let ok = match self.ios().buffer() {
                Some(buf) => buf
                    .borrow_mut()
                    .pubseekoff(off, dir, OpenMode::OUT)
                    .is_some(),
                None => false,
            };
            if !ok {
                self.ios_mut().setstate(Iostate::FAIL);
            }
        }
        self
    }

    /// Drain another buffer into this stream. Transferring nothing
    /// raises FAIL.
    fn insert_streambuf(&mut self, src: &mut dyn StreamBuf) -> &mut Self {
        if self.output_ready() {
            let n = match self.ios().buffer() {
                Some(buf) => {
                    let mut b = buf.borrow_mut();
                    copy_buffered(src, &mut *b)
                }
                None => 0,
            };
            if n == 0 {
                self.ios_mut().setstate(Iostate::FAIL);
            }
        }
        self.output_epilogue();
        self
    }
}

// ---------------------------------------------------------------------------
// Insert implementations
// ---------------------------------------------------------------------------

/// Write a rendered field through the stream buffer.
fn write_field(ios: &mut Ios, bytes: &[u8]) {
    let Some(buf) = ios.buffer() else {
        ios.setstate(Iostate::BAD | Iostate::FAIL);
        return;
    };
    let n = buf.borrow_mut().sputn(bytes);
    if n < bytes.len() {
        ios.setstate(Iostate::BAD);
    }
}

macro_rules! insert_int {
    ($t:ty, $formatter:path) => {
        impl Insert for $t {
            fn insert(&self, ios: &mut Ios) {
                let bytes = $formatter(*self, ios.flags(), ios.width(), ios.fill());
                ios.set_width(0);
                write_field(ios, &bytes);
            }
        }
    };
}

insert_int!(i16, put::format_i16);
insert_int!(u16, put::format_u16);
insert_int!(i32, put::format_i32);
insert_int!(u32, put::format_u32);
insert_int!(i64, put::format_i64);
insert_int!(u64, put::format_u64);
insert_int!(bool, put::format_bool);

macro_rules! insert_float {
    ($t:ty, $formatter:path) => {
        impl Insert for $t {
            fn insert(&self, ios: &mut Ios) {
                let bytes = $formatter(
                    *self,
                    ios.flags(),
                    ios.width(),
                    ios.precision(),
                    ios.fill(),
                );
                ios.set_width(0);
                write_field(ios, &bytes);
            }
        }
    };
}

insert_float!(f32, put::format_f32);
insert_float!(f64, put::format_f64);

impl Insert for usize {
    /// Pointer-sized values print as hex with a base prefix.
    fn insert(&self, ios: &mut Ios) {
        let bytes = put::format_ptr(*self, ios.flags(), ios.width(), ios.fill());
        ios.set_width(0);
        write_field(ios, &bytes);
    }
}

impl Insert for u8 {
    /// A single character still honors the field width.
    fn insert(&self, ios: &mut Ios) {
        let bytes = put::pad_text(&[*self], ios.flags(), ios.width(), ios.fill());
        ios.set_width(0);
        write_field(ios, &bytes);
    }
}

impl Insert for char {
    fn insert(&self, ios: &mut Ios) {
        let b = ios.widen(*self);
        b.insert(ios);
    }
}

impl Insert for [u8] {
    fn insert(&self, ios: &mut Ios) {
        let bytes = put::pad_text(self, ios.flags(), ios.width(), ios.fill());
        ios.set_width(0);
        write_field(ios, &bytes);
    }
}

impl Insert for str {
    fn insert(&self, ios: &mut Ios) {
        self.as_bytes().insert(ios);
    }
}

impl Insert for String {
    fn insert(&self, ios: &mut Ios) {
        self.as_str().insert(ios);
    }
}
