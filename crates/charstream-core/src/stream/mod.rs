//! Stream front-ends.
//!
//! `InputStream`, `OutputStream`, and the bidirectional `Stream` are
//! thin shells: each holds shared condition/format state (`Ios`) plus,
//! for readers, the last unformatted transfer count. All behavior lives
//! in the [`ReadStream`] and [`WriteStream`] capability traits, so the
//! bidirectional stream is plain composition, not a diamond.
//!
//! Every operation opens with the sentry protocol: verify the stream is
//! good, flush any tied output stream, and (for formatted input) skip
//! whitespace. A failed sentry means the operation touches neither the
//! buffer nor its output operand.

mod manip;
mod read;
mod write;

pub use manip::Manip;
pub use read::{Extract, ReadStream};
pub use write::{Insert, WriteStream};

use crate::ios::{BufHandle, Ios};

/// Access to the shared stream state. Everything else is defaulted on
/// top of this.
pub trait StreamBase {
    fn ios(&self) -> &Ios;

    fn ios_mut(&mut self) -> &mut Ios;

    /// Flush the tied stream, if any. A tie that is already borrowed
    /// (a stream tied to itself, or a tie cycle) is skipped rather than
    /// recursed into.
    fn flush_tie(&mut self) {
        if let Some(tie) = self.ios().tie()
            && let Ok(mut tied) = tie.try_borrow_mut()
        {
            tied.flush();
        }
    }
}

/// Formatted input stream.
pub struct InputStream {
    ios: Ios,
    gcount: usize,
}

impl InputStream {
    pub fn new(buf: BufHandle) -> Self {
        Self {
            ios: Ios::new(Some(buf)),
            gcount: 0,
        }
    }
}

impl StreamBase for InputStream {
    fn ios(&self) -> &Ios {
        &self.ios
    }

    fn ios_mut(&mut self) -> &mut Ios {
        &mut self.ios
    }
}

impl ReadStream for InputStream {
    fn gcount(&self) -> usize {
        self.gcount
    }

    fn set_gcount(&mut self, n: usize) {
        self.gcount = n;
    }
}

/// Formatted output stream.
pub struct OutputStream {
    ios: Ios,
}

impl OutputStream {
    pub fn new(buf: BufHandle) -> Self {
        Self {
            ios: Ios::new(Some(buf)),
        }
    }
}

impl StreamBase for OutputStream {
    fn ios(&self) -> &Ios {
        &self.ios
    }

    fn ios_mut(&mut self) -> &mut Ios {
        &mut self.ios
    }
}

impl WriteStream for OutputStream {}

/// Bidirectional stream: both capabilities over one state block.
pub struct Stream {
    ios: Ios,
    gcount: usize,
}

impl Stream {
    pub fn new(buf: BufHandle) -> Self {
        Self {
            ios: Ios::new(Some(buf)),
            gcount: 0,
        }
    }
}

impl StreamBase for Stream {
    fn ios(&self) -> &Ios {
        &self.ios
    }

    fn ios_mut(&mut self) -> &mut Ios {
        &mut self.ios
    }
}

impl ReadStream for Stream {
    fn gcount(&self) -> usize {
        self.gcount
    }

    fn set_gcount(&mut self, n: usize) {
        self.gcount = n;
    }
}

impl WriteStream for Stream {}
