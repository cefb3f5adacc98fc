//! Formatting and condition state shared by all streams.
//!
//! Holds the pieces every stream front-end carries: format flags with
//! their three mutually-exclusive groups, one-shot field width, float
//! precision, the four condition bits, the fill character, the attached
//! stream buffer, and an optional tied output stream.
//!
//! Buffer attachment is a shared `Rc<RefCell<dyn StreamBuf>>` handle so
//! that several front-ends (and a tied peer) can drive one buffer; the
//! handle is never owned by the stream that reads or writes through it.

use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};
use std::cell::RefCell;
use std::rc::Rc;

use crate::stream::OutputStream;
use crate::streambuf::StreamBuf;

/// Shared handle to a stream buffer.
pub type BufHandle = Rc<RefCell<dyn StreamBuf>>;

/// Shared handle to a tied output stream.
pub type TieHandle = Rc<RefCell<OutputStream>>;

macro_rules! bitmask {
    ($(#[$meta:meta])* $name:ident : $repr:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name($repr);

        impl $name {
            pub const fn empty() -> Self {
                Self(0)
            }

            pub const fn bits(self) -> $repr {
                self.0
            }

            pub const fn from_bits(bits: $repr) -> Self {
                Self(bits)
            }

            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            /// True when every bit of `other` is set in `self`.
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// True when `self` and `other` share any bit.
            pub const fn intersects(self, other: Self) -> bool {
                self.0 & other.0 != 0
            }
        }

        impl BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl BitAnd for $name {
            type Output = Self;
            fn bitand(self, rhs: Self) -> Self {
                Self(self.0 & rhs.0)
            }
        }

        impl BitAndAssign for $name {
            fn bitand_assign(&mut self, rhs: Self) {
                self.0 &= rhs.0;
            }
        }

        impl Not for $name {
            type Output = Self;
            fn not(self) -> Self {
                Self(!self.0 & Self::ALL.0)
            }
        }
    };
}

bitmask! {
    /// Format control flags.
    FmtFlags: u16
}

impl FmtFlags {
    pub const BOOLALPHA: FmtFlags = FmtFlags(1 << 0);
    pub const DEC: FmtFlags = FmtFlags(1 << 1);
    pub const FIXED: FmtFlags = FmtFlags(1 << 2);
    pub const HEX: FmtFlags = FmtFlags(1 << 3);
    pub const INTERNAL: FmtFlags = FmtFlags(1 << 4);
    pub const LEFT: FmtFlags = FmtFlags(1 << 5);
    pub const OCT: FmtFlags = FmtFlags(1 << 6);
    pub const RIGHT: FmtFlags = FmtFlags(1 << 7);
    pub const SCIENTIFIC: FmtFlags = FmtFlags(1 << 8);
    pub const SHOWBASE: FmtFlags = FmtFlags(1 << 9);
    pub const SHOWPOINT: FmtFlags = FmtFlags(1 << 10);
    pub const SHOWPOS: FmtFlags = FmtFlags(1 << 11);
    pub const SKIPWS: FmtFlags = FmtFlags(1 << 12);
    pub const UNITBUF: FmtFlags = FmtFlags(1 << 13);
    pub const UPPERCASE: FmtFlags = FmtFlags(1 << 14);

    /// Justification group: left | right | internal.
    pub const ADJUSTFIELD: FmtFlags = FmtFlags(1 << 4 | 1 << 5 | 1 << 7);
    /// Integer base group: dec | hex | oct.
    pub const BASEFIELD: FmtFlags = FmtFlags(1 << 1 | 1 << 3 | 1 << 6);
    /// Float notation group: fixed | scientific (both set means hexfloat).
    pub const FLOATFIELD: FmtFlags = FmtFlags(1 << 2 | 1 << 8);

    pub const ALL: FmtFlags = FmtFlags(0x7fff);
}

bitmask! {
    /// Stream condition state. `GOOD` is the absence of all bits.
    Iostate: u8
}

impl Iostate {
    pub const GOOD: Iostate = Iostate(0);
    pub const BAD: Iostate = Iostate(1 << 0);
    pub const EOF: Iostate = Iostate(1 << 1);
    pub const FAIL: Iostate = Iostate(1 << 2);

    pub const ALL: Iostate = Iostate(0b111);
}

bitmask! {
    /// How a buffer is opened: direction plus positioning policy.
    OpenMode: u8
}

impl OpenMode {
    pub const APP: OpenMode = OpenMode(1 << 0);
    pub const ATE: OpenMode = OpenMode(1 << 1);
    pub const BINARY: OpenMode = OpenMode(1 << 2);
    pub const IN: OpenMode = OpenMode(1 << 3);
    pub const OUT: OpenMode = OpenMode(1 << 4);
    pub const TRUNC: OpenMode = OpenMode(1 << 5);

    pub const ALL: OpenMode = OpenMode(0b11_1111);
}

/// Anchor for a relative seek.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekDir {
    Beg,
    Cur,
    End,
}

// ---------------------------------------------------------------------------
// Base state
// ---------------------------------------------------------------------------

/// Format and condition state independent of any buffer.
///
/// Width is one-shot: each formatted operation that honors it resets it
/// to zero. Precision and flags persist.
#[derive(Debug, Clone)]
pub struct IosCore {
    flags: FmtFlags,
    precision: usize,
    width: usize,
    state: Iostate,
}

impl Default for IosCore {
    fn default() -> Self {
        Self::new()
    }
}

impl IosCore {
    pub fn new() -> Self {
        Self {
            flags: FmtFlags::DEC | FmtFlags::SKIPWS,
            precision: 6,
            width: 0,
            state: Iostate::GOOD,
        }
    }

    pub fn flags(&self) -> FmtFlags {
        self.flags
    }

    /// Replace the whole flag word. Returns the previous value.
    pub fn set_flags(&mut self, flags: FmtFlags) -> FmtFlags {
        let old = self.flags;
        self.flags = flags;
        old
    }

    /// Set the given bits without touching the rest.
    pub fn setf(&mut self, flags: FmtFlags) -> FmtFlags {
        let old = self.flags;
        self.flags |= flags;
        old
    }

    /// Clear the bits of `mask`, then set `flags & mask`. This is how the
    /// mutually-exclusive groups stay exclusive.
    pub fn setf_mask(&mut self, flags: FmtFlags, mask: FmtFlags) -> FmtFlags {
        let old = self.flags;
        self.flags = (self.flags & !mask) | (flags & mask);
        old
    }

    pub fn unsetf(&mut self, flags: FmtFlags) {
        self.flags &= !flags;
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn set_precision(&mut self, precision: usize) -> usize {
        let old = self.precision;
        self.precision = precision;
        old
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn set_width(&mut self, width: usize) -> usize {
        let old = self.width;
        self.width = width;
        old
    }

    pub fn rdstate(&self) -> Iostate {
        self.state
    }
}

// ---------------------------------------------------------------------------
// Buffer-attached state
// ---------------------------------------------------------------------------

/// Per-stream state plus the attached buffer, fill character, and tie.
pub struct Ios {
    core: IosCore,
    buf: Option<BufHandle>,
    fill: u8,
    tie: Option<TieHandle>,
}

impl Ios {
    /// Initialize over an optional buffer. No buffer means the stream
    /// starts bad.
    pub fn new(buf: Option<BufHandle>) -> Self {
        let mut ios = Self {
            core: IosCore::new(),
            buf: None,
            fill: b' ',
            tie: None,
        };
        ios.init(buf);
        ios
    }

    /// Re-initialize to default formatting state over `buf`.
    pub fn init(&mut self, buf: Option<BufHandle>) {
        self.core = IosCore::new();
        self.fill = b' ';
        self.tie = None;
        let state = if buf.is_some() {
            Iostate::GOOD
        } else {
            Iostate::BAD
        };
        self.buf = buf;
        self.core.state = state;
    }

    // ---- condition state ----

    pub fn rdstate(&self) -> Iostate {
        self.core.state
    }

    pub fn good(&self) -> bool {
        self.core.state.is_empty()
    }

    pub fn eof(&self) -> bool {
        self.core.state.contains(Iostate::EOF)
    }

    /// True on FAIL or BAD: a failed operation or a lost stream.
    pub fn fail(&self) -> bool {
        self.core.state.intersects(Iostate::FAIL | Iostate::BAD)
    }

    pub fn bad(&self) -> bool {
        self.core.state.contains(Iostate::BAD)
    }

    /// Overwrite the condition state. With no attached buffer the BAD
    /// bit is forced on.
    pub fn clear(&mut self, state: Iostate) {
        self.core.state = if self.buf.is_some() {
            state
        } else {
            state | Iostate::BAD
        };
    }

    /// OR bits into the condition state.
    pub fn setstate(&mut self, state: Iostate) {
        self.clear(self.core.state | state);
    }

    // ---- buffer and tie ----

    pub fn buffer(&self) -> Option<BufHandle> {
        self.buf.clone()
    }

    pub fn has_buffer(&self) -> bool {
        self.buf.is_some()
    }

    /// Rebind the buffer and reset the condition state.
    pub fn set_buffer(&mut self, buf: Option<BufHandle>) -> Option<BufHandle> {
        let old = self.buf.take();
        self.buf = buf;
        self.clear(Iostate::GOOD);
        old
    }

    pub fn tie(&self) -> Option<TieHandle> {
        self.tie.clone()
    }

    pub fn set_tie(&mut self, tie: Option<TieHandle>) -> Option<TieHandle> {
        core::mem::replace(&mut self.tie, tie)
    }

    // ---- fill and widening ----

    pub fn fill(&self) -> u8 {
        self.fill
    }

    pub fn set_fill(&mut self, fill: u8) -> u8 {
        core::mem::replace(&mut self.fill, fill)
    }

    /// Map a char into the byte character set. Non-ASCII has no
    /// representation here and widens to `?`.
    pub fn widen(&self, c: char) -> u8 {
        if c.is_ascii() { c as u8 } else { b'?' }
    }

    /// Copy formatting state (flags, precision, width, fill, tie) from
    /// `other`. Condition state and buffer binding are preserved.
    pub fn copyfmt(&mut self, other: &Ios) {
        let state = self.core.state;
        self.core = other.core.clone();
        self.core.state = state;
        self.fill = other.fill;
        self.tie = other.tie.clone();
    }

    // ---- forwarded format state ----

    pub fn flags(&self) -> FmtFlags {
        self.core.flags()
    }

    pub fn set_flags(&mut self, flags: FmtFlags) -> FmtFlags {
        self.core.set_flags(flags)
    }

    pub fn setf(&mut self, flags: FmtFlags) -> FmtFlags {
        self.core.setf(flags)
    }

    pub fn setf_mask(&mut self, flags: FmtFlags, mask: FmtFlags) -> FmtFlags {
        self.core.setf_mask(flags, mask)
    }

    pub fn unsetf(&mut self, flags: FmtFlags) {
        self.core.unsetf(flags)
    }

    pub fn precision(&self) -> usize {
        self.core.precision()
    }

    pub fn set_precision(&mut self, precision: usize) -> usize {
        self.core.set_precision(precision)
    }

    pub fn width(&self) -> usize {
        self.core.width()
    }

    pub fn set_width(&mut self, width: usize) -> usize {
        self.core.set_width(width)
    }
}
