//! Stream manipulators.
//!
//! One closed enum instead of bare function pointers: a manipulator is
//! data, applied to the stream state when inserted (or via `apply` on
//! the input side). `Endl`, `Ends`, and `Flush` act through the buffer;
//! everything else edits flags, width, precision, or fill.

use crate::ios::{FmtFlags, Ios, Iostate};
use crate::stream::write::Insert;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Manip {
    /// Newline, then flush.
    Endl,
    /// NUL terminator.
    Ends,
    Flush,
    SetW(usize),
    SetFill(u8),
    SetPrecision(usize),
    Boolalpha(bool),
    Showbase(bool),
    Showpoint(bool),
    Showpos(bool),
    Uppercase(bool),
    Unitbuf(bool),
    Skipws(bool),
    Left,
    Right,
    Internal,
    Dec,
    Hex,
    Oct,
    Fixed,
    Scientific,
    Hexfloat,
    Defaultfloat,
}

impl Manip {
    pub fn apply_ios(self, ios: &mut Ios) {
        match self {
            Manip::Endl => {
                put_through(ios, b'\n');
                sync_through(ios);
            }
            Manip::Ends => put_through(ios, 0),
            Manip::Flush => sync_through(ios),
            Manip::SetW(w) => {
                ios.set_width(w);
            }
            Manip::SetFill(c) => {
                ios.set_fill(c);
            }
            Manip::SetPrecision(p) => {
                ios.set_precision(p);
            }
            Manip::Boolalpha(on) => toggle(ios, FmtFlags::BOOLALPHA, on),
            Manip::Showbase(on) => toggle(ios, FmtFlags::SHOWBASE, on),
            Manip::Showpoint(on) => toggle(ios, FmtFlags::SHOWPOINT, on),
            Manip::Showpos(on) => toggle(ios, FmtFlags::SHOWPOS, on),
            Manip::Uppercase(on) => toggle(ios, FmtFlags::UPPERCASE, on),
            Manip::Unitbuf(on) => toggle(ios, FmtFlags::UNITBUF, on),
            Manip::Skipws(on) => toggle(ios, FmtFlags::SKIPWS, on),
            Manip::Left => {
                ios.setf_mask(FmtFlags::LEFT, FmtFlags::ADJUSTFIELD);
            }
            Manip::Right => {
                ios.setf_mask(FmtFlags::RIGHT, FmtFlags::ADJUSTFIELD);
            }
            Manip::Internal => {
                ios.setf_mask(FmtFlags::INTERNAL, FmtFlags::ADJUSTFIELD);
            }
            Manip::Dec => {
                ios.setf_mask(FmtFlags::DEC, FmtFlags::BASEFIELD);
            }
            Manip::Hex => {
                ios.setf_mask(FmtFlags::HEX, FmtFlags::BASEFIELD);
            }
            Manip::Oct => {
                ios.setf_mask(FmtFlags::OCT, FmtFlags::BASEFIELD);
            }
            Manip::Fixed => {
                ios.setf_mask(FmtFlags::FIXED, FmtFlags::FLOATFIELD);
            }
            Manip::Scientific => {
                ios.setf_mask(FmtFlags::SCIENTIFIC, FmtFlags::FLOATFIELD);
            }
            Manip::Hexfloat => {
                ios.setf_mask(FmtFlags::FLOATFIELD, FmtFlags::FLOATFIELD);
            }
            Manip::Defaultfloat => {
                ios.setf_mask(FmtFlags::empty(), FmtFlags::FLOATFIELD);
            }
        }
    }
}

fn toggle(ios: &mut Ios, flag: FmtFlags, on: bool) {
    if on {
        ios.setf(flag);
    } else {
        ios.unsetf(flag);
    }
}

fn put_through(ios: &mut Ios, c: u8) {
    let Some(buf) = ios.buffer() else {
        ios.setstate(Iostate::BAD | Iostate::FAIL);
        return;
    };
    if buf.borrow_mut().sputc(c).is_none() {
        ios.setstate(Iostate::BAD);
    }
}

fn sync_through(ios: &mut Ios) {
    let Some(buf) = ios.buffer() else {
        ios.setstate(Iostate::BAD | Iostate::FAIL);
        return;
    };
    if !buf.borrow_mut().pubsync() {
        ios.setstate(Iostate::BAD);
    }
}

impl Insert for Manip {
    fn insert(&self, ios: &mut Ios) {
        self.apply_ios(ios);
    }
}
