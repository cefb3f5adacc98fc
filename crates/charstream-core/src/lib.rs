//! # charstream-core
//!
//! A freestanding buffered character I/O stack: stream buffers with
//! pluggable backends, formatted numeric extraction and insertion, and
//! input/output stream front-ends over shared buffers.
//!
//! The stack is byte-oriented and locale-free. Failure is communicated
//! through stream condition state, never through panics. No `unsafe`
//! code is permitted at the crate level.

#![deny(unsafe_code)]

pub mod ctype;
pub mod ios;
pub mod num;
pub mod serial;
pub mod sstream;
pub mod stream;
pub mod streambuf;
pub mod traits;

pub use ios::{FmtFlags, Ios, Iostate, OpenMode, SeekDir};
pub use serial::{SerialBuf, SerialPort};
pub use sstream::StringBuf;
pub use stream::{InputStream, Manip, OutputStream, ReadStream, Stream, StreamBase, WriteStream};
pub use streambuf::StreamBuf;
