//! Formatted numeric conversion.
//!
//! Locale-free extraction and insertion of the numeric types, driven by
//! the stream format flags. Extraction reads through the public buffer
//! interface only; insertion renders to byte vectors the stream layer
//! writes out. Errors are reported as condition-state bits, never as
//! panics.

pub mod ftoa;
pub mod get;
pub mod put;
