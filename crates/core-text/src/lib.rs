//! Text primitives shared by the editor: incremental UTF-8 decoding and
//! monospaced display-width measurement.
//!
//! Both concerns live in one leaf crate because every consumer of one needs
//! the other: the rune reader decodes raw terminal bytes into `char`s and
//! the renderer measures those same `char`s in terminal columns.

pub mod utf8;
pub mod width;

pub use utf8::{Decoded, Utf8Decoder};
pub use width::{rune_width, slice_width, str_width};
