//! # MAT-file codec
//!
//! Minimal Level 5 MAT-file support for the `movieInfo` structure: double
//! matrices and struct arrays, optionally zlib-compressed, little-endian.
//!
//! ## Layout written for movieInfo
//!
//! ```text
//! [128 bytes]  header: descriptive text, version 0x0100, "IM"
//! miMATRIX     "movieInfo", mxSTRUCT_CLASS, (max_frame + 1) x 1
//!   fields     xCoord, yCoord, amp
//!   per frame  three miMATRIX mxDOUBLE_CLASS, N x 2 or 0 x 0
//! ```

mod error;
mod reader;
mod types;
mod writer;

#[cfg(test)]
mod tests;

pub use error::MatError;
pub use reader::{movie_info_from_value, read_movie_info, read_variables, MAX_STRUCT_DEPTH};
pub use types::{DataType, MatValue, MatVariable, HEADER_SIZE};
pub use writer::{movie_info_value, write_movie_info_file, MatWriter, MatWriterConfig};
