//! Delimited Tables
//!
//! Reads header-prefixed delimited text into a rectangular table of raw cells
//! and provides the positional and named selections used by the feature and
//! label pipelines.

mod error;
mod table;

pub use error::TableError;
pub use table::{delimiter_byte, read_delimited, CsvTable};
