//! imrec-io - Tabular data and CSV I/O
//!
//! This crate provides the row/column model the reconciliation engine
//! operates on and the readers/writers at its edges:
//!
//! - **Table**: ordered columns, rows of dynamically typed [`Value`]s
//! - **CSV reader**: configurable delimiter and quoting, NA markers,
//!   decoding with an ordered list of fallback encodings
//! - **CSV writer**: configurable delimiter, quoting, line terminator and
//!   output encoding
//!
//! # Design
//!
//! Columns are addressed by exact, case-sensitive name. Columns the engine
//! does not understand are carried through untouched.

pub mod csv_reader;
pub mod csv_writer;
pub mod encoding;
pub mod options;
pub mod reader;
pub mod table;

pub use csv_reader::*;
pub use csv_writer::*;
pub use encoding::*;
pub use options::*;
pub use reader::*;
pub use table::*;
