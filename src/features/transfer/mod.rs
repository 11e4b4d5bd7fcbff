//! Moving the session log in and out as CSV.

pub mod codec;

pub use codec::{default_filename, export_csv, parse_csv, read_import, write_export, ImportReport, BOM, HEADER};
