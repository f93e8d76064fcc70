// File I/O: CSV and Excel sources in, directory CSV out

pub mod csv;
pub mod output;
pub mod xlsx;

pub use output::{write_bytes, write_directory};
