//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success                                                   |
//! | 1    | General error (unspecified)                               |
//! | 2    | Usage error (bad args, bad config, unknown table id)      |
//! | 3    | Schema error (a source produced an invalid record)        |
//! | 4    | Source unavailable (missing file, failed download)        |
//! | 5    | Output could not be written                               |
//! | 6    | `validate` found problems in a directory file             |
//!
//! Codes 3-5 abort before anything is written: the previous output file,
//! if any, is left as it was.

use schooldir_recon::DirectoryError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unreadable or invalid settings file.
pub const EXIT_USAGE: u8 = 2;

/// A record failed canonical validation (e.g. unknown school type).
pub const EXIT_SCHEMA: u8 = 3;

/// A selected source could not be read or downloaded.
pub const EXIT_SOURCE_UNAVAILABLE: u8 = 4;

/// The directory file could not be written.
pub const EXIT_WRITE: u8 = 5;

/// `validate` found duplicate keys, unsorted rows, or missing columns.
pub const EXIT_AUDIT_PROBLEMS: u8 = 6;

/// Map a pipeline error to its exit code.
pub fn directory_exit_code(err: &DirectoryError) -> u8 {
    match err {
        DirectoryError::Schema { .. } => EXIT_SCHEMA,
        DirectoryError::SourceUnavailable { .. } => EXIT_SOURCE_UNAVAILABLE,
        DirectoryError::Io(_) => EXIT_WRITE,
    }
}
