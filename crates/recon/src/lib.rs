//! `schooldir-recon`: multi-source school directory reconciliation engine.
//!
//! Pure engine crate: adapters turn decoded tables and embedded lists into
//! canonical [`Record`]s, [`reconcile`] merges them first-write-wins, and
//! [`sink`] serializes the result. No filesystem or network access.

pub mod adapter;
pub mod audit;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod external;
pub mod literal;
pub mod model;
pub mod search;
pub mod sink;
pub mod spreadsheet;
pub mod summary;
pub mod table;

pub use adapter::{AdapterOutput, AliasOverrides, ColumnAliases, SourceAdapter};
pub use audit::{audit, audit_source, AuditReport};
pub use engine::{append, collect, reconcile, ReconcileReport, Reconciliation, SourceBatch};
pub use error::{DirectoryError, Result, SchemaError};
pub use external::{ExternalCsvAdapter, TypePolicy};
pub use literal::{LiteralListAdapter, LiteralTable};
pub use model::{DedupKey, Record, RecordBuilder, SchoolType, DEFAULT_COUNTRY};
pub use search::{search, SearchError, SearchHit, SearchQuery};
pub use spreadsheet::SpreadsheetAdapter;
pub use summary::DirectorySummary;
pub use table::{Table, TableRow};
