//! `lokal-recon`: translation reconciliation.
//!
//! Pure logic crate: receives records and rows already loaded by the caller,
//! returns per-key entries, filtered exports, diffs and upload payloads.
//! No network, no file IO.

pub mod classify;
pub mod collect;
pub mod diff;
pub mod error;
pub mod model;
pub mod payload;

pub use classify::{classify, stats, ExportFilter, TranslationStats};
pub use collect::{collect, collect_rows, Collected, UnknownLocalePolicy};
pub use diff::{diff, Diff, DiffRow, DiffStats, DiffStatus};
pub use error::ReconError;
pub use model::{Locale, SheetRow, TranslationEntry, TranslationMap, TranslationRecord, UploadItem};
pub use payload::{build_payload, PayloadOrder};

/// Category used by the LUDOS service when none is configured.
pub const DEFAULT_CATEGORY: &str = "ludos";
