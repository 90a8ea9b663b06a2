//! Batch distance pipeline over a host table.
//!
//! [`RecordPager`] enumerates a table's records, [`BatchOrchestrator`] feeds
//! each record pair through a [`DistanceSource`] and writes accepted results
//! back in fixed-size batches. The table itself sits behind the
//! [`TableHost`] trait.
//!
//! [`DistanceSource`]: routecalc_amap::DistanceSource

pub mod error;
pub mod orchestrator;
pub mod pacing;
pub mod pager;
pub mod request;
pub mod summary;
pub mod table;

pub use error::{BatchError, TableError};
pub use orchestrator::{run_pipeline, BatchOrchestrator, BatchSettings};
pub use pacing::Pacer;
pub use pager::{RecordPager, MAX_PAGES};
pub use request::RunRequest;
pub use summary::{RecordFailure, RecordOutcome, RunState, RunSummary, SkipReason};
pub use table::{
    FieldKind, FieldMeta, Record, RecordPage, RecordUpdate, TableHost, TableMeta,
};
