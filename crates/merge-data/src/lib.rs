//! Batch plumbing for health-merge.
//!
//! Loads the sleep and workout documents, folds validated records into
//! per-day aggregates, runs the sleep/exercise comparison and builds the
//! output document.

pub mod aggregator;
pub mod analysis;
pub mod output;
pub mod pipeline;
pub mod reader;
