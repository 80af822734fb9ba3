//! Normalization and attribution engine for health-merge.
//!
//! Validates raw sleep and workout records, pins local wall-clock readings
//! to the UTC timeline, and decides which UTC civil date each record counts
//! against.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
pub mod validation;

pub use error::{MergeError, Result};
