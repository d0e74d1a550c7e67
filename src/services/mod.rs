//! Services - batch orchestration
//!
//! This module contains the batch processing logic:
//! - `batch` - Streams a delimited table through the classifier, applying
//!   the configured row failure policy

pub mod batch;

// Re-export commonly used types
pub use batch::{BatchOutcome, BatchRunner};
