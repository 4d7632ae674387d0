//! Types and traits for recording metrics of episodes and evaluations.
//!
//! * [`Record`] - a container of key/value pairs of various data types
//! * [`RecordValue`] - the kinds of values a [`Record`] can hold
//! * [`Recorder`] - the interface for writing and storing records
//! * [`RecordStorage`] - aggregates stored records into summary statistics
//! * [`BufferedRecorder`] - keeps written records in memory
//! * [`NullRecorder`] - discards all records
//!
//! ```rust
//! use beamsel_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("step", RecordValue::Scalar(1.0));
//! record.insert("reward", RecordValue::Scalar(0.5));
//! record.insert("obs", RecordValue::Array1(vec![1.0, 5.0, 2.0, 0.0]));
//! assert_eq!(record.get_scalar("reward").unwrap(), 0.5);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
pub use storage::RecordStorage;
