//! corpus-norm library - speaker role resolution and attribute normalization
//!
//! Batch jobs over the CSJ and CWPC corpus tables:
//! - who speaks and who listens in each utterance ([`roles`])
//! - age buckets ([`age`]) and occupation codes ([`occupation`])
//! - utterance stitching from verb context windows ([`stitcher`])
//!
//! [`runner::BatchRunner`] drives one job per invocation against the row store.

pub mod age;
pub mod db;
pub mod error;
pub mod occupation;
pub mod report;
pub mod roles;
pub mod runner;
pub mod stitcher;

pub use error::{Error, Result};
pub use report::RunReport;
pub use runner::{BatchRunner, Job};
