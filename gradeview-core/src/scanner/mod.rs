//! Submission directory scanner
//!
//! Classifies the files of one directory into per-user primary and
//! supplementary submissions. The allow-list is strict: once a directory
//! holds any primary file, every other file must belong to a known user.

mod classify;
mod config;

pub use classify::{
    classify_directory, list_subdirectories, FileClassifier, ScanOutcome, SubmissionFile,
    SubmissionFormat, SubmissionKind, UserFiles,
};
pub use config::ScanConfig;
