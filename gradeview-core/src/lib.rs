//! gradeview - terminal browser for per-student answer submissions
//!
//! Loads a directory of submission exports into a [`Corpus`] of
//! display-ready answer blocks and provides the navigation state machine the
//! terminal front-end drives.
//!
//! Pipeline: [`scanner`] -> [`parser`] -> [`assembler`] -> [`navigation`].

pub mod assembler;
pub mod config;
pub mod error;
pub mod footnotes;
pub mod lint;
pub mod marker;
pub mod model;
pub mod navigation;
pub mod parser;
pub mod pipeline;
pub mod scanner;

pub use assembler::{annotate, assemble, BlockContext};
pub use config::ViewerConfig;
pub use error::{GradeError, Result};
pub use marker::{is_block_beginning, Marker};
pub use model::{AnswerBlock, Corpus, Cursor, DisplayBlock, RawSubmission, UserAnswers, UserId};
pub use navigation::{AnswerView, Key, Move, Step, TreeView, ViewerState};
pub use parser::{NotebookSubmissionParser, SubmissionParser, TextSubmissionParser};
pub use pipeline::load_corpus;
pub use scanner::{classify_directory, FileClassifier, ScanConfig, ScanOutcome};
