//! Submission parsers
//!
//! Each parser turns the content of one file into an ordered list of
//! [`AnswerBlock`]s. Primary text files always yield a header block first;
//! notebook exports yield only the cells that carry a numbered-answer marker.

mod notebook;
mod text;

pub use notebook::NotebookSubmissionParser;
pub use text::{split_blocks, TextSubmissionParser};

use crate::model::AnswerBlock;
use crate::scanner::{SubmissionFile, SubmissionFormat, SubmissionKind};
use crate::{GradeError, Result};
use std::fs;
use std::path::Path;

/// Parses the content of one submission file
pub trait SubmissionParser {
    /// Short name used in log output
    fn name(&self) -> &'static str;

    /// Parse already-loaded content; `path` is only used for error reporting
    fn parse(&self, path: &Path, content: &str) -> Result<Vec<AnswerBlock>>;

    /// Read and parse a file
    fn parse_file(&self, path: &Path) -> Result<Vec<AnswerBlock>> {
        let content = fs::read_to_string(path)?;
        let blocks = self.parse(path, &content)?;
        tracing::debug!("{} parser: {:?} -> {} blocks", self.name(), path, blocks.len());
        Ok(blocks)
    }
}

/// Pick the parser for a classified file
pub fn parser_for(file: &SubmissionFile) -> Result<&'static dyn SubmissionParser> {
    let parser: &'static dyn SubmissionParser = match (file.kind, file.format) {
        (SubmissionKind::Primary, _) => &TextSubmissionParser,
        (SubmissionKind::Supplementary, SubmissionFormat::Notebook) => &NotebookSubmissionParser,
        (SubmissionKind::Supplementary, format) => {
            return Err(GradeError::structural(
                &file.path,
                format!("no parser for supplementary format {:?}", format),
            ))
        }
    };
    Ok(parser)
}
