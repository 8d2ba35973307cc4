use super::SubmissionParser;
use crate::marker::contains_numbered_answer;
use crate::model::AnswerBlock;
use crate::{GradeError, Result};
use serde::Deserialize;
use std::path::Path;

/// Parser for supplementary notebook exports (`.ipynb` / `.json`)
///
/// Only code cells whose source carries a numbered-answer marker become
/// blocks, one block per cell, in document order.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotebookSubmissionParser;

/// Only nbformat v4 documents are accepted
const NBFORMAT_MAJOR: u32 = 4;

/// The subset of nbformat v4 needed here
#[derive(Debug, Deserialize)]
struct NotebookDocument {
    nbformat: u32,
    cells: Vec<NotebookCell>,
}

#[derive(Debug, Deserialize)]
struct NotebookCell {
    cell_type: String,
    #[serde(default)]
    source: CellSource,
}

/// nbformat stores source either as one string or as a list of line strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CellSource {
    Text(String),
    Lines(Vec<String>),
}

impl Default for CellSource {
    fn default() -> Self {
        CellSource::Text(String::new())
    }
}

impl CellSource {
    fn joined(&self) -> String {
        match self {
            CellSource::Text(text) => text.clone(),
            CellSource::Lines(lines) => lines.concat(),
        }
    }
}

impl SubmissionParser for NotebookSubmissionParser {
    fn name(&self) -> &'static str {
        "notebook"
    }

    fn parse(&self, path: &Path, content: &str) -> Result<Vec<AnswerBlock>> {
        let document: NotebookDocument =
            serde_json::from_str(content).map_err(|source| GradeError::Notebook {
                path: path.to_path_buf(),
                source,
            })?;

        if document.nbformat != NBFORMAT_MAJOR {
            return Err(GradeError::structural(
                path,
                format!(
                    "unsupported nbformat {} (expected {})",
                    document.nbformat, NBFORMAT_MAJOR
                ),
            ));
        }

        let blocks = document
            .cells
            .iter()
            .filter(|cell| cell.cell_type == "code")
            .map(|cell| cell.source.joined())
            .filter(|source| contains_numbered_answer(source))
            .map(|source| AnswerBlock::new(source.lines().map(str::to_string).collect()))
            .collect();

        Ok(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<Vec<AnswerBlock>> {
        NotebookSubmissionParser.parse(Path::new("us000001_nb.ipynb"), content)
    }

    #[test]
    fn test_selects_marked_code_cells() {
        let content = r##"{
            "nbformat": 4,
            "cells": [
                {"cell_type": "markdown", "source": "# 課題解答1.1 (markdown is ignored)"},
                {"cell_type": "code", "source": ["# 課題解答1.1\n", "print(1)\n"]},
                {"cell_type": "code", "source": "print('no marker')"},
                {"cell_type": "code", "source": "#課題解答1.2\nx = 2"}
            ]
        }"##;

        let blocks = parse(content).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines(), ["# 課題解答1.1", "print(1)"]);
        assert_eq!(blocks[1].lines(), ["#課題解答1.2", "x = 2"]);
    }

    #[test]
    fn test_marker_in_middle_of_cell() {
        let content = r#"{"nbformat": 4, "cells": [{"cell_type": "code", "source": "import os\n# 課題解答2.1\nos.getcwd()"}]}"#;
        let blocks = parse(content).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].line(0), Some("import os"));
    }

    #[test]
    fn test_no_cells() {
        assert!(parse(r#"{"nbformat": 4, "cells": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_json_without_notebook_fields_is_rejected() {
        let err = parse("{}").unwrap_err();
        assert!(matches!(err, GradeError::Notebook { .. }));

        let err = parse(r#"{"score": 3, "comment": "late"}"#).unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("us000001_nb.ipynb"));
    }

    #[test]
    fn test_other_nbformat_major_is_rejected() {
        let err = parse(r#"{"nbformat": 3, "cells": []}"#).unwrap_err();
        assert!(matches!(err, GradeError::Structural { .. }));
        assert!(err.to_string().contains("unsupported nbformat 3"));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse("not json").unwrap_err();
        assert!(matches!(err, GradeError::Notebook { .. }));
        assert!(err.is_structural());
    }
}
