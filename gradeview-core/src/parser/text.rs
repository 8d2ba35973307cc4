use super::SubmissionParser;
use crate::marker::{is_block_beginning, Marker, MARKER_CHAR};
use crate::model::AnswerBlock;
use crate::{GradeError, Result};
use std::borrow::Cow;
use std::path::Path;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parser for primary `<user>.txt` exports
///
/// Layout:
/// ```text
/// #<header>          line 1, marker-prefixed
/// #<anything>        line 2, marker-prefixed
/// <field>,<field>    line 3, not marker-prefixed
/// #...               line 4 onward: marker-delimited blocks
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSubmissionParser;

impl SubmissionParser for TextSubmissionParser {
    fn name(&self) -> &'static str {
        "text"
    }

    fn parse(&self, path: &Path, content: &str) -> Result<Vec<AnswerBlock>> {
        let content = normalize_line_breaks(content);
        let mut lines: Vec<&str> = content.lines().collect();

        if lines.len() < 4 {
            return Err(GradeError::structural(
                path,
                format!("expected at least 4 lines, found {}", lines.len()),
            ));
        }

        lines[0] = lines[0].strip_prefix(BYTE_ORDER_MARK).unwrap_or(lines[0]);

        for (index, must_be_marked) in [(0, true), (1, true), (2, false), (3, true)] {
            if lines[index].starts_with(MARKER_CHAR) != must_be_marked {
                let expectation = if must_be_marked { "must" } else { "must not" };
                return Err(GradeError::structural(
                    path,
                    format!("line {} {} start with '{}'", index + 1, expectation, MARKER_CHAR),
                ));
            }
        }

        let header = &lines[0][MARKER_CHAR.len_utf8()..];
        let mut info = lines[2].split(',');
        let (Some(first), Some(second)) = (info.next(), info.next()) else {
            return Err(GradeError::structural(
                path,
                "line 3 must hold two comma-separated fields",
            ));
        };

        let mut header_block = vec![format!("# {header}"), format!("# {first} {second}")];
        let mut blocks = Vec::new();

        for block in split_blocks(&lines[3..]) {
            let is_section = Marker::classify(&block[0]).is_some_and(|m| m.is_section());
            if is_section {
                header_block.push(String::new());
                header_block.extend(block);
            } else {
                blocks.push(AnswerBlock::new(block));
            }
        }

        blocks.insert(0, AnswerBlock::new(header_block));
        Ok(blocks)
    }
}

/// Turn lone `\r` (classic Mac) breaks into `\n`; `\r\n` is left to `str::lines`
///
/// Other Unicode separators (`\u{2028}`, form feed, ...) are not line breaks here.
fn normalize_line_breaks(content: &str) -> Cow<'_, str> {
    if !content.contains('\r') {
        return Cow::Borrowed(content);
    }
    Cow::Owned(content.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Split lines into blocks at every marker line, dropping empty blocks
///
/// Every returned block has at least one line.
pub fn split_blocks(lines: &[&str]) -> Vec<Vec<String>> {
    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in lines {
        if is_block_beginning(line) {
            blocks.push(std::mem::take(&mut current));
        }
        current.push((*line).to_string());
    }
    blocks.push(current);

    blocks.retain(|block| !is_empty_block(block));
    blocks
}

/// A block is empty when everything after an optional leading marker line is blank
fn is_empty_block(lines: &[String]) -> bool {
    let body = match lines.first() {
        Some(first) if first.starts_with(MARKER_CHAR) => &lines[1..],
        _ => lines,
    };
    body.iter().all(|line| line.trim().is_empty())
}
