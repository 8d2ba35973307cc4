//! Block assembly
//!
//! Turns per-user raw blocks into the display-ready [`Corpus`]. Every block
//! gets the user's two header lines with position counters:
//!
//! ```text
//! # <title> [<user rank>/<user count>]
//! # <info> [<block number>/<block count>]
//!
//! <block lines>
//! ```
//!
//! Annotation is a pure function of the raw block and its [`BlockContext`].
//! Its output is a [`DisplayBlock`], which cannot be annotated again.

use crate::model::{AnswerBlock, Corpus, DisplayBlock, RawSubmission, UserAnswers};
use crate::{GradeError, Result};

/// Where a block sits within the corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockContext {
    /// First header line, already suffixed with the user rank
    pub header1: String,
    /// Second header line of block 0, unsuffixed
    pub header2: String,
    /// 0-based position within the user
    pub index: usize,
    pub block_count: usize,
}

impl BlockContext {
    fn counter(&self) -> String {
        format!(" [{}/{}]", self.index + 1, self.block_count)
    }
}

/// Annotate one raw block
pub fn annotate(block: &AnswerBlock, ctx: &BlockContext) -> DisplayBlock {
    let mut lines: Vec<String> = if ctx.index == 0 {
        let mut lines = block.lines().to_vec();
        match lines.first_mut() {
            Some(first) => *first = ctx.header1.clone(),
            None => lines.push(ctx.header1.clone()),
        }
        if lines.len() < 2 {
            lines.push(ctx.header2.clone());
        }
        lines
    } else {
        let mut lines = Vec::with_capacity(block.len() + 3);
        lines.push(ctx.header1.clone());
        lines.push(ctx.header2.clone());
        lines.extend_from_slice(block.lines());
        lines
    };

    lines[1].push_str(&ctx.counter());

    if lines.get(2).is_some_and(|line| !line.trim().is_empty()) {
        lines.insert(2, String::new());
    }

    DisplayBlock::from_lines(lines)
}

/// Assemble all users of a directory into a corpus, ordered by user id
pub fn assemble(mut submissions: Vec<RawSubmission>) -> Result<Corpus> {
    submissions.sort_by(|a, b| a.user_id.cmp(&b.user_id));

    let total_users = submissions.len();
    let mut users = Vec::with_capacity(total_users);

    for (rank, submission) in submissions.into_iter().enumerate() {
        let RawSubmission { user_id, blocks } = submission;

        let first = blocks.first().ok_or_else(|| {
            GradeError::InvariantViolation(format!("{user_id} has no answer blocks"))
        })?;
        let (Some(title), Some(info)) = (first.line(0), first.line(1)) else {
            return Err(GradeError::InvariantViolation(format!(
                "{user_id} header block has fewer than two lines"
            )));
        };

        let header1 = format!("{} [{}/{}]", title, rank + 1, total_users);
        let header2 = info.to_string();
        let block_count = blocks.len();

        let annotated = blocks
            .iter()
            .enumerate()
            .map(|(index, block)| {
                let ctx = BlockContext {
                    header1: header1.clone(),
                    header2: header2.clone(),
                    index,
                    block_count,
                };
                annotate(block, &ctx)
            })
            .collect();

        tracing::debug!("Assembled {} blocks for {}", block_count, user_id);
        users.push(UserAnswers::new(user_id, annotated));
    }

    Ok(Corpus::new(users))
}
