//! Submission data model
//!
//! Parsers produce [`AnswerBlock`]s grouped in a [`RawSubmission`]. The
//! assembler turns those into display-ready [`DisplayBlock`]s, grouped per
//! user in [`UserAnswers`] and ordered by user in a [`Corpus`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Student identifier, e.g. `us000001`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One parsed answer unit, headed by a marker line (or the synthetic header)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerBlock {
    lines: Vec<String>,
}

impl AnswerBlock {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Annotated copy of an [`AnswerBlock`], ready to draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayBlock {
    lines: Vec<String>,
}

impl DisplayBlock {
    /// Only the assembler creates display blocks.
    pub(crate) fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Unannotated blocks of one user, primary-derived blocks first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSubmission {
    pub user_id: UserId,
    pub blocks: Vec<AnswerBlock>,
}

impl RawSubmission {
    pub fn new(user_id: UserId, blocks: Vec<AnswerBlock>) -> Self {
        Self { user_id, blocks }
    }
}

/// Display-ready blocks of one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAnswers {
    user_id: UserId,
    blocks: Vec<DisplayBlock>,
}

impl UserAnswers {
    pub(crate) fn new(user_id: UserId, blocks: Vec<DisplayBlock>) -> Self {
        Self { user_id, blocks }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn blocks(&self) -> &[DisplayBlock] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&DisplayBlock> {
        self.blocks.get(index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// All users of one directory, ascending by user id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Corpus {
    users: Vec<UserAnswers>,
}

impl Corpus {
    pub(crate) fn new(users: Vec<UserAnswers>) -> Self {
        Self { users }
    }

    pub fn users(&self) -> &[UserAnswers] {
        &self.users
    }

    pub fn user(&self, index: usize) -> Option<&UserAnswers> {
        self.users.get(index)
    }

    /// Number of blocks of the user at `index`, 0 when out of range
    pub fn block_count(&self, index: usize) -> usize {
        self.users.get(index).map_or(0, UserAnswers::len)
    }

    /// Block under a cursor
    pub fn get(&self, cursor: Cursor) -> Option<&DisplayBlock> {
        self.user(cursor.user)?.block(cursor.block)
    }

    pub fn contains(&self, cursor: Cursor) -> bool {
        self.get(cursor).is_some()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Position in answer-browse mode: (user index, block-within-user index)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor {
    pub user: usize,
    pub block: usize,
}

impl Cursor {
    pub fn new(user: usize, block: usize) -> Self {
        Self { user, block }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.user, self.block)
    }
}
