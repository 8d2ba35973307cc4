//! Viewer navigation
//!
//! Two modes share one input loop: a directory tree for picking a submission
//! folder, and answer browsing over the loaded [`Corpus`]. Every transition
//! consumes the current [`ViewerState`] and returns the next one.

use crate::model::{Corpus, Cursor, DisplayBlock};
use crate::pipeline::load_corpus;
use crate::scanner::{list_subdirectories, ScanConfig};
use crate::Result;
use std::path::{Path, PathBuf};

/// Synthetic entry for the parent directory
pub const PARENT_ENTRY: &str = "..";

/// Cursor movement in answer-browse mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Previous user, first block
    Up,
    /// Next user, first block
    Down,
    /// Previous block, crossing into the previous user's last block
    Left,
    /// Next block, crossing into the next user's first block
    Right,
}

impl Cursor {
    /// Apply a move; at the edges of the corpus the cursor stays put
    pub fn moved(self, mv: Move, corpus: &Corpus) -> Cursor {
        let Cursor { user, block } = self;
        let last_user = corpus.len().saturating_sub(1);

        match mv {
            Move::Up if user > 0 => Cursor::new(user - 1, 0),
            Move::Down if user < last_user => Cursor::new(user + 1, 0),
            Move::Left if block > 0 => Cursor::new(user, block - 1),
            Move::Left if user > 0 => {
                let last_block = corpus.block_count(user - 1).saturating_sub(1);
                Cursor::new(user - 1, last_block)
            }
            Move::Right if block + 1 < corpus.block_count(user) => Cursor::new(user, block + 1),
            Move::Right if user < last_user => Cursor::new(user + 1, 0),
            _ => self,
        }
    }
}

/// Input understood by the viewer, already decoded from the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Quit,
    Up,
    Down,
    Left,
    Right,
    /// Enter or space
    Select,
}

/// Directory-tree mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeView {
    pub dir: PathBuf,
    /// `..` followed by the sorted visible subdirectories
    pub entries: Vec<String>,
    pub selected: usize,
    /// Last load error for this directory, shown to the grader
    pub status: Option<String>,
}

impl TreeView {
    pub fn selected_entry(&self) -> Option<&str> {
        self.entries.get(self.selected).map(String::as_str)
    }

    fn with_status(mut self, status: String) -> Self {
        self.status = Some(status);
        self
    }
}

/// Answer-browse mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerView {
    pub dir: PathBuf,
    pub corpus: Corpus,
    pub cursor: Cursor,
}

impl AnswerView {
    /// Block under the cursor
    pub fn block(&self) -> Option<&DisplayBlock> {
        self.corpus.get(self.cursor)
    }
}

/// The one piece of mutable viewer state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerState {
    DirectoryTree(TreeView),
    AnswerBrowse(AnswerView),
}

/// Outcome of handling one key
#[derive(Debug)]
pub enum Step {
    Continue(ViewerState),
    Exit,
}

impl ViewerState {
    /// Open `dir`: answer mode if it holds submissions, tree mode otherwise
    pub fn open(dir: &Path, config: &ScanConfig) -> Result<ViewerState> {
        open_directory(dir, None, config)
    }

    pub fn dir(&self) -> &Path {
        match self {
            ViewerState::DirectoryTree(tree) => &tree.dir,
            ViewerState::AnswerBrowse(view) => &view.dir,
        }
    }

    /// Compute the next state for one key
    pub fn handle(self, key: Key, config: &ScanConfig) -> Step {
        match self {
            ViewerState::DirectoryTree(tree) => handle_tree_key(tree, key, config),
            ViewerState::AnswerBrowse(view) => handle_answer_key(view, key, config),
        }
    }
}

fn handle_tree_key(mut tree: TreeView, key: Key, config: &ScanConfig) -> Step {
    match key {
        Key::Quit => return Step::Exit,
        Key::Up => {
            if tree.selected > 0 {
                tree.selected -= 1;
            }
        }
        Key::Down => {
            if tree.selected + 1 < tree.entries.len() {
                tree.selected += 1;
            }
        }
        Key::Select => {
            let Some(entry) = tree.selected_entry() else {
                return Step::Continue(ViewerState::DirectoryTree(tree));
            };
            let came_from = (entry == PARENT_ENTRY)
                .then(|| dir_name(&tree.dir))
                .flatten();
            let target = tree.dir.join(entry);

            return match open_directory(&target, came_from.as_deref(), config) {
                Ok(state) => Step::Continue(state),
                Err(e) => {
                    tracing::warn!("Cannot open {:?}: {}", target, e);
                    Step::Continue(ViewerState::DirectoryTree(tree.with_status(e.to_string())))
                }
            };
        }
        Key::Left | Key::Right => {}
    }
    Step::Continue(ViewerState::DirectoryTree(tree))
}

fn handle_answer_key(mut view: AnswerView, key: Key, config: &ScanConfig) -> Step {
    let mv = match key {
        Key::Up => Move::Up,
        Key::Down => Move::Down,
        Key::Left => Move::Left,
        Key::Right => Move::Right,
        Key::Select => return Step::Continue(ViewerState::AnswerBrowse(view)),
        Key::Quit => {
            let parent = view.dir.join(PARENT_ENTRY);
            let came_from = dir_name(&view.dir);
            return match open_directory(&parent, came_from.as_deref(), config) {
                Ok(state) => Step::Continue(state),
                Err(e) => {
                    tracing::warn!("Cannot open {:?}: {}", parent, e);
                    Step::Continue(ViewerState::AnswerBrowse(view))
                }
            };
        }
    };

    view.cursor = view.cursor.moved(mv, &view.corpus);
    Step::Continue(ViewerState::AnswerBrowse(view))
}

/// List `path` and load its submissions
///
/// `came_from` pre-selects that entry in the listing (used when going up).
/// A load failure is not an error here: the tree view carries it as status.
fn open_directory(path: &Path, came_from: Option<&str>, config: &ScanConfig) -> Result<ViewerState> {
    let dir = path.canonicalize()?;

    let mut entries = vec![PARENT_ENTRY.to_string()];
    entries.extend(list_subdirectories(&dir, config.show_hidden_dirs)?);

    let selected = came_from
        .and_then(|name| entries.iter().position(|entry| entry == name))
        .unwrap_or(0);

    let tree = TreeView {
        dir,
        entries,
        selected,
        status: None,
    };

    let state = match load_corpus(&tree.dir, config) {
        Ok(Some(corpus)) => ViewerState::AnswerBrowse(AnswerView {
            dir: tree.dir,
            corpus,
            cursor: Cursor::default(),
        }),
        Ok(None) => ViewerState::DirectoryTree(tree),
        Err(e) => {
            tracing::warn!("Failed to load {:?}: {}", tree.dir, e);
            let status = e.to_string();
            ViewerState::DirectoryTree(tree.with_status(status))
        }
    };

    Ok(state)
}

fn dir_name(dir: &Path) -> Option<String> {
    dir.file_name().map(|name| name.to_string_lossy().into_owned())
}
