//! Integration tests for the viewer state machine over real directories

use gradeview_core::{Cursor, Key, Result, ScanConfig, Step, ViewerState};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const VALID_PRIMARY: &str = "#Report 1\n#exported\n1,Taro\n#回答内容\nok\n#課題解答1.1\nx = 1\n";

/// Course layout:
/// ```text
/// root/
/// ├── .cache/
/// ├── broken/      us000001.txt + stray file
/// ├── empty/
/// └── week1/       two valid submissions
/// ```
fn create_course_tree() -> Result<TempDir> {
    let root = TempDir::new()?;
    let path = root.path();

    fs::create_dir(path.join(".cache"))?;
    fs::create_dir(path.join("empty"))?;
    fs::create_dir(path.join("week1"))?;
    fs::create_dir(path.join("broken"))?;

    fs::write(path.join("week1/us000001.txt"), VALID_PRIMARY)?;
    fs::write(path.join("week1/us000002.txt"), VALID_PRIMARY)?;
    fs::write(path.join("broken/us000001.txt"), VALID_PRIMARY)?;
    fs::write(path.join("broken/todo.txt"), "grade this\n")?;

    Ok(root)
}

fn press(state: ViewerState, keys: &[Key]) -> ViewerState {
    let config = ScanConfig::default();
    keys.iter().fold(state, |state, &key| match state.handle(key, &config) {
        Step::Continue(next) => next,
        Step::Exit => panic!("unexpected exit on {:?}", key),
    })
}

fn canonical(path: &Path) -> std::path::PathBuf {
    path.canonicalize().unwrap()
}

#[test]
fn test_open_plain_directory_lists_visible_subdirectories() -> Result<()> {
    let root = create_course_tree()?;
    let state = ViewerState::open(root.path(), &ScanConfig::default())?;

    let ViewerState::DirectoryTree(tree) = state else {
        panic!("root has no submissions");
    };
    assert_eq!(tree.dir, canonical(root.path()));
    assert_eq!(tree.entries, vec!["..", "broken", "empty", "week1"]);
    assert_eq!(tree.selected, 0);
    assert!(tree.status.is_none());
    Ok(())
}

#[test]
fn test_enter_submission_directory_and_quit_back() -> Result<()> {
    let root = create_course_tree()?;
    let state = ViewerState::open(root.path(), &ScanConfig::default())?;

    let state = press(state, &[Key::Down, Key::Down, Key::Down, Key::Select]);
    let ViewerState::AnswerBrowse(view) = &state else {
        panic!("week1 holds submissions");
    };
    assert_eq!(view.dir, canonical(&root.path().join("week1")));
    assert_eq!(view.cursor, Cursor::default());
    assert_eq!(view.corpus.len(), 2);
    assert_eq!(view.block().unwrap().lines()[0], "# Report 1 [1/2]");

    let state = press(state, &[Key::Right, Key::Right]);
    let ViewerState::AnswerBrowse(view) = &state else {
        panic!("still browsing");
    };
    assert_eq!(view.cursor, Cursor::new(1, 0));

    let state = press(state, &[Key::Quit]);
    let ViewerState::DirectoryTree(tree) = state else {
        panic!("quit returns to the parent listing");
    };
    assert_eq!(tree.dir, canonical(root.path()));
    assert_eq!(tree.selected_entry(), Some("week1"));
    Ok(())
}

#[test]
fn test_enter_empty_directory_and_go_up() -> Result<()> {
    let root = create_course_tree()?;
    let state = ViewerState::open(root.path(), &ScanConfig::default())?;

    // "empty" is the third entry
    let state = press(state, &[Key::Down, Key::Down, Key::Select]);
    let ViewerState::DirectoryTree(tree) = &state else {
        panic!("empty directory stays in tree mode");
    };
    assert_eq!(tree.dir, canonical(&root.path().join("empty")));
    assert_eq!(tree.entries, vec![".."]);

    let state = press(state, &[Key::Select]);
    let ViewerState::DirectoryTree(tree) = state else {
        panic!("root has no submissions");
    };
    assert_eq!(tree.dir, canonical(root.path()));
    assert_eq!(tree.selected_entry(), Some("empty"));
    Ok(())
}

#[test]
fn test_load_failure_is_reported_in_tree_mode() -> Result<()> {
    let root = create_course_tree()?;
    let state = ViewerState::open(root.path(), &ScanConfig::default())?;

    let state = press(state, &[Key::Down, Key::Select]);
    let ViewerState::DirectoryTree(tree) = state else {
        panic!("a broken directory never opens in answer mode");
    };
    assert_eq!(tree.dir, canonical(&root.path().join("broken")));
    let status = tree.status.expect("the error is shown to the grader");
    assert!(status.contains("unexpected file"));
    assert!(status.contains("todo.txt"));
    Ok(())
}

#[test]
fn test_open_submission_directory_starts_in_answer_mode() -> Result<()> {
    let root = create_course_tree()?;
    let state = ViewerState::open(&root.path().join("week1"), &ScanConfig::default())?;
    assert!(matches!(state, ViewerState::AnswerBrowse(_)));
    assert_eq!(state.dir(), canonical(&root.path().join("week1")));
    Ok(())
}

#[test]
fn test_hidden_directories_when_configured() -> Result<()> {
    let root = create_course_tree()?;
    let config = ScanConfig::default().with_hidden_dirs(true);
    let ViewerState::DirectoryTree(tree) = ViewerState::open(root.path(), &config)? else {
        panic!("root has no submissions");
    };
    assert_eq!(tree.entries, vec!["..", ".cache", "broken", "empty", "week1"]);
    Ok(())
}

#[test]
fn test_quit_in_tree_mode_exits() -> Result<()> {
    let root = create_course_tree()?;
    let state = ViewerState::open(root.path(), &ScanConfig::default())?;
    assert!(matches!(state.handle(Key::Quit, &ScanConfig::default()), Step::Exit));
    Ok(())
}
