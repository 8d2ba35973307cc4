use super::ScanConfig;
use crate::model::UserId;
use crate::{GradeError, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Role of a file within one user's submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmissionKind {
    Primary,
    Supplementary,
}

/// On-disk format of a submission file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmissionFormat {
    Text,
    Notebook,
    Other,
}

impl SubmissionFormat {
    fn of_supplementary(path: &Path) -> Self {
        match lowercase_extension(path).as_deref() {
            Some("ipynb") | Some("json") => SubmissionFormat::Notebook,
            Some("txt") => SubmissionFormat::Text,
            _ => SubmissionFormat::Other,
        }
    }
}

/// A classified file in a submission directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionFile {
    pub path: PathBuf,
    pub user_id: UserId,
    pub kind: SubmissionKind,
    pub format: SubmissionFormat,
}

/// All files of one user, ready for parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserFiles {
    pub user_id: UserId,
    pub primary: SubmissionFile,
    /// In filename order
    pub supplementary: Vec<SubmissionFile>,
}

/// Result of classifying a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// No primary file: not a submission directory
    Empty,
    /// Ascending by user id
    Ready(Vec<UserFiles>),
}

/// Strict allow-list classifier for submission directories
#[derive(Debug)]
pub struct FileClassifier {
    config: ScanConfig,
    primary_re: Regex,
    supplementary_re: Regex,
}

impl FileClassifier {
    /// Compile the filename patterns for a configuration
    pub fn new(config: &ScanConfig) -> Result<Self> {
        if config.primary_extension.is_empty() {
            return Err(GradeError::Config("primary_extension must not be empty".into()));
        }

        let prefix = regex::escape(&config.user_prefix);
        let primary_re = Regex::new(&format!(
            r"^({prefix}\d{{6}})\.{}$",
            regex::escape(&config.primary_extension)
        ))?;
        let supplementary_re = Regex::new(&format!(r"^({prefix}\d{{6}})_"))?;

        Ok(Self {
            config: config.clone(),
            primary_re,
            supplementary_re,
        })
    }

    /// Classify every regular file directly inside `dir`
    pub fn classify(&self, dir: &Path) -> Result<ScanOutcome> {
        tracing::info!("Scanning directory: {:?}", dir);

        let files = list_files(dir)?;
        let mut seen: HashSet<&Path> = HashSet::new();
        let mut users: BTreeMap<UserId, UserFiles> = BTreeMap::new();

        // Pass 1: primary files
        for path in &files {
            let Some(user_id) = self.primary_user(path) else {
                continue;
            };
            register_primary(&mut users, user_id, path)?;
            seen.insert(path.as_path());
        }

        // Pass 2: supplementary files, which need their primary
        for path in &files {
            let Some(user_id) = self.supplementary_user(path) else {
                continue;
            };
            let Some(entry) = users.get_mut(&user_id) else {
                return Err(GradeError::OrphanedSupplementary {
                    user: user_id.to_string(),
                    path: path.clone(),
                });
            };
            tracing::debug!("{:?}: supplementary file of {}", path, user_id);
            seen.insert(path.as_path());
            entry.supplementary.push(SubmissionFile {
                path: path.clone(),
                user_id,
                kind: SubmissionKind::Supplementary,
                format: SubmissionFormat::of_supplementary(path),
            });
        }

        if users.is_empty() {
            tracing::info!("No submissions in {:?}", dir);
            return Ok(ScanOutcome::Empty);
        }

        if let Some(path) = files.iter().find(|p| !seen.contains(p.as_path())) {
            return Err(GradeError::UnexpectedFile { path: path.clone() });
        }

        tracing::info!(
            "Found {} users ({} files) in {:?}",
            users.len(),
            seen.len(),
            dir
        );

        Ok(ScanOutcome::Ready(users.into_values().collect()))
    }

    fn primary_user(&self, path: &Path) -> Option<UserId> {
        let name = path.file_name()?.to_str()?;
        let caps = self.primary_re.captures(name)?;
        Some(UserId::new(&caps[1]))
    }

    fn supplementary_user(&self, path: &Path) -> Option<UserId> {
        let name = path.file_name()?.to_str()?;
        let caps = self.supplementary_re.captures(name)?;
        let ext = path.extension()?.to_str()?;
        if !self.config.is_supplementary_extension(ext) {
            return None;
        }
        Some(UserId::new(&caps[1]))
    }
}

/// Record the primary file of a user
///
/// Distinct names in one directory never map to the same user with the exact
/// `<prefix>NNNNNN.<ext>` match, so the duplicate branch only guards callers
/// that feed paths from elsewhere.
fn register_primary(
    users: &mut BTreeMap<UserId, UserFiles>,
    user_id: UserId,
    path: &Path,
) -> Result<()> {
    if users.contains_key(&user_id) {
        return Err(GradeError::DuplicatePrimary {
            user: user_id.to_string(),
            path: path.to_path_buf(),
        });
    }
    tracing::debug!("{:?}: primary file of {}", path, user_id);
    let primary = SubmissionFile {
        path: path.to_path_buf(),
        user_id: user_id.clone(),
        kind: SubmissionKind::Primary,
        format: SubmissionFormat::Text,
    };
    users.insert(
        user_id.clone(),
        UserFiles {
            user_id,
            primary,
            supplementary: Vec::new(),
        },
    );
    Ok(())
}

/// Classify `dir` with a one-off classifier
pub fn classify_directory(dir: &Path, config: &ScanConfig) -> Result<ScanOutcome> {
    FileClassifier::new(config)?.classify(dir)
}

/// Regular files directly inside `dir` (symlinks followed), sorted by name
fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.path().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Visible subdirectory names of `dir`, sorted
pub fn list_subdirectories(dir: &Path, include_hidden: bool) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !include_hidden && name.starts_with('.') {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn dir_with(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in files {
            fs::write(dir.path().join(name), "").unwrap();
        }
        dir
    }

    fn classify(dir: &TempDir) -> Result<ScanOutcome> {
        classify_directory(dir.path(), &ScanConfig::default())
    }

    #[test]
    fn test_primary_and_supplementary() {
        let dir = dir_with(&[
            "us000002.txt",
            "us000001.txt",
            "us000001_b.ipynb",
            "us000001_a.JSON",
        ]);

        let ScanOutcome::Ready(users) = classify(&dir).unwrap() else {
            panic!("expected submissions");
        };
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].user_id.as_str(), "us000001");
        assert_eq!(users[1].user_id.as_str(), "us000002");

        let names: Vec<_> = users[0]
            .supplementary
            .iter()
            .map(|f| f.path.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["us000001_a.JSON", "us000001_b.ipynb"]);
        assert!(users[0]
            .supplementary
            .iter()
            .all(|f| f.kind == SubmissionKind::Supplementary
                && f.format == SubmissionFormat::Notebook));
        assert_eq!(users[1].primary.kind, SubmissionKind::Primary);
        assert!(users[1].supplementary.is_empty());
    }

    #[test]
    fn test_empty_directory() {
        let dir = dir_with(&[]);
        assert_eq!(classify(&dir).unwrap(), ScanOutcome::Empty);
    }

    #[test]
    fn test_unrelated_files_without_primary_is_empty() {
        let dir = dir_with(&["README.md", "notes.pdf"]);
        assert_eq!(classify(&dir).unwrap(), ScanOutcome::Empty);
    }

    #[test]
    fn test_orphaned_supplementary() {
        let dir = dir_with(&["us000002.txt", "us000003_extra.json"]);
        let err = classify(&dir).unwrap_err();
        assert!(matches!(err, GradeError::OrphanedSupplementary { ref user, .. } if user == "us000003"));
    }

    #[test]
    fn test_unexpected_file() {
        let dir = dir_with(&["us000001.txt", "grades.xlsx"]);
        let err = classify(&dir).unwrap_err();
        assert!(matches!(err, GradeError::UnexpectedFile { ref path } if path.ends_with("grades.xlsx")));
    }

    #[test]
    fn test_supplementary_with_other_extension_is_unexpected() {
        let dir = dir_with(&["us000001.txt", "us000001_report.pdf"]);
        assert!(matches!(
            classify(&dir).unwrap_err(),
            GradeError::UnexpectedFile { .. }
        ));
    }

    #[test]
    fn test_subdirectories_are_ignored_by_classifier() {
        let dir = dir_with(&["us000001.txt"]);
        fs::create_dir(dir.path().join("archive")).unwrap();
        assert!(matches!(classify(&dir).unwrap(), ScanOutcome::Ready(_)));
    }

    #[test]
    fn test_wrong_code_length_is_not_primary() {
        let dir = dir_with(&["us00001.txt"]);
        assert_eq!(classify(&dir).unwrap(), ScanOutcome::Empty);
    }

    #[test]
    fn test_duplicate_primary_is_rejected() {
        let mut users = BTreeMap::new();
        let user = UserId::new("us000001");
        register_primary(&mut users, user.clone(), Path::new("a/us000001.txt")).unwrap();

        let err = register_primary(&mut users, user, Path::new("b/us000001.txt")).unwrap_err();
        assert!(err.is_classification());
        assert!(matches!(
            err,
            GradeError::DuplicatePrimary { ref user, ref path }
                if user == "us000001" && path.starts_with("b")
        ));
        assert_eq!(users.len(), 1);
        assert!(users[&UserId::new("us000001")].primary.path.starts_with("a"));
    }

    #[test]
    fn test_list_subdirectories() {
        let dir = dir_with(&["us000001.txt"]);
        for name in ["week2", ".git", "week1"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        assert_eq!(
            list_subdirectories(dir.path(), false).unwrap(),
            vec!["week1", "week2"]
        );
        assert_eq!(
            list_subdirectories(dir.path(), true).unwrap(),
            vec![".git", "week1", "week2"]
        );
    }
}
