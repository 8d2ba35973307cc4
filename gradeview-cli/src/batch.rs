//! Non-interactive subcommands

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use gradeview_core::footnotes::{process_corpora, FootnoteConfig};
use gradeview_core::lint::{lint_corpora, LintConfig, LintMatch};
use gradeview_core::{load_corpus, ScanConfig};
use std::ops::Range;
use std::path::Path;
use tracing::info;

/// Print the corpus of `dir` as pretty JSON (`null` when there are no submissions)
pub fn dump(dir: &Path, config: &ScanConfig) -> Result<()> {
    println!("{}", dump_json(dir, config)?);
    Ok(())
}

fn dump_json(dir: &Path, config: &ScanConfig) -> Result<String> {
    let corpus = load_corpus(dir, config)
        .with_context(|| format!("Failed to load submissions from {}", dir.display()))?;
    serde_json::to_string_pretty(&corpus).context("Failed to serialize corpus")
}

pub fn lint(root: &Path, config: &LintConfig) -> Result<()> {
    let matches = lint_corpora(root, config).context("Failed to lint corpora")?;
    for m in &matches {
        let path = display_path(root, &m.path);
        println!(
            "{}:{}:    {}",
            path.magenta(),
            m.line_no.to_string().green(),
            highlight(m)
        );
    }
    info!("{} line(s) with discouraged spellings", matches.len());
    Ok(())
}

pub fn footnotes(root: &Path, config: &FootnoteConfig) -> Result<()> {
    let patched = process_corpora(root, config).context("Failed to rewrite footnotes")?;
    for path in &patched {
        println!("patch {}", display_path(root, path));
    }
    info!("{} file(s) patched", patched.len());
    Ok(())
}

fn highlight(m: &LintMatch) -> String {
    split_spans(&m.line, &m.spans)
        .into_iter()
        .map(|(text, hit)| {
            if hit {
                text.red().bold().to_string()
            } else {
                text.to_string()
            }
        })
        .collect()
}

/// Cut `line` into alternating plain and hit segments
fn split_spans<'a>(line: &'a str, spans: &[Range<usize>]) -> Vec<(&'a str, bool)> {
    let mut parts = Vec::new();
    let mut pos = 0;
    for span in spans {
        if span.start > pos {
            parts.push((&line[pos..span.start], false));
        }
        parts.push((&line[span.clone()], true));
        pos = span.end;
    }
    if pos < line.len() {
        parts.push((&line[pos..], false));
    }
    parts
}

fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_dump_json_of_submission_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("us000001.txt"),
            "#Header\n#x\n1,Name\n#回答内容\nhello\n",
        )
        .unwrap();

        let json = dump_json(dir.path(), &ScanConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let users = value["users"].as_array().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["user_id"], "us000001");
        assert_eq!(users[0]["blocks"][0]["lines"][0], "# Header [1/1]");
    }

    #[test]
    fn test_dump_json_of_plain_dir_is_null() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("README.md"), "notes\n").unwrap();
        assert_eq!(dump_json(dir.path(), &ScanConfig::default()).unwrap(), "null");
    }

    #[test]
    fn test_dump_json_reports_load_errors() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("us000002_extra.json"), "{}").unwrap();
        let err = dump_json(dir.path(), &ScanConfig::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("orphaned supplementary"));
    }

    #[test]
    fn test_split_spans() {
        let line = "xxユーザyyメモリー";
        let start = "xx".len();
        let user = start..start + "ユーザ".len();
        let mem = line.len() - "メモリー".len()..line.len();

        let parts = split_spans(line, &[user, mem]);
        assert_eq!(
            parts,
            vec![("xx", false), ("ユーザ", true), ("yy", false), ("メモリー", true)]
        );
    }

    #[test]
    fn test_split_spans_without_hits() {
        assert_eq!(split_spans("plain", &[]), vec![("plain", false)]);
    }

    #[test]
    fn test_display_path_relative_to_root() {
        let root = Path::new("/course");
        assert_eq!(display_path(root, Path::new("/course/docs/a.md")), "docs/a.md");
        assert_eq!(display_path(root, Path::new("/elsewhere/b.md")), "/elsewhere/b.md");
    }
}
