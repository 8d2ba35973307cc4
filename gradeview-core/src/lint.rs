//! Style linter for course material
//!
//! Scans text corpora for discouraged spellings and reports every line that
//! contains one, with the byte ranges of each hit.

use crate::{GradeError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// One anti-pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRule {
    /// Regular expression for the discouraged spelling
    pub pattern: String,
    /// A hit directly followed by this text is accepted
    #[serde(default)]
    pub not_followed_by: Option<String>,
}

impl StyleRule {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            not_followed_by: None,
        }
    }

    pub fn not_followed_by(mut self, suffix: impl Into<String>) -> Self {
        self.not_followed_by = Some(suffix.into());
        self
    }
}

/// Linter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Glob patterns, relative to the project root
    pub corpora: Vec<String>,
    pub rules: Vec<StyleRule>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            corpora: vec![
                "notebooks/*.ipynb".to_string(),
                "notebooks/*.md".to_string(),
                "docs/*.md".to_string(),
            ],
            rules: vec![
                StyleRule::new("コンピュータ").not_followed_by("ー"),
                StyleRule::new("フォルダ").not_followed_by("ー"),
                StyleRule::new("メモリー"),
                StyleRule::new("ユーザ").not_followed_by("ー"),
            ],
        }
    }
}

/// A source line with at least one hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintMatch {
    pub path: PathBuf,
    /// 1-based
    pub line_no: usize,
    /// Right-trimmed line text
    pub line: String,
    /// Sorted, non-overlapping byte ranges into `line`
    pub spans: Vec<Range<usize>>,
}

#[derive(Debug)]
struct CompiledRule {
    regex: Regex,
    not_followed_by: Option<String>,
}

/// Compiled rule set
#[derive(Debug)]
pub struct StyleLinter {
    rules: Vec<CompiledRule>,
}

impl StyleLinter {
    pub fn new(rules: &[StyleRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                Ok(CompiledRule {
                    regex: Regex::new(&rule.pattern)?,
                    not_followed_by: rule.not_followed_by.clone().filter(|s| !s.is_empty()),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Hit ranges in one line, merged where rules overlap
    pub fn check_line(&self, line: &str) -> Vec<Range<usize>> {
        let mut spans: Vec<Range<usize>> = Vec::new();
        for rule in &self.rules {
            for m in rule.regex.find_iter(line) {
                let accepted = rule
                    .not_followed_by
                    .as_deref()
                    .is_some_and(|suffix| line[m.end()..].starts_with(suffix));
                if !accepted && !m.range().is_empty() {
                    spans.push(m.range());
                }
            }
        }

        spans.sort_by_key(|span| span.start);
        let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
        for span in spans {
            match merged.last_mut() {
                Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
                _ => merged.push(span),
            }
        }
        merged
    }

    /// Check already-loaded text
    pub fn check_text(&self, path: &Path, text: &str) -> Vec<LintMatch> {
        text.lines()
            .enumerate()
            .filter_map(|(index, line)| {
                let line = line.trim_end();
                let spans = self.check_line(line);
                (!spans.is_empty()).then(|| LintMatch {
                    path: path.to_path_buf(),
                    line_no: index + 1,
                    line: line.to_string(),
                    spans,
                })
            })
            .collect()
    }

    pub fn check_file(&self, path: &Path) -> Result<Vec<LintMatch>> {
        let text = fs::read_to_string(path)?;
        Ok(self.check_text(path, &text))
    }
}

/// Expand corpus globs below `root`, pattern by pattern
pub fn expand_corpora(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let base = glob::Pattern::escape(&root.to_string_lossy());
    let mut files = Vec::new();
    for pattern in patterns {
        let full = format!("{}/{}", base.trim_end_matches('/'), pattern);
        for entry in glob::glob(&full)? {
            let path = entry.map_err(|e| GradeError::Io(std::io::Error::other(e)))?;
            if path.is_file() {
                files.push(path);
            }
        }
    }
    Ok(files)
}

/// Lint every corpus file below `root`
pub fn lint_corpora(root: &Path, config: &LintConfig) -> Result<Vec<LintMatch>> {
    let linter = StyleLinter::new(&config.rules)?;
    let files = expand_corpora(root, &config.corpora)?;
    tracing::info!("Linting {} files", files.len());

    let mut matches = Vec::new();
    for path in files {
        matches.extend(linter.check_file(&path)?);
    }
    Ok(matches)
}
