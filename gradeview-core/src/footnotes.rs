//! Footnote canonicalizer
//!
//! Rewrites Markdown-style footnotes inside notebook sources into HTML
//! anchors numbered in order of first reference:
//!
//! ```text
//! [^src]     ->  [<sup id=\"cite_ref-1\">[1]</sup>](#cite_note-1)
//! [^src]:    ->  <span id=\"cite_note-1\">1.</span> [^](#cite_ref-1)
//! ```
//!
//! The files are raw `.ipynb` JSON, so the attribute quotes are written
//! escaped (`\"`).
//!
//! Each distinct label gets the number of its first reference, so numbers
//! run 1, 2, 3 without gaps in reading order. A later repeat never renumbers
//! a label: `[^x] [^y] [^x]` gives x=1, y=2 (not x=3).

use crate::lint::expand_corpora;
use crate::Result;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

static NOTE_DEF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\^([^\]]+)\]\s*:").expect("valid footnote definition regex"));

static NOTE_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\^([^\]]+)\]").expect("valid footnote reference regex"));

static REF_ANCHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<sup id=\\"cite_ref-([^\\]+)\\">\[([^\]]+)\]</sup>\]\(#cite_note-([^)]+)\)"#)
        .expect("valid reference anchor regex")
});

static NOTE_ANCHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"<span id=\\"cite_note-([^\\]+)\\">([^<]*?)\.\s*</span>\s*\[\^\]\(#cite_ref-([^)]+)\)"#,
    )
    .expect("valid note anchor regex")
});

/// Footnote tool settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootnoteConfig {
    /// Glob patterns, relative to the project root
    pub corpora: Vec<String>,
}

impl Default for FootnoteConfig {
    fn default() -> Self {
        Self {
            corpora: vec!["notebooks/*.ipynb".to_string()],
        }
    }
}

/// Label shared by all three positions of an anchor, if they agree
fn consistent_label<'a>(caps: &'a Captures<'_>) -> Option<&'a str> {
    let label = caps.get(1)?.as_str();
    let agrees = (2..caps.len()).all(|i| caps.get(i).is_some_and(|m| m.as_str() == label));
    agrees.then_some(label)
}

/// Canonicalize footnotes in a sequence of lines
pub fn canonicalize(lines: &[String]) -> Vec<String> {
    let anchored: Vec<String> = lines
        .iter()
        .map(|line| {
            let line = NOTE_DEF_RE.replace_all(
                line,
                r#"<span id=\"cite_note-${1}\">${1}.</span> [^](#cite_ref-${1})"#,
            );
            NOTE_REF_RE
                .replace_all(
                    &line,
                    r#"[<sup id=\"cite_ref-${1}\">[${1}]</sup>](#cite_note-${1})"#,
                )
                .into_owned()
        })
        .collect();

    let mut numbering: HashMap<String, usize> = HashMap::new();
    for line in &anchored {
        for caps in REF_ANCHOR_RE.captures_iter(line) {
            if let Some(label) = consistent_label(&caps) {
                let next = numbering.len() + 1;
                numbering.entry(label.to_string()).or_insert(next);
            }
        }
    }

    anchored
        .iter()
        .map(|line| {
            let line = REF_ANCHOR_RE.replace_all(line, |caps: &Captures| {
                match consistent_label(caps).and_then(|label| numbering.get(label)) {
                    Some(n) => format!(r#"<sup id=\"cite_ref-{n}\">[{n}]</sup>](#cite_note-{n})"#),
                    None => caps[0].to_string(),
                }
            });
            NOTE_ANCHOR_RE
                .replace_all(&line, |caps: &Captures| {
                    match consistent_label(caps).and_then(|label| numbering.get(label)) {
                        Some(n) => format!(r#"<span id=\"cite_note-{n}\">{n}.</span> [^](#cite_ref-{n})"#),
                        None => caps[0].to_string(),
                    }
                })
                .into_owned()
        })
        .collect()
}

/// Rewrite one file in place; returns whether it changed
pub fn process_file(path: &Path) -> Result<bool> {
    let text = fs::read_to_string(path)?;
    let input: Vec<String> = text.lines().map(str::to_string).collect();
    let output = canonicalize(&input);

    if input == output {
        return Ok(false);
    }

    let mut rewritten = output.join("\n");
    rewritten.push('\n');
    fs::write(path, rewritten)?;
    tracing::debug!("Rewrote footnotes in {:?}", path);
    Ok(true)
}

/// Process every corpus file below `root`; returns the rewritten files
pub fn process_corpora(root: &Path, config: &FootnoteConfig) -> Result<Vec<PathBuf>> {
    let mut patched = Vec::new();
    for path in expand_corpora(root, &config.corpora)? {
        if process_file(&path)? {
            patched.push(path);
        }
    }
    Ok(patched)
}
