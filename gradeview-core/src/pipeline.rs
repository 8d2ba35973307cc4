//! Directory loading pipeline: scan -> parse -> assemble

use crate::assembler::assemble;
use crate::model::{Corpus, RawSubmission};
use crate::parser::parser_for;
use crate::scanner::{FileClassifier, ScanConfig, ScanOutcome, UserFiles};
use crate::Result;
use std::path::Path;
use std::time::Instant;

/// Load every submission in `dir`
///
/// Returns `Ok(None)` when the directory holds no primary file. Any
/// classification, parse or invariant error aborts the whole load.
pub fn load_corpus(dir: &Path, config: &ScanConfig) -> Result<Option<Corpus>> {
    let start = Instant::now();

    let users = match FileClassifier::new(config)?.classify(dir)? {
        ScanOutcome::Empty => return Ok(None),
        ScanOutcome::Ready(users) => users,
    };

    let submissions = users
        .iter()
        .map(parse_user)
        .collect::<Result<Vec<_>>>()?;

    let corpus = assemble(submissions)?;

    tracing::info!(
        "Loaded {} users from {:?} in {:?}",
        corpus.len(),
        dir,
        start.elapsed()
    );

    Ok(Some(corpus))
}

/// Parse the primary file, then each supplementary file in order
fn parse_user(files: &UserFiles) -> Result<RawSubmission> {
    let mut blocks = parser_for(&files.primary)?.parse_file(&files.primary.path)?;

    for file in &files.supplementary {
        blocks.extend(parser_for(file)?.parse_file(&file.path)?);
    }

    Ok(RawSubmission::new(files.user_id.clone(), blocks))
}
