//! Viewer configuration
//!
//! Every section has defaults, so a config file only needs the keys it
//! changes:
//!
//! ```json
//! { "scan": { "user_prefix": "st" }, "lint": { "corpora": ["docs/*.md"] } }
//! ```

use crate::footnotes::FootnoteConfig;
use crate::lint::LintConfig;
use crate::scanner::ScanConfig;
use crate::{GradeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level configuration, loaded from JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub scan: ScanConfig,
    pub lint: LintConfig,
    pub footnotes: FootnoteConfig,
}

impl ViewerConfig {
    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| GradeError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: ViewerConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.scan.primary_extension.is_empty() {
            return Err(GradeError::Config("scan.primary_extension must not be empty".into()));
        }
        if self.scan.supplementary_extensions.iter().any(|ext| ext.is_empty()) {
            return Err(GradeError::Config(
                "scan.supplementary_extensions must not contain empty entries".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config = ViewerConfig::from_json("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = ViewerConfig::from_json(
            r#"{"scan": {"user_prefix": "st"}, "lint": {"rules": [{"pattern": "ユーザ"}]}}"#,
        )
        .unwrap();
        assert_eq!(config.scan.user_prefix, "st");
        assert_eq!(config.scan.primary_extension, "txt");
        assert_eq!(config.lint.rules.len(), 1);
        assert_eq!(config.lint.rules[0].not_followed_by, None);
        assert_eq!(config.lint.corpora, LintConfig::default().corpora);
        assert_eq!(config.footnotes, FootnoteConfig::default());
    }

    #[test]
    fn test_invalid_config() {
        let err = ViewerConfig::from_json(r#"{"scan": {"primary_extension": ""}}"#).unwrap_err();
        assert!(matches!(err, GradeError::Config(_)));
        assert!(matches!(
            ViewerConfig::from_json("[").unwrap_err(),
            GradeError::Json(_)
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = ViewerConfig::load(Path::new("/nonexistent/gradeview.json")).unwrap_err();
        assert!(matches!(err, GradeError::Config(_)));
    }
}
