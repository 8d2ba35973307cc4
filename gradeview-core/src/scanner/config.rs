use serde::{Deserialize, Serialize};

/// Configuration for classifying the files of a submission directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Prefix in front of the six-digit user code (e.g. "us")
    pub user_prefix: String,
    /// Extension of primary submission files
    pub primary_extension: String,
    /// Extensions accepted for supplementary files (matched lower-cased)
    pub supplementary_extensions: Vec<String>,
    /// List directories starting with '.' in the directory tree
    pub show_hidden_dirs: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            user_prefix: "us".to_string(),
            primary_extension: "txt".to_string(),
            supplementary_extensions: vec!["ipynb".to_string(), "json".to_string()],
            show_hidden_dirs: false,
        }
    }
}

impl ScanConfig {
    /// Create a new ScanConfig with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the user code prefix
    pub fn with_user_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_prefix = prefix.into();
        self
    }

    /// Set the primary file extension
    pub fn with_primary_extension(mut self, ext: impl Into<String>) -> Self {
        self.primary_extension = ext.into();
        self
    }

    /// Add a supplementary file extension
    pub fn add_supplementary_extension(mut self, ext: impl Into<String>) -> Self {
        self.supplementary_extensions.push(ext.into());
        self
    }

    /// Set the supplementary file extensions
    pub fn with_supplementary_extensions(mut self, extensions: Vec<String>) -> Self {
        self.supplementary_extensions = extensions;
        self
    }

    /// Enable/disable hidden directories in the tree view
    pub fn with_hidden_dirs(mut self, show: bool) -> Self {
        self.show_hidden_dirs = show;
        self
    }

    pub(crate) fn is_supplementary_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.supplementary_extensions
            .iter()
            .any(|candidate| candidate.to_lowercase() == ext)
    }
}
