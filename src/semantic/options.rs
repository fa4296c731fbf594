//! Analyzer options

/// Options controlling which checks the analyzer runs and how strict it is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerOptions {
    /// Warn about variables and associations that are never referenced
    pub check_unused: bool,
    /// Treat every warning as an error
    pub warnings_as_errors: bool,
    /// Report a missing `#version` define as an error
    pub require_version: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            check_unused: true,
            warnings_as_errors: false,
            require_version: true,
        }
    }
}

impl AnalyzerOptions {
    pub fn with_check_unused(mut self, check_unused: bool) -> Self {
        self.check_unused = check_unused;
        self
    }

    pub fn with_warnings_as_errors(mut self, warnings_as_errors: bool) -> Self {
        self.warnings_as_errors = warnings_as_errors;
        self
    }

    pub fn with_require_version(mut self, require_version: bool) -> Self {
        self.require_version = require_version;
        self
    }
}
