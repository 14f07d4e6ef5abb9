//! Extraction configuration.

use crate::ExtractionError;
use crate::Result;
use crate::ScopeMatcher;
use crate::ScopeRule;

/// Configuration for an extraction run.
///
/// The rule set is the only authority on which scopes are extracted; the
/// default configuration has no rules and therefore fails validation.
///
/// # Examples
///
/// ```
/// use scopex_core::ExtractionConfig;
/// use scopex_core::ScopeRule;
///
/// let config = ExtractionConfig::default()
///     .with_rule(ScopeRule::domain_suffix("@org.co.uk"))
///     .with_rule(ScopeRule::resource_prefix("Resource:"))
///     .with_jobs(4);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.archive_suffixes, vec![".zip".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// Admission rules; a scope is admitted if any rule matches.
    pub rules: Vec<ScopeRule>,

    /// 1-based position of the scope segment in entry paths.
    ///
    /// `None` uses the container's default (2 for tarball and zip
    /// containers, 1 for directory trees).
    pub scope_depth: Option<usize>,

    /// File name suffixes that mark a secondary archive (case-sensitive).
    pub archive_suffixes: Vec<String>,

    /// Number of per-scope workers for directory containers.
    pub jobs: usize,
}

impl Default for ExtractionConfig {
    /// Default values:
    /// - `rules`: empty
    /// - `scope_depth`: container default
    /// - `archive_suffixes`: `[".zip"]`
    /// - `jobs`: 1 (sequential)
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            scope_depth: None,
            archive_suffixes: vec![".zip".to_string()],
            jobs: 1,
        }
    }
}

impl ExtractionConfig {
    /// Creates a configuration with the given rules and default settings.
    #[must_use]
    pub fn with_rules(rules: Vec<ScopeRule>) -> Self {
        Self {
            rules,
            ..Default::default()
        }
    }

    /// Adds an admission rule.
    #[must_use]
    pub fn with_rule(mut self, rule: ScopeRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Overrides the scope depth.
    #[must_use]
    pub fn with_scope_depth(mut self, depth: usize) -> Self {
        self.scope_depth = Some(depth);
        self
    }

    /// Replaces the secondary-archive suffixes.
    #[must_use]
    pub fn with_archive_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.archive_suffixes = suffixes;
        self
    }

    /// Sets the number of per-scope workers.
    #[must_use]
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Checks that the configuration can drive a run.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidConfig` if there are no rules, a rule
    /// or archive suffix is empty, the scope depth is zero, or `jobs` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.rules.is_empty() {
            return Err(invalid("at least one scope rule is required"));
        }
        if let Some(rule) = self.rules.iter().find(|rule| rule.pattern().is_empty()) {
            return Err(invalid(format!("empty pattern in scope rule {rule:?}")));
        }
        if self.scope_depth == Some(0) {
            return Err(invalid("scope depth is 1-based and must be at least 1"));
        }
        if self.archive_suffixes.iter().any(String::is_empty) {
            return Err(invalid("archive suffixes must not be empty"));
        }
        if self.jobs == 0 {
            return Err(invalid("jobs must be at least 1"));
        }
        Ok(())
    }

    /// Builds the scope matcher for this rule set.
    #[must_use]
    pub fn matcher(&self) -> ScopeMatcher {
        ScopeMatcher::new(self.rules.clone())
    }

    /// Returns `true` if `file_name` ends with a secondary-archive suffix.
    #[must_use]
    pub fn is_secondary_archive(&self, file_name: &str) -> bool {
        self.archive_suffixes
            .iter()
            .any(|suffix| file_name.ends_with(suffix.as_str()))
    }
}

fn invalid(reason: impl Into<String>) -> ExtractionError {
    ExtractionError::InvalidConfig {
        reason: reason.into(),
    }
}
