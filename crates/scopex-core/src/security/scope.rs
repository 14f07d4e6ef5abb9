//! Scope admission rules.
//!
//! A scope is the identity or resource bucket an export entry belongs to.
//! It is named by a single path segment (for example `alice@org.co.uk` or
//! `Resource: 42`). The matcher only looks at that one segment; which segment
//! of an entry path is the scope token is decided by the caller.

use std::fmt;

/// A single admission rule.
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScopeRule {
    /// Admits segments that end with the given domain suffix, e.g.
    /// `@org.co.uk`.
    DomainSuffix(String),

    /// Admits segments that start with the given literal prefix, e.g.
    /// `Resource:`.
    ResourcePrefix(String),
}

impl ScopeRule {
    /// Creates a domain-suffix rule.
    #[must_use]
    pub fn domain_suffix(suffix: impl Into<String>) -> Self {
        Self::DomainSuffix(suffix.into())
    }

    /// Creates a resource-prefix rule.
    #[must_use]
    pub fn resource_prefix(prefix: impl Into<String>) -> Self {
        Self::ResourcePrefix(prefix.into())
    }

    /// Returns `true` if `segment` satisfies this rule.
    ///
    /// # Examples
    ///
    /// ```
    /// use scopex_core::ScopeRule;
    ///
    /// let rule = ScopeRule::domain_suffix("@org.co.uk");
    /// assert!(rule.matches("alice@org.co.uk"));
    /// assert!(!rule.matches("alice@org.com"));
    /// ```
    #[must_use]
    pub fn matches(&self, segment: &str) -> bool {
        match self {
            Self::DomainSuffix(suffix) => segment.ends_with(suffix.as_str()),
            Self::ResourcePrefix(prefix) => segment.starts_with(prefix.as_str()),
        }
    }

    /// Returns the literal text of the rule.
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            Self::DomainSuffix(s) | Self::ResourcePrefix(s) => s,
        }
    }
}

impl fmt::Display for ScopeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DomainSuffix(suffix) => write!(f, "*{suffix}"),
            Self::ResourcePrefix(prefix) => write!(f, "{prefix}*"),
        }
    }
}

/// Decides whether a path segment names an authorized scope.
///
/// A segment is admitted if any configured rule matches. A matcher with no
/// rules admits nothing.
///
/// # Examples
///
/// ```
/// use scopex_core::ScopeMatcher;
/// use scopex_core::ScopeRule;
///
/// let matcher = ScopeMatcher::new(vec![
///     ScopeRule::domain_suffix("@org.co.uk"),
///     ScopeRule::resource_prefix("Resource:"),
/// ]);
///
/// assert!(matcher.is_admitted("user@org.co.uk"));
/// assert!(matcher.is_admitted("Resource: 42"));
/// assert!(!matcher.is_admitted("Resources-42"));
/// assert!(!matcher.is_admitted("user@org.com"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeMatcher {
    rules: Vec<ScopeRule>,
}

impl ScopeMatcher {
    /// Creates a matcher from a rule set.
    #[must_use]
    pub fn new(rules: Vec<ScopeRule>) -> Self {
        Self { rules }
    }

    /// Returns `true` if `segment` is admitted by at least one rule.
    #[must_use]
    pub fn is_admitted(&self, segment: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(segment))
    }

    /// Returns the configured rules.
    #[must_use]
    pub fn rules(&self) -> &[ScopeRule] {
        &self.rules
    }
}
