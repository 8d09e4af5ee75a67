//! Include/exclude filtering of watched file names

use regex::Regex;
use tracing::info;

use crate::error::{Error, Result};

/// Default exclude list: hidden files on *NIX systems
pub const DEFAULT_EXCLUDE: &str = r"^\.";

/// Default include list: everything
pub const DEFAULT_INCLUDE: &str = ".*";

/// Role of a compiled pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRole {
    Include,
    Exclude,
}

/// A compiled pattern plus its role
#[derive(Debug, Clone)]
pub struct FilterRule {
    pub role: FilterRole,
    pub pattern: Regex,
}

impl FilterRule {
    /// Compile a rule, reporting the offending pattern on failure
    pub fn new(role: FilterRole, pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { role, pattern })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }
}

/// Decides which filesystem entries take part in change detection.
///
/// Patterns are evaluated against the base name only. Excludes are checked
/// first and veto the entry; includes then need at least one match, unless
/// the include set matches everything.
#[derive(Debug, Clone)]
pub struct FilterSet {
    include: Vec<FilterRule>,
    exclude: Vec<FilterRule>,
    include_all: bool,
}

impl FilterSet {
    /// Compile include and exclude pattern lists.
    ///
    /// An empty include list, or one made only of `.*`, matches everything.
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Result<Self> {
        let include = compile(FilterRole::Include, include)?;
        let exclude = compile(FilterRole::Exclude, exclude)?;
        let include_all = include
            .iter()
            .all(|rule| rule.pattern.as_str() == DEFAULT_INCLUDE);

        Ok(Self {
            include,
            exclude,
            include_all,
        })
    }

    /// Build from comma-separated pattern lists as given on the command line
    pub fn from_csv(include: &str, exclude: &str) -> Result<Self> {
        let include = split_patterns(include);
        let exclude = split_patterns(exclude);
        Self::new(include.as_slice(), exclude.as_slice())
    }

    /// Whether an entry should be checked for modification.
    ///
    /// Directories always return false; they are traversed but never reported.
    pub fn should_process(&self, name: &str, is_dir: bool) -> bool {
        if is_dir {
            return false;
        }
        if self.exclude.iter().any(|rule| rule.matches(name)) {
            return false;
        }
        self.include_all || self.include.iter().any(|rule| rule.matches(name))
    }

    pub fn includes_all(&self) -> bool {
        self.include_all
    }
}

impl Default for FilterSet {
    fn default() -> Self {
        Self::from_csv(DEFAULT_INCLUDE, DEFAULT_EXCLUDE)
            .expect("default patterns are valid regexes")
    }
}

fn compile<S: AsRef<str>>(role: FilterRole, patterns: &[S]) -> Result<Vec<FilterRule>> {
    patterns
        .iter()
        .map(|p| {
            let pattern: &str = p.as_ref();
            let rule = FilterRule::new(role, pattern)?;
            info!(?role, pattern, "filter");
            Ok(rule)
        })
        .collect()
}

/// Split a comma-separated list, dropping empty items
pub fn split_patterns(csv: &str) -> Vec<&str> {
    csv.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}
