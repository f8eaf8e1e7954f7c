//! Fragment — one plugin's contribution to `JAVA_OPTS`.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Highest valid priority. Reserved for end-user overrides.
pub const MAX_PRIORITY: u8 = 99;

/// Priority of the user-supplied options fragment.
pub const USER_PRIORITY: u8 = MAX_PRIORITY;

/// File extension of a stored fragment.
pub const FRAGMENT_SUFFIX: &str = "opts";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    #[error("fragment priority {0} is out of range (0..=99)")]
    PriorityOutOfRange(u8),

    #[error("fragment name {0:?} is empty after sanitizing")]
    InvalidName(String),
}

/// Immutable `(priority, name, content)` triple.
///
/// Ordering is by priority, then name, which is also the store's iteration
/// order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Fragment {
    priority: u8,
    name: String,
    content: String,
}

impl Fragment {
    /// Create a fragment, sanitizing `name` into a storage-safe slug.
    pub fn new(
        priority: u8,
        name: &str,
        content: impl Into<String>,
    ) -> Result<Self, FragmentError> {
        if priority > MAX_PRIORITY {
            return Err(FragmentError::PriorityOutOfRange(priority));
        }
        let slug = sanitize_name(name);
        if slug.is_empty() {
            return Err(FragmentError::InvalidName(name.to_string()));
        }
        Ok(Self {
            priority,
            name: slug,
            content: content.into(),
        })
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Storage key, e.g. `35_app-dynamics`. Sorts lexically in priority order.
    pub fn key(&self) -> String {
        format!("{:02}_{}", self.priority, self.name)
    }

    /// On-disk file name, e.g. `35_app-dynamics.opts`.
    ///
    /// Priorities sort lexically, but names sharing a priority may not:
    /// `35_a-b.opts` lists before `35_a.opts`. Use [`Fragment`]'s `Ord`, not
    /// the raw directory listing, for tie order.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.key(), FRAGMENT_SUFFIX)
    }

    /// Inverse of [`Fragment::file_name`]: recover `(priority, name)`.
    ///
    /// Returns `None` for anything that is not a well-formed fragment file.
    pub fn parse_file_name(file_name: &str) -> Option<(u8, String)> {
        let stem = file_name.strip_suffix(FRAGMENT_SUFFIX)?.strip_suffix('.')?;
        let (priority, name) = stem.split_once('_')?;
        if priority.len() != 2 || !priority.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if name.is_empty() || sanitize_name(name) != name {
            return None;
        }
        Some((priority.parse().ok()?, name.to_string()))
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.key(), self.content)
    }
}

/// Lowercase; anything outside `[a-z0-9_-]` becomes `_`.
pub fn sanitize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_zero_padded() {
        let f = Fragment::new(5, "base", "-Xms256m").unwrap();
        assert_eq!(f.key(), "05_base");
        assert_eq!(f.file_name(), "05_base.opts");
    }

    #[test]
    fn name_is_sanitized() {
        let f = Fragment::new(40, "App Dynamics/Agent", "").unwrap();
        assert_eq!(f.name(), "app_dynamics_agent");
    }

    #[test]
    fn rejects_priority_above_max() {
        assert_eq!(
            Fragment::new(100, "x", ""),
            Err(FragmentError::PriorityOutOfRange(100))
        );
    }

    #[test]
    fn rejects_blank_name() {
        assert!(matches!(
            Fragment::new(10, "   ", ""),
            Err(FragmentError::InvalidName(_))
        ));
    }

    #[test]
    fn orders_by_priority_then_name() {
        let mut fragments = vec![
            Fragment::new(35, "zeta", "").unwrap(),
            Fragment::new(5, "base", "").unwrap(),
            Fragment::new(35, "alpha", "").unwrap(),
        ];
        fragments.sort();
        let keys: Vec<_> = fragments.iter().map(Fragment::key).collect();
        assert_eq!(keys, vec!["05_base", "35_alpha", "35_zeta"]);
    }

    #[test]
    fn displays_key_and_content() {
        let f = Fragment::new(12, "jmx", "-Dcom.sun.management.jmxremote").unwrap();
        assert_eq!(f.to_string(), "12_jmx\t-Dcom.sun.management.jmxremote");
    }

    #[test]
    fn tie_order_follows_name_not_file_name() {
        let mut fragments = vec![
            Fragment::new(35, "a-b", "").unwrap(),
            Fragment::new(35, "a", "").unwrap(),
        ];
        let mut file_names: Vec<_> = fragments.iter().map(Fragment::file_name).collect();
        file_names.sort();
        assert_eq!(file_names, vec!["35_a-b.opts", "35_a.opts"]);

        fragments.sort();
        let keys: Vec<_> = fragments.iter().map(Fragment::key).collect();
        assert_eq!(keys, vec!["35_a", "35_a-b"]);
    }

    #[test]
    fn parses_own_file_names() {
        let f = Fragment::new(7, "jmx", "").unwrap();
        assert_eq!(
            Fragment::parse_file_name(&f.file_name()),
            Some((7, "jmx".to_string()))
        );
    }

    #[test]
    fn ignores_foreign_file_names() {
        assert_eq!(Fragment::parse_file_name("README.md"), None);
        assert_eq!(Fragment::parse_file_name("5_base.opts"), None);
        assert_eq!(Fragment::parse_file_name("05_.opts"), None);
        assert_eq!(Fragment::parse_file_name("05_Base.opts"), None);
        assert_eq!(Fragment::parse_file_name(".05_base.opts.tmp"), None);
    }
}
