//! Assembly resolver — ordered fragments → final `JAVA_OPTS` value.
//!
//! Substitution runs in fixed passes over a list of segments. Text inserted
//! by a pass is frozen and never scanned again, so no expansion recurses and
//! a fragment's `$JAVA_OPTS` can only ever see the inbound value.

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::opts::fragment::Fragment;
use crate::opts::store::{FragmentStore, StoreError};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Unresolved variable(s) in assembled options: {}", .names.join(", "))]
    UnresolvedVariables { names: Vec<String> },
}

/// Names of the deferred-expansion variables with special handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    /// Install root (droplet dependencies directory).
    pub install_root: String,
    /// User home directory.
    pub home: String,
    /// Variable whose inbound value is captured before assembly.
    pub passthrough: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            install_root: "DEPS_DIR".to_string(),
            home: "HOME".to_string(),
            passthrough: "JAVA_OPTS".to_string(),
        }
    }
}

/// What to do with references that nothing resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// Substitute the empty string and report a warning.
    #[default]
    Lenient,
    /// Fail with [`ResolveError::UnresolvedVariables`].
    Strict,
}

impl ResolveMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

/// Inputs the resolver reads at process launch.
#[derive(Debug, Clone, Default)]
pub struct RuntimeContext {
    pub install_root: String,
    pub home: String,
    /// Ambient environment, used for generic `$NAME` references.
    pub env: HashMap<String, String>,
    /// Value of the pass-through variable as it was before assembly.
    pub inbound: Option<String>,
}

impl RuntimeContext {
    pub fn new(install_root: impl Into<String>, home: impl Into<String>) -> Self {
        Self {
            install_root: install_root.into(),
            home: home.into(),
            ..Default::default()
        }
    }

    pub fn with_env(mut self, env: impl IntoIterator<Item = (String, String)>) -> Self {
        self.env.extend(env);
        self
    }

    pub fn with_inbound(mut self, inbound: Option<String>) -> Self {
        self.inbound = inbound;
        self
    }

    /// Snapshot the current process environment.
    ///
    /// The pass-through value is taken from the environment here, before
    /// anything assembles a new value for it. Missing roots fall back to the
    /// matching environment variable, then to the working directory and
    /// `dirs::home_dir()`.
    pub fn from_process(
        install_root: Option<PathBuf>,
        home: Option<PathBuf>,
        placeholders: &Placeholders,
    ) -> Self {
        let env: HashMap<String, String> = std::env::vars().collect();
        let inbound = env.get(&placeholders.passthrough).cloned();

        let install_root = install_root
            .map(|p| p.display().to_string())
            .or_else(|| env.get(&placeholders.install_root).cloned())
            .or_else(|| std::env::current_dir().ok().map(|p| p.display().to_string()))
            .unwrap_or_default();
        let home = home
            .map(|p| p.display().to_string())
            .or_else(|| env.get(&placeholders.home).cloned())
            .or_else(|| dirs::home_dir().map(|p| p.display().to_string()))
            .unwrap_or_default();

        Self {
            install_root,
            home,
            env,
            inbound,
        }
    }
}

/// Result of a successful resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Final option string.
    pub value: String,
    /// References that resolved to nothing (lenient mode only).
    pub unresolved: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Resolver {
    placeholders: Placeholders,
    mode: ResolveMode,
}

impl Resolver {
    pub fn new(placeholders: Placeholders, mode: ResolveMode) -> Self {
        Self { placeholders, mode }
    }

    /// Read the store and assemble its fragments.
    pub fn resolve(
        &self,
        store: &FragmentStore,
        ctx: &RuntimeContext,
    ) -> Result<Resolution, ResolveError> {
        let fragments = store.all_ordered()?;
        self.resolve_fragments(&fragments, ctx)
    }

    /// Assemble already-ordered fragments.
    pub fn resolve_fragments(
        &self,
        fragments: &[Fragment],
        ctx: &RuntimeContext,
    ) -> Result<Resolution, ResolveError> {
        // 1. Inbound pass-through value, fixed before any assembly.
        let inbound = ctx.inbound.clone().unwrap_or_default();

        // 2. Concatenate non-blank contents in store order.
        let joined = fragments
            .iter()
            .map(Fragment::content)
            .filter(|content| !content.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let mut segments = vec![Segment::Raw(joined)];

        // 3. Structural placeholders.
        let p = &self.placeholders;
        segments = substitute(segments, |name| {
            if name == p.install_root {
                Some(ctx.install_root.clone())
            } else if name == p.home {
                Some(ctx.home.clone())
            } else {
                None
            }
        });

        // 4. Pass-through placeholder.
        segments = substitute(segments, |name| {
            (name == p.passthrough).then(|| inbound.clone())
        });

        // 5. Everything else from the ambient environment.
        let mut unresolved: Vec<String> = Vec::new();
        segments = substitute(segments, |name| match ctx.env.get(name) {
            Some(value) => Some(value.clone()),
            None => {
                if !unresolved.iter().any(|n| n == name) {
                    unresolved.push(name.to_string());
                }
                Some(String::new())
            }
        });

        if !unresolved.is_empty() && self.mode == ResolveMode::Strict {
            return Err(ResolveError::UnresolvedVariables { names: unresolved });
        }
        for name in &unresolved {
            tracing::warn!(variable = %name, "Unresolved variable replaced with empty string");
        }

        // 6. Trim.
        let value = segments
            .iter()
            .map(Segment::text)
            .collect::<String>()
            .trim()
            .to_string();

        tracing::info!(
            fragments = fragments.len(),
            unresolved = unresolved.len(),
            "Assembled options"
        );

        Ok(Resolution { value, unresolved })
    }
}

/// Assembly text, split into parts still open to substitution and parts
/// already produced by one.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Raw(String),
    Resolved(String),
}

impl Segment {
    fn text(&self) -> &str {
        match self {
            Segment::Raw(s) | Segment::Resolved(s) => s,
        }
    }
}

/// One substitution pass over the `Raw` segments.
///
/// `lookup` returns `Some` to replace a reference, `None` to leave it for a
/// later pass.
fn substitute(
    segments: Vec<Segment>,
    mut lookup: impl FnMut(&str) -> Option<String>,
) -> Vec<Segment> {
    let mut out = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            Segment::Raw(text) => scan(&text, &mut lookup, &mut out),
            resolved => out.push(resolved),
        }
    }
    out
}

fn scan(
    text: &str,
    lookup: &mut impl FnMut(&str) -> Option<String>,
    out: &mut Vec<Segment>,
) {
    let bytes = text.as_bytes();
    let mut raw_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            // Escaped character, never the start of a reference.
            b'\\' => i += 2,
            b'$' => match parse_reference(&text[i..]) {
                Some((name, len)) => {
                    if let Some(value) = lookup(name) {
                        if raw_start < i {
                            out.push(Segment::Raw(text[raw_start..i].to_string()));
                        }
                        out.push(Segment::Resolved(value));
                        raw_start = i + len;
                    }
                    i += len;
                }
                None => i += 1,
            },
            _ => i += 1,
        }
    }

    if raw_start < bytes.len() {
        out.push(Segment::Raw(text[raw_start..].to_string()));
    }
}

/// Parse `$NAME` or `${NAME}` at the start of `s`.
///
/// Returns the name and the byte length of the whole reference.
fn parse_reference(s: &str) -> Option<(&str, usize)> {
    let rest = s.strip_prefix('$')?;
    if let Some(braced) = rest.strip_prefix('{') {
        let end = braced.find('}')?;
        let name = &braced[..end];
        return is_identifier(name).then_some((name, end + 3));
    }

    let len = rest
        .bytes()
        .enumerate()
        .take_while(|&(idx, b)| {
            b == b'_' || b.is_ascii_alphabetic() || (idx > 0 && b.is_ascii_digit())
        })
        .count();
    (len > 0).then(|| (&rest[..len], len + 1))
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(b) if b == b'_' || b.is_ascii_alphabetic() => {}
        _ => return false,
    }
    bytes.all(|b| b == b'_' || b.is_ascii_alphanumeric())
}
