//! Option assembler — one fragment's content in one place.

use crate::opts::escaper::{escape_option, escape_value};
use crate::opts::fragment::{Fragment, FragmentError, USER_PRIORITY};
use crate::opts::tokenizer::{tokenize, TokenizeError};

/// Builder for the content of a single fragment.
#[derive(Debug, Clone, Default)]
pub struct OptsAssembler {
    opts: Vec<String>,
}

impl OptsAssembler {
    /// Start with an empty option list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Framework-owned option, added verbatim.
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.opts.push(option.into());
        self
    }

    /// `-Dkey=value` with the value escaped.
    pub fn with_system_property(mut self, key: &str, value: &str) -> Self {
        self.opts.push(format!("-D{}={}", key, escape_value(value)));
        self
    }

    /// User-supplied, shell-quoted options: tokenized, then each re-escaped.
    pub fn with_user_opts(mut self, raw: &str) -> Result<Self, TokenizeError> {
        self.opts
            .extend(tokenize(raw)?.iter().map(|token| escape_option(token)));
        Ok(self)
    }

    /// Deferred reference to the inbound value of `variable`.
    pub fn with_passthrough(mut self, variable: &str) -> Self {
        self.opts.push(format!("${}", variable));
        self
    }

    /// Build the fragment content.
    pub fn build(self) -> String {
        self.opts.join(" ")
    }
}

/// Errors while building the user fragment.
#[derive(Debug, thiserror::Error)]
pub enum UserOptsError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error(transparent)]
    Fragment(#[from] FragmentError),
}

/// Build the end-user fragment (`99_user`).
///
/// `raw` is the configured option string. With `from_environment` the
/// inbound value of `passthrough` is appended so options already present in
/// the launch environment are kept.
pub fn user_fragment(
    raw: &str,
    from_environment: bool,
    passthrough: &str,
) -> Result<Fragment, UserOptsError> {
    let mut assembler = OptsAssembler::new().with_user_opts(raw)?;
    if from_environment {
        assembler = assembler.with_passthrough(passthrough);
    }
    Ok(Fragment::new(USER_PRIORITY, "user", assembler.build())?)
}
