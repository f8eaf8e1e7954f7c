//! `JAVA_OPTS` assembly pipeline.
//!
//! Staging-time producers write fragments; launch-time assembly reads them
//! back in priority order:
//!
//! ```text
//! Raw options → Tokenize → Escape → Fragment → Store
//! Store → Order → Substitute (structural, pass-through, env) → Trim → JAVA_OPTS
//! ```
//!
//! Each stage is a pure function or a small builder that can be unit-tested
//! independently; only the store touches the filesystem.

mod assembler;
mod env_builder;
mod escaper;
mod fragment;
mod pipeline;
mod resolver;
mod store;
mod tokenizer;

pub use assembler::{user_fragment, OptsAssembler, UserOptsError};
pub use env_builder::LaunchEnv;
pub use escaper::{escape_option, escape_value};
pub use fragment::{sanitize_name, Fragment, FragmentError, MAX_PRIORITY, USER_PRIORITY};
pub use pipeline::{build_launch_params, LaunchParams};
pub use resolver::{
    is_identifier, Placeholders, Resolution, ResolveError, ResolveMode, Resolver, RuntimeContext,
};
pub use store::{write_fragment, FragmentStore, StoreError};
pub use tokenizer::{tokenize, TokenizeError};
