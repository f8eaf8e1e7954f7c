//! Staging-time `JAVA_OPTS` assembly.
//!
//! Framework plugins contribute option fragments at staging time; the
//! launcher assembles them once at process start.

pub mod config;
pub mod logging;
pub mod opts;
