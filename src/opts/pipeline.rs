//! Pipeline — ties the launch-time stages together.

use crate::opts::env_builder::LaunchEnv;
use crate::opts::resolver::{ResolveError, Resolver, RuntimeContext};
use crate::opts::store::FragmentStore;

/// Ready-to-use parameters for launching the managed process.
#[derive(Debug, Clone)]
pub struct LaunchParams {
    /// Assembled option string.
    pub java_opts: String,
    /// Environment variables to set.
    pub env: Vec<(String, String)>,
    /// Warnings produced during assembly.
    pub warnings: Vec<String>,
}

/// Build launch parameters from the fragment store.
///
/// This is the consumer entry point, invoked once per process start.
///
/// # Arguments
///
/// * `store` - Fragment store populated during staging
/// * `ctx` - Runtime context captured before anything was assembled
/// * `resolver` - Resolver carrying placeholder names and strictness
/// * `variable` - Name the assembled value is exported under
/// * `extra_env` - Additional variables for the child process
pub fn build_launch_params(
    store: &FragmentStore,
    ctx: &RuntimeContext,
    resolver: &Resolver,
    variable: &str,
    extra_env: Vec<(String, String)>,
) -> Result<LaunchParams, ResolveError> {
    // Stage 1: Resolve fragments
    let resolution = resolver.resolve(store, ctx)?;

    // Stage 2: Build environment
    let env = LaunchEnv::new()
        .with_java_opts(variable, &resolution.value)
        .with_extra(extra_env)
        .build();

    let warnings = resolution
        .unresolved
        .iter()
        .map(|name| format!("${}: unresolved, replaced with empty string", name))
        .collect();

    Ok(LaunchParams {
        java_opts: resolution.value,
        env,
        warnings,
    })
}
