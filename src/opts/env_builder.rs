//! Launch environment builder — all child env vars in one place.

/// Builder for environment variables passed to the managed process.
#[derive(Debug, Clone, Default)]
pub struct LaunchEnv {
    vars: Vec<(String, String)>,
}

impl LaunchEnv {
    /// Create an empty environment set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Always-present: the assembled option string under `variable`.
    pub fn with_java_opts(mut self, variable: &str, value: &str) -> Self {
        self.vars.push((variable.into(), value.into()));
        self
    }

    /// Add arbitrary extra environment variables.
    pub fn with_extra(mut self, extra: Vec<(String, String)>) -> Self {
        self.vars.extend(extra);
        self
    }

    /// Build the final environment variable list.
    pub fn build(self) -> Vec<(String, String)> {
        self.vars
    }
}
