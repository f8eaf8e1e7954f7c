use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::opts::{Placeholders, ResolveMode};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub placeholders: PlaceholderConfig,
    #[serde(default)]
    pub launch: LaunchConfig,
    #[serde(default)]
    pub user: UserConfig,
}

/// Where fragments are kept between staging and launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Fragment directory (default: `.java-opts`).
    #[serde(default = "default_store_dir")]
    pub dir: PathBuf,
}

/// Assembly behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Fail on unresolved `$NAME` references instead of substituting "".
    #[serde(default)]
    pub strict: bool,
}

/// Names of the deferred-expansion variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderConfig {
    /// Install root (default: `DEPS_DIR`).
    #[serde(default = "default_install_root_var")]
    pub install_root: String,
    /// Home directory (default: `HOME`).
    #[serde(default = "default_home_var")]
    pub home: String,
    /// Pass-through variable (default: `JAVA_OPTS`).
    #[serde(default = "default_passthrough_var")]
    pub passthrough: String,
}

/// How the assembled value reaches the managed process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Environment variable that receives the value (default: `JAVA_OPTS`).
    #[serde(default = "default_launch_variable")]
    pub variable: String,
}

/// End-user options, written as the last fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Shell-quoted option string.
    #[serde(default)]
    pub java_opts: String,
    /// Keep options already present in the launch environment (default: true).
    #[serde(default = "default_from_environment")]
    pub from_environment: bool,
}

fn default_store_dir() -> PathBuf {
    PathBuf::from(".java-opts")
}

fn default_install_root_var() -> String {
    "DEPS_DIR".to_string()
}

fn default_home_var() -> String {
    "HOME".to_string()
}

fn default_passthrough_var() -> String {
    "JAVA_OPTS".to_string()
}

fn default_launch_variable() -> String {
    "JAVA_OPTS".to_string()
}

fn default_from_environment() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: default_store_dir(),
        }
    }
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            install_root: default_install_root_var(),
            home: default_home_var(),
            passthrough: default_passthrough_var(),
        }
    }
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            variable: default_launch_variable(),
        }
    }
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            java_opts: String::new(),
            from_environment: default_from_environment(),
        }
    }
}

impl PlaceholderConfig {
    pub fn to_placeholders(&self) -> Placeholders {
        Placeholders {
            install_root: self.install_root.clone(),
            home: self.home.clone(),
            passthrough: self.passthrough.clone(),
        }
    }
}

impl ResolverConfig {
    pub fn mode(&self) -> ResolveMode {
        ResolveMode::from_strict(self.strict)
    }
}
