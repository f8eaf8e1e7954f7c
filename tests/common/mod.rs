//! Shared test utilities.

#![allow(dead_code)]

use java_opts::opts::{Fragment, FragmentStore};
use tempfile::TempDir;

/// Fresh store in a temporary directory. Keep the `TempDir` alive.
pub fn temp_store() -> (TempDir, FragmentStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = FragmentStore::new(temp_dir.path().join("java_opts"));
    (temp_dir, store)
}

pub fn fragment(priority: u8, name: &str, content: &str) -> Fragment {
    Fragment::new(priority, name, content).expect("valid fragment")
}

/// Keys of `fragments` in order, e.g. `["05_base", "99_user"]`.
pub fn keys(fragments: &[Fragment]) -> Vec<String> {
    fragments.iter().map(Fragment::key).collect()
}
