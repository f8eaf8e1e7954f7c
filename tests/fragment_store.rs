mod common;

use std::sync::Arc;
use std::thread;

use common::{fragment, keys, temp_store};
use java_opts::opts::{write_fragment, FragmentError, FragmentStore, StoreError};
use tempfile::TempDir;

#[test]
fn missing_directory_is_empty() {
    let (_dir, store) = temp_store();
    assert!(!store.dir().exists());
    assert!(store.all_ordered().unwrap().is_empty());
}

#[test]
fn put_creates_directory_and_file() {
    let (_dir, store) = temp_store();
    let path = store.put(&fragment(5, "base", "-Xms256m")).unwrap();

    assert_eq!(path, store.dir().join("05_base.opts"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "-Xms256m");
}

#[test]
fn last_write_wins_per_key() {
    let (_dir, store) = temp_store();
    write_fragment(&store, 35, "agent", "-Dold=1").unwrap();
    write_fragment(&store, 35, "agent", "-Dnew=1").unwrap();

    let fragments = store.all_ordered().unwrap();
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].content(), "-Dnew=1");
}

#[test]
fn same_name_different_priority_are_distinct() {
    let (_dir, store) = temp_store();
    write_fragment(&store, 10, "agent", "a").unwrap();
    write_fragment(&store, 20, "agent", "b").unwrap();
    assert_eq!(keys(&store.all_ordered().unwrap()), vec!["10_agent", "20_agent"]);
}

#[test]
fn content_is_preserved_byte_for_byte() {
    let (_dir, store) = temp_store();
    let content = "  -Da=x\\ y  '\n' $JAVA_OPTS ";
    write_fragment(&store, 1, "raw", content).unwrap();
    assert_eq!(store.all_ordered().unwrap()[0].content(), content);
}

#[test]
fn directory_listing_is_priority_ordered() {
    let (_dir, store) = temp_store();
    for (priority, name) in [(9, "b"), (10, "a"), (1, "c")] {
        write_fragment(&store, priority, name, "").unwrap();
    }

    let mut names: Vec<String> = std::fs::read_dir(store.dir())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["01_c.opts", "09_b.opts", "10_a.opts"]);
}

#[test]
fn foreign_files_are_ignored() {
    let (_dir, store) = temp_store();
    write_fragment(&store, 5, "base", "-Xms256m").unwrap();
    std::fs::write(store.dir().join("README"), "not a fragment").unwrap();
    std::fs::write(store.dir().join(".05_base.opts.partial.tmp"), "junk").unwrap();

    assert_eq!(keys(&store.all_ordered().unwrap()), vec!["05_base"]);
}

#[test]
fn invalid_fragments_are_rejected_before_writing() {
    let (_dir, store) = temp_store();
    let err = write_fragment(&store, 120, "late", "-Dx=1").unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidFragment(FragmentError::PriorityOutOfRange(120))
    ));
    assert!(!store.dir().exists());
}

#[test]
fn uncreatable_directory_reports_the_directory() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();

    let store = FragmentStore::new(&blocker);
    let err = write_fragment(&store, 1, "a", "x").unwrap_err();
    match err {
        StoreError::WriteError { ref path, .. } => assert_eq!(path, &blocker),
        ref other => panic!("unexpected error: {:?}", other),
    }
    assert!(!err.to_string().contains("01_a.opts"));
}

#[test]
fn concurrent_puts_do_not_lose_updates() {
    let (_dir, store) = temp_store();
    let store = Arc::new(store);

    let handles: Vec<_> = (0..32u8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for round in 0..5 {
                    write_fragment(
                        &store,
                        i,
                        &format!("plugin-{}", i),
                        &format!("-Dplugin{}.round={}", i, round),
                    )
                    .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let fragments = store.all_ordered().unwrap();
    assert_eq!(fragments.len(), 32);
    for (i, f) in fragments.iter().enumerate() {
        assert_eq!(f.priority() as usize, i);
        assert_eq!(f.content(), format!("-Dplugin{}.round=4", i));
    }

    let leftovers = std::fs::read_dir(store.dir())
        .unwrap()
        .filter(|e| {
            e.as_ref()
                .unwrap()
                .file_name()
                .to_string_lossy()
                .ends_with(".tmp")
        })
        .count();
    assert_eq!(leftovers, 0);
}
