//! Environment-dependent loading lives in its own test binary: these tests
//! mutate process-wide state and run one at a time under `ENV_LOCK`.

use std::env;
use std::fs;
use std::sync::Mutex;

use tempfile::TempDir;

use treestore::{DuplicateIdPolicy, RootPolicy, Settings};

static ENV_LOCK: Mutex<()> = Mutex::new(());

const OVERRIDES: [&str; 4] = [
    "TREESTORE_DUPLICATE_IDS",
    "TREESTORE_MULTIPLE_ROOTS",
    "TREESTORE_DISPLAY__EMPTY_LABEL",
    "TREESTORE_DISPLAY__MAX_DEPTH",
];

/// Points the XDG config home at an empty temp dir and clears overrides.
fn isolated_env() -> TempDir {
    let home = TempDir::new().unwrap();
    env::set_var("XDG_CONFIG_HOME", home.path());
    for key in OVERRIDES {
        env::remove_var(key);
    }
    home
}

#[test]
fn given_isolated_env_when_load_without_local_then_returns_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _home = isolated_env();

    let settings = Settings::load(None).expect("load settings");

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.duplicate_ids, DuplicateIdPolicy::LastWriteWins);
    assert_eq!(settings.multiple_roots, RootPolicy::LastWins);
    assert_eq!(settings.display.empty_label, "Empty tree");
}

#[cfg(target_os = "linux")]
#[test]
fn given_global_file_under_xdg_home_when_load_then_it_is_applied() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let home = isolated_env();
    let dir = home.path().join("treestore");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("treestore.toml"), "multiple_roots = \"reject\"\n").unwrap();

    let settings = Settings::load(None).expect("load settings");

    assert_eq!(settings.multiple_roots, RootPolicy::Reject);
}

#[test]
fn given_env_overrides_when_load_then_env_wins_over_local_file() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let home = isolated_env();
    let path = home.path().join("local.toml");
    fs::write(&path, "duplicate_ids = \"last-write-wins\"\n").unwrap();

    env::set_var("TREESTORE_DUPLICATE_IDS", "reject");
    env::set_var("TREESTORE_DISPLAY__EMPTY_LABEL", "nothing here");
    env::set_var("TREESTORE_DISPLAY__MAX_DEPTH", "16");

    let settings = Settings::load(Some(&path));

    for key in OVERRIDES {
        env::remove_var(key);
    }

    let settings = settings.expect("load settings");
    assert_eq!(settings.duplicate_ids, DuplicateIdPolicy::Reject);
    assert_eq!(settings.multiple_roots, RootPolicy::LastWins);
    assert_eq!(settings.display.empty_label, "nothing here");
    assert_eq!(settings.display.max_depth, 16);
}
