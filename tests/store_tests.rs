//! Integration tests for the account store.

use std::fs;

use passvault::config::Settings;
use passvault::config::BackupSettings;
use passvault::crypto::{Argon2Params, KeyVault, Session};
use passvault::errors::PassVaultError;
use passvault::vault::{AccountStore, ScriptedPrompter, BACKUP_DIR};
use tempfile::TempDir;

/// Helper: an initialized store in a fresh temp dir with cheap KDF settings.
fn setup() -> (TempDir, Settings, Session, AccountStore) {
    setup_with_backup_format(passvault::vault::BACKUP_TIMESTAMP_FORMAT)
}

/// Helper: like `setup`, with a custom backup suffix format.
fn setup_with_backup_format(format: &str) -> (TempDir, Settings, Session, AccountStore) {
    let dir = TempDir::new().expect("create temp dir");
    let settings = Settings {
        kdf: Argon2Params::minimum(),
        backup: BackupSettings {
            timestamp_format: format.to_string(),
        },
        ..Settings::default()
    };
    let keys = KeyVault::new(dir.path(), settings.argon2_params());
    keys.initialize(b"pw").expect("initialize");
    let session = keys.unlock(b"pw").expect("unlock");
    let store = AccountStore::open(dir.path(), &settings).expect("open store");
    (dir, settings, session, store)
}

fn suffix_of<'a>(key: &'a str, name: &str) -> &'a str {
    key.strip_prefix(&format!("{BACKUP_DIR}/{name}."))
        .expect("backup key of name")
}

// ---------------------------------------------------------------------------
// Write / read
// ---------------------------------------------------------------------------

#[test]
fn write_then_read_with_backup() {
    let (_dir, _settings, session, mut store) = setup();

    store.write(&session, "alpha/one", &["secret1"]).unwrap();
    assert_eq!(store.read(&session, "alpha/one").unwrap(), vec!["secret1"]);

    let backups = store.backups("alpha/one");
    assert_eq!(backups.len(), 1);
    assert!(backups[0].starts_with(".backup/alpha/one."));

    let live = fs::read(store.path_of("alpha/one")).unwrap();
    let copy = fs::read(store.path_of(&backups[0])).unwrap();
    assert_eq!(live, copy);
}

#[test]
fn records_are_trimmed_and_one_token_per_line() {
    let (_dir, _settings, session, mut store) = setup();

    store
        .write(&session, "mail", &["  pw  ", "", "user: me ", "   "])
        .unwrap();
    assert_eq!(store.read(&session, "mail").unwrap(), vec!["pw", "user: me"]);

    let on_disk = fs::read_to_string(store.path_of("mail")).unwrap();
    assert_eq!(on_disk.lines().count(), 2);
    assert!(on_disk.lines().all(|line| line != "pw" && line != "user: me"));
}

#[test]
fn backups_can_be_read() {
    let (_dir, _settings, session, mut store) = setup();
    store.write(&session, "mail", &["first"]).unwrap();

    let backup = store.backups("mail").remove(0);
    assert_eq!(store.read(&session, &backup).unwrap(), vec!["first"]);
}

#[test]
fn write_replaces_and_create_refuses() {
    let (_dir, _settings, session, mut store) = setup();
    store.create(&session, "mail", &["one"]).unwrap();

    assert!(matches!(
        store.create(&session, "mail", &["two"]),
        Err(PassVaultError::NameExists(_))
    ));
    assert_eq!(store.read(&session, "mail").unwrap(), vec!["one"]);

    store.write(&session, "mail", &["two"]).unwrap();
    assert_eq!(store.read(&session, "mail").unwrap(), vec!["two"]);
}

#[test]
fn invalid_records_are_rejected() {
    let (_dir, _settings, session, mut store) = setup();

    assert!(matches!(
        store.write(&session, "a", &["", " "]),
        Err(PassVaultError::EmptyRecord(_))
    ));
    assert!(matches!(
        store.write(&session, "a", &["has space"]),
        Err(PassVaultError::SecretContainsSpace)
    ));
    assert!(!store.contains("a"));
    assert!(store.backups("a").is_empty());
}

#[test]
fn invalid_names_are_rejected() {
    let (_dir, _settings, session, mut store) = setup();

    for name in ["a.", "", ".", ".hidden", "/abs", "a//b", "a/", "a/.b", "a./b"] {
        assert!(
            matches!(
                store.write(&session, name, &["x"]),
                Err(PassVaultError::InvalidAccountName(..))
            ),
            "{name:?} should be rejected"
        );
    }
    assert!(store.list("", true).is_empty());
}

#[test]
fn read_missing_account() {
    let (_dir, _settings, session, store) = setup();
    assert!(matches!(
        store.read(&session, "nope"),
        Err(PassVaultError::NotFound(_))
    ));
}

#[test]
fn tampered_line_fails_and_others_stay_readable() {
    let (_dir, _settings, session, mut store) = setup();
    store.write(&session, "victim", &["s1"]).unwrap();
    store.write(&session, "bystander", &["s2"]).unwrap();

    let path = store.path_of("victim");
    let mut token: Vec<char> = fs::read_to_string(&path).unwrap().trim().chars().collect();
    let mid = token.len() / 2;
    token[mid] = if token[mid] == 'A' { 'B' } else { 'A' };
    fs::write(&path, token.into_iter().collect::<String>()).unwrap();

    assert!(matches!(
        store.read(&session, "victim"),
        Err(PassVaultError::InvalidCiphertext)
    ));
    assert_eq!(store.read(&session, "bystander").unwrap(), vec!["s2"]);
}

#[test]
fn another_stores_key_cannot_read() {
    let (_dir_a, _settings_a, session_a, mut store_a) = setup();
    let (_dir_b, _settings_b, session_b, _store_b) = setup();
    store_a.write(&session_a, "mail", &["x"]).unwrap();

    assert!(matches!(
        store_a.read(&session_b, "mail"),
        Err(PassVaultError::InvalidCiphertext)
    ));
}

// ---------------------------------------------------------------------------
// Path conflicts
// ---------------------------------------------------------------------------

#[test]
fn file_in_the_way_is_a_path_conflict() {
    let (_dir, _settings, session, mut store) = setup();
    store.write(&session, "a", &["x"]).unwrap();

    match store.write(&session, "a/b", &["y"]) {
        Err(PassVaultError::PathConflict(name, blocker)) => {
            assert_eq!(name, "a/b");
            assert_eq!(blocker, "a");
        }
        other => panic!("expected PathConflict, got {other:?}"),
    }
}

#[test]
fn directory_in_the_way_is_rejected() {
    let (_dir, _settings, session, mut store) = setup();
    store.write(&session, "a/b", &["x"]).unwrap();

    assert!(matches!(
        store.write(&session, "a", &["y"]),
        Err(PassVaultError::IsDirectory(_))
    ));
}

// ---------------------------------------------------------------------------
// Listing and index
// ---------------------------------------------------------------------------

#[test]
fn list_is_sorted_and_hides_backups() {
    let (_dir, _settings, session, mut store) = setup();
    store.write(&session, "zeta", &["1"]).unwrap();
    store.write(&session, "alpha/two", &["2"]).unwrap();
    store.write(&session, "alpha/one", &["3"]).unwrap();
    store.write(&session, "alpha/one", &["4"]).unwrap();

    assert_eq!(store.list("", false), vec!["alpha/one", "alpha/two", "zeta"]);
    assert_eq!(store.list("alpha", false), vec!["alpha/one", "alpha/two"]);
    assert!(store.list("nothing", false).is_empty());

    let all = store.list("", true);
    assert!(all.iter().any(|k| k.starts_with(".backup/zeta.")));
    let mut sorted = all.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(all, sorted);

    // A filter naming the mirror shows backups without the flag.
    assert!(!store.list(".backup/zeta", false).is_empty());
}

#[test]
fn index_is_rebuilt_on_reopen() {
    let (dir, settings, session, mut store) = setup();
    store.write(&session, "mail/work", &["1"]).unwrap();
    store.write(&session, "bank", &["2"]).unwrap();

    // Stray files the index must skip.
    fs::write(dir.path().join(".hidden"), "x").unwrap();
    fs::create_dir_all(dir.path().join(".git")).unwrap();
    fs::write(dir.path().join(".git").join("HEAD"), "x").unwrap();

    let reopened = AccountStore::open(dir.path(), &settings).unwrap();
    assert_eq!(reopened.list("", false), vec!["bank", "mail/work"]);
    assert_eq!(reopened.backups("mail/work").len(), 1);
    assert_eq!(reopened.read(&session, "bank").unwrap(), vec!["2"]);
    assert!(!reopened.list("", true).iter().any(|k| k.contains(".git")));
}

#[test]
fn backups_of_dotted_siblings_are_kept_apart() {
    let (_dir, _settings, session, mut store) = setup();
    store.write(&session, "web/site", &["1"]).unwrap();
    store.write(&session, "web/site.old", &["2"]).unwrap();

    let backups = store.backups("web/site");
    assert_eq!(backups.len(), 1);
    assert!(!backups[0].contains("site.old"));
}

// ---------------------------------------------------------------------------
// Remove and move
// ---------------------------------------------------------------------------

#[test]
fn remove_prunes_directories_and_keeps_backups() {
    let (dir, _settings, session, mut store) = setup();
    store.write(&session, "a/b/c", &["x"]).unwrap();

    store.remove("a/b/c").unwrap();
    assert!(!store.contains("a/b/c"));
    assert!(!dir.path().join("a").exists());
    assert!(dir.path().is_dir());
    assert_eq!(store.backups("a/b/c").len(), 1);

    assert!(matches!(store.remove("a/b/c"), Err(PassVaultError::NotFound(_))));
}

#[test]
fn remove_keeps_non_empty_parents() {
    let (dir, _settings, session, mut store) = setup();
    store.write(&session, "a/one", &["x"]).unwrap();
    store.write(&session, "a/two", &["y"]).unwrap();

    store.remove("a/one").unwrap();
    assert!(dir.path().join("a").is_dir());
    assert_eq!(store.list("", false), vec!["a/two"]);
}

#[test]
fn move_carries_backups() {
    let (dir, _settings, session, mut store) = setup();
    store.write(&session, "a", &["x"]).unwrap();
    let before: Vec<String> = store
        .backups("a")
        .iter()
        .map(|k| suffix_of(k, "a").to_string())
        .collect();

    store.move_account("a", "b/c").unwrap();

    assert_eq!(store.read(&session, "b/c").unwrap(), vec!["x"]);
    assert!(!dir.path().join("a").exists());
    assert!(!store.contains("a"));
    assert!(store.backups("a").is_empty());

    let after: Vec<String> = store
        .backups("b/c")
        .iter()
        .map(|k| suffix_of(k, "b/c").to_string())
        .collect();
    assert_eq!(before, after);
    for suffix in &after {
        assert!(store.path_of(&format!(".backup/b/c.{suffix}")).is_file());
    }
}

#[test]
fn move_carries_every_backup() {
    let (_dir, _settings, session, mut store) = setup_with_backup_format("%y%m%d%H%M%S%6f");
    store.write(&session, "a", &["v1"]).unwrap();
    store.write(&session, "a", &["v2"]).unwrap();
    store.write(&session, "a", &["v3"]).unwrap();
    assert_eq!(store.backups("a").len(), 3);

    store.move_account("a", "b").unwrap();

    assert!(store.backups("a").is_empty());
    let contents: Vec<Vec<String>> = store
        .backups("b")
        .iter()
        .map(|key| store.read(&session, key).unwrap())
        .collect();
    assert_eq!(contents, vec![vec!["v1"], vec!["v2"], vec!["v3"]]);
}

#[test]
fn move_onto_removed_name_keeps_its_backups() {
    // A literal format gives every backup the same suffix.
    let (_dir, _settings, session, mut store) = setup_with_backup_format("fixed");
    store.write(&session, "y", &["old-y"]).unwrap();
    store.remove("y").unwrap();
    store.write(&session, "x", &["x"]).unwrap();

    store.move_account("x", "y").unwrap();

    assert_eq!(store.backups("y"), vec![".backup/y.fixed", ".backup/y.fixed-1"]);
    assert_eq!(store.read(&session, ".backup/y.fixed").unwrap(), vec!["old-y"]);
    assert_eq!(store.read(&session, ".backup/y.fixed-1").unwrap(), vec!["x"]);
    assert!(store.backups("x").is_empty());
}

#[test]
fn index_matches_disk_after_failed_backup_on_write() {
    let (dir, settings, session, _store) = setup();
    // A file where the backup directory of `mail/work` must go.
    fs::write(dir.path().join(BACKUP_DIR).join("mail"), "x").unwrap();
    let mut store = AccountStore::open(dir.path(), &settings).unwrap();

    assert!(store.write(&session, "mail/work", &["pw"]).is_err());

    assert!(store.contains("mail/work"));
    assert!(store.backups("mail/work").is_empty());
    let on_disk = AccountStore::open(dir.path(), &settings).unwrap();
    assert_eq!(store.list("", true), on_disk.list("", true));
}

#[test]
fn index_matches_disk_after_failed_backup_move() {
    let (dir, settings, session, _store) = setup();
    fs::write(dir.path().join(BACKUP_DIR).join("dst"), "x").unwrap();
    let mut store = AccountStore::open(dir.path(), &settings).unwrap();
    store.write(&session, "a", &["pw"]).unwrap();

    assert!(store.move_account("a", "dst/x").is_err());

    // The live rename went through, the backups stayed behind.
    assert!(store.contains("dst/x"));
    assert!(!store.contains("a"));
    assert_eq!(store.backups("a").len(), 1);
    assert_eq!(store.read(&session, "dst/x").unwrap(), vec!["pw"]);
    let on_disk = AccountStore::open(dir.path(), &settings).unwrap();
    assert_eq!(store.list("", true), on_disk.list("", true));
}

#[test]
fn move_prunes_old_backup_directories() {
    let (dir, _settings, session, mut store) = setup();
    store.write(&session, "old/deep/name", &["x"]).unwrap();

    store.move_account("old/deep/name", "new").unwrap();

    assert!(!dir.path().join("old").exists());
    assert!(!dir.path().join(BACKUP_DIR).join("old").exists());
    assert!(dir.path().join(BACKUP_DIR).is_dir());
    assert_eq!(store.backups("new").len(), 1);
}

#[test]
fn move_refuses_existing_target() {
    let (_dir, _settings, session, mut store) = setup();
    store.write(&session, "a", &["x"]).unwrap();
    store.write(&session, "b", &["y"]).unwrap();

    assert!(matches!(
        store.move_account("a", "b"),
        Err(PassVaultError::NameExists(_))
    ));
    assert!(matches!(
        store.move_account("missing", "c"),
        Err(PassVaultError::NotFound(_))
    ));
    assert!(matches!(
        store.move_account("a", "c."),
        Err(PassVaultError::InvalidAccountName(..))
    ));
    assert_eq!(store.read(&session, "a").unwrap(), vec!["x"]);
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

#[test]
fn select_single_match_needs_no_input() {
    let (_dir, _settings, session, mut store) = setup();
    store.write(&session, "mail", &["x"]).unwrap();
    store.write(&session, "bank", &["y"]).unwrap();

    let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
    assert_eq!(store.select("ma", &mut prompter).unwrap(), "mail");
    assert!(prompter.shown.is_empty());
    assert_eq!(prompter.confirmed, vec!["mail"]);
}

#[test]
fn select_disambiguates_by_filter() {
    let (_dir, _settings, session, mut store) = setup();
    store.write(&session, "aa", &["x"]).unwrap();
    store.write(&session, "aaa", &["y"]).unwrap();

    let mut prompter = ScriptedPrompter::new(["aaa"]);
    assert_eq!(store.select("a", &mut prompter).unwrap(), "aaa");
    assert_eq!(prompter.shown, vec![vec!["aa".to_string(), "aaa".to_string()]]);
    // Only a direct single match is announced.
    assert!(prompter.confirmed.is_empty());
}

#[test]
fn select_by_index() {
    let (_dir, _settings, session, mut store) = setup();
    store.write(&session, "aa", &["x"]).unwrap();
    store.write(&session, "aaa", &["y"]).unwrap();

    let mut prompter = ScriptedPrompter::new(["0"]);
    assert_eq!(store.select("a", &mut prompter).unwrap(), "aa");
}

#[test]
fn select_empty_answer_cancels() {
    let (_dir, _settings, session, mut store) = setup();
    store.write(&session, "aa", &["x"]).unwrap();
    store.write(&session, "aaa", &["y"]).unwrap();

    let mut prompter = ScriptedPrompter::new([""]);
    assert!(matches!(
        store.select("a", &mut prompter),
        Err(PassVaultError::Cancelled)
    ));
    assert!(prompter.confirmed.is_empty());
}

#[test]
fn select_without_match() {
    let (_dir, _settings, session, mut store) = setup();
    store.write(&session, "mail", &["x"]).unwrap();

    let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
    assert!(matches!(
        store.select("zzz", &mut prompter),
        Err(PassVaultError::NoMatch)
    ));
}

#[test]
fn open_rejects_bad_backup_format() {
    let dir = TempDir::new().unwrap();
    let settings = Settings {
        backup: BackupSettings {
            timestamp_format: "%Y.%m".into(),
        },
        ..Settings::default()
    };
    assert!(matches!(
        AccountStore::open(dir.path(), &settings),
        Err(PassVaultError::ConfigError(_))
    ));
}
