//! Naming and dispatch behavior of storage policies.
//!
//! Run with: `cargo test -p stowage-storage --test policy_naming_test`

use std::time::{SystemTime, UNIX_EPOCH};

use stowage_storage::{PolicyExt, StorageBackend, StoragePolicy};

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

fn with_dir_rule(rule: &str) -> StoragePolicy {
    StoragePolicy {
        dir_name_rule: rule.to_string(),
        ..Default::default()
    }
}

fn with_file_rule(backend: &str, rule: &str) -> StoragePolicy {
    StoragePolicy {
        backend: StorageBackend::from(backend),
        auto_rename: true,
        file_name_rule: rule.to_string(),
        ..Default::default()
    }
}

fn is_alphanumeric(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_alphanumeric())
}

#[test]
fn test_generate_path_random_keys() {
    let key16 = with_dir_rule("{randomkey16}").generate_path(1, "/");
    assert_eq!(key16.len(), 16);
    assert!(is_alphanumeric(&key16));

    let key8 = with_dir_rule("{randomkey8}").generate_path(1, "/");
    assert_eq!(key8.len(), 8);
    assert!(is_alphanumeric(&key8));

    let policy = with_dir_rule("{randomkey16}");
    assert_ne!(policy.generate_path(1, "/"), policy.generate_path(1, "/"));
}

#[test]
fn test_generate_path_timestamp() {
    let before = unix_now();
    let value: i64 = with_dir_rule("{timestamp}")
        .generate_path(1, "/")
        .parse()
        .expect("timestamp is decimal");
    let after = unix_now();
    assert!(before <= value && value <= after);
}

#[test]
fn test_generate_path_uid_and_dates() {
    assert_eq!(with_dir_rule("{uid}").generate_path(1, "/"), "1");
    assert_eq!(with_dir_rule("{uid}").generate_path(9001, "/"), "9001");
    assert_eq!(with_dir_rule("{datetime}").generate_path(1, "/").len(), 14);
    assert_eq!(with_dir_rule("{date}").generate_path(1, "/").len(), 8);
    assert_eq!(
        with_dir_rule("123{date}ss{datetime}")
            .generate_path(1, "/")
            .len(),
        27
    );
}

#[test]
fn test_generate_path_with_base_path() {
    let res = with_dir_rule("/1/{path}/456").generate_path(1, "/23");
    assert!(res == "/1/23/456" || res == "\\1\\23\\456", "got {res}");
}

#[test]
fn test_generate_file_name_generic_tokens() {
    let policy = with_file_rule("local", "{randomkey16}");
    assert_eq!(policy.generate_file_name(1, "123.txt").len(), 16);

    let policy = with_file_rule("local", "{randomkey8}");
    assert_eq!(policy.generate_file_name(1, "123.txt").len(), 8);

    let before = unix_now();
    let value: i64 = with_file_rule("local", "{timestamp}")
        .generate_file_name(1, "123.txt")
        .parse()
        .expect("timestamp is decimal");
    assert!(before <= value && value <= unix_now());

    assert_eq!(
        with_file_rule("local", "{uid}").generate_file_name(1, "123.txt"),
        "1"
    );
    assert_eq!(
        with_file_rule("local", "{datetime}")
            .generate_file_name(1, "123.txt")
            .len(),
        14
    );
    assert_eq!(
        with_file_rule("local", "{date}")
            .generate_file_name(1, "123.txt")
            .len(),
        8
    );
    assert_eq!(
        with_file_rule("local", "123{date}ss{datetime}")
            .generate_file_name(1, "123.txt")
            .len(),
        27
    );
}

#[test]
fn test_generate_file_name_origin_name_per_backend() {
    assert_eq!(
        with_file_rule("local", "123{originname}").generate_file_name(1, "123.txt"),
        "123123.txt"
    );
    assert_eq!(
        with_file_rule("qiniu", "{uid}123{originname}").generate_file_name(1, "123.txt"),
        "1123123.txt"
    );
    assert_eq!(
        with_file_rule("oss", "{uid}123{originname}").generate_file_name(1, ""),
        "1123${filename}"
    );
    assert_eq!(
        with_file_rule("upyun", "{uid}123{originname}").generate_file_name(1, ""),
        "1123{filename}{.suffix}"
    );
}

#[test]
fn test_is_directly_preview() {
    let mut policy = StoragePolicy {
        backend: StorageBackend::Local,
        ..Default::default()
    };
    assert!(policy.is_directly_preview());

    policy.backend = StorageBackend::Remote;
    assert!(!policy.is_directly_preview());
}

#[test]
fn test_upload_url() {
    let mut policy = StoragePolicy {
        backend: StorageBackend::Local,
        server: "http://127.0.0.1".to_string(),
        ..Default::default()
    };
    assert_eq!(policy.upload_url(), "http://127.0.0.1/api/v3/file/upload");

    policy.backend = StorageBackend::Remote;
    assert_eq!(policy.upload_url(), "http://127.0.0.1/api/v3/slave/upload");

    policy.backend = StorageBackend::from("unknown");
    assert_eq!(policy.upload_url(), "http://127.0.0.1");
}

#[test]
fn test_is_path_generate_needed() {
    let mut policy = StoragePolicy {
        backend: StorageBackend::Qiniu,
        ..Default::default()
    };
    assert!(policy.is_path_generate_needed());

    policy.backend = StorageBackend::Remote;
    assert!(!policy.is_path_generate_needed());
}

#[test]
fn test_concurrent_generation() {
    let policy = with_file_rule("local", "{uid}_{randomkey16}");

    let names: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8u64)
            .map(|uid| {
                let policy = &policy;
                scope.spawn(move || policy.generate_file_name(uid, "a.txt"))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("worker panicked"))
            .collect()
    });

    for (uid, name) in names.iter().enumerate() {
        let (prefix, key) = name.split_once('_').expect("separator present");
        assert_eq!(prefix, uid.to_string());
        assert_eq!(key.len(), 16);
        assert!(is_alphanumeric(key));
    }
}
