//! Behavioral specs for the shallow filter flavors.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

#[test]
fn permissions_filter_matches_any_requested_permission() {
    let corpus = Corpus::new();
    corpus.extension_with_manifest(
        "tabby",
        r#"{"permissions": ["tabs", "storage"]}"#,
        &[],
    );
    corpus.extension_with_manifest(
        "hosty",
        r#"{"host_permissions": ["https://*/*"]}"#,
        &[],
    );
    corpus.extension_with_manifest("plain", "{}", &[]);

    let kept = kept_lines(run_filter(
        &corpus,
        &["permissions", "tabs", "https://*/*"],
        "tabby\nhosty\nplain\n",
    ));
    assert_eq!(kept.len(), 2);
    assert!(kept[0].ends_with("tabby"));
    assert!(kept[1].ends_with("hosty"));
}

#[test]
fn manifest_filter_requires_every_key() {
    let corpus = Corpus::new();
    corpus.extension_with_manifest(
        "worker",
        r#"{"background": {"service_worker": "bg.js"}}"#,
        &[],
    );
    corpus.extension_with_manifest(
        "scripts",
        r#"{"background": {"scripts": ["bg.js"]}}"#,
        &[],
    );

    let kept = kept_lines(run_filter(
        &corpus,
        &["manifest", "background.service_worker"],
        "worker\nscripts\n",
    ));
    assert_eq!(kept.len(), 1);
    assert!(kept[0].ends_with("worker"));
}

#[test]
fn broken_manifest_is_filtered_with_a_warning() {
    let corpus = Corpus::new();
    let root = corpus.extension("broken", &[]);
    std::fs::write(root.join("manifest.json"), "{oops").unwrap();

    run_filter(&corpus, &["permissions", "tabs"], "broken\n")
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("broken"));
}

#[test]
fn user_count_keeps_addons_at_or_above_threshold() {
    let corpus = Corpus::new();
    let metadata = corpus.metadata(
        r#"[
            {"id": 1, "guid": "big@x", "average_daily_users": 50000},
            {"id": 2, "guid": "small@x", "average_daily_users": 12}
        ]"#,
    );

    let mut cmd = finder_cmd();
    cmd.arg("--root").arg(corpus.path());
    cmd.args(["user-count", "1000"]);
    cmd.env("AMO_METADATA_JSON", &metadata);
    cmd.write_stdin("big@x\nsmall@x\n1\n2\n");
    let kept = kept_lines(cmd.assert());
    assert_eq!(kept, vec!["big@x".to_string(), "1".to_string()]);
}

#[test]
fn user_count_without_metadata_is_fatal_with_remediation() {
    let mut cmd = finder_cmd();
    cmd.args(["user-count", "1000"]);
    cmd.env_remove("AMO_METADATA_JSON");
    cmd.write_stdin("1\n");
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("AMO_METADATA_JSON"))
        .stderr(predicate::str::contains("curl"));
}

#[test]
fn user_count_with_unreadable_metadata_is_fatal() {
    let mut cmd = finder_cmd();
    cmd.args(["user-count", "1000"]);
    cmd.env("AMO_METADATA_JSON", "/nonexistent/amo.json");
    cmd.write_stdin("1\n");
    cmd.assert().code(1);
}

#[test]
fn id_lines_resolve_through_metadata_paths() {
    let corpus = Corpus::new();
    let root = corpus.extension("ublock-origin", &[("bg.js", "browser.tabs.create({})")]);
    let metadata = corpus.metadata(
        r#"[{"id": 607454, "guid": "uBlock0@raymondhill.net",
             "average_daily_users": 10, "path": "ublock-origin"}]"#,
    );

    let mut cmd = finder_cmd();
    cmd.arg("--root").arg(corpus.path());
    cmd.args(["api", "tabs.create"]);
    cmd.env("AMO_METADATA_JSON", &metadata);
    cmd.write_stdin("607454\n");
    let kept = kept_lines(cmd.assert());
    assert_eq!(kept, vec![root.display().to_string()]);
}
