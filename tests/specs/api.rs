//! Behavioral specs for the api filter.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

#[test]
fn keeps_extensions_referencing_a_query() {
    let corpus = Corpus::new();
    let hit = corpus.extension("hit", &[("bg.js", "browser.tabs.create({});")]);
    corpus.extension("miss", &[("bg.js", "console.log('quiet');")]);

    let kept = kept_lines(run_filter(&corpus, &["api", "tabs.create"], "hit\nmiss\n"));
    assert_eq!(kept, vec![hit.display().to_string()]);
}

#[test]
fn output_preserves_stdin_order() {
    let corpus = Corpus::new();
    let mut input = String::new();
    for i in 0..10 {
        corpus.extension(
            &format!("ext{i}"),
            &[("bg.js", "chrome.storage.local.get({});")],
        );
        input.push_str(&format!("ext{i}\n"));
    }

    let kept = kept_lines(run_filter(&corpus, &["api", "storage.local.get"], &input));
    assert_eq!(kept.len(), 10);
    for (i, line) in kept.iter().enumerate() {
        assert!(line.ends_with(&format!("ext{i}")), "line {i} was {line}");
    }
}

#[test]
fn aliased_references_match() {
    let corpus = Corpus::new();
    corpus.extension(
        "aliased",
        &[("bg.js", "var s = chrome.ns;\ns.api();")],
    );
    corpus.extension("bare-alias", &[("bg.js", "var s = ns;\ns.api();")]);

    let kept = kept_lines(run_filter(
        &corpus,
        &["api", "ns.api"],
        "aliased\nbare-alias\n",
    ));
    assert_eq!(kept.len(), 1);
    assert!(kept[0].ends_with("aliased"));
}

#[test]
fn comment_split_references_match() {
    let corpus = Corpus::new();
    corpus.extension("tricky", &[("bg.js", "ns/**/./*x*/api")]);
    let kept = kept_lines(run_filter(&corpus, &["api", "ns.api"], "tricky\n"));
    assert_eq!(kept.len(), 1);
}

#[test]
fn versioned_layout_resolves_to_latest_version() {
    let corpus = Corpus::new();
    corpus.versioned_extension(
        "versioned",
        &[
            ("1.0", "nothing_here();"),
            ("2.0", "browser.tabs.create({});"),
        ],
    );
    let kept = kept_lines(run_filter(&corpus, &["api", "tabs.create"], "versioned\n"));
    assert_eq!(kept.len(), 1);
    assert!(kept[0].ends_with("2.0"), "kept {}", kept[0]);
}

#[test]
fn multiple_queries_match_any() {
    let corpus = Corpus::new();
    corpus.extension("storage-only", &[("bg.js", "chrome.storage.local.get({})")]);
    let kept = kept_lines(run_filter(
        &corpus,
        &["api", "tabs.create", "storage.local.get"],
        "storage-only\n",
    ));
    assert_eq!(kept.len(), 1);
}

#[test]
fn missing_extension_warns_and_is_filtered() {
    let corpus = Corpus::new();
    corpus.extension("real", &[("bg.js", "browser.tabs.create({})")]);

    run_filter(&corpus, &["api", "tabs.create"], "ghost\nreal\n")
        .success()
        .stdout(predicate::str::contains("real"))
        .stdout(predicate::str::contains("ghost").not())
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn ignore_missing_addon_silences_the_warning() {
    let corpus = Corpus::new();
    corpus.extension("real", &[("bg.js", "browser.tabs.create({})")]);

    let mut cmd = finder_cmd();
    cmd.arg("--root").arg(corpus.path());
    cmd.args(["api", "tabs.create"]);
    cmd.env("IGNORE_MISSING_ADDON", "1");
    cmd.write_stdin("ghost\nreal\n");
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("ghost").not());
}

#[test]
fn single_worker_pool_still_completes() {
    let corpus = Corpus::new();
    let mut input = String::new();
    for i in 0..5 {
        corpus.extension(&format!("e{i}"), &[("bg.js", "browser.tabs.create({})")]);
        input.push_str(&format!("e{i}\n"));
    }
    let mut cmd = finder_cmd();
    cmd.arg("--root").arg(corpus.path());
    cmd.args(["api", "tabs.create"]);
    cmd.env("WE_API_FINDER_NUM_THREADS", "1");
    cmd.write_stdin(input);
    let kept = kept_lines(cmd.assert());
    assert_eq!(kept.len(), 5);
}

#[test]
fn no_matches_exits_zero_with_empty_output() {
    let corpus = Corpus::new();
    corpus.extension("quiet", &[("bg.js", "nothing();")]);
    run_filter(&corpus, &["api", "tabs.create"], "quiet\n")
        .success()
        .stdout(predicate::str::is_empty());
}
