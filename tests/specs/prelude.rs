//! Test helpers for behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub use assert_cmd::Command;
pub use predicates::prelude::*;

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Returns a Command configured to run the we-api-finder binary.
/// `assert_cmd::Command` rather than `std::process::Command` because the
/// driver is fed through stdin.
pub fn finder_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("we-api-finder"))
}

/// A temporary extension corpus.
pub struct Corpus {
    dir: TempDir,
}

#[allow(dead_code)]
impl Corpus {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create an unpacked extension with a default manifest.
    pub fn extension(&self, name: &str, scripts: &[(&str, &str)]) -> PathBuf {
        self.extension_with_manifest(name, r#"{"manifest_version": 2}"#, scripts)
    }

    /// Create an unpacked extension with the given manifest JSON.
    pub fn extension_with_manifest(
        &self,
        name: &str,
        manifest: &str,
        scripts: &[(&str, &str)],
    ) -> PathBuf {
        let root = self.dir.path().join(name);
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("manifest.json"), manifest).unwrap();
        for (file, content) in scripts {
            let path = root.join(file);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(path, content).unwrap();
        }
        root
    }

    /// Create a versioned extension: version subdirectories under `name`.
    pub fn versioned_extension(&self, name: &str, versions: &[(&str, &str)]) -> PathBuf {
        let root = self.dir.path().join(name);
        for (version, script) in versions {
            let vdir = root.join(version);
            std::fs::create_dir_all(&vdir).unwrap();
            std::fs::write(vdir.join("manifest.json"), r#"{"manifest_version": 2}"#).unwrap();
            std::fs::write(vdir.join("background.js"), script).unwrap();
        }
        root
    }

    /// Write an AMO metadata dump and return its path.
    pub fn metadata(&self, json: &str) -> PathBuf {
        let path = self.dir.path().join("amo-metadata.json");
        std::fs::write(&path, json).unwrap();
        path
    }
}

/// Run a filter invocation against a corpus with the given stdin lines.
pub fn run_filter(corpus: &Corpus, args: &[&str], stdin: &str) -> assert_cmd::assert::Assert {
    let mut cmd = finder_cmd();
    cmd.arg("--root").arg(corpus.path());
    cmd.args(args);
    cmd.write_stdin(stdin.to_string());
    cmd.assert()
}

/// stdout lines of a successful run.
pub fn kept_lines(assert: assert_cmd::assert::Assert) -> Vec<String> {
    let output = assert.success().get_output().stdout.clone();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
