// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Extension root resolution and script discovery.
//!
//! Input lines name extensions three ways: a directory path, an AMO
//! numeric id, or an extension id (guid). Paths are tried first; the rest
//! go through the metadata index. A resolved directory is then classified:
//! corpus dumps store either the unpacked extension itself or a directory
//! of version subdirectories.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::WalkBuilder;

use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::metadata::{AddonRecord, AmoMetadata};
use crate::reader::read_script;

/// How an extension directory is laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `manifest.json` sits directly in the directory.
    Unpacked,
    /// The directory holds version subdirectories, each an unpacked
    /// extension; the greatest version name wins.
    Versioned,
}

/// Classify a directory and return the manifest-bearing root.
pub fn classify(dir: &Path) -> Option<(Layout, PathBuf)> {
    if dir.join("manifest.json").is_file() {
        return Some((Layout::Unpacked, dir.to_path_buf()));
    }
    let entries = std::fs::read_dir(dir).ok()?;
    let mut versions: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.join("manifest.json").is_file())
        .collect();
    versions.sort();
    versions.pop().map(|latest| (Layout::Versioned, latest))
}

/// Script extensions worth matching.
fn is_script(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("js") | Some("mjs")
    )
}

/// Collect script file paths under a resolved extension root.
///
/// Gitignore semantics are off: corpus directories are not checkouts, and
/// a bundled `.gitignore` must not hide scripts from the scan.
pub fn collect_scripts(root: &Path) -> Vec<PathBuf> {
    let mut scripts: Vec<PathBuf> = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => {
                let path = entry.into_path();
                (path.is_file() && is_script(&path)).then_some(path)
            }
            Err(err) => {
                tracing::warn!(root = %root.display(), %err, "walk error");
                None
            }
        })
        .collect();
    scripts.sort();
    scripts
}

/// One resolved input line.
#[derive(Debug)]
pub struct ExtensionInput {
    line: String,
    root: Option<PathBuf>,
    record: Option<Arc<AddonRecord>>,
}

impl ExtensionInput {
    /// The original input line.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// The manifest-bearing directory, when one was found.
    pub fn root(&self) -> Result<&Path> {
        self.root.as_deref().ok_or_else(|| Error::UnknownAddon {
            line: self.line.clone(),
        })
    }

    /// The AMO metadata record, when the line resolved through one.
    pub fn record(&self) -> Option<&AddonRecord> {
        self.record.as_deref()
    }

    /// Load the extension's manifest.
    pub fn manifest(&self) -> Result<Manifest> {
        Manifest::load(self.root()?)
    }

    /// Read every script under the extension root.
    ///
    /// Unreadable or size-gated files are skipped with a warning; an
    /// extension with no readable scripts yields an empty set.
    pub fn scripts(&self) -> Result<Vec<String>> {
        let root = self.root()?;
        let mut sources = Vec::new();
        for path in collect_scripts(root) {
            match read_script(&path) {
                Ok(Some(text)) => sources.push(text),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "unreadable script, skipped");
                }
            }
        }
        Ok(sources)
    }
}

/// Resolves input lines against the corpus root and AMO metadata.
#[derive(Debug, Default)]
pub struct Resolver {
    corpus_root: PathBuf,
    metadata: Option<AmoMetadata>,
}

impl Resolver {
    pub fn new(corpus_root: PathBuf, metadata: Option<AmoMetadata>) -> Self {
        Self {
            corpus_root,
            metadata,
        }
    }

    /// Resolve one input line.
    ///
    /// Never fails: lines that resolve to nothing produce an input with no
    /// root, and filters that need one report it per-line.
    pub fn resolve(&self, line: &str) -> ExtensionInput {
        let record = self
            .metadata
            .as_ref()
            .and_then(|metadata| metadata.lookup(line));

        let candidate = {
            let as_path = Path::new(line);
            let direct = if as_path.is_absolute() {
                as_path.to_path_buf()
            } else {
                self.corpus_root.join(as_path)
            };
            if direct.is_dir() {
                Some(direct)
            } else {
                record
                    .as_ref()
                    .and_then(|r| r.path.as_deref())
                    .map(|p| self.corpus_root.join(p))
                    .filter(|p| p.is_dir())
            }
        };

        let root = candidate.and_then(|dir| classify(&dir).map(|(_, root)| root));

        ExtensionInput {
            line: line.to_string(),
            root,
            record,
        }
    }
}

#[cfg(test)]
#[path = "extension_tests.rs"]
mod tests;
