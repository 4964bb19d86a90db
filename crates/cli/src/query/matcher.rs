//! Source accumulation and query matching.
//!
//! A matcher owns a set of script sources and grows a monotone set of
//! matched query names across scans. For every added source two texts are
//! stored: the raw one and a comment-stripped copy. Stripping is lexical
//! and can be wrong (regex literals, `//` inside strings), which is why the
//! raw copy stays — a pattern hit on either copy counts.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use super::compiler::CompiledQuery;

/// `/* ... */`, non-greedy, across newlines.
static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"));

/// `//` to end of line, unless the `//` immediately follows a `:` (keeps
/// `http://...` intact).
static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(^|[^:])//.*$").expect("valid regex"));

/// Strip comments from script text, best-effort.
///
/// Block comments go first so `ns/**/.api` collapses to `ns.api` before
/// the line pass sees it.
pub(crate) fn strip_comments(text: &str) -> String {
    let without_blocks = BLOCK_COMMENT.replace_all(text, "");
    LINE_COMMENT.replace_all(&without_blocks, "${1}").into_owned()
}

/// Evaluates compiled queries against accumulated sources.
///
/// Borrows the compiler's query slice, so a matcher cannot outlive its
/// compiler. Matchers vended from one compiler are independent.
#[derive(Debug)]
pub struct Matcher<'c> {
    queries: &'c [CompiledQuery],
    sources: BTreeSet<String>,
    matched: BTreeSet<String>,
}

impl<'c> Matcher<'c> {
    pub(crate) fn new(queries: &'c [CompiledQuery]) -> Self {
        Self {
            queries,
            sources: BTreeSet::new(),
            matched: BTreeSet::new(),
        }
    }

    /// Store a source text and its comment-stripped copy, deduplicated.
    pub fn add_source(&mut self, text: &str) {
        self.sources.insert(strip_comments(text));
        self.sources.insert(text.to_string());
    }

    /// Scan the stored sources for every query not yet matched.
    ///
    /// A query matches when any of its conditions has all patterns match
    /// some stored source; the first matching condition wins. Pattern
    /// verdicts are memoized for the duration of the call by interning id,
    /// so shared patterns are evaluated once per scan. Repeated calls are
    /// safe; the matched set only grows.
    pub fn find_matches(&mut self) {
        let sources = &self.sources;
        let mut verdicts: HashMap<usize, bool> = HashMap::new();
        for query in self.queries {
            if self.matched.contains(query.name()) {
                continue;
            }
            let hit = query.conditions().iter().any(|condition| {
                condition.patterns().iter().all(|pattern| {
                    *verdicts
                        .entry(pattern.id())
                        .or_insert_with(|| sources.iter().any(|s| pattern.is_match(s)))
                })
            });
            if hit {
                self.matched.insert(query.name().to_string());
            }
        }
    }

    /// The matched query names. Same instance across calls; treat as
    /// read-only.
    pub fn matched_results(&self) -> &BTreeSet<String> {
        &self.matched
    }
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
