// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Lexical regex fragments for API reference matching.
//!
//! Script sources in the corpus are minified, aliased, and commented, so
//! matching is lexical: a dotted API name is recognized by its token
//! boundaries, not by parsing. Fragments here are regex source strings
//! composed verbatim by the compiler.

/// Member-access separator: whitespace-tolerant `.`, accepting optional
/// chaining (`?.`). `??.` never matches because the first `?` is not
/// consumed by any surrounding fragment.
pub(crate) const DOT: &str = r"\s*\??\.\s*";

/// Leading expression boundary: punctuation that can precede an expression,
/// or start of input. Rules out identifier-adjacent hits (`nottest` does
/// not contain the token `test`).
pub(crate) const BEFORE: &str = r"(?:[!%&()*+,\-./:;<=>?\[\^{|}~\n]|^)\s*";

/// Trailing expression boundary, symmetric to [`BEFORE`].
pub(crate) const AFTER: &str = r"\s*(?:[%&()*+,\-./:;<=>?\[\]\^{|}\n]|$)";

/// Strict trailing context for right-hand-side occurrences: expression
/// terminators, `||`/`??`, end of input, or a newline that plausibly
/// triggers automatic semicolon insertion (whitespace then an identifier
/// start). The last alternative consumes what the original lookahead only
/// asserted; only boolean match is ever observed and the fragment
/// terminates every pattern it appears in, so the two are equivalent.
pub(crate) const RHS_AFTER: &str = r"\s*(?:[),;\]{}:]|\|\||\?\?|$|\n\s*[A-Za-z_$])";

/// A JavaScript identifier.
pub(crate) const IDENT: &str = r"[A-Za-z_$][A-Za-z_$0-9]*";

/// Any identifier followed by a property-access dot: the permissive
/// stand-in for "some alias".
pub(crate) fn alias_dot() -> String {
    format!("{IDENT}{DOT}")
}

/// The known extension roots followed by a property-access dot.
pub(crate) fn host_dot() -> String {
    format!("(?:chrome|browser){DOT}")
}

/// Wrap a body in the general boundary context.
pub(crate) fn any(body: &str) -> String {
    format!("{BEFORE}(?:{body}){AFTER}")
}

/// Wrap a body as a dereference off some alias.
pub(crate) fn dot(body: &str) -> String {
    format!("{}(?:{body}){AFTER}", alias_dot())
}

/// Wrap a body as a right-hand-side occurrence.
pub(crate) fn rhs(body: &str) -> String {
    format!("{BEFORE}(?:{body}){RHS_AFTER}")
}

/// Join query parts into a pattern body: each part escaped (metacharacters
/// in queries match literally), grouped, and joined by [`DOT`].
pub(crate) fn body(parts: &[&str]) -> String {
    let escaped: Vec<String> = parts
        .iter()
        .map(|p| format!("(?:{})", regex::escape(p)))
        .collect();
    escaped.join(DOT)
}

#[cfg(test)]
#[path = "fragments_tests.rs"]
mod tests;
