//! Manifest dependency reader and rewriter
//!
//! Pure text operations on a `PKGBUILD`. Arrays use shell syntax:
//!
//! ```text
//! depends=(
//!   'glibc'
//!   "github.com/owner/lib@v2"   # pinned source dependency
//!   zlib
//! )
//! ```
//!
//! The rewrite is a literal, whole-file substitution: every occurrence of a
//! source dependency token is replaced, including occurrences outside the
//! dependency arrays.

use crate::domain::entities::{PackageGroups, PackageReference};
use crate::error::BridgeResult;

/// Runtime dependency array name
pub const RUNTIME_DEPS: &str = "depends";
/// Build-time dependency array name
pub const BUILD_DEPS: &str = "makedepends";

/// Elements of the array assignment `name=( ... )`, in order.
/// A missing array yields an empty list.
pub fn read_array(content: &str, name: &str) -> Vec<String> {
    let Some(body) = find_assignment(content, name) else {
        return Vec::new();
    };
    if !body.starts_with('(') {
        return Vec::new();
    }
    split_words(&body[1..], true)
}

/// First word of `name=value` or `name=(value ...)`
pub fn read_scalar(content: &str, name: &str) -> Option<String> {
    let body = find_assignment(content, name)?;
    let words = if let Some(inner) = body.strip_prefix('(') {
        split_words(inner, true)
    } else {
        split_words(body, false)
    };
    words.into_iter().next()
}

/// Runtime then build-time dependencies, manifest order within each list
pub fn read_dependencies(content: &str) -> Vec<String> {
    let mut deps = read_array(content, RUNTIME_DEPS);
    deps.extend(read_array(content, BUILD_DEPS));
    deps
}

/// Dependencies classified into native and source groups
pub fn dependency_groups(content: &str) -> BridgeResult<PackageGroups> {
    PackageGroups::classify(&read_dependencies(content))
}

/// Replace each source token with its short name. An empty token list
/// returns the content unchanged.
pub fn rewrite_sources(content: &str, tokens: &[String]) -> BridgeResult<String> {
    let mut pairs = Vec::with_capacity(tokens.len());
    for token in tokens {
        let reference = PackageReference::parse(token)?;
        if reference.is_source() {
            pairs.push((token.as_str(), reference.short_name().to_string()));
        }
    }
    // Longer tokens first so a pinned `a/b/c@v1` is not split by `a/b/c`.
    pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = content.to_string();
    for (token, short) in pairs {
        if out.contains(token) {
            out = out.replace(token, &short);
        }
    }
    Ok(out)
}

/// Text following `name=` on a line where the assignment starts the line.
fn find_assignment<'a>(content: &'a str, name: &str) -> Option<&'a str> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();
        if let Some(rest) = trimmed.strip_prefix(name) {
            if rest.starts_with('=') {
                return Some(&content[offset + indent + name.len() + 1..]);
            }
        }
        offset += line.len();
    }
    None
}

/// Shell-like word splitting. With `in_array`, stops at the closing `)`;
/// otherwise stops at the end of the first line.
fn split_words(input: &str, in_array: bool) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut has_word = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            ')' if in_array => break,
            '\n' if !in_array => break,
            c if c.is_whitespace() => {
                if has_word {
                    words.push(std::mem::take(&mut current));
                    has_word = false;
                }
            }
            '#' if !has_word => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        break;
                    }
                }
                if !in_array {
                    break;
                }
            }
            '\'' => {
                has_word = true;
                for next in chars.by_ref() {
                    if next == '\'' {
                        break;
                    }
                    current.push(next);
                }
            }
            '"' => {
                has_word = true;
                while let Some(next) = chars.next() {
                    match next {
                        '"' => break,
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                current.push(escaped);
                            }
                        }
                        other => current.push(other),
                    }
                }
            }
            '\\' => {
                if let Some(escaped) = chars.next() {
                    if escaped != '\n' {
                        has_word = true;
                        current.push(escaped);
                    }
                }
            }
            other => {
                has_word = true;
                current.push(other);
            }
        }
    }
    if has_word {
        words.push(current);
    }
    words
}
