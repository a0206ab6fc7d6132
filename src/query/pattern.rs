//! SQL LIKE patterns
//!
//! `%` matches any run of characters (including none), `_` matches exactly
//! one character. Matching is anchored at both ends and case-insensitive.

use std::cell::RefCell;
use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

/// Compiled patterns kept per thread before the cache is reset
const PATTERN_CACHE_CAPACITY: usize = 64;

thread_local! {
    // `None` records a pattern that failed to compile
    static PATTERN_CACHE: RefCell<HashMap<String, Option<Regex>>> = RefCell::new(HashMap::new());
}

/// Translate a LIKE pattern into an anchored regex source string
fn like_to_regex(pattern: &str) -> String {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push('^');
    let mut literal = [0u8; 4];
    for c in pattern.chars() {
        match c {
            '%' => source.push_str(".*"),
            '_' => source.push('.'),
            other => source.push_str(&regex::escape(other.encode_utf8(&mut literal))),
        }
    }
    source.push('$');
    source
}

/// Compile a LIKE pattern
fn compile(pattern: &str) -> Option<Regex> {
    match RegexBuilder::new(&like_to_regex(pattern))
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
    {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::debug!("Rejecting $like pattern {:?}: {}", pattern, e);
            None
        }
    }
}

/// Check `text` against a LIKE pattern. A pattern that cannot be compiled
/// never matches.
///
/// Each distinct pattern is compiled once per thread and reused.
pub fn like_matches(text: &str, pattern: &str) -> bool {
    PATTERN_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if !cache.contains_key(pattern) {
            if cache.len() >= PATTERN_CACHE_CAPACITY {
                cache.clear();
            }
            cache.insert(pattern.to_string(), compile(pattern));
        }
        cache
            .get(pattern)
            .and_then(Option::as_ref)
            .map_or(false, |regex| regex.is_match(text))
    })
}

#[cfg(test)]
fn cached_patterns() -> usize {
    PATTERN_CACHE.with(|cache| cache.borrow().len())
}
