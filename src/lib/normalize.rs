//! Directory and file name normalization.
//!
//! Names are pushed through a fixed table of regex substitutions, once, in
//! order. The result is plain ASCII with nothing a shell would trip over.
//! The table is order sensitive: rule 3 only makes sense after rule 2 has
//! removed the well formed `(...)` groups.

use once_cell::sync::Lazy;
use regex::Regex;

/// Substitutions to be performed on every directory and file name, in order
const SUBSTITUTIONS: &[(&str, &str)] = &[
    (r"[^\x00-\x7F]+", ""), // non-ASCII
    (r"\([^.]*\)", ""),     // "(...)" with no dot inside
    (r"\(.*\.", "."),       // "(..." up to the next dot
    (r"[!?@$]", ""),
    (r";", ""),
    (r"&", "And"),
    (r" - ", "-"),
    (r" _ ", "_"),
    (r"- ", "-"),
    (r"_ ", "_"),
    (r" -", "-"),
    (r" _", "_"),
    (r"'", ""),
    (r#"""#, ""),
    (r",", ""),
    (r" ", ""),
];

static RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    SUBSTITUTIONS
        .iter()
        .map(|(pattern, replacement)| {
            let re = Regex::new(pattern).expect("substitution pattern is a valid regex");
            (re, *replacement)
        })
        .collect()
});

/// Normalize one path segment (directory or file name).
pub fn normalize(segment: &str) -> String {
    RULES
        .iter()
        .fold(segment.to_string(), |name, (re, replacement)| {
            re.replace_all(&name, regex::NoExpand(*replacement))
                .into_owned()
        })
}
