// src/script/interpolate.rs

use std::sync::LazyLock;

use regex::{Captures, Regex};

static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("reference pattern is valid"));

/// Replace `${name}` references using `lookup`. Unknown references are left
/// as written.
pub fn interpolate<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if !text.contains("${") {
        return text.to_string();
    }
    REFERENCE
        .replace_all(text, |caps: &Captures<'_>| {
            lookup(caps[1].trim()).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
