//! Subnet group name generation.
//!
//! Generated names are `<prefix><timestamp><counter>`: an 18 digit UTC
//! timestamp (seconds plus four fractional digits) followed by an 8 digit
//! lowercase hex counter, [`UNIQUE_ID_SUFFIX_LENGTH`] characters in total.

use crate::config::UNIQUE_ID_SUFFIX_LENGTH;
use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::atomic::{AtomicU32, Ordering};

static ID_COUNTER: AtomicU32 = AtomicU32::new(0);

lazy_static! {
    static ref SUFFIX_RE: Regex =
        Regex::new(r"^(.*)[0-9]{18}[0-9a-f]{8}$").expect("Invalid Regex?");
}

/// Append a unique suffix to `prefix`.
pub fn generate_name(prefix: &str) -> String {
    let now = Utc::now();
    let counter = ID_COUNTER.fetch_add(1, Ordering::SeqCst).wrapping_add(1);
    let name = format!(
        "{prefix}{}{:04}{counter:08x}",
        now.format("%Y%m%d%H%M%S"),
        (now.timestamp_subsec_micros() / 100).min(9_999)
    );
    debug_assert_eq!(name.len(), prefix.len() + UNIQUE_ID_SUFFIX_LENGTH);
    name
}

/// Pick the effective name: `name` if given, else a generated name built
/// from `name_prefix` (or the empty prefix).
pub fn resolve_name(name: Option<&str>, name_prefix: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => generate_name(name_prefix.unwrap_or_default()),
    }
}

/// Recover the prefix of a generated name.
///
/// Returns `None` when `name` does not end in a generated suffix or the
/// prefix is empty.
pub fn prefix_from_name(name: &str) -> Option<String> {
    SUFFIX_RE
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|prefix| !prefix.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_name;

    #[test]
    fn test_generate_name_shape() {
        let name = generate_name("cache-");
        let re = Regex::new(r"^cache-[a-z0-9]{26}$").expect("Invalid Regex?");
        assert!(re.is_match(&name), "Unexpected name {name}");
        assert!(validate_name(&name).is_ok());
    }

    #[test]
    fn test_generate_name_unique() {
        let a = generate_name("x-");
        let b = generate_name("x-");
        assert_ne!(a, b);
    }

    #[test]
    fn test_resolve_name() {
        assert_eq!(resolve_name(Some("fixed"), None), "fixed");
        assert!(resolve_name(None, Some("pre-")).starts_with("pre-"));
        assert_eq!(resolve_name(None, None).len(), UNIQUE_ID_SUFFIX_LENGTH);
    }

    #[test]
    fn test_prefix_from_name() {
        let name = generate_name("cache-");
        assert_eq!(prefix_from_name(&name).as_deref(), Some("cache-"));
        assert_eq!(prefix_from_name(&generate_name("")), None);
        assert_eq!(prefix_from_name("my-subnet-group"), None);
    }
}
