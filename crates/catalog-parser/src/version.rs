//! Version coercion in the style of node-semver's `coerce`.

use std::sync::OnceLock;

use regex::Regex;
use semver::Version;

/// Largest integer a version component may hold
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

static COERCE_RE: OnceLock<Regex> = OnceLock::new();

fn coerce_re() -> &'static Regex {
    COERCE_RE.get_or_init(|| {
        Regex::new(r"(?:^|[^\d])(\d{1,16})(?:\.(\d{1,16}))?(?:\.(\d{1,16}))?(?:$|[^\d])").unwrap()
    })
}

/// Pull the first `major[.minor[.patch]]` run out of `text`.
///
/// Range operators, prefixes and anything after the numbers are ignored, so
/// `^18.2.0`, `>=3`, `npm:react@18` and `v1.2` all coerce, while `latest` and
/// `workspace:*` do not.
pub fn coerce_version(text: &str) -> Option<Version> {
    let caps = coerce_re().captures(text)?;
    let component = |i: usize| -> Option<u64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok().filter(|n| *n <= MAX_SAFE_INTEGER),
            None => Some(0),
        }
    };
    Some(Version::new(component(1)?, component(2)?, component(3)?))
}

/// Whether `text` looks like a version declaration
pub fn is_coercible_version(text: &str) -> bool {
    coerce_version(text).is_some()
}
