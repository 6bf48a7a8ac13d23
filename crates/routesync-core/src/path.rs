//! Path canonicalisation and base-prefix handling.

/// Canonicalise a path.
///
/// Lowercases, collapses repeated slashes, removes a trailing slash and
/// guarantees exactly one leading slash. The empty string becomes `/`.
pub fn normalize(path: &str) -> String {
    let lower = path.to_lowercase();
    let mut out = String::with_capacity(lower.len() + 1);

    for segment in lower.split('/').filter(|s| !s.is_empty()) {
        out.push('/');
        out.push_str(segment);
    }

    if out.is_empty() {
        out.push('/');
    }
    out
}

/// True when the normalized base is the root, i.e. no prefix applies.
pub fn is_root(base: &str) -> bool {
    base.is_empty() || base == "/"
}

/// Remainder of `path` below `base`, or `None` when `path` lies outside it.
///
/// The comparison is case-insensitive and aligned on segment boundaries, so
/// `/app` contains `/app` and `/app/x` but not `/apple`.
pub fn strip_base<'a>(path: &'a str, base: &str) -> Option<&'a str> {
    if is_root(base) {
        return Some(path);
    }

    let head = path.get(..base.len())?;
    if !head.eq_ignore_ascii_case(base) {
        return None;
    }

    let rest = &path[base.len()..];
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Prefix `path` with `base` and normalize the result.
pub fn join_base(base: &str, path: &str) -> String {
    if is_root(base) {
        return normalize(path);
    }
    normalize(&format!("{}/{}", base, path))
}
