//! Normalization and segment-wise comparison of repository-relative paths.
//!
//! Every path handled by the dashboard is kept in the form `/seg1/seg2/...`,
//! with exactly one leading slash and no trailing slash. The repository root
//! is `/`.

/// The normalized form of the repository root.
pub const ROOT: &str = "/";

/// Strip all leading and trailing slashes and prefix exactly one slash.
///
/// Interior runs of slashes are kept as-is, so `a//b` becomes `/a//b`.
pub fn sanitize(raw: &str) -> String {
    format!("/{}", raw.trim_matches('/'))
}

/// Split a path into its slash-delimited segments, ignoring the leading slash.
///
/// The root has no segments. Empty interior segments are preserved.
pub fn segments(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

/// Every non-root prefix of `path`, shortest first, each one sanitized.
///
/// The path itself is the last element. Prefixes that sanitize to the same
/// string (e.g. `/a` and `/a/` for `/a//b`) are reported once.
pub fn prefixes(path: &str) -> Vec<String> {
    let segs = segments(path);
    let mut result: Vec<String> = Vec::with_capacity(segs.len());
    for end in 1..=segs.len() {
        let prefix = sanitize(&segs[..end].join("/"));
        if prefix != ROOT && result.last() != Some(&prefix) {
            result.push(prefix);
        }
    }
    result
}

/// The label shown for a single directory level: its last segment plus `/`.
pub fn directory_label(path: &str) -> String {
    let last = path.rsplit('/').next().unwrap_or_default();
    format!("{}/", last)
}

/// True if `ancestor` is a strictly shorter, segment-wise prefix of `path`.
///
/// Segments are compared for equality one index at a time, so `/foo` is not
/// an ancestor of `/foobar`. The root is an ancestor of every other path.
pub fn is_proper_ancestor(ancestor: &str, path: &str) -> bool {
    let ancestor = segments(ancestor);
    let path = segments(path);
    ancestor.len() < path.len() && ancestor.iter().zip(path.iter()).all(|(a, b)| a == b)
}
