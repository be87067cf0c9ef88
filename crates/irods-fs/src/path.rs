// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Path resolution between user-facing and grid-native forms
//!
//! Pure functions of their inputs and the configured zone; no I/O, no
//! failure mode. A malformed path is joined as given and surfaces later
//! as not-found from the grid.

/// Resolve a user-facing path into its grid-native, zone-prefixed form.
///
/// Idempotent: a path already under `/zone` is returned unchanged. The
/// prefix is matched as a whole segment, so `/zoneExtra/...` is treated
/// as a relative path rather than an already-resolved one.
pub fn resolve(zone: &str, path: &str) -> String {
    let prefix = format!("/{zone}");
    if path == prefix || path.starts_with(&format!("{prefix}/")) {
        return path.to_string();
    }
    let mut resolved = prefix;
    for segment in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
        resolved.push('/');
        resolved.push_str(segment);
    }
    resolved
}

/// Textual dirname of a user-facing path.
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Whether the path denotes the zone root, in any of the textual forms a
/// caller might use: empty, `/`, the bare zone name, or the resolved
/// `/zone` form.
pub fn is_root(zone: &str, path: &str) -> bool {
    path.is_empty() || path == "/" || path == zone || path == format!("/{zone}")
}
