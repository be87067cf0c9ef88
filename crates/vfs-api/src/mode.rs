// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Open-mode string predicates
//!
//! Modes follow the conventional `open()` grammar (`r`, `w`, `a`, with
//! optional `+` and `b`). These are pure string predicates, independent of
//! any filesystem state.

/// Whether the mode implies creating the file when it does not exist.
pub fn can_create(mode: &str) -> bool {
    mode.contains('w') || mode.contains('a')
}

/// Whether the mode truncates existing content.
pub fn truncates(mode: &str) -> bool {
    mode.contains('w')
}

/// Whether the mode positions writes at the end of the file.
pub fn appends(mode: &str) -> bool {
    mode.contains('a')
}

/// Whether the mode permits reading.
pub fn readable(mode: &str) -> bool {
    mode.contains('r') || mode.contains('+')
}

/// Whether the mode permits writing.
pub fn writable(mode: &str) -> bool {
    can_create(mode) || mode.contains('+')
}

/// The mode with the binary marker removed.
pub fn strip_binary(mode: &str) -> String {
    mode.chars().filter(|c| *c != 'b').collect()
}
