// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Resource metadata records

use serde::{Deserialize, Serialize};

/// Metadata for a single filesystem resource.
///
/// Timestamps are unix seconds (UTC). `size` is zero for directories.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInfo {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub owner: String,
    pub created: i64,
    pub modified: i64,
}

impl ResourceInfo {
    pub fn is_file(&self) -> bool {
        !self.is_dir
    }
}
