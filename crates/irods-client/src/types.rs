// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Record types returned by the grid services

use serde::{Deserialize, Serialize};

/// A data object (file-equivalent leaf) in the grid namespace.
///
/// Timestamps are unix seconds (UTC), as the catalog stores them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataObject {
    /// Grid-native (zone-prefixed) path.
    pub path: String,
    pub name: String,
    pub size: u64,
    pub owner_name: String,
    pub create_time: i64,
    pub modify_time: i64,
}

/// A collection (directory-equivalent container) in the grid namespace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Grid-native (zone-prefixed) path.
    pub path: String,
    pub name: String,
    pub owner_name: String,
    pub create_time: i64,
    pub modify_time: i64,
}

/// Immediate children of a collection.
#[derive(Clone, Debug, Default)]
pub struct CollectionListing {
    pub data_objects: Vec<DataObject>,
    pub subcollections: Vec<Collection>,
}

impl CollectionListing {
    pub fn is_empty(&self) -> bool {
        self.data_objects.is_empty() && self.subcollections.is_empty()
    }
}

/// How a data object is opened.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenFlags {
    pub read: bool,
    pub write: bool,
    pub create: bool,
    pub truncate: bool,
    pub append: bool,
}
