// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Session trait and connection configuration
//!
//! A [`GridSession`] is one authenticated connection to a grid endpoint.
//! Sessions are not safe for concurrent use; callers serialize access
//! (the adapter holds one behind a mutex). Every method is a network
//! round trip on a live implementation.

use std::io::{Read, Seek, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ClientResult;
use crate::types::{Collection, CollectionListing, DataObject, OpenFlags};

/// Binary stream over an open data object.
///
/// Independent of the session once returned; reads and writes rely on the
/// client's own per-handle safety.
pub trait DataStream: Read + Write + Seek + Send {}

impl<T: Read + Write + Seek + Send> DataStream for T {}

/// The data-object and collection services of one grid connection.
///
/// Paths are always grid-native (zone-prefixed); resolution is the
/// caller's concern.
#[cfg_attr(test, mockall::automock)]
pub trait GridSession: Send {
    /// The zone this session is authenticated against.
    fn zone(&self) -> &str;

    // Data-object service

    fn data_object_exists(&mut self, path: &str) -> ClientResult<bool>;
    fn get_data_object(&mut self, path: &str) -> ClientResult<DataObject>;
    fn create_data_object(&mut self, path: &str) -> ClientResult<()>;
    fn open_data_object(&mut self, path: &str, flags: OpenFlags) -> ClientResult<Box<dyn DataStream>>;
    fn unlink_data_object(&mut self, path: &str) -> ClientResult<()>;
    fn move_data_object(&mut self, src: &str, dst: &str) -> ClientResult<()>;
    /// Upload a local file into the grid, truncating any existing object.
    fn put_data_object(&mut self, local: &Path, path: &str) -> ClientResult<()>;
    /// Download a data object into a local file.
    fn get_data_object_to(&mut self, path: &str, local: &Path) -> ClientResult<()>;

    // Collection service

    fn collection_exists(&mut self, path: &str) -> ClientResult<bool>;
    fn get_collection(&mut self, path: &str) -> ClientResult<Collection>;
    fn list_collection(&mut self, path: &str) -> ClientResult<CollectionListing>;
    fn create_collection(&mut self, path: &str) -> ClientResult<()>;
    /// Remove a collection. Without `recurse` a non-empty collection is a
    /// grid-side error.
    fn remove_collection(&mut self, path: &str, recurse: bool) -> ClientResult<()>;
    fn move_collection(&mut self, src: &str, dst: &str) -> ClientResult<()>;
}

/// Flat connection parameters for one grid endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub zone: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1247,
            user: "rods".to_string(),
            password: "rods".to_string(),
            zone: "tempZone".to_string(),
        }
    }
}

/// Builder for [`SessionConfig`].
#[derive(Clone, Debug, Default)]
pub struct SessionBuilder {
    config: SessionConfig,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.config.user = user.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.config.zone = zone.into();
        self
    }

    pub fn build(self) -> SessionConfig {
        self.config
    }
}

/// Produces live sessions from connection parameters.
///
/// The native wire client implements this; tests plug in
/// [`crate::testing::InMemoryConnector`].
pub trait SessionConnector: Send + Sync {
    fn connect(&self, config: &SessionConfig) -> ClientResult<Box<dyn GridSession>>;
}
