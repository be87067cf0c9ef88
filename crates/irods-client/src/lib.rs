// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Client surface for an iRODS data grid
//!
//! Defines the session trait an adapter talks to: the data-object and
//! collection services of one authenticated grid connection. The wire
//! protocol itself lives in an external native client that plugs in behind
//! [`SessionConnector`]; this crate carries only the seam and an in-memory
//! fake for tests.

pub mod error;
pub mod session;
pub mod testing;
pub mod types;

pub use error::{ClientError, ClientResult};
pub use session::{DataStream, GridSession, SessionBuilder, SessionConfig, SessionConnector};
pub use types::{Collection, CollectionListing, DataObject, OpenFlags};
