// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for the grid client surface

use std::io;

/// Client-side failure raised by a grid session.
///
/// The adapter above this crate does not translate these; they propagate
/// to callers opaquely.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("connection to {host}:{port} failed: {reason}")]
    Connection {
        host: String,
        port: u16,
        reason: String,
    },
    #[error("authentication rejected for user {0}")]
    Authentication(String),
    #[error("grid error {code}: {message}")]
    Protocol { code: i32, message: String },
    #[error("session is closed")]
    SessionClosed,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl ClientError {
    /// iRODS server status `CAT_NO_ROWS_FOUND`: the queried entity does
    /// not exist.
    pub fn no_rows(path: &str) -> Self {
        ClientError::Protocol {
            code: -808000,
            message: format!("CAT_NO_ROWS_FOUND: {path}"),
        }
    }

    /// iRODS server status `CAT_COLLECTION_NOT_EMPTY`.
    pub fn collection_not_empty(path: &str) -> Self {
        ClientError::Protocol {
            code: -821000,
            message: format!("CAT_COLLECTION_NOT_EMPTY: {path}"),
        }
    }

    /// iRODS server status `OVERWRITE_WITHOUT_FORCE_FLAG`.
    pub fn overwrite_without_force(path: &str) -> Self {
        ClientError::Protocol {
            code: -802000,
            message: format!("OVERWRITE_WITHOUT_FORCE_FLAG: {path}"),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
