// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for the virtual-filesystem contract

/// Filesystem error type
///
/// Every precondition violation maps onto one of the modeled variants.
/// Backend transport failures are carried opaquely in `Other`; the contract
/// does not reinterpret them.
#[derive(thiserror::Error, Debug)]
pub enum FsError {
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("resource already exists: {0}")]
    AlreadyExists(String),
    #[error("file expected: {0}")]
    FileExpected(String),
    #[error("directory expected: {0}")]
    DirectoryExpected(String),
    #[error("directory not empty: {0}")]
    DirectoryNotEmpty(String),
    #[error("root directory cannot be removed")]
    RootRemovalForbidden,
    #[error("destination exists: {0}")]
    DestinationExists(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FsError {
    /// Wrap a backend failure without translating it.
    pub fn other<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FsError::Other(anyhow::Error::new(err))
    }
}

pub type FsResult<T> = Result<T, FsError>;
