// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! URL-scheme based filesystem construction
//!
//! Backends install an [`Opener`] into an explicit [`OpenerRegistry`]
//! instance; there is no process-global registry.

use std::collections::HashMap;
use std::sync::Arc;

use url::Url;

use crate::error::{FsError, FsResult};
use crate::fs::FileSystem;

/// Constructs a filesystem from a parsed URL.
pub trait Opener: Send + Sync {
    /// URL schemes this opener handles.
    fn schemes(&self) -> &[&str];

    /// Open a filesystem for the given URL.
    fn open_fs(&self, url: &Url) -> FsResult<Box<dyn FileSystem>>;
}

/// Maps URL schemes to installed openers.
#[derive(Default)]
pub struct OpenerRegistry {
    openers: HashMap<String, Arc<dyn Opener>>,
}

impl OpenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an opener for every scheme it declares.
    pub fn install(&mut self, opener: Arc<dyn Opener>) {
        for scheme in opener.schemes() {
            self.openers.insert(scheme.to_string(), Arc::clone(&opener));
        }
    }

    /// Parse a filesystem URL and open it through the matching opener.
    pub fn open_fs(&self, fs_url: &str) -> FsResult<Box<dyn FileSystem>> {
        let url = Url::parse(fs_url).map_err(FsError::other)?;
        let opener = self
            .openers
            .get(url.scheme())
            .ok_or_else(|| FsError::Unsupported(format!("no opener for scheme {:?}", url.scheme())))?;
        tracing::debug!(url = fs_url, "opening filesystem");
        opener.open_fs(&url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SentinelOpener;

    impl Opener for SentinelOpener {
        fn schemes(&self) -> &[&str] {
            &["sentinel"]
        }

        fn open_fs(&self, url: &Url) -> FsResult<Box<dyn FileSystem>> {
            Err(FsError::Unsupported(format!("sentinel reached: {}", url.host_str().unwrap_or(""))))
        }
    }

    #[test]
    fn test_dispatch_by_scheme() {
        let mut registry = OpenerRegistry::new();
        registry.install(Arc::new(SentinelOpener));

        let err = registry.open_fs("sentinel://somewhere").err().unwrap();
        assert!(matches!(err, FsError::Unsupported(msg) if msg.contains("sentinel reached")));
    }

    #[test]
    fn test_unknown_scheme() {
        let registry = OpenerRegistry::new();
        let err = registry.open_fs("nope://somewhere").err().unwrap();
        assert!(matches!(err, FsError::Unsupported(msg) if msg.contains("no opener")));
    }

    #[test]
    fn test_invalid_url() {
        let registry = OpenerRegistry::new();
        let err = registry.open_fs("not a url").err().unwrap();
        assert!(matches!(err, FsError::Other(_)));
    }
}
