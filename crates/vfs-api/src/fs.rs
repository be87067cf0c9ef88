// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The filesystem contract
//!
//! Backends implement the primitive verbs; everything else is derived from
//! them by the provided methods. Paths are slash-separated strings; the
//! backend defines how they are resolved.

use std::io::{Read, Seek, Write};

use crate::error::{FsError, FsResult};
use crate::info::ResourceInfo;

/// Live binary stream over an open file.
///
/// Owned by the caller once returned from [`FileSystem::openbin`]; closing
/// is the caller's responsibility (dropping the handle releases it).
pub trait FileHandle: Read + Write + Seek + Send {}

impl<T: Read + Write + Seek + Send> FileHandle for T {}

/// One entry produced by [`FileSystem::walk`].
#[derive(Clone, Debug)]
pub struct WalkEntry {
    pub path: String,
    pub info: ResourceInfo,
}

/// Path-addressed filesystem operations implemented by backends.
pub trait FileSystem: Send + Sync {
    /// Get metadata for a resource.
    fn getinfo(&self, path: &str) -> FsResult<ResourceInfo>;

    /// Update metadata for a resource. Backends may not support this.
    fn setinfo(&self, path: &str, info: &ResourceInfo) -> FsResult<()>;

    /// List the children of a directory.
    fn listdir(&self, path: &str) -> FsResult<Vec<String>>;

    /// Create a directory. With `recreate`, an already existing directory
    /// is not an error.
    fn makedir(&self, path: &str, recreate: bool) -> FsResult<()>;

    /// Open a file as a binary stream, per the given open-mode string.
    fn openbin(&self, path: &str, mode: &str) -> FsResult<Box<dyn FileHandle>>;

    /// Create an empty file.
    fn create(&self, path: &str) -> FsResult<()>;

    /// Remove a file.
    fn remove(&self, path: &str) -> FsResult<()>;

    /// Remove an empty directory.
    fn removedir(&self, path: &str) -> FsResult<()>;

    /// Remove a directory and everything below it.
    fn removetree(&self, path: &str) -> FsResult<()>;

    /// Move a file. Without `overwrite` an existing destination is an error.
    fn move_file(&self, src: &str, dst: &str, overwrite: bool) -> FsResult<()>;

    /// Move a directory.
    fn move_dir(&self, src: &str, dst: &str) -> FsResult<()>;

    /// Whether a resource of any kind exists at the path.
    fn exists(&self, path: &str) -> FsResult<bool>;

    /// Whether the path names a file.
    fn isfile(&self, path: &str) -> FsResult<bool> {
        match self.getinfo(path) {
            Ok(info) => Ok(info.is_file()),
            Err(FsError::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Whether the path names a directory.
    fn isdir(&self, path: &str) -> FsResult<bool> {
        match self.getinfo(path) {
            Ok(info) => Ok(info.is_dir),
            Err(FsError::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Whether the directory has no children.
    fn isempty(&self, path: &str) -> FsResult<bool> {
        Ok(self.listdir(path)?.is_empty())
    }

    /// Read the whole contents of a file.
    fn readbytes(&self, path: &str) -> FsResult<Vec<u8>> {
        let mut handle = self.openbin(path, "r")?;
        let mut buf = Vec::new();
        handle.read_to_end(&mut buf).map_err(FsError::other)?;
        Ok(buf)
    }

    /// Replace the contents of a file, creating it if necessary.
    fn writebytes(&self, path: &str, data: &[u8]) -> FsResult<()> {
        let mut handle = self.openbin(path, "w")?;
        handle.write_all(data).map_err(FsError::other)?;
        handle.flush().map_err(FsError::other)?;
        Ok(())
    }

    /// Copy a file. Without `overwrite` an existing destination is an error.
    fn copy_file(&self, src: &str, dst: &str, overwrite: bool) -> FsResult<()> {
        if !overwrite && self.exists(dst)? {
            return Err(FsError::DestinationExists(dst.to_string()));
        }
        let data = self.readbytes(src)?;
        self.writebytes(dst, &data)
    }

    /// Recursively copy a directory into `dst`, creating it if needed.
    fn copy_dir(&self, src: &str, dst: &str) -> FsResult<()> {
        self.makedir(dst, true)?;
        for child in self.listdir(src)? {
            let target = join(dst, basename(&child));
            if self.isdir(&child)? {
                self.copy_dir(&child, &target)?;
            } else {
                self.copy_file(&child, &target, true)?;
            }
        }
        Ok(())
    }

    /// Depth-traverse a directory, returning every resource below it.
    fn walk(&self, path: &str) -> FsResult<Vec<WalkEntry>> {
        let mut pending = vec![path.to_string()];
        let mut entries = Vec::new();
        while let Some(dir) = pending.pop() {
            for child in self.listdir(&dir)? {
                let info = self.getinfo(&child)?;
                if info.is_dir {
                    pending.push(child.clone());
                }
                entries.push(WalkEntry { path: child, info });
            }
        }
        Ok(entries)
    }
}

fn basename(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}

fn join(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}
