// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The operation dispatcher
//!
//! Every public verb acquires the session lock once, resolves its paths,
//! checks the verb's preconditions against the grid, and then issues the
//! single remote call that performs the operation. Internal helpers take
//! the already-locked session, so no lock is ever re-acquired.

use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use irods_client::{Collection, DataObject, GridSession, OpenFlags};
use vfs_api::error::{FsError, FsResult};
use vfs_api::fs::{FileHandle, FileSystem};
use vfs_api::info::ResourceInfo;
use vfs_api::mode;

use crate::path;

/// Kind of the resource a resolved path currently names.
///
/// Determined by two independent existence queries; a path is never both
/// a data object and a collection. Kinds are not cached, so concurrent
/// remote changes can alter the answer between calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    File,
    Directory,
    Missing,
}

/// What `setinfo` does after its existence check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetinfoPolicy {
    /// Raise `Unsupported`: grid metadata is immutable through the adapter.
    #[default]
    Fail,
    /// Accept and discard the update.
    Ignore,
}

/// Behavior knobs for the dispatcher.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FsPolicy {
    /// Subcollections of the zone root that `removetree` on the root
    /// leaves in place. These are grid-managed namespaces.
    pub preserved_root_collections: Vec<String>,
    pub setinfo: SetinfoPolicy,
}

impl Default for FsPolicy {
    fn default() -> Self {
        Self {
            preserved_root_collections: vec!["trash".to_string(), "home".to_string()],
            setinfo: SetinfoPolicy::default(),
        }
    }
}

/// Filesystem over one iRODS session.
///
/// The session is the only shared mutable state; all operations serialize
/// through its mutex because the grid client is not safe for concurrent
/// use. Handles returned by `openbin` are independent of the lock.
pub struct IrodsFs {
    session: Mutex<Box<dyn GridSession>>,
    zone: String,
    policy: FsPolicy,
}

impl IrodsFs {
    pub fn new(session: Box<dyn GridSession>) -> Self {
        Self::with_policy(session, FsPolicy::default())
    }

    pub fn with_policy(session: Box<dyn GridSession>, policy: FsPolicy) -> Self {
        let zone = session.zone().to_string();
        Self {
            session: Mutex::new(session),
            zone,
            policy,
        }
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn policy(&self) -> &FsPolicy {
        &self.policy
    }

    /// Upload a local file into the grid through its native put operation,
    /// truncating any existing object at `path`.
    pub fn upload(&self, path: &str, local: &Path) -> FsResult<()> {
        let mut session = self.lock_session();
        let parent_grid = path::resolve(&self.zone, path::parent(path));
        if !session.collection_exists(&parent_grid).map_err(FsError::other)? {
            return Err(FsError::NotFound(path.to_string()));
        }
        tracing::debug!(path, "uploading local file");
        session
            .put_data_object(local, &path::resolve(&self.zone, path))
            .map_err(FsError::other)
    }

    /// Download a data object into a local file through the grid's native
    /// get operation.
    pub fn download(&self, path: &str, local: &Path) -> FsResult<()> {
        let mut session = self.lock_session();
        let grid = path::resolve(&self.zone, path);
        if self.classify(session.as_mut(), &grid)? == Resource::Missing {
            return Err(FsError::NotFound(path.to_string()));
        }
        session.get_data_object_to(&grid, local).map_err(FsError::other)
    }

    fn lock_session(&self) -> MutexGuard<'_, Box<dyn GridSession>> {
        self.session.lock().unwrap()
    }

    /// Two existence queries; exactly one may be true.
    fn classify(&self, session: &mut dyn GridSession, grid_path: &str) -> FsResult<Resource> {
        if session.data_object_exists(grid_path).map_err(FsError::other)? {
            return Ok(Resource::File);
        }
        if session.collection_exists(grid_path).map_err(FsError::other)? {
            return Ok(Resource::Directory);
        }
        Ok(Resource::Missing)
    }

    fn create_locked(&self, session: &mut dyn GridSession, path: &str) -> FsResult<()> {
        let parent_grid = path::resolve(&self.zone, path::parent(path));
        if !session.collection_exists(&parent_grid).map_err(FsError::other)? {
            return Err(FsError::NotFound(path.to_string()));
        }
        let grid = path::resolve(&self.zone, path);
        if session.data_object_exists(&grid).map_err(FsError::other)? {
            return Err(FsError::AlreadyExists(path.to_string()));
        }
        tracing::debug!(path, "creating data object");
        session.create_data_object(&grid).map_err(FsError::other)
    }
}

fn file_info(object: DataObject) -> ResourceInfo {
    ResourceInfo {
        name: object.name,
        is_dir: false,
        size: object.size,
        owner: object.owner_name,
        created: object.create_time,
        modified: object.modify_time,
    }
}

fn dir_info(coll: Collection) -> ResourceInfo {
    ResourceInfo {
        name: coll.name,
        is_dir: true,
        size: 0,
        owner: coll.owner_name,
        created: coll.create_time,
        modified: coll.modify_time,
    }
}

impl FileSystem for IrodsFs {
    fn getinfo(&self, path: &str) -> FsResult<ResourceInfo> {
        let mut session = self.lock_session();
        let grid = path::resolve(&self.zone, path);
        match self.classify(session.as_mut(), &grid)? {
            Resource::Missing => Err(FsError::NotFound(path.to_string())),
            Resource::File => {
                let object = session.get_data_object(&grid).map_err(FsError::other)?;
                Ok(file_info(object))
            }
            Resource::Directory => {
                let coll = session.get_collection(&grid).map_err(FsError::other)?;
                Ok(dir_info(coll))
            }
        }
    }

    fn setinfo(&self, path: &str, _info: &ResourceInfo) -> FsResult<()> {
        let mut session = self.lock_session();
        let grid = path::resolve(&self.zone, path);
        if self.classify(session.as_mut(), &grid)? == Resource::Missing {
            return Err(FsError::NotFound(path.to_string()));
        }
        match self.policy.setinfo {
            SetinfoPolicy::Fail => Err(FsError::Unsupported(
                "grid metadata is immutable through this adapter".to_string(),
            )),
            SetinfoPolicy::Ignore => Ok(()),
        }
    }

    fn listdir(&self, path: &str) -> FsResult<Vec<String>> {
        let mut session = self.lock_session();
        let grid = path::resolve(&self.zone, path);
        match self.classify(session.as_mut(), &grid)? {
            Resource::Missing => Err(FsError::NotFound(path.to_string())),
            Resource::File => Err(FsError::DirectoryExpected(path.to_string())),
            Resource::Directory => {
                let listing = session.list_collection(&grid).map_err(FsError::other)?;
                Ok(listing
                    .data_objects
                    .into_iter()
                    .map(|o| o.path)
                    .chain(listing.subcollections.into_iter().map(|c| c.path))
                    .collect())
            }
        }
    }

    fn makedir(&self, path: &str, recreate: bool) -> FsResult<()> {
        let mut session = self.lock_session();
        let grid = path::resolve(&self.zone, path);
        if self.classify(session.as_mut(), &grid)? == Resource::Directory {
            if recreate {
                return Ok(());
            }
            return Err(FsError::AlreadyExists(path.to_string()));
        }
        let parent_grid = path::resolve(&self.zone, path::parent(path));
        if !session.collection_exists(&parent_grid).map_err(FsError::other)? {
            return Err(FsError::NotFound(path.to_string()));
        }
        tracing::debug!(path, "creating collection");
        session.create_collection(&grid).map_err(FsError::other)
    }

    fn openbin(&self, path: &str, mode: &str) -> FsResult<Box<dyn FileHandle>> {
        let create = mode::can_create(mode);
        let mut session = self.lock_session();
        let grid = path::resolve(&self.zone, path);
        match self.classify(session.as_mut(), &grid)? {
            Resource::Missing => {
                if !create {
                    return Err(FsError::NotFound(path.to_string()));
                }
                self.create_locked(session.as_mut(), path)?;
            }
            Resource::Directory => return Err(FsError::FileExpected(path.to_string())),
            Resource::File => {}
        }
        let flags = OpenFlags {
            read: mode::readable(mode),
            write: mode::writable(mode),
            create,
            truncate: mode::truncates(mode),
            append: mode::appends(mode),
        };
        let mut stream = session.open_data_object(&grid, flags).map_err(FsError::other)?;
        if flags.append {
            stream.seek(SeekFrom::End(0)).map_err(FsError::other)?;
        }
        Ok(Box::new(stream))
    }

    fn create(&self, path: &str) -> FsResult<()> {
        let mut session = self.lock_session();
        self.create_locked(session.as_mut(), path)
    }

    fn remove(&self, path: &str) -> FsResult<()> {
        let mut session = self.lock_session();
        let grid = path::resolve(&self.zone, path);
        match self.classify(session.as_mut(), &grid)? {
            Resource::Missing => Err(FsError::NotFound(path.to_string())),
            Resource::Directory => Err(FsError::FileExpected(path.to_string())),
            Resource::File => {
                tracing::debug!(path, "unlinking data object");
                session.unlink_data_object(&grid).map_err(FsError::other)
            }
        }
    }

    fn removedir(&self, path: &str) -> FsResult<()> {
        // The root always exists and is always a directory, so every root
        // spelling short-circuits here before any classification.
        if path::is_root(&self.zone, path) {
            return Err(FsError::RootRemovalForbidden);
        }
        let mut session = self.lock_session();
        let grid = path::resolve(&self.zone, path);
        match self.classify(session.as_mut(), &grid)? {
            Resource::Missing => return Err(FsError::NotFound(path.to_string())),
            Resource::File => return Err(FsError::DirectoryExpected(path.to_string())),
            Resource::Directory => {}
        }
        let listing = session.list_collection(&grid).map_err(FsError::other)?;
        if !listing.is_empty() {
            return Err(FsError::DirectoryNotEmpty(path.to_string()));
        }
        tracing::debug!(path, "removing collection");
        session.remove_collection(&grid, false).map_err(FsError::other)
    }

    fn removetree(&self, path: &str) -> FsResult<()> {
        let mut session = self.lock_session();
        // Every root spelling maps to the zone collection itself, so the
        // purge branch below is reachable through all of them.
        let grid = if path::is_root(&self.zone, path) {
            format!("/{}", self.zone)
        } else {
            path::resolve(&self.zone, path)
        };
        match self.classify(session.as_mut(), &grid)? {
            Resource::Missing => return Err(FsError::NotFound(path.to_string())),
            Resource::File => return Err(FsError::DirectoryExpected(path.to_string())),
            Resource::Directory => {}
        }
        if path::is_root(&self.zone, path) {
            // Purge the root's children individually; the zone root itself
            // and its preserved collections stay in place.
            tracing::warn!(path, "purging zone root contents");
            let listing = session.list_collection(&grid).map_err(FsError::other)?;
            for object in listing.data_objects {
                session.unlink_data_object(&object.path).map_err(FsError::other)?;
            }
            for sub in listing.subcollections {
                if self.policy.preserved_root_collections.iter().any(|p| *p == sub.name) {
                    continue;
                }
                session.remove_collection(&sub.path, true).map_err(FsError::other)?;
            }
            Ok(())
        } else {
            tracing::debug!(path, "removing collection tree");
            session.remove_collection(&grid, true).map_err(FsError::other)
        }
    }

    fn move_file(&self, src: &str, dst: &str, overwrite: bool) -> FsResult<()> {
        let mut session = self.lock_session();
        let src_grid = path::resolve(&self.zone, src);
        let dst_grid = path::resolve(&self.zone, dst);
        match self.classify(session.as_mut(), &src_grid)? {
            Resource::Missing => return Err(FsError::NotFound(src.to_string())),
            Resource::Directory => return Err(FsError::FileExpected(src.to_string())),
            Resource::File => {}
        }
        if !overwrite && self.classify(session.as_mut(), &dst_grid)? != Resource::Missing {
            return Err(FsError::DestinationExists(dst.to_string()));
        }
        tracing::debug!(src, dst, "moving data object");
        session.move_data_object(&src_grid, &dst_grid).map_err(FsError::other)
    }

    fn move_dir(&self, src: &str, dst: &str) -> FsResult<()> {
        let mut session = self.lock_session();
        let src_grid = path::resolve(&self.zone, src);
        let dst_grid = path::resolve(&self.zone, dst);
        tracing::debug!(src, dst, "moving collection");
        session.move_collection(&src_grid, &dst_grid).map_err(FsError::other)
    }

    fn exists(&self, path: &str) -> FsResult<bool> {
        let mut session = self.lock_session();
        let grid = path::resolve(&self.zone, path);
        Ok(self.classify(session.as_mut(), &grid)? != Resource::Missing)
    }

    fn isfile(&self, path: &str) -> FsResult<bool> {
        let mut session = self.lock_session();
        let grid = path::resolve(&self.zone, path);
        session.data_object_exists(&grid).map_err(FsError::other)
    }

    fn isdir(&self, path: &str) -> FsResult<bool> {
        let mut session = self.lock_session();
        let grid = path::resolve(&self.zone, path);
        session.collection_exists(&grid).map_err(FsError::other)
    }
}
