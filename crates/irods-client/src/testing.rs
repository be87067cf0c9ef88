// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! In-memory grid fake for testing
//!
//! A complete [`GridSession`] implementation over a mutex-guarded map,
//! seeded with the `home` and `trash` collections a fresh zone carries.
//! Clones share the same store, so a test can hold one handle while the
//! adapter under test holds another.

use std::collections::BTreeMap;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{ClientError, ClientResult};
use crate::session::{DataStream, GridSession, SessionConfig, SessionConnector};
use crate::types::{Collection, CollectionListing, DataObject, OpenFlags};

#[derive(Clone, Debug)]
enum EntryKind {
    Collection,
    Data(Vec<u8>),
}

#[derive(Clone, Debug)]
struct Entry {
    kind: EntryKind,
    owner: String,
    create_time: i64,
    modify_time: i64,
}

type Store = BTreeMap<String, Entry>;

fn now() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs() as i64).unwrap_or(0)
}

fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => "",
    }
}

fn basename_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// In-memory [`GridSession`] over one simulated zone.
#[derive(Clone)]
pub struct InMemoryGrid {
    zone: String,
    owner: String,
    store: Arc<Mutex<Store>>,
}

impl InMemoryGrid {
    pub fn new(zone: &str) -> Self {
        let grid = Self {
            zone: zone.to_string(),
            owner: "rods".to_string(),
            store: Arc::new(Mutex::new(BTreeMap::new())),
        };
        let stamp = now();
        let mut store = grid.store.lock().unwrap();
        for path in [
            format!("/{zone}"),
            format!("/{zone}/home"),
            format!("/{zone}/trash"),
        ] {
            store.insert(
                path,
                Entry {
                    kind: EntryKind::Collection,
                    owner: grid.owner.clone(),
                    create_time: stamp,
                    modify_time: stamp,
                },
            );
        }
        drop(store);
        grid
    }

    fn entry(&self, path: &str) -> ClientResult<Entry> {
        let store = self.store.lock().unwrap();
        store.get(path).cloned().ok_or_else(|| ClientError::no_rows(path))
    }

    fn insert(&self, path: &str, kind: EntryKind) {
        let stamp = now();
        let mut store = self.store.lock().unwrap();
        store.insert(
            path.to_string(),
            Entry {
                kind,
                owner: self.owner.clone(),
                create_time: stamp,
                modify_time: stamp,
            },
        );
    }

    fn require_parent_collection(&self, path: &str) -> ClientResult<()> {
        let parent = parent_of(path);
        let store = self.store.lock().unwrap();
        match store.get(parent) {
            Some(Entry { kind: EntryKind::Collection, .. }) => Ok(()),
            _ => Err(ClientError::no_rows(parent)),
        }
    }

    fn data_object_record(&self, path: &str, entry: &Entry) -> DataObject {
        let size = match &entry.kind {
            EntryKind::Data(data) => data.len() as u64,
            EntryKind::Collection => 0,
        };
        DataObject {
            path: path.to_string(),
            name: basename_of(path).to_string(),
            size,
            owner_name: entry.owner.clone(),
            create_time: entry.create_time,
            modify_time: entry.modify_time,
        }
    }

    fn collection_record(&self, path: &str, entry: &Entry) -> Collection {
        Collection {
            path: path.to_string(),
            name: basename_of(path).to_string(),
            owner_name: entry.owner.clone(),
            create_time: entry.create_time,
            modify_time: entry.modify_time,
        }
    }
}

impl GridSession for InMemoryGrid {
    fn zone(&self) -> &str {
        &self.zone
    }

    fn data_object_exists(&mut self, path: &str) -> ClientResult<bool> {
        let store = self.store.lock().unwrap();
        Ok(matches!(store.get(path), Some(Entry { kind: EntryKind::Data(_), .. })))
    }

    fn get_data_object(&mut self, path: &str) -> ClientResult<DataObject> {
        let entry = self.entry(path)?;
        match entry.kind {
            EntryKind::Data(_) => Ok(self.data_object_record(path, &entry)),
            EntryKind::Collection => Err(ClientError::no_rows(path)),
        }
    }

    fn create_data_object(&mut self, path: &str) -> ClientResult<()> {
        self.require_parent_collection(path)?;
        if self.store.lock().unwrap().contains_key(path) {
            return Err(ClientError::overwrite_without_force(path));
        }
        self.insert(path, EntryKind::Data(Vec::new()));
        Ok(())
    }

    fn open_data_object(&mut self, path: &str, flags: OpenFlags) -> ClientResult<Box<dyn DataStream>> {
        {
            let mut store = self.store.lock().unwrap();
            match store.get_mut(path) {
                Some(Entry { kind: EntryKind::Data(data), modify_time, .. }) => {
                    if flags.truncate {
                        data.clear();
                        *modify_time = now();
                    }
                }
                Some(_) => return Err(ClientError::no_rows(path)),
                None => {
                    if !flags.create {
                        return Err(ClientError::no_rows(path));
                    }
                    let stamp = now();
                    store.insert(
                        path.to_string(),
                        Entry {
                            kind: EntryKind::Data(Vec::new()),
                            owner: self.owner.clone(),
                            create_time: stamp,
                            modify_time: stamp,
                        },
                    );
                }
            }
        }
        Ok(Box::new(InMemoryStream {
            store: Arc::clone(&self.store),
            path: path.to_string(),
            pos: 0,
            flags,
        }))
    }

    fn unlink_data_object(&mut self, path: &str) -> ClientResult<()> {
        let mut store = self.store.lock().unwrap();
        match store.get(path) {
            Some(Entry { kind: EntryKind::Data(_), .. }) => {
                store.remove(path);
                Ok(())
            }
            _ => Err(ClientError::no_rows(path)),
        }
    }

    fn move_data_object(&mut self, src: &str, dst: &str) -> ClientResult<()> {
        self.require_parent_collection(dst)?;
        let mut store = self.store.lock().unwrap();
        match store.get(src) {
            Some(Entry { kind: EntryKind::Data(_), .. }) => {
                let mut entry = store.remove(src).expect("checked above");
                entry.modify_time = now();
                store.insert(dst.to_string(), entry);
                Ok(())
            }
            _ => Err(ClientError::no_rows(src)),
        }
    }

    fn put_data_object(&mut self, local: &Path, path: &str) -> ClientResult<()> {
        self.require_parent_collection(path)?;
        let data = std::fs::read(local)?;
        self.insert(path, EntryKind::Data(data));
        Ok(())
    }

    fn get_data_object_to(&mut self, path: &str, local: &Path) -> ClientResult<()> {
        let entry = self.entry(path)?;
        match entry.kind {
            EntryKind::Data(data) => {
                std::fs::write(local, data)?;
                Ok(())
            }
            EntryKind::Collection => Err(ClientError::no_rows(path)),
        }
    }

    fn collection_exists(&mut self, path: &str) -> ClientResult<bool> {
        let store = self.store.lock().unwrap();
        Ok(matches!(store.get(path), Some(Entry { kind: EntryKind::Collection, .. })))
    }

    fn get_collection(&mut self, path: &str) -> ClientResult<Collection> {
        let entry = self.entry(path)?;
        match entry.kind {
            EntryKind::Collection => Ok(self.collection_record(path, &entry)),
            EntryKind::Data(_) => Err(ClientError::no_rows(path)),
        }
    }

    fn list_collection(&mut self, path: &str) -> ClientResult<CollectionListing> {
        let store = self.store.lock().unwrap();
        match store.get(path) {
            Some(Entry { kind: EntryKind::Collection, .. }) => {}
            _ => return Err(ClientError::no_rows(path)),
        }
        let mut listing = CollectionListing::default();
        for (child, entry) in store.iter() {
            if parent_of(child) != path {
                continue;
            }
            match &entry.kind {
                EntryKind::Data(_) => {
                    listing.data_objects.push(self.data_object_record(child, entry))
                }
                EntryKind::Collection => {
                    listing.subcollections.push(self.collection_record(child, entry))
                }
            }
        }
        Ok(listing)
    }

    fn create_collection(&mut self, path: &str) -> ClientResult<()> {
        self.require_parent_collection(path)?;
        if self.store.lock().unwrap().contains_key(path) {
            return Err(ClientError::Protocol {
                code: -809000,
                message: format!("CATALOG_ALREADY_HAS_ITEM_BY_THAT_NAME: {path}"),
            });
        }
        self.insert(path, EntryKind::Collection);
        Ok(())
    }

    fn remove_collection(&mut self, path: &str, recurse: bool) -> ClientResult<()> {
        let mut store = self.store.lock().unwrap();
        match store.get(path) {
            Some(Entry { kind: EntryKind::Collection, .. }) => {}
            _ => return Err(ClientError::no_rows(path)),
        }
        let prefix = format!("{path}/");
        let has_children = store.keys().any(|k| k.starts_with(&prefix));
        if has_children && !recurse {
            return Err(ClientError::collection_not_empty(path));
        }
        store.retain(|k, _| k != path && !k.starts_with(&prefix));
        Ok(())
    }

    fn move_collection(&mut self, src: &str, dst: &str) -> ClientResult<()> {
        self.require_parent_collection(dst)?;
        let mut store = self.store.lock().unwrap();
        match store.get(src) {
            Some(Entry { kind: EntryKind::Collection, .. }) => {}
            _ => return Err(ClientError::no_rows(src)),
        }
        let prefix = format!("{src}/");
        let moved: Vec<(String, Entry)> = store
            .iter()
            .filter(|(k, _)| *k == src || k.starts_with(&prefix))
            .map(|(k, e)| (k.clone(), e.clone()))
            .collect();
        for (k, entry) in moved {
            store.remove(&k);
            let rebased = format!("{dst}{}", &k[src.len()..]);
            store.insert(rebased, entry);
        }
        Ok(())
    }
}

/// Stream over one data object in the store, write-through per call.
struct InMemoryStream {
    store: Arc<Mutex<Store>>,
    path: String,
    pos: u64,
    flags: OpenFlags,
}

impl InMemoryStream {
    fn len(&self) -> io::Result<u64> {
        let store = self.store.lock().unwrap();
        match store.get(&self.path) {
            Some(Entry { kind: EntryKind::Data(data), .. }) => Ok(data.len() as u64),
            _ => Err(io::Error::new(io::ErrorKind::NotFound, self.path.clone())),
        }
    }
}

impl Read for InMemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.flags.read {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "not opened for reading"));
        }
        let store = self.store.lock().unwrap();
        let data = match store.get(&self.path) {
            Some(Entry { kind: EntryKind::Data(data), .. }) => data,
            _ => return Err(io::Error::new(io::ErrorKind::NotFound, self.path.clone())),
        };
        let start = self.pos as usize;
        if start >= data.len() {
            return Ok(0);
        }
        let n = std::cmp::min(buf.len(), data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        self.pos += n as u64;
        Ok(n)
    }
}

impl Write for InMemoryStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.flags.write {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "not opened for writing"));
        }
        let mut store = self.store.lock().unwrap();
        let (data, modify_time) = match store.get_mut(&self.path) {
            Some(Entry { kind: EntryKind::Data(data), modify_time, .. }) => (data, modify_time),
            _ => return Err(io::Error::new(io::ErrorKind::NotFound, self.path.clone())),
        };
        let start = self.pos as usize;
        let end = start + buf.len();
        if end > data.len() {
            data.resize(end, 0);
        }
        data[start..end].copy_from_slice(buf);
        *modify_time = now();
        self.pos = end as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for InMemoryStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(n) => n as i64,
            SeekFrom::Current(d) => self.pos as i64 + d,
            SeekFrom::End(d) => self.len()? as i64 + d,
        };
        if target < 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "seek before start"));
        }
        self.pos = target as u64;
        Ok(self.pos)
    }
}

/// Connector producing a fresh [`InMemoryGrid`] per connect call.
#[derive(Clone, Copy, Debug, Default)]
pub struct InMemoryConnector;

impl SessionConnector for InMemoryConnector {
    fn connect(&self, config: &SessionConfig) -> ClientResult<Box<dyn GridSession>> {
        tracing::debug!(zone = %config.zone, user = %config.user, "opening in-memory session");
        Ok(Box::new(InMemoryGrid::new(&config.zone)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_zone() {
        let mut grid = InMemoryGrid::new("tempZone");
        assert!(grid.collection_exists("/tempZone").unwrap());
        assert!(grid.collection_exists("/tempZone/home").unwrap());
        assert!(grid.collection_exists("/tempZone/trash").unwrap());
        assert!(!grid.data_object_exists("/tempZone").unwrap());
    }

    #[test]
    fn test_create_and_list() {
        let mut grid = InMemoryGrid::new("tempZone");
        grid.create_collection("/tempZone/dir").unwrap();
        grid.create_data_object("/tempZone/dir/a.txt").unwrap();

        let listing = grid.list_collection("/tempZone/dir").unwrap();
        assert_eq!(listing.data_objects.len(), 1);
        assert_eq!(listing.data_objects[0].name, "a.txt");
        assert!(listing.subcollections.is_empty());
    }

    #[test]
    fn test_create_requires_parent() {
        let mut grid = InMemoryGrid::new("tempZone");
        let err = grid.create_data_object("/tempZone/missing/a.txt").unwrap_err();
        assert!(matches!(err, ClientError::Protocol { code: -808000, .. }));
    }

    #[test]
    fn test_remove_collection_not_empty() {
        let mut grid = InMemoryGrid::new("tempZone");
        grid.create_collection("/tempZone/dir").unwrap();
        grid.create_data_object("/tempZone/dir/a.txt").unwrap();

        let err = grid.remove_collection("/tempZone/dir", false).unwrap_err();
        assert!(matches!(err, ClientError::Protocol { code: -821000, .. }));

        grid.remove_collection("/tempZone/dir", true).unwrap();
        assert!(!grid.collection_exists("/tempZone/dir").unwrap());
        assert!(!grid.data_object_exists("/tempZone/dir/a.txt").unwrap());
    }

    #[test]
    fn test_move_collection_rebases_children() {
        let mut grid = InMemoryGrid::new("tempZone");
        grid.create_collection("/tempZone/src").unwrap();
        grid.create_data_object("/tempZone/src/a.txt").unwrap();

        grid.move_collection("/tempZone/src", "/tempZone/dst").unwrap();
        assert!(grid.collection_exists("/tempZone/dst").unwrap());
        assert!(grid.data_object_exists("/tempZone/dst/a.txt").unwrap());
        assert!(!grid.collection_exists("/tempZone/src").unwrap());
    }

    #[test]
    fn test_stream_roundtrip() {
        let mut grid = InMemoryGrid::new("tempZone");
        let flags = OpenFlags { read: true, write: true, create: true, ..Default::default() };
        let mut stream = grid.open_data_object("/tempZone/f.txt", flags).unwrap();
        stream.write_all(b"hello grid").unwrap();
        stream.seek(SeekFrom::Start(0)).unwrap();

        let mut buf = String::new();
        stream.read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "hello grid");

        stream.seek(SeekFrom::End(-4)).unwrap();
        let mut tail = String::new();
        stream.read_to_string(&mut tail).unwrap();
        assert_eq!(tail, "grid");
    }

    #[test]
    fn test_read_only_stream_rejects_writes() {
        let mut grid = InMemoryGrid::new("tempZone");
        grid.create_data_object("/tempZone/f.txt").unwrap();
        let flags = OpenFlags { read: true, ..Default::default() };
        let mut stream = grid.open_data_object("/tempZone/f.txt", flags).unwrap();
        let err = stream.write(b"nope").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_put_and_get_local_files() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        std::fs::write(&src, b"payload").unwrap();

        let mut grid = InMemoryGrid::new("tempZone");
        grid.put_data_object(&src, "/tempZone/up.txt").unwrap();
        assert_eq!(grid.get_data_object("/tempZone/up.txt").unwrap().size, 7);

        let dst = dir.path().join("dst.txt");
        grid.get_data_object_to("/tempZone/up.txt", &dst).unwrap();
        assert_eq!(std::fs::read(&dst).unwrap(), b"payload");
    }

    #[test]
    fn test_clones_share_store() {
        let mut grid = InMemoryGrid::new("tempZone");
        let mut other = grid.clone();
        grid.create_data_object("/tempZone/shared.txt").unwrap();
        assert!(other.data_object_exists("/tempZone/shared.txt").unwrap());
    }
}
