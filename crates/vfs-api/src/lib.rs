// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Generic virtual-filesystem contract
//!
//! A backend-agnostic, path-addressed filesystem interface. Backends
//! implement the primitive verbs of [`FileSystem`]; the recursive and
//! whole-file conveniences are provided on top of them.

pub mod error;
pub mod fs;
pub mod info;
pub mod mode;
pub mod opener;

pub use error::{FsError, FsResult};
pub use fs::{FileHandle, FileSystem, WalkEntry};
pub use info::ResourceInfo;
pub use opener::{Opener, OpenerRegistry};
