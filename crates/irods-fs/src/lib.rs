// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! iRODS backend for the virtual-filesystem contract
//!
//! Maps the generic path-addressed verbs onto the grid's collection and
//! data-object services: resolve the path into its zone-prefixed form,
//! enforce the verb's preconditions, then issue the one remote call that
//! carries the operation out. Precondition violations are raised before
//! any mutating call; grid transport failures pass through untranslated.

pub mod fs;
pub mod opener;
pub mod path;
pub mod testing;

pub use fs::{FsPolicy, IrodsFs, Resource, SetinfoPolicy};
pub use opener::IrodsOpener;
