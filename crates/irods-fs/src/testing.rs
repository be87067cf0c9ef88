// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Test builder for adapters over the in-memory grid

use irods_client::testing::InMemoryGrid;
use irods_client::{GridSession, SessionBuilder, SessionConfig};

use crate::fs::{FsPolicy, IrodsFs};

/// Builds an [`IrodsFs`] over a fresh in-memory grid, seeded the way a
/// newly provisioned zone looks: `/zone/home/<user>` and `/zone/trash`.
#[derive(Clone, Debug, Default)]
pub struct IrodsFsBuilder {
    builder: SessionBuilder,
    policy: Option<FsPolicy>,
}

impl IrodsFsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: &str) -> Self {
        self.builder = self.builder.with_user(user);
        self
    }

    pub fn with_zone(mut self, zone: &str) -> Self {
        self.builder = self.builder.with_zone(zone);
        self
    }

    pub fn with_policy(mut self, policy: FsPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn config(&self) -> SessionConfig {
        self.builder.clone().build()
    }

    pub fn build(self) -> IrodsFs {
        let config = self.builder.build();
        let mut grid = InMemoryGrid::new(&config.zone);
        grid.create_collection(&format!("/{}/home/{}", config.zone, config.user))
            .expect("seeding user home");
        IrodsFs::with_policy(Box::new(grid), self.policy.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vfs_api::fs::FileSystem;

    #[test]
    fn test_seeded_layout() {
        let fs = IrodsFsBuilder::new().build();
        assert!(fs.isdir("/tempZone/home/rods").unwrap());
        assert!(fs.isdir("/tempZone/trash").unwrap());
    }

    #[test]
    fn test_custom_zone_and_user() {
        let fs = IrodsFsBuilder::new().with_zone("labZone").with_user("alice").build();
        assert_eq!(fs.zone(), "labZone");
        assert!(fs.isdir("/labZone/home/alice").unwrap());
    }
}
