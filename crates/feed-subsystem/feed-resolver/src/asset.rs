// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tracing::debug;

/// Where uploaded images live. Posts only carry a reference to them.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Remove the asset behind `reference`. Clearing an asset that does not exist succeeds.
    async fn clear(&self, reference: &str) -> std::io::Result<()>;
}

/// Assets stored as files directly under `root`
pub struct LocalAssetStore {
    root: PathBuf,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Only the file name of a reference is used, so a reference cannot point outside the root
    fn path_for(&self, reference: &str) -> Option<PathBuf> {
        Path::new(reference)
            .file_name()
            .map(|file_name| self.root.join(file_name))
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn clear(&self, reference: &str) -> std::io::Result<()> {
        let Some(path) = self.path_for(reference) else {
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Asset already gone");
                Ok(())
            }
            result => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clear_removes_file() {
        let root = tempfile::tempdir().unwrap();
        let image = root.path().join("a.png");
        tokio::fs::write(&image, b"png").await.unwrap();

        let store = LocalAssetStore::new(root.path());
        store.clear("images/a.png").await.unwrap();

        assert!(!image.exists());
    }

    #[tokio::test]
    async fn clear_missing_file() {
        let root = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::new(root.path());

        store.clear("images/missing.png").await.unwrap();
        store.clear("").await.unwrap();
    }

    #[tokio::test]
    async fn stays_under_root() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("images");
        tokio::fs::create_dir(&root).await.unwrap();
        let outside = outer.path().join("keep.txt");
        tokio::fs::write(&outside, b"keep").await.unwrap();

        let store = LocalAssetStore::new(&root);
        store.clear("../keep.txt").await.unwrap();

        assert!(outside.exists());
    }
}
