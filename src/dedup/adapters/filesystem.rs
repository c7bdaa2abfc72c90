//! Filesystem dedup store backed by a capability-scoped directory.
//!
//! Each tenant's hashes live in `<tenant-id>.json`. Writes go to a temporary
//! sibling first and are renamed into place so a crash never leaves a
//! half-written file behind.

use crate::dedup::ports::{DedupStore, DedupStoreError, DedupStoreResult};
use crate::sms::domain::ContentHash;
use crate::tenant::domain::TenantId;
use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const STATE_EXTENSION: &str = "json";
const TEMP_SUFFIX: &str = "tmp";

#[derive(Debug, Serialize, Deserialize)]
struct PersistedDedupState {
    hashes: Vec<ContentHash>,
}

/// Dedup store writing one JSON document per tenant.
#[derive(Debug, Clone)]
pub struct FsDedupStore {
    dir: Arc<Dir>,
}

impl FsDedupStore {
    /// Opens (creating if needed) the state directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DedupStoreError::Persistence`] when the directory cannot be
    /// created or opened.
    pub fn open(path: &Utf8Path) -> DedupStoreResult<Self> {
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let name = path.file_name().ok_or_else(|| {
            DedupStoreError::persistence(std::io::Error::other(
                "dedup state path must include a directory name",
            ))
        })?;
        let parent_dir =
            Dir::open_ambient_dir(parent, ambient_authority()).map_err(DedupStoreError::persistence)?;
        parent_dir
            .create_dir_all(name)
            .map_err(DedupStoreError::persistence)?;
        let dir = parent_dir.open_dir(name).map_err(DedupStoreError::persistence)?;
        Ok(Self::from_dir(dir))
    }

    /// Wraps an already opened directory.
    #[must_use]
    pub fn from_dir(dir: Dir) -> Self {
        Self { dir: Arc::new(dir) }
    }
}

fn state_file_name(tenant_id: &TenantId) -> String {
    format!("{tenant_id}.{STATE_EXTENSION}")
}

#[async_trait]
impl DedupStore for FsDedupStore {
    async fn load(&self, tenant_id: &TenantId) -> DedupStoreResult<Vec<ContentHash>> {
        let dir = Arc::clone(&self.dir);
        let owned_id = tenant_id.clone();
        tokio::task::spawn_blocking(move || {
            let contents = match dir.read_to_string(state_file_name(&owned_id)) {
                Ok(contents) => contents,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
                Err(err) => return Err(DedupStoreError::persistence(err)),
            };
            let state: PersistedDedupState = serde_json::from_str(&contents)
                .map_err(|err| DedupStoreError::corrupt(owned_id.clone(), err))?;
            Ok(state.hashes)
        })
        .await
        .map_err(DedupStoreError::persistence)?
    }

    async fn save(&self, tenant_id: &TenantId, hashes: &[ContentHash]) -> DedupStoreResult<()> {
        let dir = Arc::clone(&self.dir);
        let file_name = state_file_name(tenant_id);
        let document = serde_json::to_vec(&PersistedDedupState {
            hashes: hashes.to_vec(),
        })
        .map_err(DedupStoreError::persistence)?;

        tokio::task::spawn_blocking(move || {
            let temp_name = format!("{file_name}.{TEMP_SUFFIX}");
            dir.write(&temp_name, document)
                .map_err(DedupStoreError::persistence)?;
            dir.rename(&temp_name, &dir, &file_name)
                .map_err(DedupStoreError::persistence)
        })
        .await
        .map_err(DedupStoreError::persistence)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Workspace {
        _temp: TempDir,
        state_dir: Utf8PathBuf,
    }

    #[fixture]
    fn workspace() -> Workspace {
        let temp = tempfile::tempdir().expect("temporary directory");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf-8 temp path");
        Workspace {
            state_dir: root.join("dedup"),
            _temp: temp,
        }
    }

    fn tenant() -> TenantId {
        TenantId::new("tenant-01").expect("valid tenant id")
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn missing_state_loads_as_empty(workspace: Workspace) {
        let store = FsDedupStore::open(&workspace.state_dir).expect("store opens");
        let hashes = store.load(&tenant()).await.expect("load succeeds");
        assert!(hashes.is_empty());
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn saved_hashes_survive_reopen(workspace: Workspace) {
        let hashes = vec![
            ContentHash::of_fields("d1", "dst", "src", "one"),
            ContentHash::of_fields("d2", "dst", "src", "two"),
        ];
        FsDedupStore::open(&workspace.state_dir)
            .expect("store opens")
            .save(&tenant(), &hashes)
            .await
            .expect("save succeeds");

        let reopened = FsDedupStore::open(&workspace.state_dir).expect("store reopens");
        let loaded = reopened.load(&tenant()).await.expect("load succeeds");

        assert_eq!(loaded, hashes);
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn corrupt_state_is_reported(workspace: Workspace) {
        let store = FsDedupStore::open(&workspace.state_dir).expect("store opens");
        store
            .dir
            .write("tenant-01.json", "{\"hashes\": [\"nothex\"]}")
            .expect("write corrupt file");

        let result = store.load(&tenant()).await;

        assert!(matches!(result, Err(DedupStoreError::Corrupt { .. })));
    }
}
