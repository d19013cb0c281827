//! On-disk draft store using Fjall

use std::path::Path;

use anyhow::Result;
use config::Config;
use fjall::{Database, Keyspace, KeyspaceCreateOptions, PersistMode};
use tracing::info;

use crate::store::DraftStore;

const DEFAULT_DATABASE_PATH: &str = "lookout-drafts";
const KEYSPACE_NAME: &str = "drafts";

pub struct FjallDraftStore {
    database: Database,
    keyspace: Keyspace,
}

impl FjallDraftStore {
    /// Open the store at `draft-store-path`, keeping anything already saved
    pub fn new(config: &Config) -> Result<Self> {
        let path = config
            .get_string("draft-store-path")
            .unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string());
        Self::open(path)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Storing transaction drafts with Fjall on disk ({})", path.display());

        let database = Database::builder(path).open()?;
        let keyspace = database.keyspace(KEYSPACE_NAME, KeyspaceCreateOptions::default)?;
        Ok(Self { database, keyspace })
    }
}

impl DraftStore for FjallDraftStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.keyspace.get(key.as_bytes())?.map(|value| value.to_vec()))
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.keyspace.insert(key.as_bytes(), value)?;
        // Persist each edit immediately
        self.database.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}
