use serde::{Deserialize, Serialize};

/// localStorage key for the recent-search list.
pub const RECENT_SEARCHES_KEY: &str = "drillmap:recent-region-searches";

/// At most this many recent searches are kept.
pub const MAX_RECENT: usize = 5;

/// One remembered selection, deep enough to replay the jump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSearch {
    pub display_name: String,
    pub province: String,
    pub city_code: Option<String>,
    pub sub_district_code: Option<String>,
    pub neighborhood_code: Option<String>,
}

impl RecentSearch {
    fn same_region(&self, other: &RecentSearch) -> bool {
        self.province == other.province
            && self.city_code == other.city_code
            && self.sub_district_code == other.sub_district_code
            && self.neighborhood_code == other.neighborhood_code
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecentError {
    StorageUnavailable,
    Io(String),
}

impl std::fmt::Display for RecentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecentError::StorageUnavailable => write!(f, "browser storage unavailable"),
            RecentError::Io(msg) => write!(f, "recent-search storage error: {msg}"),
        }
    }
}

impl std::error::Error for RecentError {}

/// Persistence for recent searches. A corrupt persisted list degrades to
/// empty rather than erroring; losing history is harmless.
pub trait RecentStore {
    fn list(&self) -> Result<Vec<RecentSearch>, RecentError>;
    fn add(&mut self, item: RecentSearch) -> Result<(), RecentError>;
    fn clear(&mut self) -> Result<(), RecentError>;
}

/// Re-searching a region moves it to the front instead of duplicating it.
fn push_recent(items: &mut Vec<RecentSearch>, item: RecentSearch) {
    items.retain(|existing| !existing.same_region(&item));
    items.insert(0, item);
    items.truncate(MAX_RECENT);
}

#[derive(Debug, Default)]
pub struct InMemoryRecentStore {
    items: Vec<RecentSearch>,
}

impl InMemoryRecentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecentStore for InMemoryRecentStore {
    fn list(&self) -> Result<Vec<RecentSearch>, RecentError> {
        Ok(self.items.clone())
    }

    fn add(&mut self, item: RecentSearch) -> Result<(), RecentError> {
        push_recent(&mut self.items, item);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), RecentError> {
        self.items.clear();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_storage {
    use super::{MAX_RECENT, RecentError, RecentSearch, RecentStore, push_recent};

    #[derive(Debug)]
    pub struct LocalStorageRecentStore {
        key: String,
    }

    impl LocalStorageRecentStore {
        pub fn new(key: impl Into<String>) -> Self {
            Self { key: key.into() }
        }

        fn load(&self) -> Result<Vec<RecentSearch>, RecentError> {
            let storage = window_local_storage()?;
            let raw = storage
                .get_item(&self.key)
                .map_err(|e| RecentError::Io(format!("get_item failed: {:?}", e)))?;
            let Some(raw) = raw else {
                return Ok(Vec::new());
            };
            // Corrupt history is dropped, not surfaced.
            let mut items = serde_json::from_str::<Vec<RecentSearch>>(&raw).unwrap_or_default();
            items.truncate(MAX_RECENT);
            Ok(items)
        }

        fn save(&self, items: &[RecentSearch]) -> Result<(), RecentError> {
            let storage = window_local_storage()?;
            let raw = serde_json::to_string(items).map_err(|e| RecentError::Io(e.to_string()))?;
            storage
                .set_item(&self.key, &raw)
                .map_err(|e| RecentError::Io(format!("set_item failed: {:?}", e)))?;
            Ok(())
        }
    }

    impl RecentStore for LocalStorageRecentStore {
        fn list(&self) -> Result<Vec<RecentSearch>, RecentError> {
            self.load()
        }

        fn add(&mut self, item: RecentSearch) -> Result<(), RecentError> {
            let mut items = self.load()?;
            push_recent(&mut items, item);
            self.save(&items)
        }

        fn clear(&mut self) -> Result<(), RecentError> {
            let storage = window_local_storage()?;
            storage
                .remove_item(&self.key)
                .map_err(|e| RecentError::Io(format!("remove_item failed: {:?}", e)))?;
            Ok(())
        }
    }

    fn window_local_storage() -> Result<web_sys::Storage, RecentError> {
        let win = web_sys::window().ok_or(RecentError::StorageUnavailable)?;
        win.local_storage()
            .map_err(|e| RecentError::Io(format!("localStorage error: {:?}", e)))?
            .ok_or(RecentError::StorageUnavailable)
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_storage::LocalStorageRecentStore;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct LocalStorageRecentStore;

#[cfg(not(target_arch = "wasm32"))]
impl LocalStorageRecentStore {
    pub fn new(_key: impl Into<String>) -> Self {
        Self
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl RecentStore for LocalStorageRecentStore {
    fn list(&self) -> Result<Vec<RecentSearch>, RecentError> {
        Err(RecentError::StorageUnavailable)
    }

    fn add(&mut self, _item: RecentSearch) -> Result<(), RecentError> {
        Err(RecentError::StorageUnavailable)
    }

    fn clear(&mut self) -> Result<(), RecentError> {
        Err(RecentError::StorageUnavailable)
    }
}
