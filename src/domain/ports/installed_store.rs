//! InstalledStore port - persistence of the installed-set mapping
//!
//! Injected into the install and remove use cases so tests can substitute
//! an in-memory store.

use crate::domain::entities::InstalledSet;
use crate::error::BridgeResult;

pub trait InstalledStore: Send + Sync {
    /// Snapshot of every entry
    fn load(&self) -> BridgeResult<InstalledSet>;

    /// Short name recorded for `key`
    fn get(&self, key: &str) -> BridgeResult<Option<String>> {
        Ok(self.load()?.get(key).map(str::to_string))
    }

    fn contains(&self, key: &str) -> BridgeResult<bool> {
        Ok(self.load()?.contains(key))
    }

    /// Record `key → short_name` (append-only)
    fn put(&self, key: &str, short_name: &str) -> BridgeResult<()>;

    /// Drop entries; only used by explicit uninstall
    fn remove(&self, keys: &[String]) -> BridgeResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installed_store_is_object_safe() {
        fn _assert_object_safe(_: &dyn InstalledStore) {}
    }
}
