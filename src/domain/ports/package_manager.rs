//! HostPackageManager port - the native binary package manager

use std::collections::HashSet;

use super::tool::{ToolError, ToolResult};

pub trait HostPackageManager: Send + Sync {
    /// True iff `name` is currently installed (query exits 0)
    fn is_installed(&self, name: &str) -> bool;

    /// Every name the manager can install from its sync databases
    fn searchable_names(&self) -> Result<HashSet<String>, ToolError>;

    /// Install all `names` in one batched call
    fn install(&self, names: &[String]) -> ToolResult;

    /// Remove all `names` in one batched call
    fn remove(&self, names: &[String]) -> ToolResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_package_manager_is_object_safe() {
        fn _assert_object_safe(_: &dyn HostPackageManager) {}
    }
}
