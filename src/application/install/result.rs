//! Install Result

use crate::domain::services::PlanSkip;

/// What one install call did
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    /// Host packages installed by the batched native call
    pub native_installed: Vec<String>,
    /// Source package keys built, installed and recorded, in build order
    pub source_installed: Vec<String>,
    /// References passed over by the planner
    pub skipped: Vec<PlanSkip>,
}

impl InstallReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_changes(&self) -> bool {
        !self.native_installed.is_empty() || !self.source_installed.is_empty()
    }
}
