//! Remove Use Case
//!
//! Uninstalls native packages and recorded source packages with one
//! batched host call, then forgets the source packages' store entries.

use crate::domain::entities::{Namespace, PackageGroups};
use crate::domain::ports::BridgeEvent;
use crate::domain::services::tool_output;
use crate::error::{BridgeError, BridgeResult};

use super::context::Ports;

pub struct RemoveUseCase<'a> {
    ports: Ports<'a>,
}

impl<'a> RemoveUseCase<'a> {
    pub fn new(ports: Ports<'a>) -> Self {
        Self { ports }
    }

    /// Remove every reference. Returns the short names handed to the host
    /// manager.
    pub fn remove<S: AsRef<str>>(&self, refs: &[S]) -> BridgeResult<Vec<String>> {
        let groups = PackageGroups::classify(refs)?;
        let installed = self.ports.store.load()?;

        let mut names = groups.native_names();
        let mut keys: Vec<String> = Vec::new();
        let mut unknown: Vec<String> = Vec::new();
        for reference in &groups.source {
            let key = reference.key();
            let matched: Vec<String> = if installed.contains(&key) {
                vec![key]
            } else if reference.has_pin() {
                Vec::new()
            } else {
                installed
                    .keys_for_address(reference.address())
                    .map(str::to_string)
                    .collect()
            };
            if matched.is_empty() {
                unknown.push(reference.key());
                continue;
            }
            for key in matched {
                if let Some(short) = installed.get(&key) {
                    if !names.iter().any(|n| n == short) {
                        names.push(short.to_string());
                    }
                }
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        if !unknown.is_empty() {
            return Err(BridgeError::Unreachable {
                namespace: Namespace::Source,
                names: unknown,
            });
        }
        if names.is_empty() {
            return Ok(names);
        }

        self.ports.events.on_event(BridgeEvent::Started {
            command: "remove".to_string(),
            packages: names.clone(),
        });
        if let Err(e) = self.ports.packages.remove(&names) {
            let missing = tool_output::missing_targets(&e.output);
            let output = if missing.is_empty() {
                e.output
            } else {
                missing.join(" ")
            };
            return Err(BridgeError::Remove { names, output });
        }
        self.ports.store.remove(&keys)?;

        self.ports.events.on_event(BridgeEvent::Removed {
            names: names.clone(),
        });
        self.ports.events.on_event(BridgeEvent::Completed {
            command: "remove".to_string(),
        });
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{FakeManager, Harness};
    use crate::domain::ports::InstalledStore;
    use crate::infrastructure::MemoryInstalledStore;

    #[test]
    fn removes_natives_and_recorded_sources_in_one_call() {
        let mut h = Harness::new();
        h.store = MemoryInstalledStore::with_entries([("h/o/tool@v1", "tool"), ("h/o/lib", "lib")]);
        h.manager = FakeManager::default().with_installed(&["vim", "tool", "lib"]);

        let removed = RemoveUseCase::new(h.ports())
            .remove(&["vim", "h/o/tool"])
            .unwrap();

        assert_eq!(removed, vec!["vim", "tool"]);
        assert_eq!(h.manager.calls(), vec!["remove vim tool"]);
        let set = h.store.load().unwrap();
        assert!(!set.contains("h/o/tool@v1"));
        assert!(set.contains("h/o/lib"));
    }

    #[test]
    fn unknown_sources_are_all_listed() {
        let mut h = Harness::new();
        h.store = MemoryInstalledStore::with_entries([("h/o/tool@v1", "tool")]);

        let err = RemoveUseCase::new(h.ports())
            .remove(&["h/o/nope", "h/o/tool@v2", "h/o/gone"])
            .unwrap_err();

        match err {
            BridgeError::Unreachable { namespace, names } => {
                assert_eq!(namespace, Namespace::Source);
                assert_eq!(names, vec!["h/o/nope", "h/o/tool@v2", "h/o/gone"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(h.manager.calls().is_empty());
    }

    #[test]
    fn failure_output_names_missing_targets() {
        let mut h = Harness::new();
        h.store = MemoryInstalledStore::with_entries([("h/o/tool", "tool")]);
        h.manager = FakeManager {
            remove_output: Some(
                "error: target not found: vim\nerror: target not found: tool\n".to_string(),
            ),
            ..FakeManager::default()
        };

        let err = RemoveUseCase::new(h.ports())
            .remove(&["vim", "h/o/tool"])
            .unwrap_err();

        match err {
            BridgeError::Remove { names, output } => {
                assert_eq!(names, vec!["vim", "tool"]);
                assert_eq!(output, "vim tool");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(h.store.load().unwrap().contains("h/o/tool"));
    }

    #[test]
    fn other_failures_keep_verbatim_output() {
        let mut h = Harness::new();
        h.manager = FakeManager {
            remove_output: Some("error: failed to prepare transaction\n".to_string()),
            ..FakeManager::default()
        };

        let err = RemoveUseCase::new(h.ports()).remove(&["vim"]).unwrap_err();

        assert_eq!(
            err.tool_output(),
            Some("error: failed to prepare transaction\n")
        );
    }
}
