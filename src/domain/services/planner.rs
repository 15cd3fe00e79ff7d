//! Install planning service
//!
//! Depth-first walk over source packages and their source dependencies.
//! The walk itself is pure: the caller supplies a [`PlanVisitor`] that
//! prepares a package (clone, checkout, read manifest) on `enter` and
//! builds it on `finish`, after all of its dependencies have finished.
//!
//! Every reference is keyed by [`PackageReference::key`]. A key that is
//! already finished is a duplicate; a key that is still being entered
//! further up the current path is a cycle. Both are recorded as skips and
//! never processed twice.

use std::collections::HashSet;

use crate::domain::entities::PackageReference;
use crate::error::BridgeResult;

/// Why the walk did not process a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Recorded as installed before the walk reached it
    AlreadyInstalled,
    /// Already processed earlier in this walk
    Duplicate,
    /// Reached again while its own dependencies were being walked
    Cycle,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::AlreadyInstalled => write!(f, "already installed"),
            SkipReason::Duplicate => write!(f, "duplicate"),
            SkipReason::Cycle => write!(f, "dependency cycle"),
        }
    }
}

/// A reference the walk passed over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSkip {
    pub reference: PackageReference,
    pub reason: SkipReason,
}

/// Side effects driven by the walk
pub trait PlanVisitor {
    /// Whether `reference` can be skipped as already installed
    fn is_installed(&mut self, reference: &PackageReference) -> BridgeResult<bool>;

    /// Prepare `reference` and return its source dependencies in manifest order
    fn enter(&mut self, reference: &PackageReference) -> BridgeResult<Vec<PackageReference>>;

    /// Complete `reference`; every dependency returned by `enter` is done
    fn finish(&mut self, reference: &PackageReference) -> BridgeResult<()>;
}

/// Outcome of a completed walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanOutcome {
    /// Finished references, dependencies before dependents
    pub finished: Vec<PackageReference>,
    pub skipped: Vec<PlanSkip>,
}

enum Step {
    Enter(PackageReference),
    Finish(PackageReference),
}

/// Walk `roots` depth-first. The first visitor error aborts the walk.
pub fn walk<V: PlanVisitor>(roots: &[PackageReference], visitor: &mut V) -> BridgeResult<PlanOutcome> {
    let mut outcome = PlanOutcome::default();
    let mut done: HashSet<String> = HashSet::new();
    let mut active: HashSet<String> = HashSet::new();
    let mut stack: Vec<Step> = roots.iter().rev().cloned().map(Step::Enter).collect();

    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(reference) => {
                let key = reference.key();
                let skip = if active.contains(&key) {
                    Some(SkipReason::Cycle)
                } else if done.contains(&key) {
                    Some(SkipReason::Duplicate)
                } else if visitor.is_installed(&reference)? {
                    done.insert(key.clone());
                    Some(SkipReason::AlreadyInstalled)
                } else {
                    None
                };
                if let Some(reason) = skip {
                    outcome.skipped.push(PlanSkip { reference, reason });
                    continue;
                }

                let deps = visitor.enter(&reference)?;
                active.insert(key);
                stack.push(Step::Finish(reference));
                stack.extend(deps.into_iter().rev().map(Step::Enter));
            }
            Step::Finish(reference) => {
                visitor.finish(&reference)?;
                let key = reference.key();
                active.remove(&key);
                done.insert(key);
                outcome.finished.push(reference);
            }
        }
    }

    Ok(outcome)
}
