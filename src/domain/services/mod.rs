//! Domain Services
//!
//! Pure business logic over domain entities. No process or network I/O;
//! everything here is testable against plain strings and in-memory fakes.

pub mod manifest;
mod planner;
pub mod tool_output;

pub use planner::{walk, PlanOutcome, PlanSkip, PlanVisitor, SkipReason};
