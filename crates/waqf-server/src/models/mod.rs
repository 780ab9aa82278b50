//! Waqf API Models
//!
//! Request/response DTOs that are not domain entities:
//! - Workflow: approval actions and records with their next actions
//! - Dashboard: per-role views over the KPI snapshot
//! - System: health and monitoring payloads

mod dashboard;
mod system;
mod workflow;

pub use dashboard::*;
pub use system::*;
pub use workflow::*;
