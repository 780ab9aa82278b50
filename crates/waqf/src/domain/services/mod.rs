//! Domain Services
//!
//! Stateless business rules that span entities: form validation,
//! bookkeeping identities, KPI reduction, distribution previews,
//! vote tallying and error classification.

pub mod accounting;
pub mod distribution;
pub mod error_classifier;
pub mod governance;
pub mod kpi;
pub mod validation;
