//! Service Ports
//!
//! Interfaces to external services.

mod edge_functions;

pub use edge_functions::*;
