//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod account_type;
mod approval;
mod error_category;
mod frequency;
mod role;

pub use account_type::*;
pub use approval::*;
pub use error_category::*;
pub use frequency::*;
pub use role::*;
