//! Waqf API Routes
//!
//! - /waqf/beneficiaries - Beneficiary registry
//! - /waqf/properties, /waqf/contracts, /waqf/payments - Rent roll
//! - /waqf/accounts, /waqf/journal, /waqf/reports - Bookkeeping
//! - /waqf/funds, /waqf/loans - Treasury
//! - /waqf/distributions - Heir distributions and their settings
//! - /waqf/requests - Beneficiary requests
//! - /waqf/decisions - Board governance
//! - /waqf/archive - Document archive metadata
//! - /waqf/tickets - Support tickets
//! - /waqf/dashboard, /waqf/kpis - Role dashboards
//! - /waqf/system - Health, error log and audit trail

pub mod archive;
pub mod beneficiary;
pub mod contract;
pub mod dashboard;
pub mod distribution;
pub mod governance;
pub mod ledger;
pub mod property;
pub mod request;
pub mod swagger;
pub mod system;
pub mod ticket;
pub mod treasury;

use uuid::Uuid;

use waqf::Permission;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::AppState;

/// Staff with `permission` pass; a beneficiary user passes only for their own profile
pub(crate) async fn ensure_own_or(
    state: &AppState,
    user: &AuthUser,
    beneficiary_id: Uuid,
    permission: Permission,
) -> Result<(), ApiError> {
    if user.can(permission) {
        return Ok(());
    }
    let own = state.beneficiary_service.for_user(user.id).await?;
    match own {
        Some(profile) if profile.id == beneficiary_id => Ok(()),
        _ => Err(ApiError::Forbidden(
            "records belong to another beneficiary".to_string(),
        )),
    }
}
