//! Dashboard - One view per role over the KPI snapshot
//!
//! Sections a role does not see are omitted from the JSON.

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use waqf::domain::services::kpi::{CollectionKpis, FundKpis, IncomeKpis};
use waqf::domain::{DocumentCategory, Loan};
use waqf::{Beneficiary, BeneficiaryRequest, KpiSnapshot, RentalPayment, UserRole};

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpis: Option<KpiSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oversight: Option<OversightSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial: Option<FinancialSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections: Option<CollectionsSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<ArchiveSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary: Option<BeneficiarySection>,
}

impl DashboardResponse {
    pub fn empty(role: UserRole) -> Self {
        Self {
            role,
            kpis: None,
            system: None,
            oversight: None,
            financial: None,
            collections: None,
            archive: None,
            beneficiary: None,
        }
    }
}

/// Parts of the dashboard; each role sees a fixed set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardSection {
    Kpis,
    System,
    Oversight,
    Financial,
    Collections,
    Archive,
    Beneficiary,
}

impl DashboardSection {
    pub fn for_role(role: UserRole) -> &'static [DashboardSection] {
        use DashboardSection::*;
        match role {
            UserRole::Admin => &[Kpis, System],
            UserRole::Nazer => &[Kpis, Oversight],
            UserRole::Accountant => &[Financial],
            UserRole::Cashier => &[Collections],
            UserRole::Archivist => &[Archive],
            UserRole::Beneficiary => &[Beneficiary],
        }
    }

    /// Whether the section is filled from the KPI snapshot
    pub fn needs_kpis(&self) -> bool {
        matches!(
            self,
            DashboardSection::Kpis
                | DashboardSection::Oversight
                | DashboardSection::Financial
                | DashboardSection::Collections
        )
    }

    /// Field name in the JSON response
    pub fn key(&self) -> &'static str {
        match self {
            DashboardSection::Kpis => "kpis",
            DashboardSection::System => "system",
            DashboardSection::Oversight => "oversight",
            DashboardSection::Financial => "financial",
            DashboardSection::Collections => "collections",
            DashboardSection::Archive => "archive",
            DashboardSection::Beneficiary => "beneficiary",
        }
    }
}

/// Admin view of the server itself
#[derive(Debug, Serialize, ToSchema)]
pub struct SystemStatus {
    pub error_log_size: usize,
    pub cache_entries: usize,
}

/// Nazer's queue of things awaiting a decision
#[derive(Debug, Serialize, ToSchema)]
pub struct OversightSection {
    pub pending_requests: i64,
    pub open_decisions: usize,
    pub distributions_awaiting_approval: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FinancialSection {
    #[serde(flatten)]
    pub income: IncomeKpis,
    #[serde(flatten)]
    pub funds: FundKpis,
    pub draft_entries: usize,
    pub trial_balance_balanced: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CollectionsSection {
    #[serde(flatten)]
    pub collections: CollectionKpis,
    /// Outstanding payments due in the next 7 days
    pub due_soon: Vec<RentalPayment>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryCount {
    pub category: DocumentCategory,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArchiveSection {
    pub total_documents: i64,
    pub by_category: Vec<CategoryCount>,
}

/// A beneficiary's own records
#[derive(Debug, Serialize, ToSchema)]
pub struct BeneficiarySection {
    pub profile: Option<Beneficiary>,
    pub requests: Vec<BeneficiaryRequest>,
    pub loans: Vec<Loan>,
    pub shares_total: Decimal,
}
