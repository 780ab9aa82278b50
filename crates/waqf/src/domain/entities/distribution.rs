//! Distribution - Periodic allocation of waqf income to heirs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::value_objects::{ApprovalAction, ApprovalStatus, Frequency};

/// Share configuration consumed by the allocation procedure.
///
/// Percentages are stored as entered; they are not required to sum to 100.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DistributionSettings {
    pub frequency: Frequency,
    pub nazer_percentage: Decimal,
    pub reserve_percentage: Decimal,
    pub maintenance_percentage: Decimal,
    pub beneficiaries_percentage: Decimal,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DistributionSettingsUpdate {
    pub frequency: Option<Frequency>,
    pub nazer_percentage: Option<Decimal>,
    pub reserve_percentage: Option<Decimal>,
    pub maintenance_percentage: Option<Decimal>,
    pub beneficiaries_percentage: Option<Decimal>,
}

impl Default for DistributionSettings {
    fn default() -> Self {
        Self {
            frequency: Frequency::Annual,
            nazer_percentage: Decimal::from(10),
            reserve_percentage: Decimal::from(10),
            maintenance_percentage: Decimal::from(5),
            beneficiaries_percentage: Decimal::from(75),
            updated_at: Utc::now(),
            updated_by: None,
        }
    }
}

impl DistributionSettings {
    pub fn total_percentage(&self) -> Decimal {
        self.nazer_percentage
            + self.reserve_percentage
            + self.maintenance_percentage
            + self.beneficiaries_percentage
    }

    pub fn apply(mut self, update: DistributionSettingsUpdate, updated_by: Option<Uuid>) -> Self {
        if let Some(frequency) = update.frequency {
            self.frequency = frequency;
        }
        if let Some(pct) = update.nazer_percentage {
            self.nazer_percentage = pct;
        }
        if let Some(pct) = update.reserve_percentage {
            self.reserve_percentage = pct;
        }
        if let Some(pct) = update.maintenance_percentage {
            self.maintenance_percentage = pct;
        }
        if let Some(pct) = update.beneficiaries_percentage {
            self.beneficiaries_percentage = pct;
        }
        self.updated_at = Utc::now();
        self.updated_by = updated_by;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Distribution {
    pub id: Uuid,
    /// Human label of the period, e.g. `2026-Q1`
    pub period_label: String,
    pub distribution_date: NaiveDate,
    pub total_amount: Decimal,
    pub beneficiaries_count: i32,
    pub status: ApprovalStatus,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewDistribution {
    pub period_label: String,
    pub distribution_date: NaiveDate,
    pub total_amount: Decimal,
}

impl NewDistribution {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.period_label.trim().is_empty() {
            return Err(DomainError::validation("period_label is required"));
        }
        if self.total_amount <= Decimal::ZERO {
            return Err(DomainError::validation("total_amount must be positive"));
        }
        Ok(())
    }
}

impl Distribution {
    pub fn apply_action(mut self, action: ApprovalAction) -> Result<Self, DomainError> {
        self.status = self.status.transition(action)?;
        Ok(self)
    }
}

/// One beneficiary's portion of a distribution
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DistributionShare {
    pub id: Uuid,
    pub distribution_id: Uuid,
    pub beneficiary_id: Uuid,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}
