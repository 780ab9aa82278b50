//! Beneficiary - Person entitled to a share of waqf income

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::services::validation;

text_enum! {
    /// Relationship of the beneficiary to the endower
    pub enum BeneficiaryCategory {
        Son => "son",
        Daughter => "daughter",
        Wife => "wife",
        Other => "other",
    }
}

text_enum! {
    pub enum BeneficiaryStatus {
        Active => "active",
        Suspended => "suspended",
        Inactive => "inactive",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Beneficiary {
    pub id: Uuid,
    pub full_name: String,
    /// Saudi national ID (10 digits)
    pub national_id: String,
    /// Normalized mobile number (`5XXXXXXXX`)
    pub phone: String,
    pub email: Option<String>,
    /// Saudi IBAN (`SA` + 22 digits), spaces removed
    pub iban: Option<String>,
    pub category: BeneficiaryCategory,
    pub status: BeneficiaryStatus,
    /// Auth user linked to this profile, if the beneficiary can sign in
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a beneficiary
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewBeneficiary {
    pub full_name: String,
    pub national_id: String,
    pub phone: String,
    pub email: Option<String>,
    pub iban: Option<String>,
    pub category: BeneficiaryCategory,
    pub user_id: Option<Uuid>,
}

/// Partial update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BeneficiaryUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub iban: Option<String>,
    pub category: Option<BeneficiaryCategory>,
    pub status: Option<BeneficiaryStatus>,
    pub user_id: Option<Uuid>,
}

impl Beneficiary {
    /// Validate input and build an active beneficiary
    pub fn register(input: NewBeneficiary) -> Result<Self, DomainError> {
        let full_name = input.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(DomainError::validation("full_name is required"));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            full_name,
            national_id: validation::validate_national_id(&input.national_id)?,
            phone: validation::normalize_phone(&input.phone)?,
            email: input
                .email
                .as_deref()
                .map(validation::validate_email)
                .transpose()?,
            iban: input
                .iban
                .as_deref()
                .map(validation::validate_iban)
                .transpose()?,
            category: input.category,
            status: BeneficiaryStatus::Active,
            user_id: input.user_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update, validating every field that changes
    pub fn apply(mut self, update: BeneficiaryUpdate) -> Result<Self, DomainError> {
        if let Some(name) = update.full_name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(DomainError::validation("full_name is required"));
            }
            self.full_name = name;
        }
        if let Some(phone) = update.phone {
            self.phone = validation::normalize_phone(&phone)?;
        }
        if let Some(email) = update.email {
            self.email = Some(validation::validate_email(&email)?);
        }
        if let Some(iban) = update.iban {
            self.iban = Some(validation::validate_iban(&iban)?);
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if update.user_id.is_some() {
            self.user_id = update.user_id;
        }
        self.updated_at = Utc::now();
        Ok(self)
    }

    pub fn is_active(&self) -> bool {
        self.status == BeneficiaryStatus::Active
    }
}
