//! Property - Real estate held by the waqf

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::errors::DomainError;

text_enum! {
    pub enum PropertyType {
        Residential => "residential",
        Commercial => "commercial",
        Land => "land",
        Mixed => "mixed",
    }
}

text_enum! {
    pub enum PropertyStatus {
        Vacant => "vacant",
        Rented => "rented",
        Maintenance => "maintenance",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Property {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub property_type: PropertyType,
    pub status: PropertyStatus,
    pub units: i32,
    pub annual_rent: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewProperty {
    pub name: String,
    pub location: String,
    pub property_type: PropertyType,
    pub units: Option<i32>,
    pub annual_rent: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PropertyUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub property_type: Option<PropertyType>,
    pub status: Option<PropertyStatus>,
    pub units: Option<i32>,
    pub annual_rent: Option<Decimal>,
}

impl Property {
    pub fn new(input: NewProperty) -> Result<Self, DomainError> {
        if input.name.trim().is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        let units = input.units.unwrap_or(1);
        if units < 1 {
            return Err(DomainError::validation("units must be at least 1"));
        }
        if input.annual_rent < Decimal::ZERO {
            return Err(DomainError::validation("annual_rent must be non-negative"));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            location: input.location.trim().to_string(),
            property_type: input.property_type,
            status: PropertyStatus::Vacant,
            units,
            annual_rent: input.annual_rent,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(mut self, update: PropertyUpdate) -> Result<Self, DomainError> {
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name is required"));
            }
            self.name = name.trim().to_string();
        }
        if let Some(location) = update.location {
            self.location = location.trim().to_string();
        }
        if let Some(property_type) = update.property_type {
            self.property_type = property_type;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(units) = update.units {
            if units < 1 {
                return Err(DomainError::validation("units must be at least 1"));
            }
            self.units = units;
        }
        if let Some(rent) = update.annual_rent {
            if rent < Decimal::ZERO {
                return Err(DomainError::validation("annual_rent must be non-negative"));
            }
            self.annual_rent = rent;
        }
        self.updated_at = Utc::now();
        Ok(self)
    }
}
