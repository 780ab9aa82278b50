//! Distribution preview - Display arithmetic over the configured shares
//!
//! The allocation itself runs in the database procedure; this only shows
//! what each configured share amounts to for a given total.

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use super::accounting::round2;
use crate::domain::entities::DistributionSettings;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SplitPreview {
    pub total: Decimal,
    pub nazer: Decimal,
    pub reserve: Decimal,
    pub maintenance: Decimal,
    pub beneficiaries: Decimal,
    pub total_percentage: Decimal,
    /// `total` minus the four shares; negative when shares exceed 100%
    pub unallocated: Decimal,
}

fn share(total: Decimal, percentage: Decimal) -> Decimal {
    round2(total * percentage / Decimal::ONE_HUNDRED)
}

pub fn split_preview(total: Decimal, settings: &DistributionSettings) -> SplitPreview {
    let nazer = share(total, settings.nazer_percentage);
    let reserve = share(total, settings.reserve_percentage);
    let maintenance = share(total, settings.maintenance_percentage);
    let beneficiaries = share(total, settings.beneficiaries_percentage);

    SplitPreview {
        total,
        nazer,
        reserve,
        maintenance,
        beneficiaries,
        total_percentage: settings.total_percentage(),
        unallocated: total - nazer - reserve - maintenance - beneficiaries,
    }
}
