//! Rental Application Service
//!
//! Properties, their contracts and the rent roll.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde_json::json;
use uuid::Uuid;

use waqf::domain::{
    ContractStatus, NewContract, NewProperty, NewRentalPayment, PropertyStatus, PropertyType,
    PropertyUpdate,
};
use waqf::{Contract, ContractRepository, DomainError, Property, PropertyRepository, RentalPayment};

use super::AuditTrail;

pub struct RentalService<P: PropertyRepository, C: ContractRepository> {
    properties: Arc<P>,
    contracts: Arc<C>,
    audit: AuditTrail,
}

impl<P: PropertyRepository, C: ContractRepository> RentalService<P, C> {
    pub fn new(properties: Arc<P>, contracts: Arc<C>, audit: AuditTrail) -> Self {
        Self {
            properties,
            contracts,
            audit,
        }
    }

    // ---- Properties ----

    pub async fn list_properties(&self) -> Result<Vec<Property>, DomainError> {
        self.properties.find_all().await
    }

    pub async fn get_property(&self, id: Uuid) -> Result<Property, DomainError> {
        self.properties
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Property", id))
    }

    pub async fn create_property(&self, input: NewProperty) -> Result<Property, DomainError> {
        let saved = self.properties.save(&Property::new(input)?).await?;
        tracing::info!("Created property: {} ({})", saved.name, saved.id);
        Ok(saved)
    }

    pub async fn update_property(
        &self,
        id: Uuid,
        update: PropertyUpdate,
    ) -> Result<Property, DomainError> {
        let current = self.get_property(id).await?;
        self.properties.save(&current.apply(update)?).await
    }

    pub async fn delete_property(&self, id: Uuid, actor: Option<Uuid>) -> Result<bool, DomainError> {
        let active = self
            .contracts
            .find_all(Some(id))
            .await?
            .iter()
            .any(|c| c.status == ContractStatus::Active);
        if active {
            return Err(DomainError::conflict(
                "Property has an active contract and cannot be deleted",
            ));
        }
        let deleted = self.properties.delete(id).await?;
        if deleted {
            tracing::info!("Deleted property: {}", id);
            self.audit.record(actor, "delete", "property", Some(id), json!({})).await;
        }
        Ok(deleted)
    }

    // ---- Contracts ----

    pub async fn list_contracts(&self, property_id: Option<Uuid>) -> Result<Vec<Contract>, DomainError> {
        self.contracts.find_all(property_id).await
    }

    pub async fn get_contract(&self, id: Uuid) -> Result<Contract, DomainError> {
        self.contracts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Contract", id))
    }

    /// Create an active contract and mark its property rented
    pub async fn create_contract(&self, input: NewContract) -> Result<Contract, DomainError> {
        let property = self.get_property(input.property_id).await?;
        let contract = self.contracts.save(&Contract::new(input)?).await?;

        if property.status != PropertyStatus::Rented {
            let update = PropertyUpdate {
                status: Some(PropertyStatus::Rented),
                ..Default::default()
            };
            self.properties.save(&property.apply(update)?).await?;
        }

        tracing::info!(
            "Created contract {} for property {}",
            contract.contract_number,
            contract.property_id
        );
        Ok(contract)
    }

    /// Terminate an active contract; the property becomes vacant when no other contract is active
    pub async fn terminate_contract(
        &self,
        id: Uuid,
        actor: Option<Uuid>,
    ) -> Result<Contract, DomainError> {
        let mut contract = self.get_contract(id).await?;
        if contract.status != ContractStatus::Active {
            return Err(DomainError::conflict(format!(
                "Only active contracts can be terminated (contract is {})",
                contract.status
            )));
        }
        contract.status = ContractStatus::Terminated;
        let saved = self.contracts.save(&contract).await?;
        self.release_property(saved.property_id).await?;

        tracing::info!("Terminated contract: {}", saved.contract_number);
        self.audit
            .record(actor, "terminate", "contract", Some(id), json!({ "number": saved.contract_number }))
            .await;
        Ok(saved)
    }

    /// Mark the property vacant once none of its contracts is active
    async fn release_property(&self, property_id: Uuid) -> Result<(), DomainError> {
        let still_rented = self
            .contracts
            .find_all(Some(property_id))
            .await?
            .iter()
            .any(|c| c.status == ContractStatus::Active);
        if still_rented {
            return Ok(());
        }
        let Some(property) = self.properties.find_by_id(property_id).await? else {
            return Ok(());
        };
        if property.status == PropertyStatus::Rented {
            let update = PropertyUpdate {
                status: Some(PropertyStatus::Vacant),
                ..Default::default()
            };
            self.properties.save(&property.apply(update)?).await?;
        }
        Ok(())
    }

    /// Expire active contracts whose end date has passed and release their properties
    pub async fn expire_contracts(&self, today: NaiveDate) -> Result<Vec<Contract>, DomainError> {
        let expired = self.contracts.expire_ended(today).await?;
        for contract in &expired {
            self.release_property(contract.property_id).await?;
            tracing::info!("Contract {} expired on {}", contract.contract_number, contract.end_date);
        }
        Ok(expired)
    }

    // ---- Payments ----

    pub async fn list_payments(
        &self,
        contract_id: Option<Uuid>,
    ) -> Result<Vec<RentalPayment>, DomainError> {
        self.contracts.find_payments(contract_id).await
    }

    pub async fn record_payment(
        &self,
        contract_id: Uuid,
        input: NewRentalPayment,
    ) -> Result<RentalPayment, DomainError> {
        self.get_contract(contract_id).await?;
        let payment = RentalPayment::new(contract_id, input)?;
        self.contracts.save_payment(&payment).await
    }

    /// Create one pending payment per installment; commercial property rent carries VAT
    pub async fn generate_schedule(&self, contract_id: Uuid) -> Result<Vec<RentalPayment>, DomainError> {
        let contract = self.get_contract(contract_id).await?;
        if !self.contracts.find_payments(Some(contract_id)).await?.is_empty() {
            return Err(DomainError::conflict("Contract already has a payment schedule"));
        }
        let property = self.get_property(contract.property_id).await?;
        let apply_vat = matches!(
            property.property_type,
            PropertyType::Commercial | PropertyType::Mixed
        );

        let mut payments = Vec::new();
        for (due_date, amount) in contract.installment_schedule() {
            let payment = RentalPayment::new(
                contract_id,
                NewRentalPayment {
                    due_date,
                    amount,
                    apply_vat,
                },
            )?;
            payments.push(self.contracts.save_payment(&payment).await?);
        }

        tracing::info!(
            "Generated {} installments for contract {}",
            payments.len(),
            contract.contract_number
        );
        Ok(payments)
    }

    pub async fn collect_payment(
        &self,
        id: Uuid,
        actor: Option<Uuid>,
    ) -> Result<RentalPayment, DomainError> {
        let payment = self
            .contracts
            .find_payment(id)
            .await?
            .ok_or_else(|| DomainError::not_found("RentalPayment", id))?;
        let saved = self.contracts.save_payment(&payment.collect()?).await?;

        tracing::info!("Collected payment {} ({})", saved.id, saved.total());
        self.audit
            .record(actor, "collect", "rental_payment", Some(id), json!({ "total": saved.total() }))
            .await;
        Ok(saved)
    }

    /// Move pending payments past their due date to overdue
    pub async fn mark_overdue(&self, today: NaiveDate) -> Result<u64, DomainError> {
        let changed = self.contracts.mark_overdue(today).await?;
        if changed > 0 {
            tracing::info!("Marked {} rental payments overdue", changed);
        }
        Ok(changed)
    }

    /// Outstanding payments due from `today` through `today + days`
    pub async fn due_within(&self, today: NaiveDate, days: i64) -> Result<Vec<RentalPayment>, DomainError> {
        let payments = self
            .contracts
            .find_payments_due(today, today + Duration::days(days))
            .await?;
        Ok(payments.into_iter().filter(|p| p.is_outstanding()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{MemoryAudit, MemoryContracts, MemoryProperties};
    use rust_decimal::Decimal;
    use waqf::domain::{Frequency, PaymentStatus};

    struct Fixture {
        service: RentalService<MemoryProperties, MemoryContracts>,
        audit: Arc<MemoryAudit>,
    }

    fn fixture() -> Fixture {
        let audit = Arc::new(MemoryAudit::default());
        let service = RentalService::new(
            Arc::new(MemoryProperties::default()),
            Arc::new(MemoryContracts::default()),
            AuditTrail::new(audit.clone()),
        );
        Fixture { service, audit }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn property(f: &Fixture, property_type: PropertyType) -> Property {
        f.service
            .create_property(NewProperty {
                name: "عمارة النخيل".to_string(),
                location: "الرياض".to_string(),
                property_type,
                units: None,
                annual_rent: Decimal::from(120000),
            })
            .await
            .unwrap()
    }

    fn lease(property_id: Uuid, number: &str) -> NewContract {
        NewContract {
            contract_number: number.to_string(),
            property_id,
            tenant_name: "مؤسسة الريان".to_string(),
            tenant_phone: "0551234567".to_string(),
            start_date: day(2026, 1, 1),
            end_date: day(2026, 12, 31),
            annual_rent: Decimal::from(120000),
            payment_frequency: Frequency::Quarterly,
        }
    }

    #[tokio::test]
    async fn test_schedule_vat_follows_property_type() {
        let f = fixture();
        let shop = property(&f, PropertyType::Commercial).await;
        let mixed = property(&f, PropertyType::Mixed).await;
        let home = property(&f, PropertyType::Residential).await;

        for (p, number, vat) in [
            (&shop, "C-1", Decimal::from(4500)),
            (&mixed, "C-2", Decimal::from(4500)),
            (&home, "C-3", Decimal::ZERO),
        ] {
            let contract = f.service.create_contract(lease(p.id, number)).await.unwrap();
            let payments = f.service.generate_schedule(contract.id).await.unwrap();
            assert_eq!(payments.len(), 4);
            assert!(payments.iter().all(|pay| pay.amount == Decimal::from(30000)));
            assert!(payments.iter().all(|pay| pay.vat_amount == vat), "{}", number);
        }
    }

    #[tokio::test]
    async fn test_second_schedule_conflicts() {
        let f = fixture();
        let p = property(&f, PropertyType::Residential).await;
        let contract = f.service.create_contract(lease(p.id, "C-1")).await.unwrap();

        f.service.generate_schedule(contract.id).await.unwrap();
        let result = f.service.generate_schedule(contract.id).await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));
        assert_eq!(f.service.list_payments(Some(contract.id)).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_schedule_totals_annual_rent() {
        let f = fixture();
        let p = property(&f, PropertyType::Residential).await;
        let mut input = lease(p.id, "C-1");
        input.annual_rent = Decimal::from(100000);
        input.payment_frequency = Frequency::Monthly;
        input.end_date = day(2027, 1, 1);
        let contract = f.service.create_contract(input).await.unwrap();

        let payments = f.service.generate_schedule(contract.id).await.unwrap();
        let total: Decimal = payments.iter().map(|p| p.amount).sum();
        assert_eq!(payments.len(), 12);
        assert_eq!(total, Decimal::from(100000));
    }

    #[tokio::test]
    async fn test_terminating_last_contract_vacates_property() {
        let f = fixture();
        let p = property(&f, PropertyType::Commercial).await;
        let first = f.service.create_contract(lease(p.id, "C-1")).await.unwrap();
        let second = f.service.create_contract(lease(p.id, "C-2")).await.unwrap();
        assert_eq!(f.service.get_property(p.id).await.unwrap().status, PropertyStatus::Rented);

        f.service.terminate_contract(first.id, None).await.unwrap();
        assert_eq!(f.service.get_property(p.id).await.unwrap().status, PropertyStatus::Rented);

        let terminated = f.service.terminate_contract(second.id, None).await.unwrap();
        assert_eq!(terminated.status, ContractStatus::Terminated);
        assert_eq!(f.service.get_property(p.id).await.unwrap().status, PropertyStatus::Vacant);
        assert_eq!(f.audit.actions(), vec!["terminate:contract", "terminate:contract"]);

        let again = f.service.terminate_contract(second.id, None).await;
        assert!(matches!(again, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_property_with_active_contract_cannot_be_deleted() {
        let f = fixture();
        let p = property(&f, PropertyType::Residential).await;
        let contract = f.service.create_contract(lease(p.id, "C-1")).await.unwrap();

        let result = f.service.delete_property(p.id, None).await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));

        f.service.terminate_contract(contract.id, None).await.unwrap();
        assert!(f.service.delete_property(p.id, None).await.unwrap());
        assert_eq!(f.audit.actions().last().map(String::as_str), Some("delete:property"));
    }

    #[tokio::test]
    async fn test_expire_contracts_releases_property() {
        let f = fixture();
        let p = property(&f, PropertyType::Residential).await;
        let mut input = lease(p.id, "C-1");
        input.start_date = day(2023, 1, 1);
        input.end_date = day(2024, 1, 1);
        let contract = f.service.create_contract(input).await.unwrap();

        assert!(f.service.expire_contracts(day(2024, 1, 1)).await.unwrap().is_empty());

        let expired = f.service.expire_contracts(day(2026, 10, 16)).await.unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(f.service.get_contract(contract.id).await.unwrap().status, ContractStatus::Expired);
        assert_eq!(f.service.get_property(p.id).await.unwrap().status, PropertyStatus::Vacant);
        assert!(f.service.delete_property(p.id, None).await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_overdue_leaves_future_and_paid_payments() {
        let f = fixture();
        let p = property(&f, PropertyType::Residential).await;
        let contract = f.service.create_contract(lease(p.id, "C-1")).await.unwrap();
        let payments = f.service.generate_schedule(contract.id).await.unwrap();
        f.service.collect_payment(payments[0].id, None).await.unwrap();

        // 2026-01-01 is paid, 04-01 and 07-01 are past due, 10-01 is not yet due
        assert_eq!(f.service.mark_overdue(day(2026, 8, 1)).await.unwrap(), 2);
        let statuses: Vec<PaymentStatus> = f
            .service
            .list_payments(Some(contract.id))
            .await
            .unwrap()
            .iter()
            .map(|p| p.status)
            .collect();
        assert_eq!(
            statuses,
            vec![
                PaymentStatus::Paid,
                PaymentStatus::Overdue,
                PaymentStatus::Overdue,
                PaymentStatus::Pending
            ]
        );

        let due = f.service.due_within(day(2026, 9, 25), 10).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(f.service.mark_overdue(day(2026, 8, 1)).await.unwrap(), 0);
    }
}
