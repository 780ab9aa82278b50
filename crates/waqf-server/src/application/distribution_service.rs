//! Distribution Application Service
//!
//! Settings are one record edited as-is. Allocation is delegated to the
//! `distribute_revenue` database procedure; approval notifies every
//! beneficiary with a share, addressed to their linked user when there is one.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use waqf::domain::services::distribution::{split_preview, SplitPreview};
use waqf::domain::{DistributionSettingsUpdate, DistributionShare, NewDistribution};
use waqf::{
    ApprovalAction, BeneficiaryRepository, Distribution, DistributionRepository,
    DistributionSettings, DomainError, Notification, Permission,
};

use super::{AuditTrail, Notifier};
use crate::auth::AuthUser;
use crate::cache::QueryCache;

const SETTINGS_CACHE_KEY: &str = "distribution:settings";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DistributionDetail {
    pub distribution: Distribution,
    pub shares: Vec<DistributionShare>,
}

pub struct DistributionService<D: DistributionRepository, B: BeneficiaryRepository> {
    repo: Arc<D>,
    beneficiaries: Arc<B>,
    cache: QueryCache,
    audit: AuditTrail,
    notifier: Notifier,
}

impl<D: DistributionRepository, B: BeneficiaryRepository> DistributionService<D, B> {
    pub fn new(
        repo: Arc<D>,
        beneficiaries: Arc<B>,
        cache: QueryCache,
        audit: AuditTrail,
        notifier: Notifier,
    ) -> Self {
        Self {
            repo,
            beneficiaries,
            cache,
            audit,
            notifier,
        }
    }

    /// Stored settings, or the defaults when none were saved yet
    pub async fn settings(&self) -> Result<DistributionSettings, DomainError> {
        if let Some(settings) = self.cache.get::<DistributionSettings>(SETTINGS_CACHE_KEY) {
            return Ok(settings);
        }
        let settings = self.repo.find_settings().await?.unwrap_or_default();
        self.cache
            .put(SETTINGS_CACHE_KEY, &["distribution_settings"], &settings);
        Ok(settings)
    }

    pub async fn update_settings(
        &self,
        update: DistributionSettingsUpdate,
        actor: Option<Uuid>,
    ) -> Result<DistributionSettings, DomainError> {
        let current = self.settings().await?;
        let saved = self.repo.save_settings(&current.apply(update, actor)).await?;
        self.cache.invalidate(SETTINGS_CACHE_KEY);

        if saved.total_percentage() != Decimal::ONE_HUNDRED {
            tracing::warn!("Distribution shares total {}%", saved.total_percentage());
        }
        self.audit
            .record(actor, "update", "distribution_settings", None, json!(saved))
            .await;
        Ok(saved)
    }

    pub async fn preview(&self, total: Decimal) -> Result<SplitPreview, DomainError> {
        if total <= Decimal::ZERO {
            return Err(DomainError::validation("total must be positive"));
        }
        Ok(split_preview(total, &self.settings().await?))
    }

    pub async fn list(&self) -> Result<Vec<Distribution>, DomainError> {
        self.repo.find_all().await
    }

    async fn get(&self, id: Uuid) -> Result<Distribution, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Distribution", id))
    }

    pub async fn detail(&self, id: Uuid) -> Result<DistributionDetail, DomainError> {
        let distribution = self.get(id).await?;
        let shares = self.repo.find_shares(id).await?;
        Ok(DistributionDetail {
            distribution,
            shares,
        })
    }

    /// Allocate a new draft distribution across active beneficiaries
    pub async fn create(
        &self,
        input: NewDistribution,
        actor: Option<Uuid>,
    ) -> Result<DistributionDetail, DomainError> {
        input.validate()?;
        let distribution = self.repo.allocate(&input, actor).await?;
        tracing::info!(
            "Allocated distribution {} ({}) across {} beneficiaries",
            distribution.period_label,
            distribution.total_amount,
            distribution.beneficiaries_count
        );
        self.audit
            .record(
                actor,
                "create",
                "distribution",
                Some(distribution.id),
                json!({ "period": distribution.period_label, "total": distribution.total_amount }),
            )
            .await;
        self.detail(distribution.id).await
    }

    pub async fn act(
        &self,
        id: Uuid,
        action: ApprovalAction,
        user: &AuthUser,
    ) -> Result<Distribution, DomainError> {
        // Submitting is done by whoever manages distributions
        let allowed = match action.required_permission() {
            None => user.can(Permission::ManageDistributions),
            Some(_) => action.allowed_for(user.role),
        };
        if !allowed {
            return Err(DomainError::forbidden(format!(
                "role {} cannot {action} distributions",
                user.role
            )));
        }
        let current = self.get(id).await?;
        let from = current.status;
        let saved = self.repo.save(&current.apply_action(action)?).await?;

        tracing::info!("Distribution {} {} -> {}", saved.period_label, from, saved.status);
        self.audit
            .record(
                user.actor(),
                action.as_str(),
                "distribution",
                Some(id),
                json!({ "from": from, "to": saved.status }),
            )
            .await;

        if action == ApprovalAction::Approve {
            let notifications = self.approval_notifications(&saved).await?;
            self.notifier.send_all(notifications);
        }
        Ok(saved)
    }

    /// One notification per share
    async fn approval_notifications(
        &self,
        distribution: &Distribution,
    ) -> Result<Vec<Notification>, DomainError> {
        let shares = self.repo.find_shares(distribution.id).await?;
        let mut notifications = Vec::with_capacity(shares.len());
        for share in shares {
            let user_id = self
                .beneficiaries
                .find_by_id(share.beneficiary_id)
                .await?
                .and_then(|b| b.user_id);
            notifications.push(Notification {
                user_id,
                beneficiary_id: Some(share.beneficiary_id),
                title: "اعتماد توزيع الغلة".to_string(),
                message: format!(
                    "تم اعتماد توزيع {} بنصيب {} ريال",
                    distribution.period_label, share.amount
                ),
                kind: "distribution_approved".to_string(),
            });
        }
        Ok(notifications)
    }

    pub async fn shares_for_beneficiary(
        &self,
        beneficiary_id: Uuid,
    ) -> Result<Vec<DistributionShare>, DomainError> {
        self.repo.find_shares_by_beneficiary(beneficiary_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{
        beneficiary, MemoryAudit, MemoryBeneficiaries, MemoryDistributions, RecordingFunctions,
    };
    use chrono::NaiveDate;
    use std::time::Duration;
    use waqf::{ApprovalStatus, UserRole};

    struct Fixture {
        service: DistributionService<MemoryDistributions, MemoryBeneficiaries>,
        repo: Arc<MemoryDistributions>,
        functions: Arc<RecordingFunctions>,
        linked_user: Uuid,
    }

    fn user(role: UserRole) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: None,
            role,
        }
    }

    /// Two beneficiaries with shares; only the first can sign in
    fn fixture() -> Fixture {
        let linked_user = Uuid::new_v4();
        let mut signed_in = beneficiary();
        signed_in.user_id = Some(linked_user);
        let offline = beneficiary();

        let beneficiaries = Arc::new(MemoryBeneficiaries::default());
        beneficiaries.insert(signed_in.clone());
        beneficiaries.insert(offline.clone());

        let repo = Arc::new(MemoryDistributions::with_recipients(vec![
            signed_in.id,
            offline.id,
        ]));
        let functions = Arc::new(RecordingFunctions::default());
        let service = DistributionService::new(
            repo.clone(),
            beneficiaries,
            QueryCache::new(Duration::from_secs(60)),
            AuditTrail::new(Arc::new(MemoryAudit::default())),
            Notifier::new(Some(functions.clone())),
        );
        Fixture {
            service,
            repo,
            functions,
            linked_user,
        }
    }

    fn quarter() -> NewDistribution {
        NewDistribution {
            period_label: "2026-Q3".to_string(),
            distribution_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            total_amount: Decimal::from(50000),
        }
    }

    #[tokio::test]
    async fn test_settings_cached_until_updated() {
        let f = fixture();
        let nazer = user(UserRole::Nazer);

        assert_eq!(f.service.settings().await.unwrap().reserve_percentage, Decimal::from(10));
        f.service.settings().await.unwrap();
        assert_eq!(f.repo.settings_reads(), 1);

        let update = DistributionSettingsUpdate {
            reserve_percentage: Some(Decimal::from(15)),
            beneficiaries_percentage: Some(Decimal::from(70)),
            ..Default::default()
        };
        f.service.update_settings(update, Some(nazer.id)).await.unwrap();

        let settings = f.service.settings().await.unwrap();
        assert_eq!(settings.reserve_percentage, Decimal::from(15));
        assert_eq!(settings.updated_by, Some(nazer.id));
        assert_eq!(f.repo.settings_reads(), 2);
    }

    #[tokio::test]
    async fn test_submit_needs_manage_distributions() {
        let f = fixture();
        let detail = f.service.create(quarter(), None).await.unwrap();
        let id = detail.distribution.id;

        for role in [UserRole::Beneficiary, UserRole::Cashier, UserRole::Accountant] {
            let result = f.service.act(id, ApprovalAction::Submit, &user(role)).await;
            assert!(matches!(result, Err(DomainError::Forbidden(_))), "{role}");
        }

        let submitted = f
            .service
            .act(id, ApprovalAction::Submit, &user(UserRole::Nazer))
            .await
            .unwrap();
        assert_eq!(submitted.status, ApprovalStatus::Pending);
    }

    #[tokio::test]
    async fn test_approval_notifies_each_share() {
        let f = fixture();
        let nazer = user(UserRole::Nazer);
        let detail = f.service.create(quarter(), None).await.unwrap();
        assert_eq!(detail.shares.len(), 2);
        let id = detail.distribution.id;

        f.service.act(id, ApprovalAction::Submit, &nazer).await.unwrap();
        assert!(f.functions.calls().is_empty());
        f.service.act(id, ApprovalAction::Approve, &nazer).await.unwrap();

        // Delivery runs on a spawned task
        for _ in 0..100 {
            if f.functions.calls().len() == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(f.functions.calls(), vec!["send-notification", "send-notification"]);

        let mut user_ids: Vec<Option<Uuid>> = f
            .functions
            .bodies()
            .iter()
            .map(|b| b["user_id"].as_str().and_then(|s| Uuid::parse_str(s).ok()))
            .collect();
        user_ids.sort();
        assert_eq!(user_ids, vec![None, Some(f.linked_user)]);
    }
}
