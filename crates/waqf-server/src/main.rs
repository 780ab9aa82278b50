use axum::{extract::FromRef, extract::State, middleware, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod auth;
mod cache;
mod config;
mod error;
mod error_log;
mod models;
mod routes;

use adapters::{
    HttpEdgeFunctions, PgArchiveRepository, PgAuditRepository, PgBeneficiaryRepository,
    PgContractRepository, PgDistributionRepository, PgGovernanceRepository, PgKpiReader,
    PgLedgerRepository, PgPropertyRepository, PgRequestRepository, PgTicketRepository,
    PgTreasuryRepository,
};
use application::{
    ArchiveService, AuditTrail, BeneficiaryService, DistributionService, GovernanceService,
    KpiService, LedgerService, Notifier, RentalService, RequestService, StatusSweeper,
    SweepConfig, TicketService, TreasuryService,
};
use auth::Authenticator;
use cache::QueryCache;
use config::ServerConfig;
use error_log::ErrorLog;
use models::DatabaseHealth;
use waqf::EdgeFunctions;

/// Type aliases for application services with concrete repository implementations
pub type AppBeneficiaryService = BeneficiaryService<PgBeneficiaryRepository>;
pub type AppRentalService = RentalService<PgPropertyRepository, PgContractRepository>;
pub type AppLedgerService = LedgerService<PgLedgerRepository>;
pub type AppTreasuryService = TreasuryService<PgTreasuryRepository, PgBeneficiaryRepository>;
pub type AppDistributionService =
    DistributionService<PgDistributionRepository, PgBeneficiaryRepository>;
pub type AppRequestService = RequestService<PgRequestRepository, PgBeneficiaryRepository>;
pub type AppGovernanceService = GovernanceService<PgGovernanceRepository>;
pub type AppArchiveService = ArchiveService<PgArchiveRepository>;
pub type AppTicketService = TicketService<PgTicketRepository>;
pub type AppKpiService = KpiService<PgKpiReader>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub cache: QueryCache,
    pub error_log: Arc<ErrorLog>,
    pub audit: AuditTrail,
    pub notifier: Notifier,
    pub beneficiary_service: Arc<AppBeneficiaryService>,
    pub rental_service: Arc<AppRentalService>,
    pub ledger_service: Arc<AppLedgerService>,
    pub treasury_service: Arc<AppTreasuryService>,
    pub distribution_service: Arc<AppDistributionService>,
    pub request_service: Arc<AppRequestService>,
    pub governance_service: Arc<AppGovernanceService>,
    pub archive_service: Arc<AppArchiveService>,
    pub ticket_service: Arc<AppTicketService>,
    pub kpi_service: Arc<AppKpiService>,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> PgPool {
        state.pool.clone()
    }
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    version: String,
    database: DatabaseHealth,
}

async fn health_check(State(pool): State<PgPool>) -> Json<HealthCheck> {
    let database = routes::system::ping_database(&pool).await;
    let status = if database.ok { "ok" } else { "degraded" };
    Json(HealthCheck {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    })
}

fn edge_functions(config: &ServerConfig) -> Option<Arc<dyn EdgeFunctions>> {
    let Some(url) = config.edge_functions_url.clone() else {
        tracing::warn!("⚠️  No EDGE_FUNCTIONS_URL set - notifications disabled");
        return None;
    };

    match HttpEdgeFunctions::new(
        url,
        config.edge_functions_key.clone(),
        config.notify_signing_secret.clone(),
    ) {
        Ok(client) => {
            tracing::info!("🔔 Edge functions client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!("⚠️  Failed to initialize edge functions: {}", e);
            None
        }
    }
}

/// Wire repositories and services over one pool
fn build_state(pool: PgPool, config: &ServerConfig) -> AppState {
    let cache = QueryCache::new(config.kpi_stale_after());
    let error_log = Arc::new(ErrorLog::new(config.error_log_capacity));
    let audit = AuditTrail::new(Arc::new(PgAuditRepository::new(pool.clone())));
    let notifier = Notifier::new(edge_functions(config));

    // Repositories shared by more than one service
    let beneficiary_repo = Arc::new(PgBeneficiaryRepository::new(pool.clone()));

    let beneficiary_service = Arc::new(BeneficiaryService::new(
        beneficiary_repo.clone(),
        audit.clone(),
    ));
    let rental_service = Arc::new(RentalService::new(
        Arc::new(PgPropertyRepository::new(pool.clone())),
        Arc::new(PgContractRepository::new(pool.clone())),
        audit.clone(),
    ));
    let ledger_service = Arc::new(LedgerService::new(
        Arc::new(PgLedgerRepository::new(pool.clone())),
        audit.clone(),
    ));
    let treasury_service = Arc::new(TreasuryService::new(
        Arc::new(PgTreasuryRepository::new(pool.clone())),
        beneficiary_repo.clone(),
        audit.clone(),
    ));
    let distribution_service = Arc::new(DistributionService::new(
        Arc::new(PgDistributionRepository::new(pool.clone())),
        beneficiary_repo.clone(),
        cache.clone(),
        audit.clone(),
        notifier.clone(),
    ));
    let request_service = Arc::new(RequestService::new(
        Arc::new(PgRequestRepository::new(pool.clone())),
        beneficiary_repo,
        audit.clone(),
        notifier.clone(),
    ));
    let governance_service = Arc::new(GovernanceService::new(
        Arc::new(PgGovernanceRepository::new(pool.clone())),
        audit.clone(),
    ));
    let archive_service = Arc::new(ArchiveService::new(
        Arc::new(PgArchiveRepository::new(pool.clone())),
        audit.clone(),
    ));
    let ticket_service = Arc::new(TicketService::new(Arc::new(PgTicketRepository::new(
        pool.clone(),
    ))));
    let kpi_service = Arc::new(KpiService::new(
        Arc::new(PgKpiReader::new(pool.clone())),
        cache.clone(),
    ));

    AppState {
        pool,
        cache,
        error_log,
        audit,
        notifier,
        beneficiary_service,
        rental_service,
        ledger_service,
        treasury_service,
        distribution_service,
        request_service,
        governance_service,
        archive_service,
        ticket_service,
        kpi_service,
    }
}

fn app(state: AppState, authenticator: Authenticator) -> Router {
    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .merge(routes::beneficiary::router())
        .merge(routes::property::router())
        .merge(routes::contract::router())
        .merge(routes::ledger::router())
        .merge(routes::treasury::router())
        .merge(routes::distribution::router())
        .merge(routes::request::router())
        .merge(routes::governance::router())
        .merge(routes::archive::router())
        .merge(routes::ticket::router())
        .merge(routes::dashboard::router())
        .merge(routes::system::router())
        .layer(middleware::from_fn_with_state(
            authenticator,
            auth::auth_middleware,
        ));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(
            state.error_log.clone(),
            error_log::record_errors,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("🕌 Waqf API initializing...");

    let config = ServerConfig::from_secrets(&secrets);

    let authenticator = Authenticator::new(config.jwt_secret.as_deref());
    if authenticator.is_enabled() {
        tracing::info!("🔐 JWT authentication enabled");
    } else {
        tracing::warn!("⚠️  No WAQF_JWT_SECRET set - authentication disabled");
    }

    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run database migrations: {e}"))?;

    tracing::info!("✅ Database migrations completed");

    let state = build_state(pool, &config);

    // Drop cached queries when their tables change
    adapters::realtime::publish_channel(&state.pool, &config.realtime_channel)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to publish realtime channel: {e}"))?;
    adapters::realtime::spawn_listener(
        state.pool.clone(),
        config.realtime_channel.clone(),
        state.cache.clone(),
    );
    tracing::info!("📡 Change triggers notify on '{}'", config.realtime_channel);

    // Overdue rent, expired contracts and defaulted loans
    StatusSweeper::new(
        state.rental_service.clone(),
        state.treasury_service.clone(),
        SweepConfig::from_secs(config.status_sweep_secs),
    )
    .start();

    let router = app(state, authenticator);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Waqf API ready");

    Ok(router.into())
}
