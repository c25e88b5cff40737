//! # API REST
//!
//! REST API implementation for the ward monitor.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - API key checks on every route except health and the docs
//!
//! Uses `api-shared` for wire types and `ward-core` for the ward service.

#![warn(rust_2018_idioms)]

mod convert;
mod handlers;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{validate_api_key, API_KEY_HEADER};
use ward_core::{
    config::{resolve_bed_topology, unscored_policy_from_env_value},
    constants::{API_KEY_ENV, BED_TOPOLOGY_ENV, UNSCORED_OCCUPANT_STATUS_ENV},
    BedTopology, CoreConfig, InMemoryWardStore, WardService,
};

/// Application state shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    service: WardService,
    api_key: Arc<str>,
}

impl AppState {
    pub fn new(service: WardService, api_key: impl Into<Arc<str>>) -> Self {
        Self {
            service,
            api_key: api_key.into(),
        }
    }

    /// Builds the state from environment variables.
    ///
    /// # Environment Variables
    /// - `WARD_API_KEY`: key expected in the `x-api-key` header (required)
    /// - `WARD_BED_TOPOLOGY`: YAML file listing the beds to seed (optional)
    /// - `WARD_UNSCORED_OCCUPANT_STATUS`: `stable` (default) or `available`
    ///
    /// # Errors
    /// Returns an error if the API key is missing, the policy value is unknown, or the topology
    /// file cannot be read or parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("{API_KEY_ENV} must be set"))?;

        let policy =
            unscored_policy_from_env_value(std::env::var(UNSCORED_OCCUPANT_STATUS_ENV).ok())?;
        let topology_path =
            resolve_bed_topology(std::env::var(BED_TOPOLOGY_ENV).ok().map(PathBuf::from))?;

        let store = match &topology_path {
            Some(path) => {
                let topology = BedTopology::load(path)?;
                tracing::info!(
                    "-- Seeding {} beds from {}",
                    topology.beds().len(),
                    path.display()
                );
                InMemoryWardStore::from_topology(&topology)?
            }
            None => {
                tracing::warn!("{BED_TOPOLOGY_ENV} not set; starting with no beds");
                InMemoryWardStore::new()
            }
        };

        let cfg = Arc::new(CoreConfig::new(policy, topology_path));
        Ok(Self::new(WardService::new(cfg, Arc::new(store)), api_key))
    }

    pub fn service(&self) -> &WardService {
        &self.service
    }
}

struct ApiKeyAddon;

impl Modify for ApiKeyAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(API_KEY_HEADER))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::dashboard,
        handlers::list_beds,
        handlers::create_bed,
        handlers::update_bed_status,
        handlers::admit_patient,
        handlers::get_patient,
        handlers::update_patient,
        handlers::discharge_patient,
        handlers::add_problem,
        handlers::resolve_problem,
        handlers::add_pending_task,
        handlers::complete_pending_task,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::MessageRes,
        api_shared::BedRes,
        api_shared::BedRowRes,
        api_shared::RosterPatientRes,
        api_shared::PatientViewRes,
        api_shared::PatientDetailRes,
        api_shared::PatientRes,
        api_shared::ProblemRes,
        api_shared::PendingTaskRes,
        api_shared::CreateBedReq,
        api_shared::UpdateBedStatusReq,
        api_shared::AdmitPatientReq,
        api_shared::UpdatePatientReq,
        api_shared::NewProblemReq,
        api_shared::NewPendingTaskReq,
    )),
    modifiers(&ApiKeyAddon),
    security(("api_key" = []))
)]
pub struct ApiDoc;

/// Builds the REST router.
///
/// `/health`, `/swagger-ui` and `/api-docs/openapi.json` are open; every other route requires
/// the `x-api-key` header.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/dashboard", get(handlers::dashboard))
        .route("/beds", get(handlers::list_beds).post(handlers::create_bed))
        .route("/beds/:id/status", patch(handlers::update_bed_status))
        .route("/patients", post(handlers::admit_patient))
        .route(
            "/patients/:id",
            get(handlers::get_patient).patch(handlers::update_patient),
        )
        .route("/patients/:id/discharge", post(handlers::discharge_patient))
        .route("/patients/:id/problems", post(handlers::add_problem))
        .route(
            "/patients/problems/:id/resolve",
            patch(handlers::resolve_problem),
        )
        .route("/patients/:id/pending", post(handlers::add_pending_task))
        .route(
            "/patients/pending/:id/complete",
            patch(handlers::complete_pending_task),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if let Err(e) = validate_api_key(provided, &state.api_key) {
        tracing::debug!(path = %request.uri().path(), "rejected request: {e}");
        return Err((StatusCode::UNAUTHORIZED, "Unauthorized"));
    }

    Ok(next.run(request).await)
}
