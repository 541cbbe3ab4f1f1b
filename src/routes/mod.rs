mod admin;
mod auth;
mod events;
mod home;
mod photos;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::auth::auth_middleware;
use crate::middleware::role::require_admin;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        home::root,
        home::health,
        auth::login,
        auth::register,
        auth::me,
        photos::list_photos,
        photos::photos_by_event,
        photos::get_photo,
        photos::update_photo,
        photos::delete_photo,
        events::list_events,
        events::get_event,
        events::create_event,
        events::update_event,
        events::delete_event,
        admin::reconcile,
        admin::activate_events,
        admin::fix_covers,
    ),
    components(
        schemas(
            home::HealthResponse,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::RegisterResponse,
            auth::UserResponse,
            photos::UpdatePhotoRequest,
            crate::services::enrichment::PhotoResponse,
            crate::services::enrichment::EnrichedPhoto,
            events::CreateEventRequest,
            events::UpdateEventRequest,
            events::EventResponse,
            crate::entities::event::EventStatus,
            crate::entities::user::Role,
            admin::ReconcileOutcome,
            admin::ActivateResponse,
            crate::services::reconcile::PurgeMode,
            crate::services::reconcile::ScanReport,
            crate::services::reconcile::ReconcileReport,
            crate::services::reconcile::MissingPhoto,
            crate::services::normalize::CoverReport,
            crate::services::normalize::MissingCover,
        )
    ),
    tags(
        (name = "General", description = "Service information"),
        (name = "Authentication", description = "Registration, login and the current account"),
        (name = "Photos", description = "Photos enriched with their event"),
        (name = "Events", description = "Event management"),
        (name = "Maintenance", description = "Reconciliation and event normalization (admin only)")
    ),
    info(
        title = "Photoevents API",
        version = "0.1.0",
        description = "Event photo sharing backend",
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(
                utoipa::openapi::security::Http::new(
                    utoipa::openapi::security::HttpAuthScheme::Bearer
                )
            ),
        );
    }
}

pub fn create_routes(state: AppState) -> Router {
    let swagger_router: Router = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into();

    // Admin-only routes: auth runs first, then the role check
    let admin_routes = Router::new()
        .route("/events", post(events::create_event))
        .route(
            "/events/{id}",
            axum::routing::put(events::update_event).delete(events::delete_event),
        )
        .route("/admin/reconcile", post(admin::reconcile))
        .route("/admin/events/activate", post(admin::activate_events))
        .route("/admin/events/fix-covers", post(admin::fix_covers))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Any authenticated account; per-photo ownership is checked in the handlers
    let user_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route(
            "/photos/{id}",
            axum::routing::put(photos::update_photo).delete(photos::delete_photo),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let public_routes = Router::new()
        .route("/health", get(home::health))
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/photos", get(photos::list_photos))
        .route("/photos/by-event", get(photos::photos_by_event))
        .route("/photos/{id}", get(photos::get_photo))
        .route("/events", get(events::list_events))
        .route("/events/{id}", get(events::get_event));

    let api = Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .nest_service(
            "/uploads/photos",
            ServeDir::new(state.config.uploads_dir.clone()),
        )
        .with_state(state);

    Router::new()
        .merge(swagger_router)
        .route("/", get(home::root))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
