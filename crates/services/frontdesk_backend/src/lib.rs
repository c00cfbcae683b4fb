// --- File: crates/services/frontdesk_backend/src/lib.rs ---
pub mod app_state;
pub mod service_factory;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// The full application: every feature router nested under `/api`, plus
/// tracing and CORS middleware.
pub fn build_router(state: &AppState) -> Router {
    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Frontdesk API!" }))
        .merge(frontdesk_gcal::routes(state.booking.clone()))
        .merge(frontdesk_mail::routes(state.contact.clone()))
        .merge(frontdesk_blog::routes(state.blog.clone()))
        .merge(frontdesk_ideas::routes(state.ideas.clone()));

    #[allow(unused_mut)] // only mutated with the openapi feature
    let mut app = Router::new().nest("/api", api_router);

    #[cfg(feature = "openapi")]
    {
        app = app.merge(swagger_ui());
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(feature = "openapi")]
fn swagger_ui() -> utoipa_swagger_ui::SwaggerUi {
    use frontdesk_blog::doc::BlogApiDoc;
    use frontdesk_gcal::doc::BookingApiDoc;
    use frontdesk_ideas::doc::IdeasApiDoc;
    use frontdesk_mail::doc::ContactApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    #[derive(OpenApi)]
    #[openapi(
        info(
            title = "Frontdesk API",
            version = "0.1.0",
            description = "Booking, contact, blog and idea endpoints"
        ),
        servers((url = "/api", description = "Main API Prefix")),
    )]
    struct ApiDoc;

    let mut openapi_doc = ApiDoc::openapi();
    openapi_doc.merge(BookingApiDoc::openapi());
    openapi_doc.merge(ContactApiDoc::openapi());
    openapi_doc.merge(BlogApiDoc::openapi());
    openapi_doc.merge(IdeasApiDoc::openapi());
    tracing::info!("📖 Adding Swagger UI at /api/docs");

    SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc)
}
