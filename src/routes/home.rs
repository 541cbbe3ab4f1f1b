use axum::{response::Html, Json};
use serde::Serialize;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Welcome page HTML", content_type = "text/html")
    ),
    tag = "General"
)]
pub async fn root() -> Html<&'static str> {
    Html(concat!(
        "<!DOCTYPE html>",
        "<html lang=\"fr\"><head><meta charset=\"UTF-8\"><title>Photoevents</title></head>",
        "<body style=\"font-family: sans-serif; margin: 3rem;\">",
        "<h1>Photoevents</h1>",
        "<ul>",
        "<li><a href=\"/api/photos\">Photos</a></li>",
        "<li><a href=\"/api/events\">Événements</a></li>",
        "<li><a href=\"/swagger-ui/\">Documentation de l'API</a></li>",
        "</ul>",
        "</body></html>",
    ))
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "General"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Photoevents API is running".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
