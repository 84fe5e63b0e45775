//! API service routes
//!
//! Each resource gets the same five routes under `/api/<resource>`, served
//! by the generic handlers below. Inventories add the photo patch route.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use serde_json::json;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{
    error::{ApiError, ApiResult},
    models::{EmptyList, Entity, Inventory},
    repositories::Store,
    services::CrudService,
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let inventories = resource_routes(state.inventories.clone()).merge(
        Router::new()
            .route(
                &format!("/api/{}/:id/photo", Inventory::RESOURCE),
                patch(update_inventory_photo),
            )
            .with_state(state.inventories.clone()),
    );

    Router::new()
        .route("/health", get(health_check))
        .with_state(state.clone())
        .merge(resource_routes(state.apartments.clone()))
        .merge(resource_routes(state.users.clone()))
        .merge(resource_routes(state.bookings.clone()))
        .merge(resource_routes(state.payments.clone()))
        .merge(resource_routes(state.installment_plans.clone()))
        .merge(resource_routes(state.feedbacks.clone()))
        .merge(inventories)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// The uniform CRUD routes for one resource
fn resource_routes<E: Entity>(service: CrudService<E>) -> Router {
    let collection = format!("/api/{}", E::RESOURCE);
    let item = format!("{}/:id", collection);

    Router::new()
        .route(&collection, get(list::<E>).post(create::<E>))
        .route(&item, get(get_one::<E>).put(update::<E>).delete(remove::<E>))
        .with_state(service)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (backend, healthy) = match &state.store {
        Store::Postgres(pool) => (
            "postgres",
            common::database::health_check(pool).await.unwrap_or(false),
        ),
        Store::Memory(_) => ("memory", true),
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if healthy { "ok" } else { "unavailable" },
            "service": "apartment-api",
            "store": backend
        })),
    )
}

/// List every row of a resource
async fn list<E: Entity>(State(service): State<CrudService<E>>) -> ApiResult<Response> {
    let items = service.list_all().await?;

    if items.is_empty() && E::POLICY.empty_list == EmptyList::NoContent {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(items).into_response())
}

/// Get a row by ID
async fn get_one<E: Entity>(
    State(service): State<CrudService<E>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<E>> {
    Ok(Json(service.get_by_id(id).await?))
}

/// Create a row; a JSON `null` body reaches the service as `None`
async fn create<E: Entity>(
    State(service): State<CrudService<E>>,
    Json(payload): Json<Option<E>>,
) -> ApiResult<impl IntoResponse> {
    let created = service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace a row
async fn update<E: Entity>(
    State(service): State<CrudService<E>>,
    Path(id): Path<i64>,
    Json(payload): Json<E>,
) -> ApiResult<Json<E>> {
    Ok(Json(service.update(id, payload).await?))
}

/// Delete a row
async fn remove<E: Entity>(
    State(service): State<CrudService<E>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace the photo URL of an inventory row.
///
/// The body is the URL itself, either raw or as a JSON string literal.
async fn update_inventory_photo(
    State(service): State<CrudService<Inventory>>,
    Path(id): Path<i64>,
    body: String,
) -> ApiResult<Json<Inventory>> {
    let photo_url = photo_url_from_body(&body)?;
    Ok(Json(service.update_photo_url(id, photo_url).await?))
}

/// A JSON string literal is unquoted; any other body is stored as sent
fn photo_url_from_body(body: &str) -> ApiResult<String> {
    if body.trim().is_empty() {
        return Err(ApiError::BadRequest("Photo URL body is required".to_string()));
    }
    match serde_json::from_str::<String>(body) {
        Ok(unquoted) => Ok(unquoted),
        Err(_) => Ok(body.to_string()),
    }
}
