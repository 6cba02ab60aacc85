//! Item CRUD routes under the `/api` prefix.
//!
//! All routes require a bearer token and record themselves in the
//! request log on success.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};

use catalog_store::{ItemRow, NewItem};

use crate::auth::AuthenticatedUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// An item as returned to clients.
#[derive(Debug, Serialize)]
pub struct Item {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}

/// Request body for item create and update.
///
/// Absent fields are stored as NULL; there is no presence validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemPayload {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<ItemPayload> for NewItem {
    fn from(payload: ItemPayload) -> Self {
        Self {
            name: payload.name,
            description: payload.description,
        }
    }
}

/// Response for POST /api/items/.
#[derive(Debug, Serialize)]
pub struct CreateItemResponse {
    #[serde(rename = "itemId")]
    pub item_id: i64,
    pub message: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/items/ - List all items ordered by id.
async fn list_items(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> ApiResult<Json<Vec<Item>>> {
    let rows = state.store().list_items().await?;

    state.request_log().record("GET", "/api/items/", None).await;

    Ok(Json(rows.into_iter().map(Item::from).collect()))
}

/// GET /api/items/{id}/ - Get a single item.
///
/// Logged on success only; a missing item returns 404 unlogged.
async fn get_item(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Item>> {
    let row = state
        .store()
        .get_item(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    state
        .request_log()
        .record("GET", &format!("/api/items/{id}/"), None)
        .await;

    Ok(Json(row.into()))
}

/// POST /api/items/ - Create an item; the store assigns the id.
async fn create_item(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<ItemPayload>,
) -> ApiResult<(StatusCode, Json<CreateItemResponse>)> {
    let item_id = state
        .store()
        .insert_item(&payload.clone().into())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create item");
            ApiError::Store(e)
        })?;

    state
        .request_log()
        .record("POST", "/api/items/", serde_json::to_value(&payload).ok())
        .await;

    tracing::info!(item_id, "Item created");

    Ok((
        StatusCode::CREATED,
        Json(CreateItemResponse {
            item_id,
            message: "Item added successfully".to_string(),
        }),
    ))
}

/// PUT /api/items/{id} - Replace an item's name and description.
///
/// An unknown id affects zero rows and still reports success.
async fn update_item(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<ItemPayload>,
) -> ApiResult<&'static str> {
    state
        .store()
        .update_item(id, &payload.clone().into())
        .await?;

    state
        .request_log()
        .record(
            "PUT",
            &format!("/api/items/{id}/"),
            serde_json::to_value(&payload).ok(),
        )
        .await;

    tracing::info!(item_id = id, "Item updated");

    Ok("Item Updated Successfully!")
}

/// DELETE /api/items/{id} - Delete an item.
///
/// An unknown id is likewise a silent no-op success.
async fn delete_item(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> ApiResult<&'static str> {
    state.store().delete_item(id).await?;

    state
        .request_log()
        .record("DELETE", &format!("/api/items/{id}/"), None)
        .await;

    tracing::info!(item_id = id, "Item deleted");

    Ok("Item Deleted Successfully")
}

/// Build item routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/items/", get(list_items).post(create_item))
        .route("/api/items/{id}/", get(get_item))
        .route("/api/items/{id}", put(update_item).delete(delete_item))
}
