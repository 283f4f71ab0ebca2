//! Product handlers.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{get, patch},
    Router,
};

use common::AppResult;
use domain::{ProductPatch, ProductResponse, StatusChangeRequest, WorkflowEntry};

use crate::extractors::JsonBody;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Create product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/:id", get(get_product).patch(update_product))
        .route("/:id/status", patch(change_status))
        .route("/:id/history", get(product_history))
}

/// List products
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All products", body = Vec<ProductResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_products(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProductResponse>>> {
    let products = state.products.list_products(current_user.principal()).await?;
    Ok(Json(products))
}

/// Get product by ID
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product with country settings", body = ProductResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ProductResponse>> {
    let product = state.products.get_product(current_user.principal(), id).await?;
    Ok(Json(product))
}

/// Update product fields and reconcile its country settings
#[utoipa::path(
    patch,
    path = "/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed to modify this product"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "SKU already in use")
    )
)]
pub async fn update_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(patch): JsonBody<ProductPatch>,
) -> AppResult<Json<ProductResponse>> {
    let product = state
        .products
        .update_product(current_user.principal(), id, patch)
        .await?;
    Ok(Json(product))
}

/// Change the product status
#[utoipa::path(
    patch,
    path = "/products/{id}/status",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = StatusChangeRequest,
    responses(
        (status = 200, description = "Status applied", body = ProductResponse),
        (status = 400, description = "Transition not allowed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not allowed to modify this product"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn change_status(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(request): JsonBody<StatusChangeRequest>,
) -> AppResult<Json<ProductResponse>> {
    let product = state
        .products
        .apply_status_change(current_user.principal(), id, request)
        .await?;
    Ok(Json(product))
}

/// Workflow history, most recent first
#[utoipa::path(
    get,
    path = "/products/{id}/history",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Realized status transitions", body = Vec<WorkflowEntry>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn product_history(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<WorkflowEntry>>> {
    let entries = state.products.history(current_user.principal(), id).await?;
    Ok(Json(entries))
}
