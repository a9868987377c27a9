use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{
        AddProductRequest, PriceInsight, PriceInsightRequest, ProductInsight, ProductResponse,
        SearchQuery,
    },
    services,
};
use crate::{
    auth::AuthUser,
    error::AppError,
    extract::{AppPath, AppQuery, ValidatedJson},
    response::ApiResponse,
    state::AppState,
};

pub fn products_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(add_product))
        .route("/products/add", post(add_product))
        .route("/products/search", get(search_product))
        .route("/products/insight", get(insight).post(price_insight))
        .route("/products/:id", delete(delete_product))
}

#[instrument(skip(state, payload))]
pub async fn add_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidatedJson(payload): ValidatedJson<AddProductRequest>,
) -> Result<ApiResponse<ProductResponse>, AppError> {
    let product = services::add_product(&state, user_id, payload).await?;
    Ok(ApiResponse::created("Product added successfully", product.into()))
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<ApiResponse<Vec<ProductResponse>>, AppError> {
    let products: Vec<ProductResponse> = services::list_products(&state, user_id)
        .await?
        .into_iter()
        .map(ProductResponse::from)
        .collect();
    let message = if products.is_empty() {
        "No products found"
    } else {
        "Products fetched successfully"
    };
    Ok(ApiResponse::ok(message, products))
}

#[instrument(skip(state))]
pub async fn search_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppQuery(q): AppQuery<SearchQuery>,
) -> Result<ApiResponse<ProductResponse>, AppError> {
    let product = services::find_product(&state, user_id, q.id).await?;
    Ok(ApiResponse::ok("Product fetched successfully", product.into()))
}

#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<ApiResponse<()>, AppError> {
    services::delete_product(&state, user_id, id).await?;
    Ok(ApiResponse::message(StatusCode::OK, "Deleted Successfully"))
}

#[instrument(skip(state))]
pub async fn insight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<ApiResponse<ProductInsight>, AppError> {
    let data = services::insight(&state, user_id).await?;
    Ok(ApiResponse::ok("Product insight fetched successfully", data))
}

#[instrument(skip(state, payload))]
pub async fn price_insight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidatedJson(payload): ValidatedJson<PriceInsightRequest>,
) -> Result<ApiResponse<PriceInsight>, AppError> {
    let data = services::price_insight(&state, user_id, payload.max_price).await?;
    Ok(ApiResponse::ok("Product price insight fetched successfully", data))
}
