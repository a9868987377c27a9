use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::{
    dto::{AddProductRequest, PriceInsight, ProductInsight, ProductResponse},
    repo_types::Product,
};
use crate::{auth::services::require_user, error::AppError, state::AppState};

/// Products at or above this rating count as top rated.
pub const TOP_RATING: f64 = 4.0;

// Product endpoints resolve the caller before touching the catalog, but any
// authenticated user may read or write any product.

pub async fn add_product(
    st: &AppState,
    user_id: Uuid,
    req: AddProductRequest,
) -> Result<Product, AppError> {
    require_user(st, user_id).await?;

    let product = Product {
        id: Uuid::new_v4(),
        name: req.name.trim().to_string(),
        description: req.description,
        price: req.price,
        category: req.category.trim().to_string(),
        image: req.image,
        stock: req.stock,
        brand: req.brand.trim().to_string(),
        rating: req.rating,
        created_at: OffsetDateTime::now_utc(),
    };
    st.products.insert_product(&product).await?;
    info!(%user_id, product_id = %product.id, "product added");
    Ok(product)
}

pub async fn list_products(st: &AppState, user_id: Uuid) -> Result<Vec<Product>, AppError> {
    require_user(st, user_id).await?;
    Ok(st.products.list_products().await?)
}

pub async fn find_product(st: &AppState, user_id: Uuid, id: Uuid) -> Result<Product, AppError> {
    require_user(st, user_id).await?;
    st.products
        .find_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product not found {}", id)))
}

pub async fn delete_product(st: &AppState, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
    require_user(st, user_id).await?;
    if !st.products.delete_product(id).await? {
        return Err(AppError::NotFound(format!("Product doesn't exist {}", id)));
    }
    info!(%user_id, product_id = %id, "product deleted");
    Ok(())
}

pub async fn insight(st: &AppState, user_id: Uuid) -> Result<ProductInsight, AppError> {
    require_user(st, user_id).await?;
    Ok(ProductInsight {
        total_products: st.products.count_products().await?,
        max_rating_products: st.products.count_rating_at_least(TOP_RATING).await?,
        max_price: st.products.max_price().await?.unwrap_or(0.0),
        min_price: st.products.min_price().await?.unwrap_or(0.0),
        avg_price: st.products.avg_price().await?,
    })
}

pub async fn price_insight(
    st: &AppState,
    user_id: Uuid,
    max_price: f64,
) -> Result<PriceInsight, AppError> {
    require_user(st, user_id).await?;
    let below = st.products.list_price_below(max_price).await?;
    Ok(PriceInsight {
        total_products: st.products.count_products().await?,
        max_rating_products: st.products.count_rating_at_least(TOP_RATING).await?,
        products_below_price: below.into_iter().map(ProductResponse::from).collect(),
    })
}
