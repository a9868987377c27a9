use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::Product;
use crate::db::PgRepo;

#[async_trait]
pub trait ProductRepo: Send + Sync {
    async fn insert_product(&self, product: &Product) -> anyhow::Result<()>;
    async fn list_products(&self) -> anyhow::Result<Vec<Product>>;
    async fn find_product(&self, id: Uuid) -> anyhow::Result<Option<Product>>;
    async fn delete_product(&self, id: Uuid) -> anyhow::Result<bool>;

    async fn count_products(&self) -> anyhow::Result<i64>;
    async fn count_rating_at_least(&self, rating: f64) -> anyhow::Result<i64>;
    async fn max_price(&self) -> anyhow::Result<Option<f64>>;
    async fn min_price(&self) -> anyhow::Result<Option<f64>>;
    /// Store-side average over every product's price; `None` when empty.
    async fn avg_price(&self) -> anyhow::Result<Option<f64>>;
    async fn list_price_below(&self, price: f64) -> anyhow::Result<Vec<Product>>;
}

#[async_trait]
impl ProductRepo for PgRepo {
    async fn insert_product(&self, p: &Product) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, description, price, category, image, stock, brand, rating, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(p.id)
        .bind(&p.name)
        .bind(&p.description)
        .bind(p.price)
        .bind(&p.category)
        .bind(&p.image)
        .bind(p.stock)
        .bind(&p.brand)
        .bind(p.rating)
        .bind(p.created_at)
        .execute(&self.pool)
        .await
        .context("insert product")?;
        Ok(())
    }

    async fn list_products(&self) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, category, image, stock, brand, rating, created_at
            FROM products
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("list products")?;
        Ok(rows)
    }

    async fn find_product(&self, id: Uuid) -> anyhow::Result<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, category, image, stock, brand, rating, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find product")?;
        Ok(row)
    }

    async fn delete_product(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM products WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete product")?;
        Ok(res.rows_affected() > 0)
    }

    async fn count_products(&self) -> anyhow::Result<i64> {
        let n = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM products"#)
            .fetch_one(&self.pool)
            .await
            .context("count products")?;
        Ok(n)
    }

    async fn count_rating_at_least(&self, rating: f64) -> anyhow::Result<i64> {
        let n = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM products WHERE rating >= $1"#)
            .bind(rating)
            .fetch_one(&self.pool)
            .await
            .context("count products by rating")?;
        Ok(n)
    }

    async fn max_price(&self) -> anyhow::Result<Option<f64>> {
        let v = sqlx::query_scalar::<_, f64>(
            r#"SELECT price FROM products ORDER BY price DESC LIMIT 1"#,
        )
        .fetch_optional(&self.pool)
        .await
        .context("max product price")?;
        Ok(v)
    }

    async fn min_price(&self) -> anyhow::Result<Option<f64>> {
        let v = sqlx::query_scalar::<_, f64>(
            r#"SELECT price FROM products ORDER BY price ASC LIMIT 1"#,
        )
        .fetch_optional(&self.pool)
        .await
        .context("min product price")?;
        Ok(v)
    }

    async fn avg_price(&self) -> anyhow::Result<Option<f64>> {
        let v = sqlx::query_scalar::<_, Option<f64>>(r#"SELECT AVG(price) FROM products"#)
            .fetch_one(&self.pool)
            .await
            .context("average product price")?;
        Ok(v)
    }

    async fn list_price_below(&self, price: f64) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, category, image, stock, brand, rating, created_at
            FROM products
            WHERE price < $1
            ORDER BY price ASC
            "#,
        )
        .bind(price)
        .fetch_all(&self.pool)
        .await
        .context("list products below price")?;
        Ok(rows)
    }
}
