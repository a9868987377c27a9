use anyhow::Context;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{RefreshToken, User};
use crate::db::{map_write_err, PgRepo};

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn exists_by_email(&self, email: &str) -> anyhow::Result<bool>;
    /// Fails with `DuplicateKey` when the email is taken.
    async fn create(&self, user: &User) -> anyhow::Result<()>;
    /// Saves name, email, phone and password hash. Fails with `DuplicateKey`
    /// when the new email is taken.
    async fn update(&self, user: &User) -> anyhow::Result<()>;
}

#[async_trait]
pub trait RefreshTokenRepo: Send + Sync {
    async fn insert(&self, token: &RefreshToken) -> anyhow::Result<()>;
    /// Deletes the live token matching `(user_id, old_hash)` and stores
    /// `replacement` atomically. Returns `false` and stores nothing when no
    /// live token matched, so a token can be rotated once.
    async fn rotate(
        &self,
        user_id: Uuid,
        old_hash: &str,
        replacement: &RefreshToken,
    ) -> anyhow::Result<bool>;
    async fn delete_all_for_user(&self, user_id: Uuid) -> anyhow::Result<u64>;
    async fn delete_expired(&self, now: OffsetDateTime) -> anyhow::Result<u64>;
}

#[async_trait]
impl UserRepo for PgRepo {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, phone, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, phone, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn exists_by_email(&self, email: &str) -> anyhow::Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)"#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .context("check email exists")?;
        Ok(exists)
    }

    async fn create(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, phone, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_err(e, "users.email", "insert user"))?;
        Ok(())
    }

    async fn update(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
               SET name = $2, email = $3, password_hash = $4, phone = $5
             WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_err(e, "users.email", "update user"))?;
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenRepo for PgRepo {
    async fn insert(&self, token: &RefreshToken) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (id, user_id, token_hash, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(token.id)
        .bind(token.user_id)
        .bind(&token.token_hash)
        .bind(token.created_at)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await
        .context("insert refresh token")?;
        Ok(())
    }

    async fn rotate(
        &self,
        user_id: Uuid,
        old_hash: &str,
        replacement: &RefreshToken,
    ) -> anyhow::Result<bool> {
        let mut tx = self.pool.begin().await.context("begin refresh rotation")?;

        let deleted = sqlx::query_scalar::<_, Uuid>(
            r#"
            DELETE FROM refresh_tokens
             WHERE id = (
                SELECT id FROM refresh_tokens
                 WHERE user_id = $1 AND token_hash = $2 AND expires_at > now()
                 LIMIT 1
                 FOR UPDATE SKIP LOCKED
             )
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(old_hash)
        .fetch_optional(&mut *tx)
        .await
        .context("consume refresh token")?;

        if deleted.is_none() {
            tx.rollback().await.context("rollback refresh rotation")?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (id, user_id, token_hash, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(replacement.id)
        .bind(replacement.user_id)
        .bind(&replacement.token_hash)
        .bind(replacement.created_at)
        .bind(replacement.expires_at)
        .execute(&mut *tx)
        .await
        .context("insert rotated refresh token")?;

        tx.commit().await.context("commit refresh rotation")?;
        Ok(true)
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> anyhow::Result<u64> {
        let res = sqlx::query(r#"DELETE FROM refresh_tokens WHERE user_id = $1"#)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("delete refresh tokens for user")?;
        Ok(res.rows_affected())
    }

    async fn delete_expired(&self, now: OffsetDateTime) -> anyhow::Result<u64> {
        let res = sqlx::query(r#"DELETE FROM refresh_tokens WHERE expires_at <= $1"#)
            .bind(now)
            .execute(&self.pool)
            .await
            .context("delete expired refresh tokens")?;
        Ok(res.rows_affected())
    }
}
