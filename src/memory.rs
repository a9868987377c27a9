//! In-memory repositories backing the test suite.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::{
        repo::{RefreshTokenRepo, UserRepo},
        repo_types::{RefreshToken, User},
    },
    db::DuplicateKey,
    notes::{repo::NoteRepo, repo_types::Note},
    products::{repo::ProductRepo, repo_types::Product},
};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    refresh_tokens: Mutex<Vec<RefreshToken>>,
    notes: Mutex<Vec<Note>>,
    products: Mutex<Vec<Product>>,
}

impl MemoryStore {
    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn refresh_token_count(&self) -> usize {
        self.refresh_tokens.lock().unwrap().len()
    }

    pub fn refresh_token_hashes(&self) -> Vec<String> {
        self.refresh_tokens
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.token_hash.clone())
            .collect()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> anyhow::Result<bool> {
        Ok(self.users.lock().unwrap().iter().any(|u| u.email == email))
    }

    async fn create(&self, user: &User) -> anyhow::Result<()> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(DuplicateKey("users.email").into());
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> anyhow::Result<()> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email && u.id != user.id) {
            return Err(DuplicateKey("users.email").into());
        }
        if let Some(existing) = users.iter_mut().find(|u| u.id == user.id) {
            existing.name = user.name.clone();
            existing.email = user.email.clone();
            existing.password_hash = user.password_hash.clone();
            existing.phone = user.phone.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenRepo for MemoryStore {
    async fn insert(&self, token: &RefreshToken) -> anyhow::Result<()> {
        self.refresh_tokens.lock().unwrap().push(token.clone());
        Ok(())
    }

    async fn rotate(
        &self,
        user_id: Uuid,
        old_hash: &str,
        replacement: &RefreshToken,
    ) -> anyhow::Result<bool> {
        let now = OffsetDateTime::now_utc();
        let mut tokens = self.refresh_tokens.lock().unwrap();
        let pos = tokens.iter().position(|t| {
            t.user_id == user_id && t.token_hash == old_hash && t.expires_at > now
        });
        Ok(match pos {
            Some(i) => {
                tokens.remove(i);
                tokens.push(replacement.clone());
                true
            }
            None => false,
        })
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> anyhow::Result<u64> {
        let mut tokens = self.refresh_tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|t| t.user_id != user_id);
        Ok((before - tokens.len()) as u64)
    }

    async fn delete_expired(&self, now: OffsetDateTime) -> anyhow::Result<u64> {
        let mut tokens = self.refresh_tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|t| t.expires_at > now);
        Ok((before - tokens.len()) as u64)
    }
}

#[async_trait]
impl NoteRepo for MemoryStore {
    async fn find_note(&self, id: Uuid) -> anyhow::Result<Option<Note>> {
        Ok(self.notes.lock().unwrap().iter().find(|n| n.id == id).cloned())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> anyhow::Result<Vec<Note>> {
        let mut notes: Vec<Note> = self
            .notes
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.owner_id == owner_id)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notes)
    }

    async fn insert_note(&self, note: &Note) -> anyhow::Result<()> {
        let mut notes = self.notes.lock().unwrap();
        if notes.iter().any(|n| n.id == note.id) {
            return Err(DuplicateKey("notes.id").into());
        }
        notes.push(note.clone());
        Ok(())
    }

    async fn update_note(&self, note: &Note) -> anyhow::Result<()> {
        if let Some(existing) = self.notes.lock().unwrap().iter_mut().find(|n| n.id == note.id) {
            existing.title = note.title.clone();
            existing.content = note.content.clone();
            existing.color = note.color;
        }
        Ok(())
    }

    async fn delete_note(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut notes = self.notes.lock().unwrap();
        let before = notes.len();
        notes.retain(|n| n.id != id);
        Ok(notes.len() < before)
    }
}

#[async_trait]
impl ProductRepo for MemoryStore {
    async fn insert_product(&self, product: &Product) -> anyhow::Result<()> {
        self.products.lock().unwrap().push(product.clone());
        Ok(())
    }

    async fn list_products(&self) -> anyhow::Result<Vec<Product>> {
        let mut products = self.products.lock().unwrap().clone();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    async fn find_product(&self, id: Uuid) -> anyhow::Result<Option<Product>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn delete_product(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }

    async fn count_products(&self) -> anyhow::Result<i64> {
        Ok(self.products.lock().unwrap().len() as i64)
    }

    async fn count_rating_at_least(&self, rating: f64) -> anyhow::Result<i64> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.rating >= rating)
            .count() as i64)
    }

    async fn max_price(&self) -> anyhow::Result<Option<f64>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.price)
            .reduce(f64::max))
    }

    async fn min_price(&self) -> anyhow::Result<Option<f64>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.price)
            .reduce(f64::min))
    }

    async fn avg_price(&self) -> anyhow::Result<Option<f64>> {
        let products = self.products.lock().unwrap();
        if products.is_empty() {
            return Ok(None);
        }
        let sum: f64 = products.iter().map(|p| p.price).sum();
        Ok(Some(sum / products.len() as f64))
    }

    async fn list_price_below(&self, price: f64) -> anyhow::Result<Vec<Product>> {
        let mut products: Vec<Product> = self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.price < price)
            .cloned()
            .collect();
        products.sort_by(|a, b| a.price.total_cmp(&b.price));
        Ok(products)
    }
}
