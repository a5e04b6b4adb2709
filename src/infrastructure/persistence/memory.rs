//! Process-local repository implementations.
//!
//! Used by the integration tests and by embedders that do not need
//! durability. All state is lost when the value is dropped.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::{ClickEvent, Link, NewClickEvent, NewLink, Summary};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;

/// Constraint name reported on duplicate codes, matching the SQL schema.
const CODE_CONSTRAINT: &str = "links_code_key";

#[derive(Default)]
struct LinkTable {
    next_id: i64,
    by_code: HashMap<String, Link>,
    code_by_id: HashMap<i64, String>,
}

/// In-memory link store.
///
/// The duplicate check and the insert happen under one write lock, so two
/// concurrent creates with the same code cannot both succeed.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    table: RwLock<LinkTable>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links.
    pub async fn len(&self) -> usize {
        self.table.read().await.by_code.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut table = self.table.write().await;

        if table.by_code.contains_key(&new_link.code) {
            return Err(AppError::conflict(CODE_CONSTRAINT));
        }

        table.next_id += 1;
        let link = Link::new(
            table.next_id,
            new_link.code,
            new_link.long_url,
            Utc::now(),
            new_link.expires_at,
        );

        table.code_by_id.insert(link.id, link.code.clone());
        table.by_code.insert(link.code.clone(), link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.table.read().await.by_code.get(code).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        let table = self.table.read().await;
        Ok(table
            .code_by_id
            .get(&id)
            .and_then(|code| table.by_code.get(code))
            .cloned())
    }

    async fn set_expiration(
        &self,
        code: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Link>, AppError> {
        let mut table = self.table.write().await;
        Ok(table.by_code.get_mut(code).map(|link| {
            link.expires_at = expires_at;
            link.clone()
        }))
    }
}

#[derive(Default)]
struct ClickTable {
    next_id: i64,
    by_link: HashMap<i64, Vec<ClickEvent>>,
}

/// In-memory click event store.
///
/// Does not check that `link_id` refers to an existing link.
#[derive(Default)]
pub struct InMemoryClickRepository {
    table: RwLock<ClickTable>,
}

impl InMemoryClickRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClickRepository for InMemoryClickRepository {
    async fn record(&self, new_click: NewClickEvent) -> Result<ClickEvent, AppError> {
        let mut table = self.table.write().await;

        table.next_id += 1;
        let event = new_click.into_event(table.next_id);
        table
            .by_link
            .entry(event.link_id)
            .or_default()
            .push(event.clone());
        Ok(event)
    }

    async fn list_by_link(&self, link_id: i64) -> Result<Vec<ClickEvent>, AppError> {
        Ok(self
            .table
            .read()
            .await
            .by_link
            .get(&link_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn summarize(&self, link_id: i64) -> Result<Summary, AppError> {
        let events = self.list_by_link(link_id).await?;
        Ok(Summary::from_events(link_id, events))
    }
}
