//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::entities::{
    ClickEvent, CountryCount, DeviceType, NewClickEvent, RECENT_EVENTS, Summary, TOP_COUNTRIES,
};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// PostgreSQL repository for click events, stored in `link_clicks`.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

const CLICK_COLUMNS: &str = "id, link_id, client_address, user_agent, device_type, country, \
     country_code, city, latitude, longitude, timezone, occurred_at";

#[derive(FromRow)]
struct ClickRow {
    id: i64,
    link_id: i64,
    client_address: String,
    user_agent: String,
    device_type: String,
    country: Option<String>,
    country_code: Option<String>,
    city: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    timezone: Option<String>,
    occurred_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct DeviceCountRow {
    device_type: String,
    count: i64,
}

#[derive(FromRow)]
struct CountryCountRow {
    country: Option<String>,
    country_code: Option<String>,
    count: i64,
}

fn to_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

impl From<ClickRow> for ClickEvent {
    fn from(r: ClickRow) -> Self {
        let device_type = r.device_type.parse().unwrap_or(DeviceType::Other);
        ClickEvent {
            id: r.id,
            link_id: r.link_id,
            client_address: r.client_address,
            user_agent: r.user_agent,
            device_type,
            country: r.country,
            country_code: r.country_code,
            city: r.city,
            latitude: r.latitude,
            longitude: r.longitude,
            timezone: r.timezone,
            occurred_at: r.occurred_at,
        }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record(&self, new_click: NewClickEvent) -> Result<ClickEvent, AppError> {
        let sql = format!(
            r#"
            INSERT INTO link_clicks (
                link_id, client_address, user_agent, device_type, country,
                country_code, city, latitude, longitude, timezone, occurred_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {CLICK_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, ClickRow>(&sql)
            .bind(new_click.link_id)
            .bind(&new_click.client_address)
            .bind(&new_click.user_agent)
            .bind(new_click.device_type.as_str())
            .bind(&new_click.country)
            .bind(&new_click.country_code)
            .bind(&new_click.city)
            .bind(new_click.latitude)
            .bind(new_click.longitude)
            .bind(&new_click.timezone)
            .bind(new_click.occurred_at)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| {
                if let Some(db) = e.as_database_error()
                    && db.is_foreign_key_violation()
                {
                    return AppError::bad_request(format!(
                        "Link {} does not exist",
                        new_click.link_id
                    ));
                }
                AppError::from(e)
            })?;

        Ok(row.into())
    }

    async fn list_by_link(&self, link_id: i64) -> Result<Vec<ClickEvent>, AppError> {
        let sql = format!("SELECT {CLICK_COLUMNS} FROM link_clicks WHERE link_id = $1");

        let rows = sqlx::query_as::<_, ClickRow>(&sql)
            .bind(link_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(ClickEvent::from).collect())
    }

    async fn summarize(&self, link_id: i64) -> Result<Summary, AppError> {
        let mut tx = self.pool.begin().await?;

        // All four reads see the same snapshot.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM link_clicks WHERE link_id = $1")
            .bind(link_id)
            .fetch_one(&mut *tx)
            .await?;

        let devices = sqlx::query_as::<_, DeviceCountRow>(
            r#"
            SELECT device_type, COUNT(*) AS count
            FROM link_clicks
            WHERE link_id = $1
            GROUP BY device_type
            "#,
        )
        .bind(link_id)
        .fetch_all(&mut *tx)
        .await?;

        let countries = sqlx::query_as::<_, CountryCountRow>(
            r#"
            SELECT country, country_code, COUNT(*) AS count
            FROM link_clicks
            WHERE link_id = $1
              AND (country IS NOT NULL OR country_code IS NOT NULL)
            GROUP BY country, country_code
            ORDER BY count DESC,
                     country COLLATE "C" ASC NULLS FIRST,
                     country_code COLLATE "C" ASC NULLS FIRST
            LIMIT $2
            "#,
        )
        .bind(link_id)
        .bind(TOP_COUNTRIES as i64)
        .fetch_all(&mut *tx)
        .await?;

        let sql = format!(
            "SELECT {CLICK_COLUMNS} FROM link_clicks WHERE link_id = $1 \
             ORDER BY occurred_at DESC, id DESC LIMIT $2"
        );
        let recent = sqlx::query_as::<_, ClickRow>(&sql)
            .bind(link_id)
            .bind(RECENT_EVENTS as i64)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        let mut counts_by_device = BTreeMap::new();
        for row in devices {
            let device = row.device_type.parse().unwrap_or(DeviceType::Other);
            *counts_by_device.entry(device).or_insert(0) += to_count(row.count);
        }

        Ok(Summary {
            link_id,
            total_clicks: to_count(total),
            counts_by_device,
            counts_by_country: countries
                .into_iter()
                .map(|r| CountryCount {
                    country: r.country,
                    country_code: r.country_code,
                    count: to_count(r.count),
                })
                .collect(),
            recent_events: recent.into_iter().map(ClickEvent::from).collect(),
        })
    }
}
