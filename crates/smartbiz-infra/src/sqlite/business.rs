//! SQLite business repository implementation.
//!
//! The free-form profile fields (social links, brand colors, goals) are
//! stored as JSON text and handed back exactly as they were saved.

use serde_json::Value;
use smartbiz_core::repository::business::BusinessRepository;
use smartbiz_types::business::{Business, BusinessId};
use smartbiz_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

pub struct SqliteBusinessRepository {
    pool: DatabasePool,
}

impl SqliteBusinessRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct BusinessRow {
    id: String,
    name: String,
    industry: Option<String>,
    description: Option<String>,
    target_audience: Option<String>,
    brand_tone: Option<String>,
    social_links: Option<String>,
    brand_colors: Option<String>,
    goals: Option<String>,
    owner_id: Option<String>,
    created_at: String,
    updated_at: String,
}

impl BusinessRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            industry: row.try_get("industry")?,
            description: row.try_get("description")?,
            target_audience: row.try_get("target_audience")?,
            brand_tone: row.try_get("brand_tone")?,
            social_links: row.try_get("social_links")?,
            brand_colors: row.try_get("brand_colors")?,
            goals: row.try_get("goals")?,
            owner_id: row.try_get("owner_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_business(self) -> Result<Business, RepositoryError> {
        let id = self
            .id
            .parse::<BusinessId>()
            .map_err(|e| RepositoryError::Query(format!("invalid business id: {e}")))?;

        Ok(Business {
            id,
            name: self.name,
            industry: self.industry,
            description: self.description,
            target_audience: self.target_audience,
            brand_tone: self.brand_tone,
            social_links: parse_json(self.social_links, "social_links")?,
            brand_colors: parse_json(self.brand_colors, "brand_colors")?,
            goals: parse_json(self.goals, "goals")?,
            owner_id: self.owner_id,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn parse_json(raw: Option<String>, column: &str) -> Result<Option<Value>, RepositoryError> {
    raw.map(|s| serde_json::from_str(&s))
        .transpose()
        .map_err(|e| RepositoryError::Query(format!("invalid {column} JSON: {e}")))
}

fn to_json(value: &Option<Value>) -> Option<String> {
    value.as_ref().map(Value::to_string)
}

impl BusinessRepository for SqliteBusinessRepository {
    async fn create_business(&self, business: &Business) -> Result<Business, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO businesses
               (id, name, industry, description, target_audience, brand_tone,
                social_links, brand_colors, goals, owner_id, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(business.id.to_string())
        .bind(&business.name)
        .bind(&business.industry)
        .bind(&business.description)
        .bind(&business.target_audience)
        .bind(&business.brand_tone)
        .bind(to_json(&business.social_links))
        .bind(to_json(&business.brand_colors))
        .bind(to_json(&business.goals))
        .bind(&business.owner_id)
        .bind(format_datetime(&business.created_at))
        .bind(format_datetime(&business.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(business.clone())
    }

    async fn get_business(&self, id: &BusinessId) -> Result<Option<Business>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM businesses WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let business_row = BusinessRow::from_row(&row).map_err(query_error)?;
                Ok(Some(business_row.into_business()?))
            }
            None => Ok(None),
        }
    }

    async fn update_business(&self, business: &Business) -> Result<Business, RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE businesses SET
               name = ?, industry = ?, description = ?, target_audience = ?, brand_tone = ?,
               social_links = ?, brand_colors = ?, goals = ?, owner_id = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(&business.name)
        .bind(&business.industry)
        .bind(&business.description)
        .bind(&business.target_audience)
        .bind(&business.brand_tone)
        .bind(to_json(&business.social_links))
        .bind(to_json(&business.brand_colors))
        .bind(to_json(&business.goals))
        .bind(&business.owner_id)
        .bind(format_datetime(&business.updated_at))
        .bind(business.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(business.clone())
    }
}
