//! SQLite conversation log: messages, generated content and media.
//!
//! Rows are ordered by `created_at` with `rowid` breaking ties, so two
//! writes inside the same microsecond still come back in insert order.

use smartbiz_core::repository::conversation::ConversationRepository;
use smartbiz_types::agent::AgentId;
use smartbiz_types::conversation::{
    Content, ContentId, ContentPayload, ContentType, ConversationMessage, Media, MediaId,
    MessageId, SenderRole,
};
use smartbiz_types::error::RepositoryError;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

/// Ids bound per `IN (...)` lookup, well under SQLite's variable limit.
const ID_CHUNK: usize = 500;

const INSERT_MESSAGE: &str =
    "INSERT INTO messages (id, agent_id, sender_role, text, created_at) VALUES (?, ?, ?, ?, ?)";

const INSERT_MEDIA: &str = r#"INSERT INTO media
    (id, agent_id, message_id, content_id, url, base64, mime_type, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#;

pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn media_linked_by(&self, column: &str, ids: Vec<String>) -> Result<Vec<Media>, RepositoryError> {
        let mut rows = Vec::new();
        for chunk in ids.chunks(ID_CHUNK) {
            let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT *, rowid FROM media WHERE {column} IN ("));
            let mut separated = qb.separated(", ");
            for id in chunk {
                separated.push_bind(id.clone());
            }
            separated.push_unseparated(")");
            rows.extend(qb.build().fetch_all(&self.pool.reader).await.map_err(query_error)?);
        }

        let mut media = rows
            .iter()
            .map(|row| {
                let rowid: i64 = row.try_get("rowid").map_err(query_error)?;
                Ok((rowid, MediaRow::from_row(row).map_err(query_error)?.into_media()?))
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;
        media.sort_by_key(|(rowid, m)| (m.created_at, *rowid));
        Ok(media.into_iter().map(|(_, m)| m).collect())
    }
}

fn bad_id(kind: &str) -> impl Fn(uuid::Error) -> RepositoryError + '_ {
    move |e| RepositoryError::Query(format!("invalid {kind} id: {e}"))
}

struct MessageRow {
    id: String,
    agent_id: String,
    sender_role: String,
    text: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            agent_id: row.try_get("agent_id")?,
            sender_role: row.try_get("sender_role")?,
            text: row.try_get("text")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ConversationMessage, RepositoryError> {
        Ok(ConversationMessage {
            id: self.id.parse::<MessageId>().map_err(bad_id("message"))?,
            agent_id: self.agent_id.parse::<AgentId>().map_err(bad_id("agent"))?,
            role: self
                .sender_role
                .parse::<SenderRole>()
                .map_err(RepositoryError::Query)?,
            text: self.text,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

struct ContentRow {
    id: String,
    agent_id: String,
    content_type: String,
    payload: String,
    created_at: String,
}

impl ContentRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            agent_id: row.try_get("agent_id")?,
            content_type: row.try_get("content_type")?,
            payload: row.try_get("payload")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_content(self) -> Result<Content, RepositoryError> {
        let payload: ContentPayload = serde_json::from_str(&self.payload)
            .map_err(|e| RepositoryError::Query(format!("invalid content payload JSON: {e}")))?;

        Ok(Content {
            id: self.id.parse::<ContentId>().map_err(bad_id("content"))?,
            agent_id: self.agent_id.parse::<AgentId>().map_err(bad_id("agent"))?,
            content_type: self
                .content_type
                .parse::<ContentType>()
                .map_err(RepositoryError::Query)?,
            payload,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

struct MediaRow {
    id: String,
    agent_id: String,
    message_id: Option<String>,
    content_id: Option<String>,
    url: Option<String>,
    base64: Option<String>,
    mime_type: Option<String>,
    created_at: String,
}

impl MediaRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            agent_id: row.try_get("agent_id")?,
            message_id: row.try_get("message_id")?,
            content_id: row.try_get("content_id")?,
            url: row.try_get("url")?,
            base64: row.try_get("base64")?,
            mime_type: row.try_get("mime_type")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_media(self) -> Result<Media, RepositoryError> {
        Ok(Media {
            id: self.id.parse::<MediaId>().map_err(bad_id("media"))?,
            agent_id: self.agent_id.parse::<AgentId>().map_err(bad_id("agent"))?,
            message_id: self
                .message_id
                .as_deref()
                .map(str::parse::<MessageId>)
                .transpose()
                .map_err(bad_id("message"))?,
            content_id: self
                .content_id
                .as_deref()
                .map(str::parse::<ContentId>)
                .transpose()
                .map_err(bad_id("content"))?,
            url: self.url,
            base64: self.base64,
            mime_type: self.mime_type,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl ConversationRepository for SqliteConversationRepository {
    async fn save_message(&self, message: &ConversationMessage) -> Result<ConversationMessage, RepositoryError> {
        sqlx::query(INSERT_MESSAGE)
            .bind(message.id.to_string())
            .bind(message.agent_id.to_string())
            .bind(message.role.to_string())
            .bind(&message.text)
            .bind(format_datetime(&message.created_at))
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(message.clone())
    }

    async fn get_message(&self, id: &MessageId) -> Result<Option<ConversationMessage>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM messages WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.map(|row| MessageRow::from_row(&row).map_err(query_error)?.into_message())
            .transpose()
    }

    async fn list_recent_messages(
        &self,
        agent_id: &AgentId,
        limit: u32,
    ) -> Result<Vec<ConversationMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE agent_id = ? ORDER BY created_at DESC, rowid DESC LIMIT ?",
        )
        .bind(agent_id.to_string())
        .bind(limit as i64)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter()
            .map(|row| MessageRow::from_row(row).map_err(query_error)?.into_message())
            .collect()
    }

    async fn list_messages(&self, agent_id: &AgentId) -> Result<Vec<ConversationMessage>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM messages WHERE agent_id = ? ORDER BY created_at ASC, rowid ASC")
            .bind(agent_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows.iter()
            .map(|row| MessageRow::from_row(row).map_err(query_error)?.into_message())
            .collect()
    }

    async fn save_reply(
        &self,
        message: &ConversationMessage,
        media: &[Media],
    ) -> Result<ConversationMessage, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        sqlx::query(INSERT_MESSAGE)
            .bind(message.id.to_string())
            .bind(message.agent_id.to_string())
            .bind(message.role.to_string())
            .bind(&message.text)
            .bind(format_datetime(&message.created_at))
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

        for item in media {
            sqlx::query(INSERT_MEDIA)
                .bind(item.id.to_string())
                .bind(item.agent_id.to_string())
                .bind(item.message_id.map(|id| id.to_string()))
                .bind(item.content_id.map(|id| id.to_string()))
                .bind(&item.url)
                .bind(&item.base64)
                .bind(&item.mime_type)
                .bind(format_datetime(&item.created_at))
                .execute(&mut *tx)
                .await
                .map_err(query_error)?;
        }

        tx.commit().await.map_err(query_error)?;
        Ok(message.clone())
    }

    async fn save_media(&self, media: &Media) -> Result<Media, RepositoryError> {
        sqlx::query(INSERT_MEDIA)
            .bind(media.id.to_string())
            .bind(media.agent_id.to_string())
            .bind(media.message_id.map(|id| id.to_string()))
            .bind(media.content_id.map(|id| id.to_string()))
            .bind(&media.url)
            .bind(&media.base64)
            .bind(&media.mime_type)
            .bind(format_datetime(&media.created_at))
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(media.clone())
    }

    async fn list_media_for_messages(&self, message_ids: &[MessageId]) -> Result<Vec<Media>, RepositoryError> {
        let ids = message_ids.iter().map(ToString::to_string).collect();
        self.media_linked_by("message_id", ids).await
    }

    async fn save_content(&self, content: &Content) -> Result<Content, RepositoryError> {
        let payload = serde_json::to_string(&content.payload)
            .map_err(|e| RepositoryError::Query(format!("failed to encode content payload: {e}")))?;

        sqlx::query(
            "INSERT INTO contents (id, agent_id, content_type, payload, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(content.id.to_string())
        .bind(content.agent_id.to_string())
        .bind(content.content_type.to_string())
        .bind(payload)
        .bind(format_datetime(&content.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(content.clone())
    }

    async fn get_content(&self, id: &ContentId) -> Result<Option<Content>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM contents WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.map(|row| ContentRow::from_row(&row).map_err(query_error)?.into_content())
            .transpose()
    }

    async fn list_content(
        &self,
        agent_id: &AgentId,
        content_type: Option<ContentType>,
        limit: u32,
    ) -> Result<Vec<Content>, RepositoryError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM contents WHERE agent_id = ");
        qb.push_bind(agent_id.to_string());
        if let Some(content_type) = content_type {
            qb.push(" AND content_type = ");
            qb.push_bind(content_type.to_string());
        }
        qb.push(" ORDER BY created_at DESC, rowid DESC LIMIT ");
        qb.push_bind(limit as i64);

        let rows = qb.build().fetch_all(&self.pool.reader).await.map_err(query_error)?;
        rows.iter()
            .map(|row| ContentRow::from_row(row).map_err(query_error)?.into_content())
            .collect()
    }

    async fn list_media_for_content(&self, content_ids: &[ContentId]) -> Result<Vec<Media>, RepositoryError> {
        let ids = content_ids.iter().map(ToString::to_string).collect();
        self.media_linked_by("content_id", ids).await
    }
}
