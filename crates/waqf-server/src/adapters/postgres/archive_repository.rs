//! PostgreSQL implementation of ArchiveRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use waqf::domain::{ArchivedDocument, DocumentCategory};
use waqf::{ArchiveRepository, DomainError};

use super::{convert_all, db_err, parse_text};

pub struct PgArchiveRepository {
    pool: PgPool,
}

impl PgArchiveRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    title: String,
    category: String,
    storage_path: String,
    mime_type: String,
    size_bytes: i64,
    related_entity: Option<String>,
    related_id: Option<Uuid>,
    uploaded_by: Option<Uuid>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<DocumentRow> for ArchivedDocument {
    type Error = DomainError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            title: row.title,
            category: parse_text("category", &row.category)?,
            storage_path: row.storage_path,
            mime_type: row.mime_type,
            size_bytes: row.size_bytes,
            related_entity: row.related_entity,
            related_id: row.related_id,
            uploaded_by: row.uploaded_by,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl ArchiveRepository for PgArchiveRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ArchivedDocument>, DomainError> {
        sqlx::query_as::<_, DocumentRow>("SELECT * FROM archived_documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(ArchivedDocument::try_from)
            .transpose()
    }

    async fn find_all(
        &self,
        category: Option<DocumentCategory>,
    ) -> Result<Vec<ArchivedDocument>, DomainError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT * FROM archived_documents
            WHERE ($1::TEXT IS NULL OR category = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(category.map(|c| c.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        convert_all(rows)
    }

    async fn save(&self, document: &ArchivedDocument) -> Result<ArchivedDocument, DomainError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            INSERT INTO archived_documents
                (id, title, category, storage_path, mime_type, size_bytes, related_entity,
                 related_id, uploaded_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE
            SET title = $2, category = $3, related_entity = $7, related_id = $8
            RETURNING *
            "#,
        )
        .bind(document.id)
        .bind(&document.title)
        .bind(document.category.as_str())
        .bind(&document.storage_path)
        .bind(&document.mime_type)
        .bind(document.size_bytes)
        .bind(&document.related_entity)
        .bind(document.related_id)
        .bind(document.uploaded_by)
        .bind(document.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM archived_documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by_category(&self) -> Result<Vec<(DocumentCategory, i64)>, DomainError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT category, COUNT(*) FROM archived_documents GROUP BY category ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter()
            .map(|(category, count)| Ok((parse_text("category", &category)?, count)))
            .collect()
    }
}
