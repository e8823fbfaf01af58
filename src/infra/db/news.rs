use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::pagination::PageWindow,
    application::repos::{CategoriesRepo, NewsRepo, RepoError},
    domain::entities::{CategoryRecord, NewsRecord},
    domain::types::{CategoryKind, VisibilityStatus},
};

use super::{PostgresRepositories, map_sqlx_error};

const NEWS_COLUMNS: &str = "n.id, n.category_id, n.title, n.summary, n.body_html, n.cover_url, \
     n.sort_order, n.status, n.published_at, n.created_at, n.updated_at";

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    kind: CategoryKind,
    name: String,
    sort_order: i32,
    status: VisibilityStatus,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<CategoryRow> for CategoryRecord {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            kind: row.kind,
            name: row.name,
            sort_order: row.sort_order,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct NewsRow {
    id: Uuid,
    category_id: Option<Uuid>,
    title: String,
    summary: String,
    body_html: String,
    cover_url: Option<String>,
    sort_order: i32,
    status: VisibilityStatus,
    published_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<NewsRow> for NewsRecord {
    fn from(row: NewsRow) -> Self {
        Self {
            id: row.id,
            category_id: row.category_id,
            title: row.title,
            summary: row.summary,
            body_html: row.body_html,
            cover_url: row.cover_url,
            sort_order: row.sort_order,
            status: row.status,
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn apply_enabled_news_filter(qb: &mut QueryBuilder<'_, Postgres>, category: Option<Uuid>) {
    qb.push(" WHERE n.status = ");
    qb.push_bind(VisibilityStatus::Enabled);
    if let Some(category) = category {
        qb.push(" AND n.category_id = ");
        qb.push_bind(category);
    }
}

#[async_trait]
impl CategoriesRepo for PostgresRepositories {
    async fn list_enabled_categories(
        &self,
        kind: CategoryKind,
        limit: u32,
    ) -> Result<Vec<CategoryRecord>, RepoError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, kind, name, sort_order, status, created_at, updated_at
            FROM categories
            WHERE kind = $1 AND status = $2
            ORDER BY sort_order ASC, created_at ASC, id ASC
            LIMIT $3
            "#,
        )
        .bind(kind)
        .bind(VisibilityStatus::Enabled)
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CategoryRecord::from).collect())
    }
}

#[async_trait]
impl NewsRepo for PostgresRepositories {
    async fn count_enabled_news(&self, category: Option<Uuid>) -> Result<u64, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM news n");
        apply_enabled_news_filter(&mut qb, category);

        let count: i64 = qb
            .build_query_scalar::<i64>()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(count.max(0) as u64)
    }

    async fn list_enabled_news(
        &self,
        category: Option<Uuid>,
        window: PageWindow,
    ) -> Result<Vec<NewsRecord>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(NEWS_COLUMNS);
        qb.push(" FROM news n");
        apply_enabled_news_filter(&mut qb, category);
        qb.push(
            " ORDER BY n.sort_order ASC, COALESCE(n.published_at, n.created_at) DESC, n.id DESC",
        );
        qb.push(" LIMIT ");
        qb.push_bind(window.limit() as i64);
        qb.push(" OFFSET ");
        qb.push_bind(window.offset as i64);

        let rows = qb
            .build_query_as::<NewsRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(NewsRecord::from).collect())
    }

    async fn find_news(&self, id: Uuid) -> Result<Option<NewsRecord>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(NEWS_COLUMNS);
        qb.push(" FROM news n WHERE n.id = ");
        qb.push_bind(id);

        let row = qb
            .build_query_as::<NewsRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(NewsRecord::from))
    }
}
