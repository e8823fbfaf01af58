use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::pagination::PageWindow,
    application::repos::{
        ContactQueryFilter, ContactSort, ContactStatusCount, ContactsRepo, ContactsWriteRepo,
        CreateContactParams, RepoError, UpdateContactParams,
    },
    domain::entities::ContactRecord,
    domain::types::ContactStatus,
};

use super::{PostgresRepositories, map_sqlx_error, push_search};

const CONTACT_COLUMNS: &str = "c.id, c.name, c.company, c.mobile, c.email, c.demand, c.status, \
     c.created_at, c.updated_at";

const CONTACT_SEARCH_COLUMNS: [&str; 5] = ["c.name", "c.company", "c.mobile", "c.email", "c.demand"];

#[derive(sqlx::FromRow)]
struct ContactRow {
    id: Uuid,
    name: String,
    company: Option<String>,
    mobile: String,
    email: Option<String>,
    demand: String,
    status: ContactStatus,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ContactRow> for ContactRecord {
    fn from(row: ContactRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            company: row.company,
            mobile: row.mobile,
            email: row.email,
            demand: row.demand,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StatusCountRow {
    status: ContactStatus,
    count: i64,
}

impl PostgresRepositories {
    fn select_contacts<'q>() -> QueryBuilder<'q, Postgres> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(CONTACT_COLUMNS);
        qb.push(" FROM contacts c WHERE 1=1");
        qb
    }

    fn apply_contact_filter<'q>(
        qb: &mut QueryBuilder<'q, Postgres>,
        filter: &ContactQueryFilter,
        with_status: bool,
    ) {
        if with_status {
            qb.push(" AND c.status IN (");
            let mut statuses = qb.separated(", ");
            for status in filter.visible_statuses() {
                statuses.push_bind(status);
            }
            statuses.push_unseparated(")");
        }

        if let Some(month) = filter.month.as_ref() {
            qb.push(" AND to_char(c.created_at AT TIME ZONE 'UTC', 'YYYY-MM') = ");
            qb.push_bind(month.clone());
        }

        if let Some(search) = filter.search.as_ref() {
            push_search(qb, &CONTACT_SEARCH_COLUMNS, search);
        }
    }

    fn push_contact_order(qb: &mut QueryBuilder<'_, Postgres>, sort: ContactSort) {
        qb.push(match sort {
            ContactSort::Newest => " ORDER BY c.created_at DESC, c.id DESC",
            ContactSort::Oldest => " ORDER BY c.created_at ASC, c.id ASC",
            ContactSort::Name => " ORDER BY LOWER(c.name) ASC, c.created_at DESC, c.id DESC",
        });
    }
}

#[async_trait]
impl ContactsRepo for PostgresRepositories {
    async fn list_contacts(
        &self,
        filter: &ContactQueryFilter,
        sort: ContactSort,
        window: PageWindow,
    ) -> Result<Vec<ContactRecord>, RepoError> {
        let mut qb = Self::select_contacts();
        Self::apply_contact_filter(&mut qb, filter, true);
        Self::push_contact_order(&mut qb, sort);
        qb.push(" LIMIT ");
        qb.push_bind(window.limit() as i64);
        qb.push(" OFFSET ");
        qb.push_bind(window.offset as i64);

        let rows = qb
            .build_query_as::<ContactRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ContactRecord::from).collect())
    }

    async fn count_contacts(&self, filter: &ContactQueryFilter) -> Result<u64, RepoError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM contacts c WHERE 1=1");
        Self::apply_contact_filter(&mut qb, filter, true);

        let count: i64 = qb
            .build_query_scalar::<i64>()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(count.max(0) as u64)
    }

    async fn list_all_contacts(
        &self,
        filter: &ContactQueryFilter,
        sort: ContactSort,
    ) -> Result<Vec<ContactRecord>, RepoError> {
        let mut qb = Self::select_contacts();
        Self::apply_contact_filter(&mut qb, filter, true);
        Self::push_contact_order(&mut qb, sort);

        let rows = qb
            .build_query_as::<ContactRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ContactRecord::from).collect())
    }

    async fn status_counts(
        &self,
        filter: &ContactQueryFilter,
    ) -> Result<Vec<ContactStatusCount>, RepoError> {
        let mut qb =
            QueryBuilder::new("SELECT c.status, COUNT(*) AS count FROM contacts c WHERE 1=1");
        Self::apply_contact_filter(&mut qb, filter, false);
        qb.push(" GROUP BY c.status");

        let rows = qb
            .build_query_as::<StatusCountRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| ContactStatusCount {
                status: row.status,
                count: row.count.max(0) as u64,
            })
            .collect())
    }

    async fn find_contact(&self, id: Uuid) -> Result<Option<ContactRecord>, RepoError> {
        let mut qb = Self::select_contacts();
        qb.push(" AND c.id = ");
        qb.push_bind(id);

        let row = qb
            .build_query_as::<ContactRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(ContactRecord::from))
    }
}

#[async_trait]
impl ContactsWriteRepo for PostgresRepositories {
    async fn create_contact(
        &self,
        params: CreateContactParams,
    ) -> Result<ContactRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let row = sqlx::query_as::<_, ContactRow>(
            r#"
            INSERT INTO contacts (id, name, company, mobile, email, demand, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id, name, company, mobile, email, demand, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(params.name)
        .bind(params.company)
        .bind(params.mobile)
        .bind(params.email)
        .bind(params.demand)
        .bind(params.status)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(ContactRecord::from(row))
    }

    async fn update_contact(
        &self,
        params: UpdateContactParams,
    ) -> Result<ContactRecord, RepoError> {
        let row = sqlx::query_as::<_, ContactRow>(
            r#"
            UPDATE contacts c
            SET name = $2,
                company = $3,
                mobile = $4,
                email = $5,
                demand = $6,
                status = CASE WHEN c.status = $8 THEN c.status ELSE $7 END,
                updated_at = now()
            WHERE c.id = $1
            RETURNING c.id, c.name, c.company, c.mobile, c.email, c.demand, c.status,
                      c.created_at, c.updated_at
            "#,
        )
        .bind(params.id)
        .bind(params.name)
        .bind(params.company)
        .bind(params.mobile)
        .bind(params.email)
        .bind(params.demand)
        .bind(params.status)
        .bind(ContactStatus::Deleted)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(ContactRecord::from).ok_or(RepoError::NotFound)
    }

    async fn mark_read_if_unread(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query(
            "UPDATE contacts SET status = $2, updated_at = now() WHERE id = $1 AND status = $3",
        )
        .bind(id)
        .bind(ContactStatus::Read)
        .bind(ContactStatus::Unread)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn set_contact_status(
        &self,
        id: Uuid,
        status: ContactStatus,
    ) -> Result<ContactRecord, RepoError> {
        let row = sqlx::query_as::<_, ContactRow>(
            r#"
            UPDATE contacts c
            SET status = $2, updated_at = now()
            WHERE c.id = $1
            RETURNING c.id, c.name, c.company, c.mobile, c.email, c.demand, c.status,
                      c.created_at, c.updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(ContactRecord::from).ok_or(RepoError::NotFound)
    }

    async fn bulk_update_status(
        &self,
        ids: &[Uuid],
        from: &[ContactStatus],
        to: ContactStatus,
    ) -> Result<u64, RepoError> {
        if ids.is_empty() || from.is_empty() {
            return Ok(0);
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE contacts SET status = ");
        qb.push_bind(to);
        qb.push(", updated_at = now() WHERE id = ANY(");
        qb.push_bind(ids.to_vec());
        qb.push(") AND status IN (");
        let mut statuses = qb.separated(", ");
        for status in from {
            statuses.push_bind(*status);
        }
        statuses.push_unseparated(")");

        let result = qb
            .build()
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
