//! Postgres-backed document store.
//!
//! Each collection is a table of `(id, created_at, doc jsonb)` rows. The
//! document is the serde form of the domain entity, so the JSON shape is the
//! one the API exposes.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Duplicate` (message derived from the index name) |
//! | ColumnDecode / Decode | N/A | `Serialization` |
//! | anything else | any | `Backend` |
//!
//! ## Conditional writes
//!
//! Updates run `SELECT ... FOR UPDATE` inside a transaction, apply the
//! mutation in process and write the document back before committing. A
//! rejected mutation drops the transaction, which rolls it back.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use jobboard_applications::Application;
use jobboard_companies::{Company, CompanyFilter};
use jobboard_core::{ApplicationId, CompanyId, DomainError, Email, EventId, JobId, UserId};
use jobboard_event_registry::Event;
use jobboard_jobs::Job;
use jobboard_users::User;

use super::{
    ApplicationRepository, CompanyRepository, EventRepository, Guard, JobRepository, Mutation, StoreError,
    StoreResult, UserRepository,
};

const SCHEMA: &str = include_str!("schema.sql");

#[derive(Debug, Copy, Clone)]
enum Table {
    Users,
    Companies,
    Jobs,
    Applications,
    Events,
}

impl Table {
    fn name(self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Companies => "companies",
            Table::Jobs => "jobs",
            Table::Applications => "applications",
            Table::Events => "events",
        }
    }
}

type DocRow<T> = (Json<T>,);

fn docs<T>(rows: Vec<DocRow<T>>) -> Vec<T> {
    rows.into_iter().map(|(Json(doc),)| doc).collect()
}

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }

    /// Connect and apply the schema.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }

    async fn insert_doc<T>(
        &self,
        table: Table,
        id: Uuid,
        created_at: DateTime<Utc>,
        doc: &T,
    ) -> StoreResult<()>
    where
        T: Serialize + Sync,
    {
        let mut tx = self.begin().await?;
        insert_in(&mut tx, table, id, created_at, doc).await?;
        commit(tx).await
    }

    async fn doc_by_id<T>(&self, table: Table, id: Uuid) -> StoreResult<Option<T>>
    where
        T: DeserializeOwned + Send + Unpin + 'static,
    {
        let sql = format!("SELECT doc FROM {} WHERE id = $1", table.name());
        let row: Option<DocRow<T>> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("doc_by_id", e))?;
        Ok(row.map(|(Json(doc),)| doc))
    }

    async fn docs_by_ids<T>(&self, table: Table, ids: Vec<Uuid>) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned + Send + Unpin + 'static,
    {
        let sql = format!("SELECT doc FROM {} WHERE id = ANY($1)", table.name());
        let rows: Vec<DocRow<T>> = sqlx::query_as(&sql)
            .bind(ids)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("docs_by_ids", e))?;
        Ok(docs(rows))
    }

    /// Documents whose top-level `field` equals `value`, newest first.
    async fn docs_where<T>(&self, table: Table, field: &str, value: String) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned + Send + Unpin + 'static,
    {
        let sql = format!(
            "SELECT doc FROM {} WHERE doc->>'{}' = $1 ORDER BY created_at DESC",
            table.name(),
            field
        );
        let rows: Vec<DocRow<T>> = sqlx::query_as(&sql)
            .bind(value)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("docs_where", e))?;
        Ok(docs(rows))
    }

    async fn all_docs<T>(&self, table: Table) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned + Send + Unpin + 'static,
    {
        let sql = format!("SELECT doc FROM {} ORDER BY created_at DESC", table.name());
        let rows: Vec<DocRow<T>> = sqlx::query_as(&sql)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("all_docs", e))?;
        Ok(docs(rows))
    }

    async fn update_doc<T>(&self, table: Table, id: Uuid, mutate: Mutation<'_, T>) -> StoreResult<Option<T>>
    where
        T: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static,
    {
        let mut tx = self.begin().await?;
        let Some(mut doc) = lock_doc::<T>(&mut tx, table, id).await? else {
            return Ok(None);
        };
        mutate(&mut doc)?;
        write_doc(&mut tx, table, id, &doc).await?;
        commit(tx).await?;
        Ok(Some(doc))
    }

    async fn begin(&self) -> StoreResult<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(|e| map_sqlx_error("begin", e))
    }
}

async fn commit(tx: Transaction<'static, Postgres>) -> StoreResult<()> {
    tx.commit().await.map_err(|e| map_sqlx_error("commit", e))
}

async fn insert_in<T>(
    tx: &mut Transaction<'static, Postgres>,
    table: Table,
    id: Uuid,
    created_at: DateTime<Utc>,
    doc: &T,
) -> StoreResult<()>
where
    T: Serialize + Sync,
{
    let sql = format!("INSERT INTO {} (id, created_at, doc) VALUES ($1, $2, $3)", table.name());
    sqlx::query(&sql)
        .bind(id)
        .bind(created_at)
        .bind(Json(doc))
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;
    Ok(())
}

async fn lock_doc<T>(tx: &mut Transaction<'static, Postgres>, table: Table, id: Uuid) -> StoreResult<Option<T>>
where
    T: DeserializeOwned + Send + Unpin + 'static,
{
    let sql = format!("SELECT doc FROM {} WHERE id = $1 FOR UPDATE", table.name());
    let row: Option<DocRow<T>> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("lock_doc", e))?;
    Ok(row.map(|(Json(doc),)| doc))
}

async fn write_doc<T>(tx: &mut Transaction<'static, Postgres>, table: Table, id: Uuid, doc: &T) -> StoreResult<()>
where
    T: Serialize + Sync,
{
    let sql = format!("UPDATE {} SET doc = $2 WHERE id = $1", table.name());
    sqlx::query(&sql)
        .bind(id)
        .bind(Json(doc))
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("write_doc", e))?;
    Ok(())
}

fn uuids<I: Copy>(ids: &[I], f: impl Fn(&I) -> Uuid) -> Vec<Uuid> {
    ids.iter().map(f).collect()
}

#[async_trait]
impl UserRepository for PostgresStore {
    #[instrument(skip(self, user), fields(user_id = %user.id), err)]
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        self.insert_doc(Table::Users, *user.id.as_uuid(), user.created_at, user).await
    }

    async fn user_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        self.doc_by_id(Table::Users, *id.as_uuid()).await
    }

    async fn user_by_email(&self, email: &Email) -> StoreResult<Option<User>> {
        Ok(self
            .docs_where(Table::Users, "email", email.as_str().to_string())
            .await?
            .into_iter()
            .next())
    }

    async fn user_by_reset_token(&self, token_hash: &str) -> StoreResult<Option<User>> {
        let row: Option<DocRow<User>> =
            sqlx::query_as("SELECT doc FROM users WHERE doc->'passwordReset'->>'tokenHash' = $1")
                .bind(token_hash)
                .fetch_optional(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("user_by_reset_token", e))?;
        Ok(row.map(|(Json(doc),)| doc))
    }

    async fn users_by_ids(&self, ids: &[UserId]) -> StoreResult<Vec<User>> {
        self.docs_by_ids(Table::Users, uuids(ids, |id| *id.as_uuid())).await
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        self.all_docs(Table::Users).await
    }

    #[instrument(skip(self, mutate), err)]
    async fn update_user(&self, id: UserId, mutate: Mutation<'_, User>) -> StoreResult<Option<User>> {
        self.update_doc(Table::Users, *id.as_uuid(), mutate).await
    }
}

#[async_trait]
impl CompanyRepository for PostgresStore {
    #[instrument(skip(self, company), fields(company_id = %company.id), err)]
    async fn insert_company(&self, company: &Company) -> StoreResult<()> {
        let mut tx = self.begin().await?;
        insert_in(&mut tx, Table::Companies, *company.id.as_uuid(), company.created_at, company).await?;

        let linked = sqlx::query(
            r#"
            UPDATE users
            SET doc = jsonb_set(doc, '{profile,company}', to_jsonb($2::text))
            WHERE id = $1
            "#,
        )
        .bind(*company.created_by.as_uuid())
        .bind(company.id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("link_company_owner", e))?;
        if linked.rows_affected() != 1 {
            return Err(DomainError::not_found("company owner").into());
        }

        commit(tx).await
    }

    async fn company_by_id(&self, id: CompanyId) -> StoreResult<Option<Company>> {
        self.doc_by_id(Table::Companies, *id.as_uuid()).await
    }

    async fn company_by_owner(&self, owner: UserId) -> StoreResult<Option<Company>> {
        Ok(self
            .docs_where(Table::Companies, "createdBy", owner.to_string())
            .await?
            .into_iter()
            .next())
    }

    async fn companies_by_ids(&self, ids: &[CompanyId]) -> StoreResult<Vec<Company>> {
        self.docs_by_ids(Table::Companies, uuids(ids, |id| *id.as_uuid())).await
    }

    async fn list_companies(&self, filter: CompanyFilter) -> StoreResult<Vec<Company>> {
        match filter {
            CompanyFilter::All => self.all_docs(Table::Companies).await,
            CompanyFilter::ActiveOnly => self.docs_where(Table::Companies, "status", "active".into()).await,
            CompanyFilter::OwnedBy(owner) => self.docs_where(Table::Companies, "createdBy", owner.to_string()).await,
        }
    }

    #[instrument(skip(self, mutate), err)]
    async fn update_company(&self, id: CompanyId, mutate: Mutation<'_, Company>) -> StoreResult<Option<Company>> {
        self.update_doc(Table::Companies, *id.as_uuid(), mutate).await
    }
}

/// `%keyword%` with LIKE wildcards escaped.
fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl JobRepository for PostgresStore {
    #[instrument(skip(self, job), fields(job_id = %job.id), err)]
    async fn insert_job(&self, job: &Job) -> StoreResult<()> {
        self.insert_doc(Table::Jobs, *job.id.as_uuid(), job.created_at, job).await
    }

    async fn job_by_id(&self, id: JobId) -> StoreResult<Option<Job>> {
        self.doc_by_id(Table::Jobs, *id.as_uuid()).await
    }

    async fn jobs_by_ids(&self, ids: &[JobId]) -> StoreResult<Vec<Job>> {
        self.docs_by_ids(Table::Jobs, uuids(ids, |id| *id.as_uuid())).await
    }

    async fn search_jobs(&self, keyword: &str) -> StoreResult<Vec<Job>> {
        let keyword = keyword.trim();
        let rows: Vec<DocRow<Job>> = sqlx::query_as(
            r#"
            SELECT doc FROM jobs
            WHERE $1 = ''
               OR doc->>'title' ILIKE $2
               OR doc->>'description' ILIKE $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(keyword)
        .bind(like_pattern(keyword))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("search_jobs", e))?;
        Ok(docs(rows))
    }

    async fn jobs_posted_by(&self, poster: Option<UserId>) -> StoreResult<Vec<Job>> {
        match poster {
            Some(poster) => self.docs_where(Table::Jobs, "createdBy", poster.to_string()).await,
            None => self.all_docs(Table::Jobs).await,
        }
    }

    #[instrument(skip(self, mutate), err)]
    async fn update_job(&self, id: JobId, mutate: Mutation<'_, Job>) -> StoreResult<Option<Job>> {
        self.update_doc(Table::Jobs, *id.as_uuid(), mutate).await
    }
}

#[async_trait]
impl ApplicationRepository for PostgresStore {
    #[instrument(skip(self, application, guard), fields(application_id = %application.id, job_id = %application.job), err)]
    async fn create_application(&self, application: &Application, guard: Guard<'_, Job>) -> StoreResult<()> {
        let mut tx = self.begin().await?;
        let job_id = *application.job.as_uuid();
        let mut job = lock_doc::<Job>(&mut tx, Table::Jobs, job_id)
            .await?
            .ok_or_else(|| DomainError::not_found("job"))?;
        guard(&job)?;

        insert_in(
            &mut tx,
            Table::Applications,
            *application.id.as_uuid(),
            application.created_at,
            application,
        )
        .await?;
        job.attach_application(application.id);
        write_doc(&mut tx, Table::Jobs, job_id, &job).await?;

        commit(tx).await
    }

    async fn application_by_id(&self, id: ApplicationId) -> StoreResult<Option<Application>> {
        self.doc_by_id(Table::Applications, *id.as_uuid()).await
    }

    async fn applications_for_job(&self, job: JobId) -> StoreResult<Vec<Application>> {
        self.docs_where(Table::Applications, "job", job.to_string()).await
    }

    async fn applications_by_applicant(&self, applicant: UserId) -> StoreResult<Vec<Application>> {
        self.docs_where(Table::Applications, "applicant", applicant.to_string()).await
    }

    #[instrument(skip(self, mutate), err)]
    async fn update_application(
        &self,
        id: ApplicationId,
        mutate: Mutation<'_, Application>,
    ) -> StoreResult<Option<Application>> {
        self.update_doc(Table::Applications, *id.as_uuid(), mutate).await
    }
}

#[async_trait]
impl EventRepository for PostgresStore {
    #[instrument(skip(self, event), fields(event_id = %event.id), err)]
    async fn insert_event(&self, event: &Event) -> StoreResult<()> {
        self.insert_doc(Table::Events, *event.id.as_uuid(), event.created_at, event).await
    }

    async fn event_by_id(&self, id: EventId) -> StoreResult<Option<Event>> {
        self.doc_by_id(Table::Events, *id.as_uuid()).await
    }

    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        self.all_docs(Table::Events).await
    }

    #[instrument(skip(self, mutate), err)]
    async fn update_event(&self, id: EventId, mutate: Mutation<'_, Event>) -> StoreResult<Option<Event>> {
        self.update_doc(Table::Events, *id.as_uuid(), mutate).await
    }
}

/// Human-readable duplicate message for a unique index.
fn duplicate_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("users_email_key") => "email already registered".into(),
        Some("companies_name_key") => "company name already exists".into(),
        Some("companies_owner_key") => "recruiter already owns a company".into(),
        Some("applications_job_applicant_key") => "already applied to this job".into(),
        Some(other) => format!("unique constraint {other} violated"),
        None => "unique constraint violated".into(),
    }
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                StoreError::Duplicate(duplicate_message(db_err.constraint()))
            } else {
                StoreError::Backend(format!("database error in {}: {}", operation, db_err.message()))
            }
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Serialization(format!("{} in {}", err, operation))
        }
        sqlx::Error::PoolClosed => StoreError::Backend(format!("connection pool closed in {}", operation)),
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_patterns_escape_wildcards() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("100%_"), "%100\\%\\_%");
    }

    #[test]
    fn duplicate_messages_name_the_constraint() {
        assert_eq!(duplicate_message(Some("users_email_key")), "email already registered");
        assert_eq!(duplicate_message(Some("other_key")), "unique constraint other_key violated");
    }

    #[test]
    fn schema_declares_every_unique_index() {
        for index in [
            "users_email_key",
            "companies_name_key",
            "companies_owner_key",
            "applications_job_applicant_key",
        ] {
            assert!(SCHEMA.contains(index), "missing {index}");
        }
    }
}
