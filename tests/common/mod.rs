//! In-memory repositories and request helpers for router tests.

#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, Response, header},
};
use bulletin::{
    application::{
        admin::{audit::AdminAuditService, contacts::AdminContactService},
        contact_form::ContactFormService,
        news::NewsService,
        pagination::PageWindow,
        repos::{
            AuditRepo, CategoriesRepo, ContactQueryFilter, ContactSort, ContactStatusCount,
            ContactsRepo, ContactsWriteRepo, CreateContactParams, HealthRepo, NewsRepo, RepoError,
            UpdateContactParams,
        },
    },
    domain::{
        entities::{AuditLogRecord, CategoryRecord, ContactRecord, NewsRecord},
        types::{CategoryKind, ContactStatus, VisibilityStatus},
    },
    infra::http::{AdminState, PublicState, build_admin_router, build_public_router},
};
use time::{Duration, OffsetDateTime, macros::datetime};
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    pub contacts: Mutex<Vec<ContactRecord>>,
    pub categories: Mutex<Vec<CategoryRecord>>,
    pub news: Mutex<Vec<NewsRecord>>,
    pub audit: Mutex<Vec<AuditLogRecord>>,
    pub status_writes: AtomicUsize,
    pub unhealthy: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert_contact(&self, record: ContactRecord) -> Uuid {
        let id = record.id;
        self.contacts.lock().unwrap().push(record);
        id
    }

    pub fn contact(&self, id: Uuid) -> ContactRecord {
        self.contacts
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .expect("contact exists")
    }

    pub fn status_of(&self, id: Uuid) -> ContactStatus {
        self.contact(id).status
    }

    pub fn audit_actions(&self) -> Vec<String> {
        self.audit
            .lock()
            .unwrap()
            .iter()
            .map(|entry| entry.action.clone())
            .collect()
    }

    fn matching(&self, filter: &ContactQueryFilter, sort: ContactSort) -> Vec<ContactRecord> {
        let visible = filter.visible_statuses();
        let mut rows: Vec<ContactRecord> = self
            .contacts
            .lock()
            .unwrap()
            .iter()
            .filter(|row| visible.contains(&row.status))
            .filter(|row| matches_text(row, filter))
            .cloned()
            .collect();
        sort_contacts(&mut rows, sort);
        rows
    }
}

fn matches_text(row: &ContactRecord, filter: &ContactQueryFilter) -> bool {
    if let Some(month) = filter.month.as_deref() {
        let key = format!("{:04}-{:02}", row.created_at.year(), u8::from(row.created_at.month()));
        if key != month {
            return false;
        }
    }
    match filter.search.as_deref() {
        None => true,
        Some(term) => {
            let term = term.to_lowercase();
            [
                Some(row.name.as_str()),
                row.company.as_deref(),
                Some(row.mobile.as_str()),
                row.email.as_deref(),
                Some(row.demand.as_str()),
            ]
            .into_iter()
            .flatten()
            .any(|value| value.to_lowercase().contains(&term))
        }
    }
}

fn sort_contacts(rows: &mut [ContactRecord], sort: ContactSort) {
    match sort {
        ContactSort::Newest => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        ContactSort::Oldest => rows.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        ContactSort::Name => rows.sort_by_key(|row| row.name.to_lowercase()),
    }
}

#[async_trait]
impl ContactsRepo for MemoryStore {
    async fn list_contacts(
        &self,
        filter: &ContactQueryFilter,
        sort: ContactSort,
        window: PageWindow,
    ) -> Result<Vec<ContactRecord>, RepoError> {
        Ok(self
            .matching(filter, sort)
            .into_iter()
            .skip(window.offset as usize)
            .take(window.limit() as usize)
            .collect())
    }

    async fn count_contacts(&self, filter: &ContactQueryFilter) -> Result<u64, RepoError> {
        Ok(self.matching(filter, ContactSort::Newest).len() as u64)
    }

    async fn list_all_contacts(
        &self,
        filter: &ContactQueryFilter,
        sort: ContactSort,
    ) -> Result<Vec<ContactRecord>, RepoError> {
        Ok(self.matching(filter, sort))
    }

    async fn status_counts(
        &self,
        filter: &ContactQueryFilter,
    ) -> Result<Vec<ContactStatusCount>, RepoError> {
        let rows = self.contacts.lock().unwrap();
        Ok(ContactStatus::ALL
            .into_iter()
            .map(|status| ContactStatusCount {
                status,
                count: rows
                    .iter()
                    .filter(|row| row.status == status && matches_text(row, filter))
                    .count() as u64,
            })
            .filter(|count| count.count > 0)
            .collect())
    }

    async fn find_contact(&self, id: Uuid) -> Result<Option<ContactRecord>, RepoError> {
        Ok(self
            .contacts
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.id == id)
            .cloned())
    }
}

#[async_trait]
impl ContactsWriteRepo for MemoryStore {
    async fn create_contact(
        &self,
        params: CreateContactParams,
    ) -> Result<ContactRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let record = ContactRecord {
            id: Uuid::new_v4(),
            name: params.name,
            company: params.company,
            mobile: params.mobile,
            email: params.email,
            demand: params.demand,
            status: params.status,
            created_at: now,
            updated_at: now,
        };
        self.contacts.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_contact(
        &self,
        params: UpdateContactParams,
    ) -> Result<ContactRecord, RepoError> {
        let mut rows = self.contacts.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == params.id)
            .ok_or(RepoError::NotFound)?;
        row.name = params.name;
        row.company = params.company;
        row.mobile = params.mobile;
        row.email = params.email;
        row.demand = params.demand;
        if row.status != ContactStatus::Deleted {
            row.status = params.status;
        }
        row.updated_at = OffsetDateTime::now_utc();
        Ok(row.clone())
    }

    async fn mark_read_if_unread(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut rows = self.contacts.lock().unwrap();
        match rows
            .iter_mut()
            .find(|row| row.id == id && row.status == ContactStatus::Unread)
        {
            Some(row) => {
                row.status = ContactStatus::Read;
                self.status_writes.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_contact_status(
        &self,
        id: Uuid,
        status: ContactStatus,
    ) -> Result<ContactRecord, RepoError> {
        let mut rows = self.contacts.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(RepoError::NotFound)?;
        row.status = status;
        self.status_writes.fetch_add(1, Ordering::SeqCst);
        Ok(row.clone())
    }

    async fn bulk_update_status(
        &self,
        ids: &[Uuid],
        from: &[ContactStatus],
        to: ContactStatus,
    ) -> Result<u64, RepoError> {
        let mut affected = 0;
        for row in self.contacts.lock().unwrap().iter_mut() {
            if ids.contains(&row.id) && from.contains(&row.status) {
                row.status = to;
                affected += 1;
            }
        }
        self.status_writes
            .fetch_add(affected as usize, Ordering::SeqCst);
        Ok(affected)
    }
}

#[async_trait]
impl CategoriesRepo for MemoryStore {
    async fn list_enabled_categories(
        &self,
        kind: CategoryKind,
        limit: u32,
    ) -> Result<Vec<CategoryRecord>, RepoError> {
        let mut rows: Vec<CategoryRecord> = self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.kind == kind && row.status == VisibilityStatus::Enabled)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.sort_order);
        rows.truncate(limit as usize);
        Ok(rows)
    }
}

impl MemoryStore {
    fn enabled_news(&self, category: Option<Uuid>) -> Vec<NewsRecord> {
        let mut rows: Vec<NewsRecord> = self
            .news
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.status == VisibilityStatus::Enabled)
            .filter(|row| category.is_none() || row.category_id == category)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.sort_order.cmp(&b.sort_order).then_with(|| {
                let a_at = a.published_at.unwrap_or(a.created_at);
                let b_at = b.published_at.unwrap_or(b.created_at);
                b_at.cmp(&a_at).then_with(|| b.id.cmp(&a.id))
            })
        });
        rows
    }
}

#[async_trait]
impl NewsRepo for MemoryStore {
    async fn count_enabled_news(&self, category: Option<Uuid>) -> Result<u64, RepoError> {
        Ok(self.enabled_news(category).len() as u64)
    }

    async fn list_enabled_news(
        &self,
        category: Option<Uuid>,
        window: PageWindow,
    ) -> Result<Vec<NewsRecord>, RepoError> {
        Ok(self
            .enabled_news(category)
            .into_iter()
            .skip(window.offset as usize)
            .take(window.limit() as usize)
            .collect())
    }

    async fn find_news(&self, id: Uuid) -> Result<Option<NewsRecord>, RepoError> {
        Ok(self
            .news
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.id == id)
            .cloned())
    }
}

#[async_trait]
impl AuditRepo for MemoryStore {
    async fn append_log(&self, record: AuditLogRecord) -> Result<(), RepoError> {
        self.audit.lock().unwrap().push(record);
        Ok(())
    }
}

#[async_trait]
impl HealthRepo for MemoryStore {
    async fn ping(&self) -> Result<(), RepoError> {
        if self.unhealthy.load(Ordering::SeqCst) {
            Err(RepoError::Timeout)
        } else {
            Ok(())
        }
    }
}

pub fn admin_router(store: &Arc<MemoryStore>, page_size: u32) -> Router {
    let audit = AdminAuditService::new(store.clone());
    let contacts = AdminContactService::new(store.clone(), store.clone(), audit, page_size);
    build_admin_router(AdminState {
        health: store.clone(),
        contacts: Arc::new(contacts),
    })
}

pub fn public_router(store: &Arc<MemoryStore>) -> Router {
    let audit = AdminAuditService::new(store.clone());
    build_public_router(PublicState {
        health: store.clone(),
        news: Arc::new(NewsService::new(store.clone(), store.clone())),
        contact_form: Arc::new(ContactFormService::new(store.clone(), audit)),
    })
}

pub fn base_time() -> OffsetDateTime {
    datetime!(2024-05-10 09:00 UTC)
}

pub fn contact(name: &str, status: ContactStatus, minutes: i64) -> ContactRecord {
    let at = base_time() + Duration::minutes(minutes);
    ContactRecord {
        id: Uuid::new_v4(),
        name: name.to_string(),
        company: Some("Acme".to_string()),
        mobile: "+1 555 0100".to_string(),
        email: Some(format!("{}@example.com", name.to_lowercase())),
        demand: format!("{name} would like a quote"),
        status,
        created_at: at,
        updated_at: at,
    }
}

pub fn category(name: &str, sort_order: i32) -> CategoryRecord {
    CategoryRecord {
        id: Uuid::new_v4(),
        kind: CategoryKind::News,
        name: name.to_string(),
        sort_order,
        status: VisibilityStatus::Enabled,
        created_at: base_time(),
        updated_at: base_time(),
    }
}

pub fn news(title: &str, category_id: Option<Uuid>, sort_order: i32, days: i64) -> NewsRecord {
    let at = base_time() + Duration::days(days);
    NewsRecord {
        id: Uuid::new_v4(),
        category_id,
        title: title.to_string(),
        summary: format!("{title} summary"),
        body_html: format!("<p>{title}</p>"),
        cover_url: None,
        sort_order,
        status: VisibilityStatus::Enabled,
        published_at: Some(at),
        created_at: at,
        updated_at: at,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request should build")
}

pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("collect body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("location header")
}

/// `name=value` of the first `Set-Cookie` header, ready to send back.
pub fn set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}
