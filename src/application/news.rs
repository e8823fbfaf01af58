//! Public news index and detail queries.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::pagination::{OffsetPage, PageRequest};
use crate::application::repos::{CategoriesRepo, NewsRepo, RepoError};
use crate::domain::entities::{CategoryRecord, NewsRecord};
use crate::domain::news::{NEWS_CATEGORY_LIMIT, NEWS_PAGE_SIZE, resolve_category_label};
use crate::domain::types::CategoryKind;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct NewsIndex {
    pub categories: Vec<CategoryRecord>,
    pub selected_category: Option<Uuid>,
    pub category_label: String,
    pub items: OffsetPage<NewsRecord>,
}

#[derive(Clone)]
pub struct NewsService {
    categories: Arc<dyn CategoriesRepo>,
    news: Arc<dyn NewsRepo>,
}

impl NewsService {
    pub fn new(categories: Arc<dyn CategoriesRepo>, news: Arc<dyn NewsRepo>) -> Self {
        Self { categories, news }
    }

    pub async fn list_news(
        &self,
        category: Option<Uuid>,
        page: Option<u32>,
    ) -> Result<NewsIndex, NewsError> {
        let mut categories = self
            .categories
            .list_enabled_categories(CategoryKind::News, NEWS_CATEGORY_LIMIT)
            .await?;
        categories.truncate(NEWS_CATEGORY_LIMIT as usize);
        let category_label = resolve_category_label(&categories, category);

        let total = self.news.count_enabled_news(category).await?;
        let window = PageRequest::new(page, NEWS_PAGE_SIZE).resolve(total);
        let mut items = self.news.list_enabled_news(category, window).await?;
        items.truncate(NEWS_PAGE_SIZE as usize);

        Ok(NewsIndex {
            categories,
            selected_category: category,
            category_label,
            items: OffsetPage::new(items, window),
        })
    }

    pub async fn news_detail(&self, id: Uuid) -> Result<Option<NewsRecord>, NewsError> {
        Ok(self.news.find_news(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use time::OffsetDateTime;

    use crate::application::pagination::PageWindow;
    use crate::domain::types::VisibilityStatus;

    struct OversizedCategories(Vec<CategoryRecord>);

    #[async_trait]
    impl CategoriesRepo for OversizedCategories {
        async fn list_enabled_categories(
            &self,
            _kind: CategoryKind,
            _limit: u32,
        ) -> Result<Vec<CategoryRecord>, RepoError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct StubNews {
        total: u64,
        requested: Mutex<Vec<(Option<Uuid>, PageWindow)>>,
    }

    #[async_trait]
    impl NewsRepo for StubNews {
        async fn count_enabled_news(&self, _category: Option<Uuid>) -> Result<u64, RepoError> {
            Ok(self.total)
        }

        async fn list_enabled_news(
            &self,
            category: Option<Uuid>,
            window: PageWindow,
        ) -> Result<Vec<NewsRecord>, RepoError> {
            self.requested.lock().unwrap().push((category, window));
            Ok((0..20).map(|_| news(category)).collect())
        }

        async fn find_news(&self, _id: Uuid) -> Result<Option<NewsRecord>, RepoError> {
            Ok(None)
        }
    }

    fn category(sort_order: i32) -> CategoryRecord {
        CategoryRecord {
            id: Uuid::new_v4(),
            kind: CategoryKind::News,
            name: format!("Category {sort_order}"),
            sort_order,
            status: VisibilityStatus::Enabled,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    fn news(category_id: Option<Uuid>) -> NewsRecord {
        NewsRecord {
            id: Uuid::new_v4(),
            category_id,
            title: "Launch".into(),
            summary: String::new(),
            body_html: "<p>Hello</p>".into(),
            cover_url: None,
            sort_order: 0,
            status: VisibilityStatus::Enabled,
            published_at: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn listing_is_capped_at_limits() {
        let categories: Vec<_> = (0..15).map(category).collect();
        let news_repo = Arc::new(StubNews {
            total: 40,
            ..StubNews::default()
        });
        let service = NewsService::new(Arc::new(OversizedCategories(categories)), news_repo.clone());

        let index = service.list_news(None, Some(2)).await.expect("index");

        assert_eq!(index.categories.len(), 10);
        assert_eq!(index.items.items.len(), 12);
        assert_eq!(index.items.total_pages, 4);
        assert_eq!(index.category_label, "All");
        let requested = news_repo.requested.lock().unwrap();
        assert_eq!(requested[0].1.offset, 12);
    }

    #[tokio::test]
    async fn category_outside_listing_filters_but_keeps_all_label() {
        let listed = vec![category(1), category(2)];
        let listed_id = listed[1].id;
        let news_repo = Arc::new(StubNews {
            total: 3,
            ..StubNews::default()
        });
        let service = NewsService::new(Arc::new(OversizedCategories(listed)), news_repo.clone());

        let index = service
            .list_news(Some(listed_id), None)
            .await
            .expect("index");
        assert_eq!(index.category_label, "Category 2");

        let hidden = Uuid::new_v4();
        let index = service.list_news(Some(hidden), None).await.expect("index");
        assert_eq!(index.category_label, "All");
        assert_eq!(index.selected_category, Some(hidden));
        let requested = news_repo.requested.lock().unwrap();
        assert_eq!(requested[1].0, Some(hidden));
    }

    #[tokio::test]
    async fn missing_detail_is_none() {
        let service = NewsService::new(
            Arc::new(OversizedCategories(Vec::new())),
            Arc::new(StubNews::default()),
        );
        assert!(service.news_detail(Uuid::new_v4()).await.expect("detail").is_none());
    }
}
