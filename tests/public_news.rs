mod common;

use axum::http::StatusCode;
use bulletin::domain::types::{ContactStatus, VisibilityStatus};
use common::{
    MemoryStore, body_string, category, get, get_with_cookie, location, news, post_form,
    public_router, set_cookie,
};
use tower::ServiceExt;

fn occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[tokio::test]
async fn root_redirects_to_news() {
    let store = MemoryStore::new();
    let response = public_router(&store)
        .oneshot(get("/"))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/news");
}

#[tokio::test]
async fn index_pages_twelve_items_and_ten_categories() {
    let store = MemoryStore::new();
    {
        let mut categories = store.categories.lock().unwrap();
        for index in 0..11 {
            categories.push(category(&format!("Topic {index:02}"), index));
        }
    }
    {
        let mut items = store.news.lock().unwrap();
        for day in 0..14 {
            items.push(news(&format!("Story {day:02}"), None, 0, day));
        }
    }
    let router = public_router(&store);

    let first = router
        .clone()
        .oneshot(get("/news"))
        .await
        .expect("router response");
    assert_eq!(first.status(), StatusCode::OK);
    let body = body_string(first).await;
    assert_eq!(occurrences(&body, "href=\"/news/"), 12);
    assert_eq!(occurrences(&body, "href=\"/news?id="), 10);
    assert!(body.contains("Story 13"));
    assert!(!body.contains("Story 01"));
    assert!(!body.contains("Topic 10"));
    assert!(body.contains("href=\"/news?page=2\""));

    let second = router
        .oneshot(get("/news?page=2"))
        .await
        .expect("router response");
    let body = body_string(second).await;
    assert_eq!(occurrences(&body, "href=\"/news/"), 2);
    assert!(body.contains("Story 00"));
}

#[tokio::test]
async fn sort_order_wins_over_publication_date() {
    let store = MemoryStore::new();
    {
        let mut items = store.news.lock().unwrap();
        items.push(news("Fresh", None, 5, 30));
        items.push(news("Pinned", None, 1, 0));
    }

    let response = public_router(&store)
        .oneshot(get("/news"))
        .await
        .expect("router response");
    let body = body_string(response).await;

    let pinned = body.find("Pinned").expect("pinned listed");
    let fresh = body.find("Fresh").expect("fresh listed");
    assert!(pinned < fresh);
}

#[tokio::test]
async fn disabled_news_is_not_listed() {
    let store = MemoryStore::new();
    {
        let mut items = store.news.lock().unwrap();
        items.push(news("Visible", None, 0, 0));
        let mut hidden = news("Hidden", None, 0, 1);
        hidden.status = VisibilityStatus::Disabled;
        items.push(hidden);
    }

    let response = public_router(&store)
        .oneshot(get("/news"))
        .await
        .expect("router response");
    let body = body_string(response).await;
    assert!(body.contains("Visible"));
    assert!(!body.contains("Hidden"));
}

#[tokio::test]
async fn category_filter_narrows_items_and_sets_the_heading() {
    let store = MemoryStore::new();
    let markets = category("Markets", 1);
    let markets_id = markets.id;
    store.categories.lock().unwrap().push(markets);
    {
        let mut items = store.news.lock().unwrap();
        items.push(news("Rates rise", Some(markets_id), 0, 0));
        items.push(news("Office move", None, 0, 1));
    }

    let response = public_router(&store)
        .oneshot(get(&format!("/news?id={markets_id}")))
        .await
        .expect("router response");
    let body = body_string(response).await;
    assert!(body.contains("<h1>Markets</h1>"));
    assert!(body.contains("Rates rise"));
    assert!(!body.contains("Office move"));
}

#[tokio::test]
async fn unknown_category_keeps_the_default_heading() {
    let store = MemoryStore::new();
    store.news.lock().unwrap().push(news("Office move", None, 0, 0));

    let response = public_router(&store)
        .oneshot(get(&format!("/news?id={}", uuid::Uuid::new_v4())))
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("<h1>All</h1>"));
    assert!(!body.contains("Office move"));
}

#[tokio::test]
async fn malformed_category_is_a_bad_request() {
    let store = MemoryStore::new();
    let response = public_router(&store)
        .oneshot(get("/news?id=markets"))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn detail_sanitizes_the_body() {
    let store = MemoryStore::new();
    let mut item = news("Launch", None, 0, 0);
    item.body_html = "<p>We launched.</p><script>alert(1)</script>".to_string();
    let id = item.id;
    store.news.lock().unwrap().push(item);

    let response = public_router(&store)
        .oneshot(get(&format!("/news/{id}")))
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("<p>We launched.</p>"));
    assert!(!body.contains("alert(1)"));
}

#[tokio::test]
async fn missing_or_malformed_detail_is_not_found() {
    let store = MemoryStore::new();
    let router = public_router(&store);

    let missing = router
        .clone()
        .oneshot(get(&format!("/news/{}", uuid::Uuid::new_v4())))
        .await
        .expect("router response");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert!(body_string(missing).await.contains("Page Not Found"));

    let malformed = router
        .oneshot(get("/news/42"))
        .await
        .expect("router response");
    assert_eq!(malformed.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_paths_render_the_not_found_page() {
    let store = MemoryStore::new();
    let response = public_router(&store)
        .oneshot(get("/about"))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn contact_submission_is_stored_unread_and_acknowledged() {
    let store = MemoryStore::new();
    let router = public_router(&store);

    let response = router
        .clone()
        .oneshot(post_form(
            "/contact",
            "name=+Erin+&company=&mobile=%2B1+555+0199&email=&demand=Need+a+quote",
        ))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/contact");

    let stored = store.contacts.lock().unwrap()[0].clone();
    assert_eq!(stored.name, "Erin");
    assert_eq!(stored.status, ContactStatus::Unread);
    assert_eq!(stored.email, None);
    assert_eq!(store.audit_actions(), vec!["contact.submit".to_string()]);

    let cookie = set_cookie(&response).expect("flash cookie");
    let follow = router
        .oneshot(get_with_cookie("/contact", &cookie))
        .await
        .expect("router response");
    assert!(
        body_string(follow)
            .await
            .contains("Thank you, your message has been received.")
    );
}

#[tokio::test]
async fn filled_honeypot_is_acknowledged_but_not_stored() {
    let store = MemoryStore::new();
    let response = public_router(&store)
        .oneshot(post_form(
            "/contact",
            "name=Bot&mobile=555+0100&demand=Buy+now&website=http%3A%2F%2Fspam.example",
        ))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/contact");
    assert!(set_cookie(&response).is_some());
    assert!(store.contacts.lock().unwrap().is_empty());
    assert!(store.audit_actions().is_empty());
}

#[tokio::test]
async fn contact_form_renders_the_hidden_trap_field() {
    let store = MemoryStore::new();
    let response = public_router(&store)
        .oneshot(get("/contact"))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("name=\"website\""));
}

#[tokio::test]
async fn invalid_submission_keeps_the_input() {
    let store = MemoryStore::new();
    let response = public_router(&store)
        .oneshot(post_form(
            "/contact",
            "name=Erin&mobile=call+me&email=erin&demand=",
        ))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_string(response).await;
    assert!(body.contains("value=\"Erin\""));
    assert!(body.contains("Mobile may only contain"));
    assert!(body.contains("Email is not a valid address"));
    assert!(body.contains("Demand is required"));
    assert!(store.contacts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn public_health_reports_no_content() {
    let store = MemoryStore::new();
    let response = public_router(&store)
        .oneshot(get("/_health/db"))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
