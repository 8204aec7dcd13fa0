//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::home::get_home))
        .route("/books/{book_slug}", get(handlers::books::get_book))
        .route(
            "/books/{book_slug}/chapters/{chapter_slug}",
            get(handlers::chapters::get_chapter),
        )
        .route("/api/clear-cache", get(handlers::revalidate::clear_cache))
        .route("/health", get(handlers::health::get_health))
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{OnceLock, Weak};

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use shelf_cache::MemoryCache;
    use shelf_site::Library;
    use shelf_store::{ContentStore, MockStore, QueryParams, StoreError};
    use tower::ServiceExt;

    use super::*;
    use crate::SiteSettings;

    const TOKEN: &str = "s3cret";

    fn site() -> SiteSettings {
        SiteSettings {
            title: "Your Library".to_owned(),
            footer_name: "Book Platform".to_owned(),
            studio_url: None,
        }
    }

    fn summary(slug: &str, order: i64) -> Value {
        json!({"_id": format!("c-{slug}"), "title": slug.to_uppercase(), "slug": slug, "order": order})
    }

    fn dune() -> Value {
        json!({
            "_id": "book-dune",
            "title": "Dune",
            "slug": "dune",
            "author": {"_id": "a1", "name": "Frank Herbert"},
            "chapters": [summary("intro", 1), summary("rise", 2), summary("fall", 3)]
        })
    }

    fn library_store() -> MockStore {
        MockStore::new()
            .with_response(
                "\"candidates\"",
                json!({
                    "book": dune(),
                    "candidates": [{
                        "_id": "c-rise",
                        "title": "RISE",
                        "slug": "rise",
                        "order": 2,
                        "content": [{
                            "_type": "block",
                            "style": "h2",
                            "children": [{"_type": "span", "text": "Hello", "marks": ["strong"]}],
                            "markDefs": []
                        }]
                    }]
                }),
            )
            .with_response("$bookSlug", dune())
            .with_response(
                "_createdAt desc",
                json!([
                    {"_id": "book-dune", "title": "Dune", "slug": "dune"},
                    {"_id": "book-emma", "title": "Emma", "slug": "emma"}
                ]),
            )
    }

    struct Harness {
        store: Arc<MockStore>,
        state: Arc<AppState>,
    }

    impl Harness {
        fn new(store: MockStore) -> Self {
            let store = Arc::new(store);
            let library = Library::new(Arc::<MockStore>::clone(&store));
            let state = Arc::new(AppState::new(
                Arc::new(library),
                &MemoryCache::new(),
                site(),
                Some(TOKEN.to_owned()),
                false,
                "1.0.0".to_owned(),
            ));
            Self { store, state }
        }

        async fn get(&self, uri: &str) -> Response {
            self.request(Request::get(uri).body(Body::empty()).unwrap())
                .await
        }

        async fn request(&self, request: Request<Body>) -> Response {
            create_router(Arc::clone(&self.state))
                .oneshot(request)
                .await
                .unwrap()
        }
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_home_lists_books() {
        let harness = Harness::new(library_store());

        let response = harness.get("/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::ETAG));

        let html = body_text(response).await;
        assert!(html.contains(r#"href="/books/dune""#));
        assert!(html.contains(r#"href="/books/emma""#));
    }

    #[tokio::test]
    async fn test_home_without_books() {
        let harness = Harness::new(MockStore::new());

        let html = body_text(harness.get("/").await).await;
        assert!(html.contains("No books found"));
    }

    #[tokio::test]
    async fn test_book_page() {
        let harness = Harness::new(library_store());

        let response = harness.get("/books/dune").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("by Frank Herbert"));
        assert!(html.contains(r#"href="/books/dune/chapters/intro""#));
    }

    #[tokio::test]
    async fn test_chapter_page() {
        let harness = Harness::new(library_store());

        let response = harness.get("/books/dune/chapters/rise").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("<h2><strong>Hello</strong></h2>"));
        assert!(html.contains(r#"href="/books/dune/chapters/intro""#));
        assert!(html.contains(r#"href="/books/dune/chapters/fall""#));
        assert!(html.contains("Chapter 2 of 3"));
        assert_eq!(harness.store.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_book_and_chapter_are_not_found() {
        let harness = Harness::new(MockStore::new());

        for uri in ["/books/missing", "/books/missing/chapters/intro"] {
            let response = harness.get(uri).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
            assert!(body_text(response).await.contains("Page Not Found"));
        }
    }

    #[tokio::test]
    async fn test_chapter_of_another_book_is_not_found() {
        let store = MockStore::new().with_response(
            "\"candidates\"",
            json!({
                "book": dune(),
                "candidates": [{"_id": "c-other", "title": "Elsewhere", "slug": "rise", "order": 1}]
            }),
        );
        let harness = Harness::new(store);

        let response = harness.get("/books/dune/chapters/rise").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let harness = Harness::new(library_store());

        let response = harness.get("/no/such/page").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(harness.store.queries().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_server_error() {
        let harness = Harness::new(MockStore::new().with_failure("_createdAt desc", 503, "down"));

        let response = harness.get("/").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("Something Went Wrong"));
    }

    #[tokio::test]
    async fn test_cached_page_skips_store() {
        let harness = Harness::new(library_store());

        let first = body_text(harness.get("/books/dune").await).await;
        let second = body_text(harness.get("/books/dune").await).await;

        assert_eq!(first, second);
        assert_eq!(harness.store.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_encoded_slash_slugs_cached_separately() {
        let harness = Harness::new(library_store());

        harness.get("/books/a%2Fb/chapters/c").await;
        harness.get("/books/a/chapters/b%2Fc").await;

        let queries = harness.store.queries();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].params.get("bookSlug"), Some(&json!("a/b")));
        assert_eq!(queries[1].params.get("chapterSlug"), Some(&json!("b/c")));
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let harness = Harness::new(MockStore::new());

        harness.get("/books/missing").await;
        harness.get("/books/missing").await;

        assert_eq!(harness.store.queries().len(), 2);
    }

    #[tokio::test]
    async fn test_if_none_match_returns_not_modified() {
        let harness = Harness::new(library_store());

        let response = harness.get("/books/dune").await;
        let etag = response.headers()[header::ETAG].clone();

        let request = Request::get("/books/dune")
            .header(header::IF_NONE_MATCH, etag)
            .body(Body::empty())
            .unwrap();
        let response = harness.request(request).await;
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_clear_cache_rejects_wrong_token() {
        let harness = Harness::new(library_store());
        harness.get("/").await;

        for uri in ["/api/clear-cache?token=wrong", "/api/clear-cache"] {
            let response = harness.get(uri).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(
                body_json(response).await,
                json!({"revalidated": false, "message": "Invalid token"})
            );
        }

        harness.get("/").await;
        assert_eq!(harness.store.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_cache_with_token() {
        let harness = Harness::new(library_store());
        harness.get("/").await;
        harness.get("/books/dune").await;

        let response = harness.get(&format!("/api/clear-cache?token={TOKEN}")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["revalidated"], true);
        assert!(json["now"].as_i64().unwrap() > 0);

        harness.get("/").await;
        harness.get("/books/dune").await;
        assert_eq!(harness.store.queries().len(), 4);
    }

    #[tokio::test]
    async fn test_clear_cache_without_configured_token() {
        let store = Arc::new(library_store());
        let state = Arc::new(AppState::new(
            Arc::new(Library::new(store)),
            &MemoryCache::new(),
            site(),
            Some(String::new()),
            false,
            "1.0.0".to_owned(),
        ));

        let response = create_router(state)
            .oneshot(
                Request::get("/api/clear-cache?token=")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    /// Store whose first answer is outdated, and which clears the page cache
    /// while that first query is in flight.
    #[derive(Default)]
    struct EditedDuringFetchStore {
        state: OnceLock<Weak<AppState>>,
        calls: AtomicUsize,
    }

    impl ContentStore for EditedDuringFetchStore {
        fn query(&self, _query: &str, _params: &QueryParams) -> Result<Value, StoreError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let title = if call == 0 {
                if let Some(state) = self.state.get().and_then(Weak::upgrade) {
                    state.clear_pages();
                }
                "Dune (first edition)"
            } else {
                "Dune (revised)"
            };
            Ok(json!({"_id": "book-dune", "title": title, "slug": "dune", "chapters": []}))
        }
    }

    #[tokio::test]
    async fn test_clear_during_render_discards_stale_page() {
        let store = Arc::new(EditedDuringFetchStore::default());
        let state = Arc::new(AppState::new(
            Arc::new(Library::new(Arc::<EditedDuringFetchStore>::clone(&store))),
            &MemoryCache::new(),
            site(),
            Some(TOKEN.to_owned()),
            false,
            "1.0.0".to_owned(),
        ));
        store.state.set(Arc::downgrade(&state)).ok();

        let get = |state: &Arc<AppState>| {
            create_router(Arc::clone(state))
                .oneshot(Request::get("/books/dune").body(Body::empty()).unwrap())
        };

        let first = body_text(get(&state).await.unwrap()).await;
        assert!(first.contains("Dune (first edition)"));

        let second = body_text(get(&state).await.unwrap()).await;
        assert!(second.contains("Dune (revised)"));
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);

        let third = body_text(get(&state).await.unwrap()).await;
        assert!(third.contains("Dune (revised)"));
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_health() {
        let harness = Harness::new(MockStore::new());

        let response = harness.get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"status": "ok", "version": "1.0.0"})
        );
    }

    #[tokio::test]
    async fn test_security_headers() {
        let harness = Harness::new(library_store());

        let response = harness.get("/").await;
        let headers = response.headers();
        assert!(
            headers["content-security-policy"]
                .to_str()
                .unwrap()
                .contains("https://cdn.sanity.io")
        );
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
    }
}
