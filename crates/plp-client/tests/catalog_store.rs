//! End-to-end tests for `CatalogStore` driving a real `ProductsClient`
//! against `wiremock`.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use plp_client::{CatalogStore, LoadOutcome, ProductsClient, SkipReason};

fn test_store(base_url: &str, page_size: u32) -> CatalogStore<ProductsClient> {
    let client =
        ProductsClient::new(base_url, 5, "plp-test/0.1", 0, 0).expect("failed to build client");
    CatalogStore::new(client, page_size)
}

fn page_json(ids: std::ops::RangeInclusive<u64>, total: u64) -> serde_json::Value {
    let products: Vec<serde_json::Value> = ids
        .map(|id| {
            json!({
                "id": id,
                "title": format!("Item {id}"),
                "price": 10.0,
                "stock": 1,
                "brand": "Acme",
                "category": "misc"
            })
        })
        .collect();
    json!({ "products": products, "total": total })
}

async fn mount_list_page(server: &MockServer, skip: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("limit", "2"))
        .and(query_param("skip", skip))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn pages_through_list_endpoint_until_total() {
    let server = MockServer::start().await;
    mount_list_page(&server, "0", page_json(1..=2, 5)).await;
    mount_list_page(&server, "2", page_json(3..=4, 5)).await;
    mount_list_page(&server, "4", page_json(5..=5, 5)).await;

    let store = test_store(&server.uri(), 2);
    for _ in 0..3 {
        assert!(matches!(
            store.load_more().await.unwrap(),
            LoadOutcome::Loaded { .. }
        ));
    }
    assert_eq!(
        store.load_more().await.unwrap(),
        LoadOutcome::Skipped(SkipReason::Exhausted)
    );

    let state = store.snapshot();
    assert_eq!(
        state.items.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );
    assert_eq!(state.page, 3);
    assert!(!state.has_more);
}

#[tokio::test]
async fn search_hits_search_endpoint_from_offset_zero() {
    let server = MockServer::start().await;
    mount_list_page(&server, "0", page_json(1..=2, 5)).await;
    mount_list_page(&server, "2", page_json(3..=4, 5)).await;

    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", "laptop"))
        .and(query_param("limit", "2"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page_json(70..=71, 4)))
        .expect(1)
        .mount(&server)
        .await;

    let store = test_store(&server.uri(), 2);
    store.load_more().await.unwrap();
    store.load_more().await.unwrap();

    let outcome = store.search("laptop").await.unwrap();
    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            appended: 2,
            total: 4
        }
    );
    let state = store.snapshot();
    assert_eq!(state.query, "laptop");
    assert_eq!(
        state.items.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![70, 71]
    );
    assert!(state.has_more);
}

#[tokio::test]
async fn http_failure_is_surfaced_and_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_list_page(&server, "0", page_json(1..=2, 2)).await;

    let store = test_store(&server.uri(), 2);
    assert!(store.load_more().await.is_err());
    let state = store.snapshot();
    assert!(!state.loading);
    assert!(state.items.is_empty());
    assert!(state.last_error.is_some());

    let outcome = store.retry().await.unwrap();
    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            appended: 2,
            total: 2
        }
    );
    assert!(store.snapshot().last_error.is_none());
}
