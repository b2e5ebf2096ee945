//! AlertClient against a mocked backend

mod common;

use alertprobe::client::{collect_pages, AlertClient, AlertSource};
use alertprobe::config::BackendConfig;
use alertprobe::models::time::utc_instant;
use alertprobe::models::{AlertFilter, EndPoint, TimeSlice};
use alertprobe::Error;
use common::{alert_json, alerts_json, page_json, MockBackend, LIST_PATH, TOKEN};
use futures::future::join_all;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn open_filter() -> AlertFilter {
    AlertFilter::builder(TimeSlice::since_start_of_record())
        .open(true)
        .all_directions()
        .build()
}

#[tokio::test]
async fn returns_page_with_continuation_token() {
    let backend = MockBackend::start().await;
    Mock::given(method("POST"))
        .and(path(LIST_PATH))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .and(body_partial_json(json!({
            "tenant_id": "meta-tap",
            "count": 10,
            "paging_token": "",
            "filter": { "open_alerts": true, "closed_alerts": false }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![alert_json("a-1", Some("prod")), alert_json("a-2", None)],
            "page-2",
        )))
        .expect(1)
        .mount(backend.inner())
        .await;

    let page = backend
        .client()
        .list_alerts("meta-tap", &open_filter(), 10, "")
        .await
        .unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page.next_token, "page-2");
    assert!(!page.is_last());
    assert_eq!(page.alerts[0].client_zone(), Some("prod"));
    assert!(matches!(page.alerts[1].client, EndPoint::External(_)));
}

#[tokio::test]
async fn empty_window_is_empty_page_not_error() {
    let backend = MockBackend::start().await;
    backend.respond(page_json(vec![], "")).await;

    let filter = AlertFilter::builder(TimeSlice::new(
        utc_instant(2022, 7, 25, 3, 8).unwrap(),
        utc_instant(2022, 7, 25, 3, 9).unwrap(),
    ))
    .open(true)
    .zone("intern-nightly")
    .build();

    let page = backend
        .client()
        .list_alerts("meta-tap", &filter, 10, "")
        .await
        .unwrap();

    assert!(page.is_empty());
    assert!(page.is_last());
}

#[tokio::test]
async fn bare_envelope_without_status_is_success() {
    let backend = MockBackend::start().await;
    backend.respond(json!({ "alerts": [alert_json("a", None)] })).await;

    let page = backend
        .client()
        .list_alerts("meta-tap", &open_filter(), 10, "")
        .await
        .unwrap();

    assert_eq!(page.len(), 1);
    assert!(page.is_last());
}

#[tokio::test]
async fn unauthorized_is_transport_error() {
    let backend = MockBackend::start().await;
    backend.fail(401, "invalid token").await;

    let err = backend
        .client()
        .list_alerts("meta-tap", &open_filter(), 10, "")
        .await
        .unwrap_err();

    assert!(err.is_transport(), "got {err:?}");
    assert!(err.to_string().contains("invalid token"));
}

#[tokio::test]
async fn server_fault_is_backend_error_with_payload() {
    let backend = MockBackend::start().await;
    backend
        .fail(
            500,
            r#"{"response":{"code":"FAILURE","message":"tenant meta-tap not provisioned"}}"#,
        )
        .await;

    let err = backend
        .client()
        .list_alerts("meta-tap", &open_filter(), 10, "")
        .await
        .unwrap_err();

    match err {
        Error::Backend {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 500);
            assert_eq!(code, "FAILURE");
            assert_eq!(message, "tenant meta-tap not provisioned");
        }
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn plain_text_fault_keeps_body() {
    let backend = MockBackend::start().await;
    backend.fail(502, "upstream unavailable").await;

    let err = backend
        .client()
        .list_alerts("meta-tap", &open_filter(), 10, "")
        .await
        .unwrap_err();

    assert!(err.is_backend());
    assert!(err.to_string().contains("upstream unavailable"));
}

#[tokio::test]
async fn failure_code_in_success_envelope_is_backend_error() {
    let backend = MockBackend::start().await;
    backend
        .respond(json!({
            "alerts": [],
            "paging_token": "",
            "response": { "code": "FAILURE", "message": "query timed out" }
        }))
        .await;

    let err = backend
        .client()
        .list_alerts("meta-tap", &open_filter(), 10, "")
        .await
        .unwrap_err();

    assert!(err.is_backend());
    assert!(err.to_string().contains("query timed out"));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let backend = MockBackend::start().await;
    Mock::given(method("POST"))
        .and(path(LIST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"alerts\": [ {"))
        .mount(backend.inner())
        .await;

    let err = backend
        .client()
        .list_alerts("meta-tap", &open_filter(), 10, "")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    // Reserve a port, then release it so nothing is listening there
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = AlertClient::new(&BackendConfig::new(format!("http://{addr}"), TOKEN)).unwrap();

    let err = client
        .list_alerts("meta-tap", &open_filter(), 10, "")
        .await
        .unwrap_err();

    assert!(err.is_transport(), "got {err:?}");
}

#[tokio::test]
async fn invalid_arguments_never_reach_the_network() {
    let backend = MockBackend::start().await;
    let client = backend.client();

    let zero_page = client.list_alerts("meta-tap", &open_filter(), 0, "").await;
    let no_tenant = client.list_alerts("", &open_filter(), 10, "").await;

    assert!(matches!(zero_page, Err(Error::InvalidRequest(_))));
    assert!(matches!(no_tenant, Err(Error::InvalidRequest(_))));
    assert_eq!(backend.calls().await, 0);
}

#[tokio::test]
async fn collect_pages_walks_tokens() {
    let backend = MockBackend::start().await;
    backend
        .respond_matching(
            json!({ "paging_token": "" }),
            page_json(alerts_json("p1", 3, Some("prod")), "t2"),
            1,
        )
        .await;
    backend
        .respond_matching(
            json!({ "paging_token": "t2" }),
            page_json(alerts_json("p2", 3, Some("prod")), "t3"),
            1,
        )
        .await;
    backend
        .respond_matching(
            json!({ "paging_token": "t3" }),
            page_json(alerts_json("p3", 1, Some("prod")), ""),
            1,
        )
        .await;

    let client = backend.client();
    let page = collect_pages(&client, "meta-tap", &open_filter(), 3, "", 10)
        .await
        .unwrap();

    assert!(page.is_last());
    assert_eq!(page.len(), 7);
    assert_eq!(page.alerts[6].alert_id, "p3-0");
    assert_eq!(backend.calls().await, 3);
}

#[tokio::test]
async fn collect_pages_reports_token_cycle() {
    let backend = MockBackend::start().await;
    for (token, next) in [("", "A"), ("A", "B"), ("B", "A")] {
        backend
            .respond_matching(
                json!({ "paging_token": token }),
                page_json(alerts_json(&format!("page-{token}"), 1, Some("prod")), next),
                1,
            )
            .await;
    }

    let client = backend.client();
    let err = collect_pages(&client, "meta-tap", &open_filter(), 1, "", 100)
        .await
        .unwrap_err();

    assert!(err.is_backend(), "got {err:?}");
    assert!(err.to_string().contains("PAGINATION_LOOP"));
    assert_eq!(backend.calls().await, 3);
}

#[tokio::test]
async fn collect_pages_stops_at_limit_with_pending_token() {
    let backend = MockBackend::start().await;
    backend
        .respond_matching(
            json!({ "paging_token": "" }),
            page_json(alerts_json("p1", 2, Some("prod")), "t2"),
            1,
        )
        .await;
    backend
        .respond_matching(
            json!({ "paging_token": "t2" }),
            page_json(alerts_json("p2", 2, Some("prod")), "t3"),
            1,
        )
        .await;

    let client = backend.client();
    let page = collect_pages(&client, "meta-tap", &open_filter(), 2, "", 2)
        .await
        .unwrap();

    assert_eq!(page.len(), 4);
    assert_eq!(page.next_token, "t3");
    assert_eq!(backend.calls().await, 2);
}

#[tokio::test]
async fn null_alert_list_is_empty_page() {
    let backend = MockBackend::start().await;
    backend
        .respond(json!({ "alerts": null, "paging_token": "" }))
        .await;

    let page = backend
        .client()
        .list_alerts("meta-tap", &open_filter(), 10, "")
        .await
        .unwrap();

    assert!(page.is_empty());
    assert!(page.is_last());
}

#[tokio::test]
async fn concurrent_calls_keep_their_own_results() {
    let backend = MockBackend::start().await;
    let zones = ["alpha", "beta", "gamma", "delta"];
    for (i, zone) in zones.iter().enumerate() {
        backend
            .respond_matching(
                json!({ "filter": { "zone": zone } }),
                page_json(alerts_json(zone, i + 1, Some(*zone)), ""),
                1,
            )
            .await;
    }

    let client = backend.client();
    let filters: Vec<_> = zones
        .iter()
        .map(|zone| {
            AlertFilter::builder(TimeSlice::since_start_of_record())
                .open(true)
                .zone(*zone)
                .build()
        })
        .collect();

    let pages = join_all(
        filters
            .iter()
            .map(|filter| client.list_alerts("meta-tap", filter, 10, "")),
    )
    .await;

    for (i, (zone, page)) in zones.iter().zip(pages).enumerate() {
        let page = page.unwrap();
        assert_eq!(page.len(), i + 1);
        assert!(page.alerts.iter().all(|a| a.client_zone() == Some(*zone)));
    }
}
