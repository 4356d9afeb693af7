use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;
use us_income_map::config::{AppConfig, Source};
use us_income_map::server::{build_router, AppState};

fn fixture(name: &str) -> Source {
    Source::File(
        std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name),
    )
}

fn app_with(income: Source, states: Source) -> Router {
    let mut config = AppConfig::default();
    config.input.income_csv = income;
    config.input.states_geojson = states;
    build_router(AppState {
        config,
        client: reqwest::Client::new(),
    })
}

fn app() -> Router {
    app_with(fixture("income.csv"), fixture("states.json"))
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn dashboard_shows_selected_state_table() {
    let (status, body) = get(app(), "/?state=Vermont").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("US State Median Income Map"));
    assert!(body.contains("Bennington County"));
    assert!(!body.contains("Belknap County"));
    assert!(body.contains("$40,000"));
    assert!(body.contains(r#"<option value="Vermont" selected>Vermont</option>"#));
}

#[tokio::test]
async fn dashboard_defaults_to_first_state() {
    let (status, body) = get(app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<option value="New Hampshire" selected>"#));
    assert!(body.contains("$61,500"));
    assert!(body.contains("Carroll County"));
}

#[tokio::test]
async fn unknown_state_is_not_found() {
    let (status, body) = get(app(), "/?state=Atlantis").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Atlantis"));
}

#[tokio::test]
async fn unreadable_source_aborts_render() {
    let (status, _) = get(app_with(fixture("missing.csv"), fixture("states.json")), "/").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn states_api_lists_medians() {
    let (status, body) = get(app(), "/api/states").await;
    assert_eq!(status, StatusCode::OK);
    let medians: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        medians,
        serde_json::json!([
            { "state": "New Hampshire", "medianincome": 61500.0 },
            { "state": "Vermont", "medianincome": 40000.0 }
        ])
    );
}

#[tokio::test]
async fn counties_api_appends_median() {
    let (status, body) = get(app(), "/api/counties?state=Vermont").await;
    assert_eq!(status, StatusCode::OK);
    let table: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(table["counties"].as_array().unwrap().len(), 3);
    assert_eq!(table["median"]["county"], "Median");
    assert_eq!(table["median"]["income-2015"], 40000.0);
    assert_eq!(table["median"]["income-1989"], 24000.0);
}

#[tokio::test]
async fn map_api_injects_default_for_unmatched_features() {
    let (status, body) = get(app(), "/api/map").await;
    assert_eq!(status, StatusCode::OK);
    let fc: serde_json::Value = serde_json::from_str(&body).unwrap();
    let values: Vec<_> = fc["features"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| {
            (
                f["properties"]["name"].as_str().unwrap().to_string(),
                f["properties"]["medianincome"].as_f64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        values,
        [
            ("Vermont".to_string(), 40000.0),
            ("New Hampshire".to_string(), 61500.0),
            ("Maine".to_string(), 0.0),
        ]
    );
}

#[tokio::test]
async fn dataset_without_states_is_unprocessable() {
    let (status, body) = get(app_with(fixture("empty.csv"), fixture("states.json")), "/").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("no recognisable state"));
}

#[tokio::test]
async fn rerendering_the_dashboard_is_deterministic() {
    let (first_status, first) = get(app(), "/?state=Vermont").await;
    let (second_status, second) = get(app(), "/?state=Vermont").await;
    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);
}

#[tokio::test]
async fn rerendering_the_map_is_deterministic() {
    let (first_status, first) = get(app(), "/api/map").await;
    let (second_status, second) = get(app(), "/api/map").await;
    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);
}
