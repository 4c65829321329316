use serde_json::Value;
use tokio::net::TcpListener;

use wastemap::config::Config;
use wastemap::server::{serve, start_server, AppState};
use wastemap::{LoadError, PipelineError, ServerError, WasteReport};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sipsn_sample.csv");

async fn spawn_server() -> String {
    let report = WasteReport::load(FIXTURE).expect("Failed to load fixture");
    let state = AppState::new(report, vec!["Jawa Barat".to_string(), "Bali".to_string()]);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        serve(listener, state).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_health() {
    let base = spawn_server().await;
    let body: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["retainedRows"], 13);
    assert_eq!(body["provinces"], 4);
    assert_eq!(body["format"]["delimiter"], ";");
    assert_eq!(body["format"]["header"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_categories_endpoint() {
    let base = spawn_server().await;
    let body: Value = reqwest::get(format!("{base}/api/categories"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let counts = body["counts"].as_array().unwrap();
    assert_eq!(counts.len(), 3);
    assert_eq!(counts[0]["category"], "GREEN");
    assert_eq!(counts[0]["count"], 2);
    assert_eq!(counts[2]["category"], "RED");
    assert_eq!(body["total"], 4);
}

#[tokio::test]
async fn test_averages_and_totals_endpoints() {
    let base = spawn_server().await;

    let averages: Value = reqwest::get(format!("{base}/api/averages"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(averages["provinces"].as_array().unwrap().len(), 4);
    assert_eq!(averages["withoutData"][0], "Papua Barat Daya");

    let totals: Value = reqwest::get(format!("{base}/api/totals"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let totals = totals.as_array().unwrap();
    assert!(totals.iter().all(|t| t["year"] != 2018));
    assert_eq!(totals[0]["year"], 2019);
    assert_eq!(totals[0]["province"], "Aceh");
}

#[tokio::test]
async fn test_chart_pages() {
    let base = spawn_server().await;

    for slug in [
        "total_annual_waste",
        "total_annual_waste_specific",
        "average_annual_waste",
        "average_annual_waste_category_count",
    ] {
        let response = reqwest::get(format!("{base}/{slug}")).await.unwrap();
        assert_eq!(response.status(), 200, "{slug}");
        let body = response.text().await.unwrap();
        assert!(body.contains("<svg"), "{slug}");
    }
}

#[tokio::test]
async fn test_specific_chart_query_override() {
    let base = spawn_server().await;
    let response = reqwest::get(format!(
        "{base}/api/charts/total_annual_waste_specific?provinces=Aceh"
    ))
    .await
    .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "image/svg+xml"
    );
    let svg = response.text().await.unwrap();
    assert!(svg.contains("Aceh"));
    assert!(!svg.contains("Jawa Barat"));
}

#[tokio::test]
async fn test_unknown_chart_is_404() {
    let base = spawn_server().await;
    let response = reqwest::get(format!("{base}/pie_chart")).await.unwrap();

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_index_page() {
    let base = spawn_server().await;
    let html = reqwest::get(format!("{base}/"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains("Waste Generation in Indonesia"));
    assert!(html.contains("href=\"/average_annual_waste\""));
    assert!(html.contains("Kalimantan Utara"));
}

#[tokio::test]
async fn test_start_server_fails_on_missing_dataset() {
    let config = Config {
        data_path: "/definitely/not/here.csv".into(),
        port: 0,
        ..Config::default()
    };

    let err = start_server(&config).await.unwrap_err();
    assert!(matches!(
        err,
        ServerError::Pipeline(PipelineError::Load(LoadError::Io(_)))
    ));
}
