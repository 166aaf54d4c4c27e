//! API integration tests against the full router with real run data.

#![cfg(feature = "api")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::util::ServiceExt;

use citygrid_sim::api::{AppState, router};
use citygrid_sim::config::ScenarioConfig;
use citygrid_sim::sim::engine::Engine;
use citygrid_sim::sim::kpi::KpiReport;

const V1_KEYS: &[&str] = &[
    "timestep",
    "hour",
    "vehicles",
    "base_mw",
    "signals_mw",
    "street_lights_mw",
    "ev_mw",
    "ev_potential_mw",
    "total_load_mw",
    "generation_mw",
    "shortage_mw",
    "renewable_share",
    "max_loading",
    "condition",
    "signal_mode",
    "street_dimming",
    "ev_limit",
    "affected_intersections",
    "feeders_ok",
];

fn make_state() -> Arc<AppState> {
    let scenario = ScenarioConfig::downtown();
    let mut engine = Engine::from_scenario(&scenario);
    let results = engine.run();
    let config = engine.config().clone();
    let kpi = KpiReport::from_results(&results, config.dt_hours);
    Arc::new(AppState {
        config,
        kpi,
        results,
    })
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn assert_has_v1_keys(object: &serde_json::Map<String, Value>) {
    for key in V1_KEYS {
        assert!(object.contains_key(*key), "missing key: {key}");
    }
}

#[tokio::test]
async fn state_carries_config_kpi_and_latest_record() {
    let (status, state) = get_json(router(make_state()), "/state").await;
    assert_eq!(status, StatusCode::OK);

    let obj = state.as_object().expect("state should be an object");
    assert!(obj.contains_key("config"));
    assert!(obj.contains_key("kpi"));

    let latest = state["latest_step"]
        .as_object()
        .expect("latest_step should be a record");
    assert_has_v1_keys(latest);
    assert_eq!(latest["timestep"].as_u64(), Some(23));

    let kpi = state["kpi"].as_object().expect("kpi should be an object");
    assert!(kpi.contains_key("peak_load_mw"));
    assert!(kpi.contains_key("energy_unserved_mwh"));
}

#[tokio::test]
async fn telemetry_range_is_inclusive_and_schema_complete() {
    let (status, telemetry) = get_json(router(make_state()), "/telemetry?from=2&to=4").await;
    assert_eq!(status, StatusCode::OK);

    let rows = telemetry.as_array().expect("telemetry should be an array");
    assert_eq!(rows.len(), 3);
    for row in rows {
        assert_has_v1_keys(row.as_object().expect("row should be an object"));
    }
    assert_eq!(rows[0]["timestep"].as_u64(), Some(2));
    assert_eq!(rows[2]["timestep"].as_u64(), Some(4));
}

#[tokio::test]
async fn telemetry_inverted_range_is_a_client_error() {
    let (status, body) = get_json(router(make_state()), "/telemetry?from=9&to=3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn condition_names_use_wire_format() {
    let (_, telemetry) = get_json(router(make_state()), "/telemetry").await;
    let rows = telemetry.as_array().expect("telemetry should be an array");
    for row in rows {
        let condition = row["condition"].as_str().expect("condition is a string");
        assert!(
            ["normal", "stressed", "critical", "blackout"].contains(&condition),
            "unexpected condition name {condition}"
        );
    }
}
