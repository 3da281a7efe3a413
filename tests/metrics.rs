mod common;

use common::*;
use floodrelief_server::{app::app, metrics::init_metrics};
use serde_json::json;

fn records_total(rendered: &str, table: &str) -> Option<f64> {
    let series = format!("floodrelief_records_total{{table=\"{table}\"}}");
    rendered
        .lines()
        .find_map(|line| line.strip_prefix(series.as_str()))
        .and_then(|value| value.trim().parse().ok())
}

#[tokio::test]
async fn startup_counts_reach_the_exporter() {
    let store = store().await;
    let app = app(store.clone(), &config(false));

    for name in ["A", "B"] {
        create(
            &app,
            "/api/v1/help-requests",
            json!({"name": name, "phone": "123", "location": "X"}),
        )
        .await;
    }

    let (_layer, handle) = init_metrics(store.connection()).await;
    let rendered = handle.render();
    assert_eq!(records_total(&rendered, "help_requests"), Some(2.0), "{rendered}");
    assert_eq!(records_total(&rendered, "volunteers"), Some(0.0), "{rendered}");

    create(
        &app,
        "/api/v1/help-requests",
        json!({"name": "C", "phone": "456", "location": "Y"}),
    )
    .await;
    assert_eq!(records_total(&handle.render(), "help_requests"), Some(3.0));
}
