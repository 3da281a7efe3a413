use axum_prometheus::PrometheusMetricLayer;
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::{DatabaseConnection, EntityName, EntityTrait, PaginatorTrait};

use crate::entities::{EmergencyContact, HelpRequest, ReliefSupply, RescueOperation, Volunteer};

async fn seed<E>(db: &DatabaseConnection) -> u64
where
    E: EntityTrait,
    E::Model: Sync,
{
    let table = E::default().table_name().to_string();
    let count = E::find().count(db).await.unwrap_or(0);
    metrics::gauge!("floodrelief_records_total", "table" => table).set(count as f64);
    count
}

/// Installs the Prometheus recorder, then seeds the per-table gauges from the
/// current row counts.
///
/// Gauges written before the recorder exists are dropped, so the order matters.
pub async fn init_metrics(
    db: &DatabaseConnection,
) -> (PrometheusMetricLayer<'static>, PrometheusHandle) {
    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let help_requests = seed::<HelpRequest>(db).await;
    let volunteers = seed::<Volunteer>(db).await;
    let supplies = seed::<ReliefSupply>(db).await;
    let operations = seed::<RescueOperation>(db).await;
    let contacts = seed::<EmergencyContact>(db).await;

    tracing::info!(
        "Initialized metrics: HelpRequests={}, Volunteers={}, Supplies={}, Operations={}, Contacts={}",
        help_requests, volunteers, supplies, operations, contacts
    );

    (prometheus_layer, metric_handle)
}

pub fn record_created(table: &str) {
    metrics::counter!("floodrelief_records_created_total", "table" => table.to_string()).increment(1);
    metrics::gauge!("floodrelief_records_total", "table" => table.to_string()).increment(1.0);
}

pub fn record_deleted(table: &str) {
    metrics::counter!("floodrelief_records_deleted_total", "table" => table.to_string()).increment(1);
    metrics::gauge!("floodrelief_records_total", "table" => table.to_string()).decrement(1.0);
}
