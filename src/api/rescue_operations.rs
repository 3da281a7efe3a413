use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;

use super::{
    deleted,
    extract::{AppJson, AppPath},
    trace_action,
};
use crate::{
    auth::Identity,
    entities::{
        enums::{OperationStatus, Priority},
        rescue_operation, RescueOperation,
    },
    error::AppError,
    lifecycle,
    store::{Resource, Store},
    validation::{
        changed_count, non_negative, parse_enum, parse_optional_enum, parse_timestamp, provided,
        Required,
    },
};

const TABLE: &str = "rescue_operations";

#[derive(Debug, Default, Deserialize)]
pub struct RescueOperationPayload {
    pub operation_name: Option<String>,
    pub help_request_id: Option<i32>,
    pub volunteer_id: Option<i32>,
    pub team_size: Option<i32>,
    pub vehicle_type: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub people_rescued: Option<i32>,
}

/// Zero is how older clients say "no link".
fn reference(id: Option<i32>) -> Option<i32> {
    id.filter(|id| *id > 0)
}

impl RescueOperationPayload {
    pub fn into_new(
        self,
        now: chrono::NaiveDateTime,
    ) -> Result<rescue_operation::ActiveModel, AppError> {
        let mut required = Required::new();
        let operation_name = required.text("operation_name", self.operation_name);
        let team_size = required.positive("team_size", self.team_size);
        let location = required.text("location", self.location);
        required.finish()?;

        let status = parse_optional_enum::<OperationStatus>("status", self.status)?
            .unwrap_or(OperationStatus::Initiated);
        let priority = parse_optional_enum::<Priority>("priority", self.priority)?
            .unwrap_or(Priority::Medium);
        let start_time = parse_timestamp("start_time", self.start_time)?.unwrap_or(now);
        let end_time = parse_timestamp("end_time", self.end_time)?;
        let people_rescued = non_negative("people_rescued", self.people_rescued)?;

        Ok(rescue_operation::ActiveModel {
            operation_name: Set(operation_name),
            help_request_id: Set(reference(self.help_request_id)),
            volunteer_id: Set(reference(self.volunteer_id)),
            team_size: Set(team_size),
            vehicle_type: Set(provided(self.vehicle_type)),
            location: Set(location),
            start_time: Set(start_time),
            end_time: Set(lifecycle::end_time_at_creation(status, end_time, now)),
            status: Set(status),
            priority: Set(priority),
            people_rescued: Set(people_rescued),
            ..Default::default()
        })
    }

    pub fn apply(
        self,
        model: &mut rescue_operation::Model,
        now: chrono::NaiveDateTime,
    ) -> Result<(), AppError> {
        let status = parse_optional_enum::<OperationStatus>("status", self.status)?;
        let priority = parse_optional_enum::<Priority>("priority", self.priority)?;
        let start_time = parse_timestamp("start_time", self.start_time)?;
        let end_time = parse_timestamp("end_time", self.end_time)?;
        let team_size = changed_count("team_size", self.team_size)?;
        let people_rescued = changed_count("people_rescued", self.people_rescued)?;

        if let Some(operation_name) = provided(self.operation_name) {
            model.operation_name = operation_name;
        }
        if let Some(id) = reference(self.help_request_id) {
            model.help_request_id = Some(id);
        }
        if let Some(id) = reference(self.volunteer_id) {
            model.volunteer_id = Some(id);
        }
        if let Some(team_size) = team_size {
            model.team_size = team_size;
        }
        if let Some(vehicle_type) = provided(self.vehicle_type) {
            model.vehicle_type = Some(vehicle_type);
        }
        if let Some(location) = provided(self.location) {
            model.location = location;
        }
        if let Some(start_time) = start_time {
            model.start_time = start_time;
        }
        if let Some(priority) = priority {
            model.priority = priority;
        }
        if let Some(people_rescued) = people_rescued {
            model.people_rescued = people_rescued;
        }

        lifecycle::transition(model, status, end_time, now);
        Ok(())
    }
}

// POST /rescue-operations
pub async fn create_rescue_operation(
    Extension(store): Extension<Store>,
    identity: Option<Extension<Identity>>,
    AppJson(payload): AppJson<RescueOperationPayload>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "create", None, identity.as_ref());

    let now = chrono::Utc::now().naive_utc();
    let created = store.insert(payload.into_new(now)?).await?;
    tracing::Span::current().record("record_id", created.id);
    info!(
        "Launched rescue operation {} ({:?}, {:?})",
        created.id, created.priority, created.status
    );

    Ok((StatusCode::CREATED, Json(created)))
}

// GET /rescue-operations - triage order
pub async fn list_rescue_operations(
    Extension(store): Extension<Store>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "list", None, None);
    Ok(Json(store.list(lifecycle::triage_queue()).await?))
}

// GET /rescue-operations/:id
pub async fn get_rescue_operation(
    Extension(store): Extension<Store>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "get", Some(id), None);
    Ok(Json(store.get::<RescueOperation>(id).await?))
}

// GET /rescue-operations/status/active
pub async fn list_active_operations(
    Extension(store): Extension<Store>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "list_active", None, None);
    Ok(Json(store.list(lifecycle::active_queue()).await?))
}

// GET /rescue-operations/priority/:priority
pub async fn list_operations_by_priority(
    Extension(store): Extension<Store>,
    AppPath(priority): AppPath<String>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "list_by_priority", None, None);

    let priority = parse_enum::<Priority>("priority", priority.trim())?;
    Ok(Json(store.list(lifecycle::by_priority(priority)).await?))
}

// PUT /rescue-operations/:id
pub async fn update_rescue_operation(
    Extension(store): Extension<Store>,
    identity: Option<Extension<Identity>>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<RescueOperationPayload>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "update", Some(id), identity.as_ref());

    let now = chrono::Utc::now().naive_utc();
    let updated = store
        .patch::<RescueOperation, _>(id, |model| payload.apply(model, now))
        .await?;

    if updated.status.is_terminal() {
        tracing::Span::current().record(
            "business_event",
            format!("Rescue operation {:?}", updated.status).as_str(),
        );
    }
    info!("Updated rescue operation {} to {:?}", id, updated.status);

    Ok(Json(updated))
}

// DELETE /rescue-operations/:id
pub async fn delete_rescue_operation(
    Extension(store): Extension<Store>,
    identity: Option<Extension<Identity>>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "delete", Some(id), identity.as_ref());

    store.remove::<RescueOperation>(id).await?;
    info!("Deleted rescue operation {}", id);

    Ok(deleted(RescueOperation::LABEL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::ActiveValue;

    fn at(hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, 27)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn payload() -> RescueOperationPayload {
        RescueOperationPayload {
            operation_name: Some("Wellampitiya sweep".into()),
            team_size: Some(6),
            location: Some("Wellampitiya".into()),
            ..Default::default()
        }
    }

    fn stored() -> rescue_operation::Model {
        rescue_operation::Model {
            id: 4,
            operation_name: "Wellampitiya sweep".into(),
            help_request_id: Some(2),
            volunteer_id: None,
            team_size: 6,
            vehicle_type: None,
            location: "Wellampitiya".into(),
            start_time: at(6),
            end_time: None,
            status: OperationStatus::InProgress,
            priority: Priority::High,
            people_rescued: 3,
            created_at: at(6),
            updated_at: at(6),
        }
    }

    #[test]
    fn create_applies_defaults() {
        let model = payload().into_new(at(8)).unwrap();

        assert_eq!(model.status, ActiveValue::Set(OperationStatus::Initiated));
        assert_eq!(model.priority, ActiveValue::Set(Priority::Medium));
        assert_eq!(model.start_time, ActiveValue::Set(at(8)));
        assert_eq!(model.end_time, ActiveValue::Set(None));
        assert_eq!(model.people_rescued, ActiveValue::Set(0));
        assert_eq!(model.help_request_id, ActiveValue::Set(None));
    }

    #[test]
    fn create_requires_name_and_team() {
        let err = RescueOperationPayload {
            location: Some("Kolonnawa".into()),
            team_size: Some(0),
            ..Default::default()
        }
        .into_new(at(8))
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Missing required fields: operation_name, team_size"
        );
    }

    #[test]
    fn create_rejects_negative_rescues() {
        let err = RescueOperationPayload {
            people_rescued: Some(-2),
            ..payload()
        }
        .into_new(at(8))
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn completing_stamps_end_time_once() {
        let mut model = stored();

        RescueOperationPayload {
            status: Some("completed".into()),
            people_rescued: Some(11),
            ..Default::default()
        }
        .apply(&mut model, at(10))
        .unwrap();
        assert_eq!(model.end_time, Some(at(10)));
        assert_eq!(model.people_rescued, 11);

        RescueOperationPayload {
            status: Some("completed".into()),
            ..Default::default()
        }
        .apply(&mut model, at(12))
        .unwrap();
        assert_eq!(model.end_time, Some(at(10)));
    }

    #[test]
    fn invalid_status_changes_nothing() {
        let mut model = stored();
        let before = model.clone();

        let err = RescueOperationPayload {
            team_size: Some(9),
            status: Some("aborted".into()),
            ..Default::default()
        }
        .apply(&mut model, at(10))
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid status. Use: initiated, in-progress, completed, failed"
        );
        assert_eq!(model, before);
    }
}
