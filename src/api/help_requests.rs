use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use sea_orm::{EntityTrait, QueryOrder, Set};
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
        enums::{HelpStatus, Priority},
        help_request, HelpRequest,
    },
    error::AppError,
    store::{Resource, Store},
    validation::{parse_optional_enum, provided, Required},
};

const TABLE: &str = "help_requests";

/// Body of both create and update calls. Blank fields are treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct HelpRequestPayload {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

impl HelpRequestPayload {
    pub fn into_new(self) -> Result<help_request::ActiveModel, AppError> {
        let mut required = Required::new();
        let name = required.text("name", self.name);
        let phone = required.text("phone", self.phone);
        let location = required.text("location", self.location);
        required.finish()?;

        let priority = parse_optional_enum::<Priority>("priority", self.priority)?;
        let status = parse_optional_enum::<HelpStatus>("status", self.status)?;

        Ok(help_request::ActiveModel {
            name: Set(name),
            phone: Set(phone),
            location: Set(location),
            description: Set(provided(self.description)),
            priority: Set(priority.unwrap_or(Priority::Medium)),
            status: Set(status.unwrap_or(HelpStatus::Pending)),
            ..Default::default()
        })
    }

    /// Merges the provided fields into `model`. Nothing is touched on error.
    pub fn apply(self, model: &mut help_request::Model) -> Result<(), AppError> {
        let priority = parse_optional_enum::<Priority>("priority", self.priority)?;
        let status = parse_optional_enum::<HelpStatus>("status", self.status)?;

        if let Some(name) = provided(self.name) {
            model.name = name;
        }
        if let Some(phone) = provided(self.phone) {
            model.phone = phone;
        }
        if let Some(location) = provided(self.location) {
            model.location = location;
        }
        if let Some(description) = provided(self.description) {
            model.description = Some(description);
        }
        if let Some(priority) = priority {
            model.priority = priority;
        }
        if let Some(status) = status {
            model.status = status;
        }
        Ok(())
    }
}

// POST /help-requests
pub async fn create_help_request(
    Extension(store): Extension<Store>,
    identity: Option<Extension<Identity>>,
    AppJson(payload): AppJson<HelpRequestPayload>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "create", None, identity.as_ref());

    let created = store.insert(payload.into_new()?).await?;
    tracing::Span::current().record("record_id", created.id);
    info!("Created help request {} with priority {:?}", created.id, created.priority);

    Ok((StatusCode::CREATED, Json(created)))
}

// GET /help-requests - newest first
pub async fn list_help_requests(
    Extension(store): Extension<Store>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "list", None, None);

    let requests = store
        .list(
            HelpRequest::find()
                .order_by_desc(help_request::Column::CreatedAt)
                .order_by_desc(help_request::Column::Id),
        )
        .await?;
    Ok(Json(requests))
}

// GET /help-requests/:id
pub async fn get_help_request(
    Extension(store): Extension<Store>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "get", Some(id), None);
    Ok(Json(store.get::<HelpRequest>(id).await?))
}

// PUT /help-requests/:id
pub async fn update_help_request(
    Extension(store): Extension<Store>,
    identity: Option<Extension<Identity>>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<HelpRequestPayload>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "update", Some(id), identity.as_ref());

    let updated = store
        .patch::<HelpRequest, _>(id, |model| payload.apply(model))
        .await?;
    info!("Updated help request {}", id);

    Ok(Json(updated))
}

// DELETE /help-requests/:id
pub async fn delete_help_request(
    Extension(store): Extension<Store>,
    identity: Option<Extension<Identity>>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "delete", Some(id), identity.as_ref());

    store.remove::<HelpRequest>(id).await?;
    info!("Deleted help request {}", id);

    Ok(deleted(HelpRequest::LABEL))
}
