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
    entities::{enums::VolunteerStatus, volunteer, Volunteer},
    error::AppError,
    store::{Resource, Store},
    validation::{parse_optional_enum, provided, Required},
};

const TABLE: &str = "volunteers";

#[derive(Debug, Default, Deserialize)]
pub struct VolunteerPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Option<String>,
    pub availability: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
}

impl VolunteerPayload {
    pub fn into_new(self) -> Result<volunteer::ActiveModel, AppError> {
        let mut required = Required::new();
        let name = required.text("name", self.name);
        let email = required.text("email", self.email);
        let phone = required.text("phone", self.phone);
        required.finish()?;

        let status = parse_optional_enum::<VolunteerStatus>("status", self.status)?;

        Ok(volunteer::ActiveModel {
            name: Set(name),
            email: Set(email.trim().to_string()),
            phone: Set(phone),
            skills: Set(provided(self.skills)),
            availability: Set(provided(self.availability)),
            location: Set(provided(self.location)),
            status: Set(status.unwrap_or(VolunteerStatus::Active)),
            ..Default::default()
        })
    }

    pub fn apply(self, model: &mut volunteer::Model) -> Result<(), AppError> {
        let status = parse_optional_enum::<VolunteerStatus>("status", self.status)?;

        if let Some(name) = provided(self.name) {
            model.name = name;
        }
        if let Some(email) = provided(self.email) {
            model.email = email.trim().to_string();
        }
        if let Some(phone) = provided(self.phone) {
            model.phone = phone;
        }
        if let Some(skills) = provided(self.skills) {
            model.skills = Some(skills);
        }
        if let Some(availability) = provided(self.availability) {
            model.availability = Some(availability);
        }
        if let Some(location) = provided(self.location) {
            model.location = Some(location);
        }
        if let Some(status) = status {
            model.status = status;
        }
        Ok(())
    }
}

// POST /volunteers
pub async fn create_volunteer(
    Extension(store): Extension<Store>,
    identity: Option<Extension<Identity>>,
    AppJson(payload): AppJson<VolunteerPayload>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "create", None, identity.as_ref());

    // A duplicate email comes back from the store as a Conflict.
    let created = store.insert(payload.into_new()?).await?;
    tracing::Span::current().record("record_id", created.id);
    info!("Registered volunteer {}", created.id);

    Ok((StatusCode::CREATED, Json(created)))
}

// GET /volunteers - newest first
pub async fn list_volunteers(
    Extension(store): Extension<Store>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "list", None, None);

    let volunteers = store
        .list(
            Volunteer::find()
                .order_by_desc(volunteer::Column::CreatedAt)
                .order_by_desc(volunteer::Column::Id),
        )
        .await?;
    Ok(Json(volunteers))
}

// GET /volunteers/:id
pub async fn get_volunteer(
    Extension(store): Extension<Store>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "get", Some(id), None);
    Ok(Json(store.get::<Volunteer>(id).await?))
}

// PUT /volunteers/:id
pub async fn update_volunteer(
    Extension(store): Extension<Store>,
    identity: Option<Extension<Identity>>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<VolunteerPayload>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "update", Some(id), identity.as_ref());

    let updated = store
        .patch::<Volunteer, _>(id, |model| payload.apply(model))
        .await?;
    info!("Updated volunteer {}", id);

    Ok(Json(updated))
}

// DELETE /volunteers/:id
pub async fn delete_volunteer(
    Extension(store): Extension<Store>,
    identity: Option<Extension<Identity>>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "delete", Some(id), identity.as_ref());

    store.remove::<Volunteer>(id).await?;
    info!("Deleted volunteer {}", id);

    Ok(deleted(Volunteer::LABEL))
}
