use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Select, Set};
use serde::Deserialize;
use tracing::info;

use super::{
    deleted,
    extract::{AppJson, AppPath},
    trace_action,
};
use crate::{
    auth::Identity,
    entities::{emergency_contact, enums::ServiceType, EmergencyContact},
    error::AppError,
    store::{Resource, Store},
    validation::{parse_enum, parse_optional_enum, provided, Required},
};

const TABLE: &str = "emergency_contacts";

#[derive(Debug, Default, Deserialize)]
pub struct EmergencyContactPayload {
    pub organization_name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub alternate_phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub service_type: Option<String>,
    pub is_active: Option<bool>,
}

impl EmergencyContactPayload {
    pub fn into_new(self) -> Result<emergency_contact::ActiveModel, AppError> {
        let mut required = Required::new();
        let organization_name = required.text("organization_name", self.organization_name);
        let phone = required.text("phone", self.phone);
        required.finish()?;

        let service_type = parse_optional_enum::<ServiceType>("service_type", self.service_type)?;

        Ok(emergency_contact::ActiveModel {
            organization_name: Set(organization_name),
            contact_person: Set(provided(self.contact_person)),
            phone: Set(phone),
            alternate_phone: Set(provided(self.alternate_phone)),
            email: Set(provided(self.email)),
            address: Set(provided(self.address)),
            service_type: Set(service_type),
            is_active: Set(self.is_active.unwrap_or(true)),
            ..Default::default()
        })
    }

    pub fn apply(self, model: &mut emergency_contact::Model) -> Result<(), AppError> {
        let service_type = parse_optional_enum::<ServiceType>("service_type", self.service_type)?;

        if let Some(organization_name) = provided(self.organization_name) {
            model.organization_name = organization_name;
        }
        if let Some(contact_person) = provided(self.contact_person) {
            model.contact_person = Some(contact_person);
        }
        if let Some(phone) = provided(self.phone) {
            model.phone = phone;
        }
        if let Some(alternate_phone) = provided(self.alternate_phone) {
            model.alternate_phone = Some(alternate_phone);
        }
        if let Some(email) = provided(self.email) {
            model.email = Some(email);
        }
        if let Some(address) = provided(self.address) {
            model.address = Some(address);
        }
        if service_type.is_some() {
            model.service_type = service_type;
        }
        if let Some(is_active) = self.is_active {
            model.is_active = is_active;
        }
        Ok(())
    }
}

fn alphabetical(query: Select<EmergencyContact>) -> Select<EmergencyContact> {
    query
        .order_by_asc(emergency_contact::Column::OrganizationName)
        .order_by_asc(emergency_contact::Column::Id)
}

// POST /emergency-contacts
pub async fn create_emergency_contact(
    Extension(store): Extension<Store>,
    identity: Option<Extension<Identity>>,
    AppJson(payload): AppJson<EmergencyContactPayload>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "create", None, identity.as_ref());

    let created = store.insert(payload.into_new()?).await?;
    tracing::Span::current().record("record_id", created.id);
    info!("Created emergency contact: {}", created.id);

    Ok((StatusCode::CREATED, Json(created)))
}

// GET /emergency-contacts - by organization name
pub async fn list_emergency_contacts(
    Extension(store): Extension<Store>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "list", None, None);
    Ok(Json(store.list(alphabetical(EmergencyContact::find())).await?))
}

// GET /emergency-contacts/:id
pub async fn get_emergency_contact(
    Extension(store): Extension<Store>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "get", Some(id), None);
    Ok(Json(store.get::<EmergencyContact>(id).await?))
}

// GET /emergency-contacts/status/active
pub async fn list_active_contacts(
    Extension(store): Extension<Store>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "list_active", None, None);

    let contacts = store
        .list(alphabetical(
            EmergencyContact::find().filter(emergency_contact::Column::IsActive.eq(true)),
        ))
        .await?;
    Ok(Json(contacts))
}

// GET /emergency-contacts/service/:service_type - active contacts only
pub async fn list_contacts_by_service(
    Extension(store): Extension<Store>,
    AppPath(service_type): AppPath<String>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "list_by_service", None, None);

    let service_type = parse_enum::<ServiceType>("service_type", service_type.trim())?;
    let contacts = store
        .list(alphabetical(
            EmergencyContact::find()
                .filter(emergency_contact::Column::ServiceType.eq(service_type))
                .filter(emergency_contact::Column::IsActive.eq(true)),
        ))
        .await?;
    Ok(Json(contacts))
}

// PUT /emergency-contacts/:id
pub async fn update_emergency_contact(
    Extension(store): Extension<Store>,
    identity: Option<Extension<Identity>>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<EmergencyContactPayload>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "update", Some(id), identity.as_ref());

    let updated = store
        .patch::<EmergencyContact, _>(id, |model| payload.apply(model))
        .await?;
    info!("Updated emergency contact: {}", id);

    Ok(Json(updated))
}

// DELETE /emergency-contacts/:id
pub async fn delete_emergency_contact(
    Extension(store): Extension<Store>,
    identity: Option<Extension<Identity>>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "delete", Some(id), identity.as_ref());

    store.remove::<EmergencyContact>(id).await?;
    info!("Deleted emergency contact: {}", id);

    Ok(deleted(EmergencyContact::LABEL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    fn payload() -> EmergencyContactPayload {
        EmergencyContactPayload {
            organization_name: Some("Disaster Management Centre".into()),
            phone: Some("117".into()),
            ..Default::default()
        }
    }

    #[test]
    fn contacts_start_active() {
        let model = payload().into_new().unwrap();
        assert_eq!(model.is_active, ActiveValue::Set(true));
        assert_eq!(model.service_type, ActiveValue::Set(None));
    }

    #[test]
    fn explicit_inactive_is_kept() {
        let model = EmergencyContactPayload {
            is_active: Some(false),
            ..payload()
        }
        .into_new()
        .unwrap();
        assert_eq!(model.is_active, ActiveValue::Set(false));
    }

    #[test]
    fn police_is_spelled_correctly() {
        let model = EmergencyContactPayload {
            service_type: Some("Police".into()),
            ..payload()
        }
        .into_new()
        .unwrap();
        assert_eq!(model.service_type, ActiveValue::Set(Some(ServiceType::Police)));

        let err = EmergencyContactPayload {
            service_type: Some("Plice".into()),
            ..payload()
        }
        .into_new()
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid service_type. Use: Medical, Rescue, Food, Shelter, Police, Fire, Other"
        );
    }

    #[test]
    fn deactivation_is_a_partial_update() {
        let now = chrono::Utc::now().naive_utc();
        let mut model = emergency_contact::Model {
            id: 1,
            organization_name: "Fire Brigade".into(),
            contact_person: None,
            phone: "110".into(),
            alternate_phone: None,
            email: None,
            address: None,
            service_type: Some(ServiceType::Fire),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        EmergencyContactPayload {
            is_active: Some(false),
            ..Default::default()
        }
        .apply(&mut model)
        .unwrap();

        assert!(!model.is_active);
        assert_eq!(model.service_type, Some(ServiceType::Fire));
        assert_eq!(model.phone, "110");
    }
}
