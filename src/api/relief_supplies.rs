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
    entities::{
        enums::{SupplyCategory, SupplyStatus},
        relief_supply, ReliefSupply,
    },
    error::AppError,
    store::{Resource, Store},
    validation::{
        changed_count, parse_enum, parse_optional_enum, parse_timestamp, provided, Required,
    },
};

const TABLE: &str = "relief_supplies";

#[derive(Debug, Default, Deserialize)]
pub struct ReliefSupplyPayload {
    pub item_name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i32>,
    pub unit: Option<String>,
    pub donor_name: Option<String>,
    pub donor_phone: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub expiry_date: Option<String>,
    pub notes: Option<String>,
}

impl ReliefSupplyPayload {
    pub fn into_new(self) -> Result<relief_supply::ActiveModel, AppError> {
        let mut required = Required::new();
        let item_name = required.text("item_name", self.item_name);
        let category = required.text("category", self.category);
        let quantity = required.positive("quantity", self.quantity);
        let unit = required.text("unit", self.unit);
        let location = required.text("location", self.location);
        required.finish()?;

        let category = parse_enum::<SupplyCategory>("category", category.trim())?;
        let status = parse_optional_enum::<SupplyStatus>("status", self.status)?;
        let expiry_date = parse_timestamp("expiry_date", self.expiry_date)?;

        Ok(relief_supply::ActiveModel {
            item_name: Set(item_name),
            category: Set(category),
            quantity: Set(quantity),
            unit: Set(unit),
            donor_name: Set(provided(self.donor_name)),
            donor_phone: Set(provided(self.donor_phone)),
            location: Set(location),
            status: Set(status.unwrap_or(SupplyStatus::Available)),
            expiry_date: Set(expiry_date),
            notes: Set(provided(self.notes)),
            ..Default::default()
        })
    }

    pub fn apply(self, model: &mut relief_supply::Model) -> Result<(), AppError> {
        let category = parse_optional_enum::<SupplyCategory>("category", self.category)?;
        let status = parse_optional_enum::<SupplyStatus>("status", self.status)?;
        let quantity = changed_count("quantity", self.quantity)?;
        let expiry_date = parse_timestamp("expiry_date", self.expiry_date)?;

        if let Some(item_name) = provided(self.item_name) {
            model.item_name = item_name;
        }
        if let Some(category) = category {
            model.category = category;
        }
        if let Some(quantity) = quantity {
            model.quantity = quantity;
        }
        if let Some(unit) = provided(self.unit) {
            model.unit = unit;
        }
        if let Some(donor_name) = provided(self.donor_name) {
            model.donor_name = Some(donor_name);
        }
        if let Some(donor_phone) = provided(self.donor_phone) {
            model.donor_phone = Some(donor_phone);
        }
        if let Some(location) = provided(self.location) {
            model.location = location;
        }
        if let Some(status) = status {
            model.status = status;
        }
        if expiry_date.is_some() {
            model.expiry_date = expiry_date;
        }
        if let Some(notes) = provided(self.notes) {
            model.notes = Some(notes);
        }
        Ok(())
    }
}

fn newest_first(query: Select<ReliefSupply>) -> Select<ReliefSupply> {
    query
        .order_by_desc(relief_supply::Column::CreatedAt)
        .order_by_desc(relief_supply::Column::Id)
}

// POST /relief-supplies
pub async fn create_relief_supply(
    Extension(store): Extension<Store>,
    identity: Option<Extension<Identity>>,
    AppJson(payload): AppJson<ReliefSupplyPayload>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "create", None, identity.as_ref());

    let created = store.insert(payload.into_new()?).await?;
    tracing::Span::current().record("record_id", created.id);
    info!(
        "Logged relief supply {}: {} {} of {}",
        created.id, created.quantity, created.unit, created.item_name
    );

    Ok((StatusCode::CREATED, Json(created)))
}

// GET /relief-supplies
pub async fn list_relief_supplies(
    Extension(store): Extension<Store>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "list", None, None);
    Ok(Json(store.list(newest_first(ReliefSupply::find())).await?))
}

// GET /relief-supplies/:id
pub async fn get_relief_supply(
    Extension(store): Extension<Store>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "get", Some(id), None);
    Ok(Json(store.get::<ReliefSupply>(id).await?))
}

// GET /relief-supplies/category/:category
pub async fn list_supplies_by_category(
    Extension(store): Extension<Store>,
    AppPath(category): AppPath<String>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "list_by_category", None, None);

    let category = parse_enum::<SupplyCategory>("category", category.trim())?;
    let supplies = store
        .list(newest_first(
            ReliefSupply::find().filter(relief_supply::Column::Category.eq(category)),
        ))
        .await?;
    Ok(Json(supplies))
}

// GET /relief-supplies/available/:available
pub async fn list_supplies_by_availability(
    Extension(store): Extension<Store>,
    AppPath(available): AppPath<bool>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "list_by_availability", None, None);

    let status = relief_supply::Column::Status;
    let filter = if available {
        status.eq(SupplyStatus::Available)
    } else {
        status.ne(SupplyStatus::Available)
    };

    let supplies = store
        .list(newest_first(ReliefSupply::find().filter(filter)))
        .await?;
    Ok(Json(supplies))
}

// PUT /relief-supplies/:id
pub async fn update_relief_supply(
    Extension(store): Extension<Store>,
    identity: Option<Extension<Identity>>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<ReliefSupplyPayload>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "update", Some(id), identity.as_ref());

    let updated = store
        .patch::<ReliefSupply, _>(id, |model| payload.apply(model))
        .await?;
    info!("Updated relief supply {}", id);

    Ok(Json(updated))
}

// DELETE /relief-supplies/:id
pub async fn delete_relief_supply(
    Extension(store): Extension<Store>,
    identity: Option<Extension<Identity>>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    trace_action(TABLE, "delete", Some(id), identity.as_ref());

    store.remove::<ReliefSupply>(id).await?;
    info!("Deleted relief supply {}", id);

    Ok(deleted(ReliefSupply::LABEL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    fn payload() -> ReliefSupplyPayload {
        ReliefSupplyPayload {
            item_name: Some("Rice".into()),
            category: Some("Food".into()),
            quantity: Some(50),
            unit: Some("kg".into()),
            location: Some("Colombo depot".into()),
            ..Default::default()
        }
    }

    #[test]
    fn status_defaults_to_available() {
        let model = payload().into_new().unwrap();
        assert_eq!(model.status, ActiveValue::Set(SupplyStatus::Available));
        assert_eq!(model.category, ActiveValue::Set(SupplyCategory::Food));
    }

    #[test]
    fn quantity_must_be_positive() {
        let err = ReliefSupplyPayload {
            quantity: Some(0),
            ..payload()
        }
        .into_new()
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: quantity");
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = ReliefSupplyPayload {
            category: Some("Toys".into()),
            ..payload()
        }
        .into_new()
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid category. Use: Food, Medical, Clothing, Shelter, Other"
        );
    }

    #[test]
    fn expiry_date_is_parsed() {
        let model = ReliefSupplyPayload {
            expiry_date: Some("2025-01-31".into()),
            ..payload()
        }
        .into_new()
        .unwrap();

        let ActiveValue::Set(Some(expiry)) = model.expiry_date else {
            panic!("expiry date not set");
        };
        assert_eq!(expiry.to_string(), "2025-01-31 00:00:00");
    }

    #[test]
    fn zero_quantity_update_is_ignored() {
        let now = chrono::Utc::now().naive_utc();
        let mut model = relief_supply::Model {
            id: 1,
            item_name: "Rice".into(),
            category: SupplyCategory::Food,
            quantity: 50,
            unit: "kg".into(),
            donor_name: None,
            donor_phone: None,
            location: "Colombo depot".into(),
            status: SupplyStatus::Available,
            expiry_date: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };

        ReliefSupplyPayload {
            quantity: Some(0),
            status: Some("Distributed".into()),
            ..Default::default()
        }
        .apply(&mut model)
        .unwrap();

        assert_eq!(model.quantity, 50);
        assert_eq!(model.status, SupplyStatus::Distributed);
    }
}
