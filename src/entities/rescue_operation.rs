use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use super::enums::{OperationStatus, Priority};
use crate::store::Resource;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "rescue_operations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub operation_name: String,
    pub help_request_id: Option<i32>,
    pub volunteer_id: Option<i32>,
    pub team_size: i32,
    pub vehicle_type: Option<String>,
    pub location: String,
    pub start_time: DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime>,
    pub status: OperationStatus,
    pub priority: Priority,
    pub people_rescued: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::help_request::Entity",
        from = "Column::HelpRequestId",
        to = "super::help_request::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    HelpRequest,
    #[sea_orm(
        belongs_to = "super::volunteer::Entity",
        from = "Column::VolunteerId",
        to = "super::volunteer::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Volunteer,
}

impl Related<super::help_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HelpRequest.def()
    }
}

impl Related<super::volunteer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Volunteer.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now().naive_utc();
        if insert {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}

impl Resource for Entity {
    const LABEL: &'static str = "Rescue operation";
}
