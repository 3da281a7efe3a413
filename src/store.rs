//! Persistence entry point shared by every handler.
//!
//! Handlers never hold a connection themselves: they receive a [`Store`]
//! through the request extensions, so tests can hand them one backed by an
//! in-memory SQLite database.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityName, EntityTrait,
    IntoActiveModel, PrimaryKeyTrait, QuerySelect, Select, TransactionTrait,
};
use tracing::debug;

use crate::{error::AppError, metrics};

/// An entity exposed through the API. `LABEL` names it in error messages.
pub trait Resource: EntityTrait {
    const LABEL: &'static str;
}

#[derive(Clone)]
pub struct Store {
    db: DatabaseConnection,
}

impl Store {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn insert<A>(
        &self,
        model: A,
    ) -> Result<<A::Entity as EntityTrait>::Model, AppError>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        let created = model.insert(&self.db).await?;
        metrics::record_created(A::Entity::default().table_name());
        Ok(created)
    }

    pub async fn list<E: EntityTrait>(&self, query: Select<E>) -> Result<Vec<E::Model>, AppError> {
        Ok(query.all(&self.db).await?)
    }

    pub async fn get<E>(&self, id: i32) -> Result<E::Model, AppError>
    where
        E: Resource,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    {
        E::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound(E::LABEL))
    }

    /// Applies `merge` to the stored row and writes it back atomically.
    ///
    /// The row is read with `FOR UPDATE` inside a transaction, so concurrent
    /// patches to the same id serialize instead of overwriting each other.
    /// If `merge` fails the transaction is dropped and nothing is written.
    pub async fn patch<E, F>(&self, id: i32, merge: F) -> Result<E::Model, AppError>
    where
        E: Resource,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
        E::Model: IntoActiveModel<E::ActiveModel>,
        E::ActiveModel: Send,
        F: FnOnce(&mut E::Model) -> Result<(), AppError> + Send,
    {
        let txn = self.db.begin().await?;

        let mut model = E::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound(E::LABEL))?;

        merge(&mut model)?;

        let updated = model.into_active_model().reset_all().update(&txn).await?;
        txn.commit().await?;

        debug!("Patched {} {}", E::LABEL, id);
        Ok(updated)
    }

    pub async fn remove<E>(&self, id: i32) -> Result<(), AppError>
    where
        E: Resource,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    {
        let res = E::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(E::LABEL));
        }
        metrics::record_deleted(E::default().table_name());
        Ok(())
    }
}
