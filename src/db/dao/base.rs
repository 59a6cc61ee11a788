use chrono::Utc;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    IntoActiveModel, PaginatorTrait, PrimaryKeyTrait, QueryFilter, QueryOrder, Select,
};

use super::base_traits::{BaseEntity, TimestampedActiveModel};
use super::error::{DaoLayerError, DaoResult};

pub type EntityModel<D> = <<D as DaoBase>::Entity as EntityTrait>::Model;
pub type EntityActiveModel<D> = <<D as DaoBase>::Entity as EntityTrait>::ActiveModel;

/// Generic single-table access for entities keyed by a store-generated `i32`.
#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized
where
    <Self::Entity as EntityTrait>::Model:
        FromQueryResult + IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send + Sync,
    <Self::Entity as EntityTrait>::ActiveModel:
        ActiveModelTrait<Entity = Self::Entity>
            + ActiveModelBehavior
            + TimestampedActiveModel
            + Send,
    <<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    type Entity: BaseEntity + Send + Sync;

    fn new(db: &DatabaseConnection) -> Self;

    fn db(&self) -> &DatabaseConnection;

    fn not_found(id: i32) -> DaoLayerError {
        DaoLayerError::NotFound {
            entity: <Self::Entity as BaseEntity>::LABEL,
            id,
        }
    }

    async fn create(
        &self,
        data: impl IntoActiveModel<EntityActiveModel<Self>> + Send,
    ) -> DaoResult<EntityModel<Self>> {
        let now = Utc::now().fixed_offset();
        let mut active = data.into_active_model();
        active.set_created_at(now);
        active.set_updated_at(now);
        Ok(active.insert(self.db()).await?)
    }

    async fn find_by_id(&self, id: i32) -> DaoResult<EntityModel<Self>> {
        Self::Entity::find_by_id(id)
            .one(self.db())
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    async fn exists(&self, id: i32) -> DaoResult<bool> {
        let count = Self::Entity::find()
            .filter(<Self::Entity as BaseEntity>::id_column().eq(id))
            .count(self.db())
            .await?;
        Ok(count > 0)
    }

    /// Every row matching `apply`, in id order.
    async fn find_all(
        &self,
        apply: impl FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    ) -> DaoResult<Vec<EntityModel<Self>>> {
        let select = apply(Self::Entity::find());
        Ok(select
            .order_by_asc(<Self::Entity as BaseEntity>::id_column())
            .all(self.db())
            .await?)
    }

    /// Loads the row, lets `apply` set the changed columns and writes them
    /// back in a single UPDATE.
    async fn update<F>(&self, id: i32, apply: F) -> DaoResult<EntityModel<Self>>
    where
        F: for<'a> FnOnce(&'a mut EntityActiveModel<Self>) + Send,
    {
        let model = self.find_by_id(id).await?;

        let mut active = model.into_active_model();
        apply(&mut active);
        active.set_updated_at(Utc::now().fixed_offset());

        Ok(active.update(self.db()).await?)
    }

    async fn delete(&self, id: i32) -> DaoResult<i32> {
        let result = Self::Entity::delete_by_id(id).exec(self.db()).await?;

        if result.rows_affected == 0 {
            return Err(Self::not_found(id));
        }

        Ok(id)
    }
}
