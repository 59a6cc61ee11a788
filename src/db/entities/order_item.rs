use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

/// One line of an order. Lines go away with their order; a menu item that
/// still has lines cannot be deleted.
#[base_entity(label = "Order item")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(indexed)]
    pub order_id: i32,
    #[sea_orm(indexed)]
    pub menu_item_id: i32,
    #[sea_orm(default_value = 1)]
    pub quantity: i32,
    #[sea_orm(belongs_to, from = "order_id", to = "id", on_delete = "Cascade")]
    pub order: HasOne<super::order::Entity>,
    #[sea_orm(belongs_to, from = "menu_item_id", to = "id", on_delete = "Restrict")]
    pub menu_item: HasOne<super::menu_item::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
