use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity(label = "Menu item")]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "menu_items")]
pub struct Model {
    pub name: String,
    pub price: f64,
    pub calories: i32,
    #[sea_orm(has_many)]
    pub order_items: HasMany<super::order_item::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
