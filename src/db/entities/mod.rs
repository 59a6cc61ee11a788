#[allow(unused_imports)]
pub mod prelude {
    pub use super::customer::Entity as Customer;
    pub use super::menu_item::Entity as MenuItem;
    pub use super::order::Entity as Order;
    pub use super::order_item::Entity as OrderItem;
}

pub mod customer;
pub mod menu_item;
pub mod order;
pub mod order_item;
