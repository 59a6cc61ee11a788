pub mod customers;
mod entry;
pub mod health;
pub mod menu_items;
pub mod orders;
pub mod reports;

pub use entry::{app, router};
