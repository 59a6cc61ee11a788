pub mod context;
pub mod crud_service;
pub mod customer_service;
pub mod menu_item_service;
pub mod order_service;
pub mod report_service;
pub mod validation;

pub use context::ServiceContext;
