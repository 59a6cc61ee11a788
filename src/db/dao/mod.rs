pub mod base;
pub mod base_traits;
mod context;
pub mod customer_dao;
pub mod error;
pub mod menu_item_dao;
pub mod order_dao;
pub mod report_dao;

pub use base::DaoBase;
pub use base_traits::{BaseEntity, TimestampedActiveModel};
pub use context::DaoContext;
pub use customer_dao::CustomerDao;
pub use error::{DaoLayerError, DaoResult};
pub use menu_item_dao::{MenuItemChanges, MenuItemDao};
pub use order_dao::{
    MenuItemSnapshot, NewOrderLine, OrderDao, OrderFilter, OrderLineRow, OrderLineSummary,
    OrderSummary,
};
pub use report_dao::{CustomerQuantity, DailyRevenue, MenuItemSales, ReportDao};
