use sea_orm::{EntityTrait, entity::prelude::DateTimeWithTimeZone};

/// Implemented by `#[base_entity]` for every entity with a generated `i32` id.
pub trait BaseEntity: EntityTrait {
    /// Human-readable entity name used in error messages.
    const LABEL: &'static str;

    fn id_column() -> Self::Column;
}

pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts: DateTimeWithTimeZone);
    fn set_updated_at(&mut self, ts: DateTimeWithTimeZone);
}
