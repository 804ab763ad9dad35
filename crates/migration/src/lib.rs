pub use sea_orm_migration::prelude::*;

mod m20260101_000001_categories;
mod m20260101_000002_coupons;
mod m20260101_000003_coupon_history;
mod m20260112_090000_pending_coupons;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_categories::Migration),
            Box::new(m20260101_000002_coupons::Migration),
            Box::new(m20260101_000003_coupon_history::Migration),
            Box::new(m20260112_090000_pending_coupons::Migration),
        ]
    }
}
