use sea_orm_migration::prelude::*;

use super::m20260101_000002_coupons::Coupons;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CouponHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CouponHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CouponHistory::CouponId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CouponHistory::Action).string().not_null())
                    .col(ColumnDef::new(CouponHistory::AmountMinor).big_integer())
                    .col(
                        ColumnDef::new(CouponHistory::ChangeSummary)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CouponHistory::CouponState).text())
                    .col(
                        ColumnDef::new(CouponHistory::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-coupon_history-coupon_id")
                            .from(CouponHistory::Table, CouponHistory::CouponId)
                            .to(Coupons::Table, Coupons::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-coupon_history-coupon_id-timestamp")
                    .table(CouponHistory::Table)
                    .col(CouponHistory::CouponId)
                    .col(CouponHistory::Timestamp)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CouponHistory::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CouponHistory {
    Table,
    Id,
    CouponId,
    Action,
    AmountMinor,
    ChangeSummary,
    CouponState,
    Timestamp,
}
