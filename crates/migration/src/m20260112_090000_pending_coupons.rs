use sea_orm_migration::prelude::*;

use super::m20260101_000002_coupons::Coupons;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum PendingCoupons {
    IsPending,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Coupons::Table)
                    .add_column(
                        ColumnDef::new(PendingCoupons::IsPending)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Coupons::Table)
                    .drop_column(PendingCoupons::IsPending)
                    .to_owned(),
            )
            .await
    }
}
