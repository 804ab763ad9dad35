use sea_orm_migration::prelude::*;

use super::m20260101_000001_categories::Categories;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Coupons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Coupons::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Coupons::Name).string().not_null())
                    .col(
                        ColumnDef::new(Coupons::CurrentValueMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Coupons::InitialValueMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Coupons::ExpirationDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Coupons::CategoryId).integer())
                    .col(ColumnDef::new(Coupons::RedeemCode).string())
                    .col(
                        ColumnDef::new(Coupons::IsArchived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-coupons-category_id")
                            .from(Coupons::Table, Coupons::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Blank codes are exempt from uniqueness, so this index stays non-unique
        // and the engine enforces the rule.
        manager
            .create_index(
                Index::create()
                    .name("idx-coupons-redeem_code")
                    .table(Coupons::Table)
                    .col(Coupons::RedeemCode)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Coupons::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Coupons {
    Table,
    Id,
    Name,
    CurrentValueMinor,
    InitialValueMinor,
    ExpirationDate,
    CategoryId,
    RedeemCode,
    IsArchived,
}
