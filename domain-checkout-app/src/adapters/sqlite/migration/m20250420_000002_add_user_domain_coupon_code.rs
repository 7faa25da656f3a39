use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(UserDomain::Table)
                    .add_column(ColumnDef::new(UserDomain::CouponCode).string().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(UserDomain::Table)
                    .drop_column(UserDomain::CouponCode)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum UserDomain {
    #[sea_orm(iden = "user_domains")]
    Table,
    CouponCode,
}
