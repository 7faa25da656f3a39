use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // domain_offers 表
        manager
            .create_table(
                Table::create()
                    .table(DomainOffer::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DomainOffer::Tld)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DomainOffer::BasePriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DomainOffer::RenewalPriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DomainOffer::Currency)
                            .string()
                            .not_null()
                            .default("USD"),
                    )
                    .col(
                        ColumnDef::new(DomainOffer::IsAvailable)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(DomainOffer::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        // portfolios 表（只读镜像）
        manager
            .create_table(
                Table::create()
                    .table(Portfolio::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Portfolio::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Portfolio::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Portfolio::IsPublished)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Portfolio::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        // user_domains 表
        manager
            .create_table(
                Table::create()
                    .table(UserDomain::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserDomain::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserDomain::UserId).string().not_null())
                    .col(ColumnDef::new(UserDomain::DomainName).string().not_null())
                    .col(ColumnDef::new(UserDomain::Tld).string().not_null())
                    .col(ColumnDef::new(UserDomain::PortfolioId).string().not_null())
                    .col(ColumnDef::new(UserDomain::ExpiryDate).string().not_null())
                    .col(
                        ColumnDef::new(UserDomain::IsActive)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(UserDomain::IsVerified)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(UserDomain::PaymentId).string().not_null())
                    .col(
                        ColumnDef::new(UserDomain::AmountPaidMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserDomain::Currency).string().not_null())
                    .col(ColumnDef::new(UserDomain::CreatedAt).string().not_null())
                    .col(ColumnDef::new(UserDomain::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        // 域名全局唯一，并发注册由该索引裁决
        manager
            .create_index(
                Index::create()
                    .name("idx_user_domains_domain_name")
                    .table(UserDomain::Table)
                    .col(UserDomain::DomainName)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_domains_user_id")
                    .table(UserDomain::Table)
                    .col(UserDomain::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // domain_mappings 表
        manager
            .create_table(
                Table::create()
                    .table(DomainMapping::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DomainMapping::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DomainMapping::UserDomainId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DomainMapping::PortfolioId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DomainMapping::IsActive)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(DomainMapping::DnsConfigured)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DomainMapping::SslStatus)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(DomainMapping::UpdatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_domain_mappings_user_domain")
                            .from(DomainMapping::Table, DomainMapping::UserDomainId)
                            .to(UserDomain::Table, UserDomain::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_domain_mappings_user_domain_id")
                    .table(DomainMapping::Table)
                    .col(DomainMapping::UserDomainId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DomainMapping::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserDomain::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Portfolio::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DomainOffer::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum DomainOffer {
    #[sea_orm(iden = "domain_offers")]
    Table,
    Tld,
    BasePriceMinor,
    RenewalPriceMinor,
    Currency,
    IsAvailable,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Portfolio {
    #[sea_orm(iden = "portfolios")]
    Table,
    Id,
    UserId,
    IsPublished,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserDomain {
    #[sea_orm(iden = "user_domains")]
    Table,
    Id,
    UserId,
    DomainName,
    Tld,
    PortfolioId,
    ExpiryDate,
    IsActive,
    IsVerified,
    PaymentId,
    AmountPaidMinor,
    Currency,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DomainMapping {
    #[sea_orm(iden = "domain_mappings")]
    Table,
    Id,
    UserDomainId,
    PortfolioId,
    IsActive,
    DnsConfigured,
    SslStatus,
    UpdatedAt,
}
