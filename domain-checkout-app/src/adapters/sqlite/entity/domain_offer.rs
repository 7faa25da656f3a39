use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "domain_offers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tld: String,
    pub base_price_minor: i64,
    pub renewal_price_minor: i64,
    pub currency: String,
    pub is_available: i32,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
