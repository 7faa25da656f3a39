use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_domains")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    #[sea_orm(unique)]
    pub domain_name: String,
    pub tld: String,
    pub portfolio_id: String,
    pub expiry_date: String,
    pub is_active: i32,
    pub is_verified: i32,
    pub payment_id: String,
    pub amount_paid_minor: i64,
    pub currency: String,
    /// Added by a later migration; older databases lack the column.
    pub coupon_code: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
