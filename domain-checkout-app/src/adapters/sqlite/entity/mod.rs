pub mod domain_mapping;
pub mod domain_offer;
pub mod portfolio;
pub mod user_domain;
