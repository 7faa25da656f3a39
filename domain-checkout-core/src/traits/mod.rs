//! Storage and collaborator abstraction trait definitions

mod dns_resolver;
mod domain_offer_repository;
mod portfolio_repository;
mod user_domain_repository;

pub use dns_resolver::{DnsResolver, SystemDnsResolver};
pub use domain_offer_repository::DomainOfferRepository;
pub use portfolio_repository::PortfolioRepository;
pub use user_domain_repository::UserDomainRepository;
