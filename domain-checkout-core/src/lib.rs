//! Domain Checkout Core Library
//!
//! Business logic for selling custom domains attached to published portfolios:
//! - Pricing with a shared coupon table (`PricingService`)
//! - Payment order issuing (`OrderService`)
//! - Checkout callback verification (`PaymentVerificationService`)
//! - Domain registration (`RegistrarService`)
//! - DNS verification (`DnsVerificationService`)
//!
//! Storage, portfolios, the payment provider and DNS resolution are injected through
//! traits, so the same services run against SQLite in the app crate and against
//! in-memory mocks in tests.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult, ErrorKind};
pub use services::{ServiceContext, WorkflowSettings};
pub use traits::{
    DnsResolver, DomainOfferRepository, PortfolioRepository, SystemDnsResolver,
    UserDomainRepository,
};
