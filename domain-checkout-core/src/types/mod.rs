//! 类型定义模块

mod coupon;
mod domain;
mod money;
mod offer;
mod portfolio;
mod purchase;
mod verification;

pub use coupon::{Coupon, CouponTable, PriceQuote, normalize_code};
pub use domain::{
    DomainMapping, NewUserDomain, SslStatus, StorageCapabilities, UserDomain,
    UserDomainWithMapping,
};
pub use money::{Amount, Currency};
pub use offer::{DomainAvailability, DomainOffer};
pub use portfolio::Portfolio;
pub use purchase::{
    CheckoutOutcome, IssuedOrder, OrderHandle, OrderMetadata, PurchaseIntent, PurchaseRequest,
    VerifiedPurchase,
};
pub use verification::{
    AcceptedTargets, DnsInstruction, DnsInstructions, DnsLookupOutcome, DnsVerificationOutcome,
    VerificationState,
};

// Re-export provider 库的公共类型
pub use domain_checkout_provider::{
    CreateOrderRequest, OrderNotes, OrderStatus, PaymentConfirmation, ProviderCredentials,
    ProviderOrder, ProviderType,
};
