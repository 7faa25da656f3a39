//! 共享测试工具和辅助函数

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashMap;

use async_trait::async_trait;
use domain_checkout_app::adapters::SqliteStore;
use domain_checkout_core::error::CoreResult;
use domain_checkout_core::traits::DnsResolver;
use domain_checkout_core::types::{
    Amount, Currency, DnsLookupOutcome, DomainOffer, Portfolio, PurchaseRequest,
};
use domain_checkout_provider::{
    CreateOrderRequest, OrderStatus, PaymentConfirmation, PaymentProvider, ProviderError,
    ProviderOrder, sign_payment,
};
use tokio::sync::RwLock;

pub const FAKE_KEY_ID: &str = "rzp_test_fake";
const FAKE_KEY_SECRET: &str = "fake_secret";

/// In-memory stand-in for the Razorpay orders API.
#[derive(Default)]
pub struct FakePaymentProvider {
    orders: RwLock<HashMap<String, ProviderOrder>>,
}

impl FakePaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the order in full and return the callback the widget would send.
    pub async fn pay(&self, order_id: &str, payment_id: &str) -> PaymentConfirmation {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(order_id).expect("unknown order");
        order.status = OrderStatus::Paid;
        order.amount_paid_minor = order.amount_minor;
        PaymentConfirmation {
            order_id: order_id.to_string(),
            payment_id: payment_id.to_string(),
            signature: sign_payment(FAKE_KEY_SECRET, order_id, payment_id),
        }
    }

    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl PaymentProvider for FakePaymentProvider {
    fn id(&self) -> &'static str {
        "fake"
    }

    fn key_id(&self) -> &str {
        FAKE_KEY_ID
    }

    async fn create_order(
        &self,
        req: &CreateOrderRequest,
    ) -> domain_checkout_provider::Result<ProviderOrder> {
        let mut orders = self.orders.write().await;
        let order = ProviderOrder {
            id: format!("order_fake{:04}", orders.len() + 1),
            amount_minor: req.amount_minor,
            amount_paid_minor: 0,
            currency: req.currency,
            status: OrderStatus::Created,
            receipt: Some(req.receipt.clone()),
            notes: req.notes.clone(),
            created_at: None,
        };
        orders.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn fetch_order(&self, order_id: &str) -> domain_checkout_provider::Result<ProviderOrder> {
        self.orders
            .read()
            .await
            .get(order_id)
            .cloned()
            .ok_or_else(|| ProviderError::OrderNotFound {
                provider: "fake".to_string(),
                order_id: order_id.to_string(),
                raw_message: None,
            })
    }

    fn verify_payment_signature(&self, confirmation: &PaymentConfirmation) -> bool {
        sign_payment(
            FAKE_KEY_SECRET,
            &confirmation.order_id,
            &confirmation.payment_id,
        ) == confirmation.signature
    }
}

/// Resolver answering from a fixed table; unknown names have no records.
#[derive(Default)]
pub struct StaticDnsResolver {
    answers: RwLock<HashMap<String, Vec<String>>>,
}

impl StaticDnsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn point(&self, domain: &str, targets: &[&str]) {
        self.answers.write().await.insert(
            domain.to_string(),
            targets.iter().map(|t| (*t).to_string()).collect(),
        );
    }
}

#[async_trait]
impl DnsResolver for StaticDnsResolver {
    async fn lookup(&self, domain: &str) -> CoreResult<DnsLookupOutcome> {
        let targets = self
            .answers
            .read()
            .await
            .get(domain)
            .cloned()
            .unwrap_or_default();
        Ok(DnsLookupOutcome {
            records_found: !targets.is_empty(),
            targets,
        })
    }
}

pub fn offer(tld: &str, base_major: u64, is_available: bool) -> DomainOffer {
    DomainOffer {
        tld: tld.to_string(),
        base_price: Amount::from_major(base_major),
        renewal_price: Amount::from_major(base_major),
        currency: Currency::Usd,
        is_available,
    }
}

pub fn portfolio(id: &str, user_id: &str, is_published: bool) -> Portfolio {
    Portfolio {
        id: id.to_string(),
        user_id: user_id.to_string(),
        is_published,
    }
}

pub async fn create_test_store() -> (SqliteStore, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let db_path = tmp.path().join("test.db");
    let store = SqliteStore::new(&db_path)
        .await
        .expect("failed to create SqliteStore");
    (store, tmp)
}

/// Store whose `user_domains` table predates the coupon column.
pub async fn create_legacy_store() -> (SqliteStore, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let db_path = tmp.path().join("legacy.db");
    let store = SqliteStore::connect(&db_path, Some(1))
        .await
        .expect("failed to create SqliteStore");
    (store, tmp)
}

/// `.dev` at 99, `.com` at 12, `.io` unavailable; `pf-1` published for `user-1`.
pub async fn seed(store: &SqliteStore) {
    store
        .seed_offers(&[
            offer(".dev", 99, true),
            offer(".com", 12, true),
            offer(".io", 49, false),
        ])
        .await
        .expect("seed offers");
    store
        .upsert_portfolio(&portfolio("pf-1", "user-1", true))
        .await
        .expect("seed portfolio");
}

pub fn purchase_request(domain_name: &str, amount: Amount, coupon: Option<&str>) -> PurchaseRequest {
    PurchaseRequest {
        user_id: "user-1".to_string(),
        domain_name: domain_name.to_string(),
        tld: ".dev".to_string(),
        portfolio_id: "pf-1".to_string(),
        amount,
        coupon_code: coupon.map(str::to_string),
    }
}
