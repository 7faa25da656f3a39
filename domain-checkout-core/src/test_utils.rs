//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use domain_checkout_provider::{
    CreateOrderRequest, OrderNotes, OrderStatus, PaymentConfirmation, PaymentProvider,
    ProviderError, ProviderOrder, sign_payment,
};
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::{ServiceContext, WorkflowSettings};
use crate::traits::{DnsResolver, DomainOfferRepository, PortfolioRepository, UserDomainRepository};
use crate::types::{
    Amount, Currency, DnsLookupOutcome, DomainMapping, DomainOffer, NewUserDomain, OrderMetadata,
    Portfolio, PurchaseIntent, PurchaseRequest, SslStatus, StorageCapabilities, UserDomain,
    UserDomainWithMapping,
};

// ===== MockOfferRepository =====

pub struct MockOfferRepository {
    offers: RwLock<HashMap<String, DomainOffer>>,
}

impl MockOfferRepository {
    pub fn new() -> Self {
        Self {
            offers: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, tld: &str, base_major: u64, is_available: bool) {
        self.offers.write().await.insert(
            tld.to_string(),
            DomainOffer {
                tld: tld.to_string(),
                base_price: Amount::from_major(base_major),
                renewal_price: Amount::from_major(base_major),
                currency: Currency::Usd,
                is_available,
            },
        );
    }
}

#[async_trait]
impl DomainOfferRepository for MockOfferRepository {
    async fn list_available(&self) -> CoreResult<Vec<DomainOffer>> {
        Ok(self
            .offers
            .read()
            .await
            .values()
            .filter(|o| o.is_available)
            .cloned()
            .collect())
    }

    async fn find_by_tld(&self, tld: &str) -> CoreResult<Option<DomainOffer>> {
        Ok(self.offers.read().await.get(tld).cloned())
    }
}

// ===== MockPortfolioRepository =====

pub struct MockPortfolioRepository {
    portfolios: RwLock<HashMap<String, Portfolio>>,
}

impl MockPortfolioRepository {
    pub fn new() -> Self {
        Self {
            portfolios: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, id: &str, user_id: &str, is_published: bool) {
        self.portfolios.write().await.insert(
            id.to_string(),
            Portfolio {
                id: id.to_string(),
                user_id: user_id.to_string(),
                is_published,
            },
        );
    }
}

#[async_trait]
impl PortfolioRepository for MockPortfolioRepository {
    async fn find_by_id(&self, portfolio_id: &str) -> CoreResult<Option<Portfolio>> {
        Ok(self.portfolios.read().await.get(portfolio_id).cloned())
    }
}

// ===== MockUserDomainRepository =====

#[derive(Default)]
struct DomainStore {
    domains: HashMap<String, UserDomain>,
    mappings: HashMap<String, DomainMapping>,
    insert_attempts: usize,
    /// 下一次插入前先由该用户"抢先"注册同名域名
    race_winner: Option<String>,
    reject_coupon: bool,
    always_schema_error: bool,
}

pub struct MockUserDomainRepository {
    store: RwLock<DomainStore>,
    capabilities: StorageCapabilities,
}

impl MockUserDomainRepository {
    pub fn new(capabilities: StorageCapabilities) -> Self {
        Self {
            store: RwLock::new(DomainStore::default()),
            capabilities,
        }
    }

    pub async fn get(&self, id: &str) -> Option<UserDomain> {
        self.store.read().await.domains.get(id).cloned()
    }

    pub async fn mapping_for(&self, user_domain_id: &str) -> Option<DomainMapping> {
        self.store.read().await.mappings.get(user_domain_id).cloned()
    }

    pub async fn count(&self) -> usize {
        self.store.read().await.domains.len()
    }

    pub async fn insert_attempts(&self) -> usize {
        self.store.read().await.insert_attempts
    }

    /// The next insert finds the name already claimed by `user_id`.
    pub async fn lose_next_insert_to(&self, user_id: &str) {
        self.store.write().await.race_winner = Some(user_id.to_string());
    }

    /// Inserts carrying a coupon fail with `SchemaIncompatible`.
    pub async fn reject_coupon_column(&self, reject: bool) {
        self.store.write().await.reject_coupon = reject;
    }

    pub async fn fail_every_insert_with_schema_error(&self, fail: bool) {
        self.store.write().await.always_schema_error = fail;
    }

    fn row_from(new: &NewUserDomain) -> (UserDomain, DomainMapping) {
        let domain = UserDomain {
            id: new.id.clone(),
            user_id: new.user_id.clone(),
            domain_name: new.domain_name.clone(),
            tld: new.tld.clone(),
            portfolio_id: new.portfolio_id.clone(),
            expiry_date: new.expiry_date,
            is_active: true,
            is_verified: false,
            payment_id: new.payment_id.clone(),
            amount_paid: new.amount_paid,
            currency: new.currency,
            coupon_code: new.coupon_code.clone(),
            created_at: new.created_at,
            updated_at: new.created_at,
        };
        let mapping = DomainMapping {
            id: new.mapping_id.clone(),
            user_domain_id: new.id.clone(),
            portfolio_id: new.portfolio_id.clone(),
            is_active: true,
            dns_configured: false,
            ssl_status: SslStatus::Pending,
            updated_at: new.created_at,
        };
        (domain, mapping)
    }

    fn update<F>(store: &mut DomainStore, id: &str, f: F) -> CoreResult<UserDomain>
    where
        F: FnOnce(&mut UserDomain, Option<&mut DomainMapping>),
    {
        let domain = store
            .domains
            .get_mut(id)
            .ok_or_else(|| CoreError::DomainNotFound(id.to_string()))?;
        f(domain, store.mappings.get_mut(id));
        domain.updated_at = Utc::now();
        Ok(domain.clone())
    }
}

#[async_trait]
impl UserDomainRepository for MockUserDomainRepository {
    fn capabilities(&self) -> StorageCapabilities {
        self.capabilities
    }

    async fn exists_by_name(&self, domain_name: &str) -> CoreResult<bool> {
        Ok(self.find_by_name(domain_name).await?.is_some())
    }

    async fn find_by_name(&self, domain_name: &str) -> CoreResult<Option<UserDomain>> {
        Ok(self
            .store
            .read()
            .await
            .domains
            .values()
            .find(|d| d.domain_name == domain_name)
            .cloned())
    }

    async fn find_by_id(&self, user_domain_id: &str) -> CoreResult<Option<UserDomain>> {
        Ok(self.get(user_domain_id).await)
    }

    async fn list_by_user(&self, user_id: &str) -> CoreResult<Vec<UserDomainWithMapping>> {
        let store = self.store.read().await;
        let mut list: Vec<UserDomainWithMapping> = store
            .domains
            .values()
            .filter(|d| d.user_id == user_id)
            .map(|d| UserDomainWithMapping {
                domain: d.clone(),
                mapping: store.mappings.get(&d.id).cloned(),
            })
            .collect();
        list.sort_by(|a, b| b.domain.created_at.cmp(&a.domain.created_at));
        Ok(list)
    }

    async fn find_mapping(&self, user_domain_id: &str) -> CoreResult<Option<DomainMapping>> {
        Ok(self.mapping_for(user_domain_id).await)
    }

    async fn insert_with_mapping(&self, new: &NewUserDomain) -> CoreResult<UserDomain> {
        let mut store = self.store.write().await;
        store.insert_attempts += 1;

        if store.always_schema_error || (store.reject_coupon && new.coupon_code.is_some()) {
            return Err(CoreError::SchemaIncompatible(
                "no such column: coupon_code".to_string(),
            ));
        }

        if let Some(winner) = store.race_winner.take() {
            let rival = NewUserDomain {
                id: uuid::Uuid::new_v4().to_string(),
                mapping_id: uuid::Uuid::new_v4().to_string(),
                user_id: winner,
                ..new.clone()
            };
            let (domain, mapping) = Self::row_from(&rival);
            store.mappings.insert(domain.id.clone(), mapping);
            store.domains.insert(domain.id.clone(), domain);
        }

        if store
            .domains
            .values()
            .any(|d| d.domain_name == new.domain_name)
        {
            return Err(CoreError::DomainTaken(new.domain_name.clone()));
        }

        let (domain, mapping) = Self::row_from(new);
        store.mappings.insert(domain.id.clone(), mapping);
        store.domains.insert(domain.id.clone(), domain.clone());
        Ok(domain)
    }

    async fn mark_verified(&self, user_domain_id: &str) -> CoreResult<UserDomain> {
        let mut store = self.store.write().await;
        Self::update(&mut store, user_domain_id, |d, m| {
            d.is_verified = true;
            if let Some(m) = m {
                m.dns_configured = true;
                m.ssl_status = SslStatus::Active;
            }
        })
    }

    async fn reassign_portfolio(
        &self,
        user_domain_id: &str,
        portfolio_id: &str,
    ) -> CoreResult<UserDomain> {
        let mut store = self.store.write().await;
        Self::update(&mut store, user_domain_id, |d, m| {
            d.portfolio_id = portfolio_id.to_string();
            if let Some(m) = m {
                m.portfolio_id = portfolio_id.to_string();
            }
        })
    }

    async fn deactivate(&self, user_domain_id: &str) -> CoreResult<UserDomain> {
        let mut store = self.store.write().await;
        Self::update(&mut store, user_domain_id, |d, m| {
            d.is_active = false;
            if let Some(m) = m {
                m.is_active = false;
            }
        })
    }
}

// ===== MockPaymentProvider =====

const MOCK_KEY_ID: &str = "rzp_test_mock";
const MOCK_KEY_SECRET: &str = "mock_secret";

#[derive(Default)]
struct PaymentState {
    orders: HashMap<String, ProviderOrder>,
    created: Vec<CreateOrderRequest>,
    next_id: u32,
    fetch_count: usize,
    create_timeout: bool,
    fetch_timeout: bool,
}

pub struct MockPaymentProvider {
    state: RwLock<PaymentState>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(PaymentState::default()),
        }
    }

    fn timeout() -> ProviderError {
        ProviderError::Timeout {
            provider: "mock".to_string(),
            detail: "deadline elapsed".to_string(),
        }
    }

    fn store_order(
        state: &mut PaymentState,
        amount_minor: u64,
        currency: Currency,
        receipt: Option<String>,
        notes: OrderNotes,
    ) -> ProviderOrder {
        state.next_id += 1;
        let order = ProviderOrder {
            id: format!("order_mock{:04}", state.next_id),
            amount_minor,
            amount_paid_minor: 0,
            currency,
            status: OrderStatus::Created,
            receipt,
            notes,
            created_at: Some(Utc::now()),
        };
        state.orders.insert(order.id.clone(), order.clone());
        order
    }

    pub async fn created_orders(&self) -> Vec<CreateOrderRequest> {
        self.state.read().await.created.clone()
    }

    pub async fn fetch_count(&self) -> usize {
        self.state.read().await.fetch_count
    }

    /// Store an already-paid order for `intent`, returning its id.
    pub async fn insert_paid_order(&self, intent: &PurchaseIntent) -> String {
        let mut state = self.state.write().await;
        let notes = OrderMetadata::new(intent.clone()).to_notes();
        let id = Self::store_order(
            &mut state,
            intent.payable.minor(),
            intent.currency,
            None,
            notes,
        )
        .id;
        if let Some(order) = state.orders.get_mut(&id) {
            order.status = OrderStatus::Paid;
            order.amount_paid_minor = order.amount_minor;
        }
        id
    }

    /// A correctly signed checkout callback.
    pub fn confirm(&self, order_id: &str, payment_id: &str) -> PaymentConfirmation {
        PaymentConfirmation {
            order_id: order_id.to_string(),
            payment_id: payment_id.to_string(),
            signature: sign_payment(MOCK_KEY_SECRET, order_id, payment_id),
        }
    }

    pub async fn set_status(&self, order_id: &str, status: OrderStatus) {
        if let Some(order) = self.state.write().await.orders.get_mut(order_id) {
            order.status = status;
        }
    }

    pub async fn set_amount(&self, order_id: &str, amount_minor: u64) {
        if let Some(order) = self.state.write().await.orders.get_mut(order_id) {
            order.amount_minor = amount_minor;
        }
    }

    pub async fn edit_notes<F: FnOnce(&mut OrderNotes)>(&self, order_id: &str, f: F) {
        if let Some(order) = self.state.write().await.orders.get_mut(order_id) {
            f(&mut order.notes);
        }
    }

    pub async fn fail_create_with_timeout(&self, fail: bool) {
        self.state.write().await.create_timeout = fail;
    }

    pub async fn fail_fetch_with_timeout(&self, fail: bool) {
        self.state.write().await.fetch_timeout = fail;
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    fn id(&self) -> &'static str {
        "mock"
    }

    fn key_id(&self) -> &str {
        MOCK_KEY_ID
    }

    async fn create_order(
        &self,
        req: &CreateOrderRequest,
    ) -> domain_checkout_provider::Result<ProviderOrder> {
        let mut state = self.state.write().await;
        if state.create_timeout {
            return Err(Self::timeout());
        }
        state.created.push(req.clone());
        Ok(Self::store_order(
            &mut state,
            req.amount_minor,
            req.currency,
            Some(req.receipt.clone()),
            req.notes.clone(),
        ))
    }

    async fn fetch_order(&self, order_id: &str) -> domain_checkout_provider::Result<ProviderOrder> {
        let mut state = self.state.write().await;
        state.fetch_count += 1;
        if state.fetch_timeout {
            return Err(Self::timeout());
        }
        state
            .orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| ProviderError::OrderNotFound {
                provider: "mock".to_string(),
                order_id: order_id.to_string(),
                raw_message: None,
            })
    }

    fn verify_payment_signature(&self, confirmation: &PaymentConfirmation) -> bool {
        sign_payment(MOCK_KEY_SECRET, &confirmation.order_id, &confirmation.payment_id)
            == confirmation.signature
    }
}

// ===== MockDnsResolver =====

#[derive(Default)]
struct DnsState {
    responses: HashMap<String, DnsLookupOutcome>,
    lookups: usize,
    timeout: bool,
}

pub struct MockDnsResolver {
    state: RwLock<DnsState>,
}

impl MockDnsResolver {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(DnsState::default()),
        }
    }

    pub async fn respond(&self, domain: &str, outcome: DnsLookupOutcome) {
        self.state
            .write()
            .await
            .responses
            .insert(domain.to_string(), outcome);
    }

    pub async fn fail_with_timeout(&self, fail: bool) {
        self.state.write().await.timeout = fail;
    }

    pub async fn lookup_count(&self) -> usize {
        self.state.read().await.lookups
    }
}

#[async_trait]
impl DnsResolver for MockDnsResolver {
    async fn lookup(&self, domain: &str) -> CoreResult<DnsLookupOutcome> {
        let mut state = self.state.write().await;
        state.lookups += 1;
        if state.timeout {
            return Err(CoreError::ProviderUnavailable(format!(
                "DNS lookup for {domain} timed out"
            )));
        }
        Ok(state.responses.get(domain).cloned().unwrap_or_default())
    }
}

// ===== 工厂方法 =====

/// 测试环境：所有 mock 与共享的 `ServiceContext`
pub struct TestEnv {
    pub ctx: Arc<ServiceContext>,
    pub offers: Arc<MockOfferRepository>,
    pub domains: Arc<MockUserDomainRepository>,
    pub portfolios: Arc<MockPortfolioRepository>,
    pub payment: Arc<MockPaymentProvider>,
    pub dns: Arc<MockDnsResolver>,
}

impl TestEnv {
    /// 默认数据：.dev $99、.com $12 可售，.io 已下架；user-1 拥有已发布的 pf-1
    pub async fn new() -> Self {
        Self::with_coupon_tracking(true).await
    }

    pub async fn with_coupon_tracking(coupon_tracking: bool) -> Self {
        let offers = Arc::new(MockOfferRepository::new());
        offers.insert(".dev", 99, true).await;
        offers.insert(".com", 12, true).await;
        offers.insert(".io", 49, false).await;

        let portfolios = Arc::new(MockPortfolioRepository::new());
        portfolios.insert("pf-1", "user-1", true).await;

        let domains = Arc::new(MockUserDomainRepository::new(StorageCapabilities {
            coupon_tracking,
        }));
        let payment = Arc::new(MockPaymentProvider::new());
        let dns = Arc::new(MockDnsResolver::new());

        let ctx = Arc::new(ServiceContext::new(
            offers.clone(),
            domains.clone(),
            portfolios.clone(),
            payment.clone(),
            dns.clone(),
            WorkflowSettings::default(),
        ));

        Self {
            ctx,
            offers,
            domains,
            portfolios,
            payment,
            dns,
        }
    }

    /// Insert a registered (unverified) domain directly into the store.
    ///
    /// Each call is stamped one second after the previous one so ordering is stable.
    pub async fn register_existing(&self, user_id: &str, domain_name: &str) -> UserDomain {
        let created_at = Utc::now()
            + Duration::seconds(i64::try_from(self.domains.count().await).unwrap_or_default());
        let new = NewUserDomain {
            id: uuid::Uuid::new_v4().to_string(),
            mapping_id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            domain_name: domain_name.to_string(),
            tld: ".dev".to_string(),
            portfolio_id: "pf-1".to_string(),
            expiry_date: crate::utils::datetime::add_one_year(created_at),
            payment_id: "pay_existing".to_string(),
            amount_paid: Amount::from_major(99),
            currency: Currency::Usd,
            coupon_code: None,
            created_at,
        };
        match self.domains.insert_with_mapping(&new).await {
            Ok(domain) => domain,
            Err(e) => unreachable!("seeding {domain_name} failed: {e}"),
        }
    }
}

/// user-1 buying `domain_name` under .dev for pf-1.
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

/// Intent for mysite.dev at $99 with SAVE20 (payable 79.20).
pub fn paid_intent() -> PurchaseIntent {
    PurchaseIntent {
        user_id: "user-1".to_string(),
        domain_name: "mysite.dev".to_string(),
        tld: ".dev".to_string(),
        portfolio_id: "pf-1".to_string(),
        base_price: Amount::from_major(99),
        coupon_code: Some("SAVE20".to_string()),
        payable: Amount::from_minor(7920),
        currency: Currency::Usd,
    }
}
