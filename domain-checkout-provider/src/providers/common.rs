//! Provider 公共工具函数

use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// 默认连接超时（秒）
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// 默认请求超时（秒）
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// 创建带超时配置的 HTTP Client
///
/// 构建失败时（TLS 后端初始化失败等）退回到无超时配置的默认 Client。
pub fn create_http_client(connect_timeout: Duration, request_timeout: Duration) -> Client {
    Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(request_timeout)
        .build()
        .unwrap_or_else(|e| {
            log::warn!("Failed to build HTTP client with timeouts, using defaults: {e}");
            Client::new()
        })
}

/// HMAC-SHA256 keyed MAC over `data`, ready for `finalize` or `verify_slice`.
///
/// HMAC accepts keys of any length, `None` is unreachable in practice.
pub fn hmac_sha256_mac(key: &[u8], data: &[u8]) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(key).ok()?;
    mac.update(data);
    Some(mac)
}

/// HMAC-SHA256 计算
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    hmac_sha256_mac(key, data)
        .map(|mac| mac.finalize().into_bytes().to_vec())
        .unwrap_or_default()
}
