//! # 客户端句柄
//!
//! ## 设计思路
//!
//! `Client` 只保存“连到哪里”（服务地址、项目 ID、语言区域、超时），
//! 具体业务接口由 `Avatars` 等服务对象持有它来发起请求。
//! 构造方式沿用 Appwrite SDK 的链式 `set_*` 风格。
//!
//! ## 实现思路
//!
//! - 底层 `reqwest::Client` 在首次请求时惰性创建，创建失败以错误返回而不是 panic。
//! - 克隆句柄共享同一个 HTTP 连接池（`Arc<OnceCell<_>>`）；修改超时会换用新池。
//! - 非 2xx 响应按 Appwrite 错误体解析，状态码 / `type` / `message` 原样上抛。
//! - 日志中的 URL 只保留 scheme/host/path，避免把二维码内容写进日志。

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use once_cell::sync::OnceCell;
use reqwest::Url;
use serde::Deserialize;

use crate::config::{AppwriteConfig, DEFAULT_ENDPOINT};
use crate::error::AppwriteError;

const HEADER_PROJECT: &str = "X-Appwrite-Project";
const HEADER_LOCALE: &str = "X-Appwrite-Locale";
const HEADER_RESPONSE_FORMAT: &str = "X-Appwrite-Response-Format";
const RESPONSE_FORMAT: &str = "1.6.0";
const SDK_NAME: &str = "qr-link";

/// 已配置的 Appwrite 客户端句柄。
#[derive(Debug, Clone)]
pub struct Client {
    endpoint: String,
    project: String,
    locale: Option<String>,
    request_timeout: Duration,
    connect_timeout: Duration,
    max_body_bytes: u64,
    http: Arc<OnceCell<reqwest::Client>>,
}

/// 成功响应的原始内容。
pub(crate) struct RawResponse {
    pub(crate) content_type: Option<String>,
    pub(crate) bytes: Bytes,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// 创建一个指向默认云端地址、尚未设置项目的句柄。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use qr_link::Client;
    ///
    /// let client = Client::new()
    ///     .set_endpoint("https://fra.cloud.appwrite.io/v1")
    ///     .set_project("688230070011fbf10e1a");
    /// ```
    pub fn new() -> Self {
        let defaults = AppwriteConfig::default();
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            project: String::new(),
            locale: None,
            request_timeout: Duration::from_secs(defaults.request_timeout_secs),
            connect_timeout: Duration::from_secs(defaults.connect_timeout_secs),
            max_body_bytes: defaults.max_body_bytes,
            http: Arc::new(OnceCell::new()),
        }
    }

    /// 按配置构造句柄。
    pub fn from_config(config: &AppwriteConfig) -> Self {
        let mut client = Self::new()
            .set_endpoint(config.endpoint.clone())
            .set_project(config.project_id.clone())
            .set_timeouts(
                Duration::from_secs(config.request_timeout_secs),
                Duration::from_secs(config.connect_timeout_secs),
            )
            .set_max_body_bytes(config.max_body_bytes);
        if let Some(locale) = &config.locale {
            client = client.set_locale(locale.clone());
        }

        log::info!(
            "🔧 Appwrite 客户端已配置 - endpoint: {}, project: {}",
            redact_url_for_log(&client.endpoint),
            client.project
        );
        client
    }

    pub fn set_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn set_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    pub fn set_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// 设置请求总超时与连接超时。
    ///
    /// 已创建的连接池不会被修改，后续请求改用新池。
    pub fn set_timeouts(mut self, request: Duration, connect: Duration) -> Self {
        self.request_timeout = request;
        self.connect_timeout = connect;
        self.http = Arc::new(OnceCell::new());
        self
    }

    /// 响应体体积上限（字节），超出即中止读取。
    pub fn set_max_body_bytes(mut self, max_body_bytes: u64) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// 在 endpoint 路径后追加路径段。
    ///
    /// 只检查地址本身：能否解析、协议是否为 http/https、不得携带查询串或片段。
    pub(crate) fn build_url(&self, segments: &[&str]) -> Result<Url, AppwriteError> {
        let mut url = Url::parse(self.endpoint.trim())
            .map_err(|e| AppwriteError::InvalidEndpoint(format!("{}（{}）", self.endpoint, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppwriteError::InvalidEndpoint(format!(
                "不支持的协议：{}",
                url.scheme()
            )));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(AppwriteError::InvalidEndpoint(format!(
                "服务地址不能包含查询串或片段：{}",
                redact_url_for_log(&self.endpoint)
            )));
        }

        url.path_segments_mut()
            .map_err(|_| AppwriteError::InvalidEndpoint(self.endpoint.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// 发起 GET 请求并读取完整响应体。
    pub(crate) async fn get(&self, url: Url) -> Result<RawResponse, AppwriteError> {
        let http = self.http_client()?;

        log::debug!("📡 GET {}", redact_url_for_log(url.as_str()));

        let mut request = http
            .get(url.clone())
            .header(HEADER_PROJECT, self.project.as_str())
            .header(HEADER_RESPONSE_FORMAT, RESPONSE_FORMAT)
            .header("x-sdk-name", SDK_NAME);
        if let Some(locale) = &self.locale {
            request = request.header(HEADER_LOCALE, locale.as_str());
        }

        let mut response = request
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e, url.as_str()))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        if let Some(len) = response.content_length() {
            if len > self.max_body_bytes {
                return Err(self.body_too_large(len));
            }
        }

        let mut buffer = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.map_reqwest_error(e, url.as_str()))?
        {
            let total = (buffer.len() + chunk.len()) as u64;
            if total > self.max_body_bytes {
                return Err(self.body_too_large(total));
            }
            buffer.extend_from_slice(&chunk);
        }
        let bytes = Bytes::from(buffer);

        if !status.is_success() {
            let err = service_error(status, &bytes);
            log::warn!(
                "⚠️ 服务端拒绝请求 - {}: {}",
                redact_url_for_log(url.as_str()),
                err
            );
            return Err(err);
        }

        log::debug!("✅ 响应完成 - {} bytes", bytes.len());
        Ok(RawResponse { content_type, bytes })
    }

    fn http_client(&self) -> Result<&reqwest::Client, AppwriteError> {
        self.http.get_or_try_init(|| {
            reqwest::Client::builder()
                .timeout(self.request_timeout)
                .connect_timeout(self.connect_timeout)
                .build()
                .map_err(|e| AppwriteError::Network(format!("无法创建 HTTP 客户端：{}", e)))
        })
    }

    fn body_too_large(&self, size: u64) -> AppwriteError {
        AppwriteError::ResourceLimit(format!(
            "响应体过大（{} 字节，上限 {} 字节）",
            size, self.max_body_bytes
        ))
    }

    /// 连接阶段超时与整体请求超时分别报告各自的上限。
    fn timeout_message(&self, during_connect: bool) -> String {
        if during_connect {
            format!("连接超时（{}秒）", self.connect_timeout.as_secs())
        } else {
            format!("请求超时（{}秒）", self.request_timeout.as_secs())
        }
    }

    fn map_reqwest_error(&self, e: reqwest::Error, url: &str) -> AppwriteError {
        let err_msg = e.to_string().replace(url, &redact_url_for_log(url));

        if e.is_timeout() {
            AppwriteError::Timeout(self.timeout_message(e.is_connect()))
        } else if e.is_connect() {
            AppwriteError::Network(format!("无法连接：{}", err_msg))
        } else {
            AppwriteError::Network(format!("请求失败：{}", err_msg))
        }
    }
}

fn service_error(status: reqwest::StatusCode, body: &[u8]) -> AppwriteError {
    let code = status.as_u16();
    let fallback = || status.canonical_reason().unwrap_or("请求失败").to_string();

    match serde_json::from_slice::<ServiceErrorBody>(body) {
        Ok(parsed) => AppwriteError::Service {
            code,
            kind: parsed.kind,
            message: parsed.message.unwrap_or_else(fallback),
        },
        Err(_) => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            AppwriteError::Service {
                code,
                kind: None,
                message: if text.is_empty() { fallback() } else { text },
            }
        }
    }
}

pub(crate) fn redact_url_for_log(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return "<invalid-url>".to_string();
    };

    let host = parsed.host_str().unwrap_or("<unknown-host>");
    let port = parsed.port().map(|p| format!(":{}", p)).unwrap_or_default();

    format!("{}://{}{}{}", parsed.scheme(), host, port, parsed.path())
}
