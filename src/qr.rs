//! # 二维码链接生成器
//!
//! ## 设计思路
//!
//! 生成器本身不编码二维码，也不校验参数，只把 `(text, size, margin, download)`
//! 按原顺序转交给后端（默认是 Appwrite Avatars），结果与错误都原样返回。
//!
//! 后端通过 `QrBackend` trait 注入：
//! 1. 生产环境使用 `Avatars`（拿图片）或 `AvatarLinks`（只拿链接）
//! 2. 测试中替换为记录调用参数的替身
//!
//! ## 实现思路
//!
//! - 推荐由调用方构造一个 `QrLinkGenerator` 并注入各处使用。
//! - 需要进程级单例时使用 [`shared`]：首次调用时从环境变量构造，之后只读复用，
//!   初始化失败会在每次调用时以错误返回。

use std::future::Future;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::avatars::Avatars;
use crate::client::Client;
use crate::config::AppwriteConfig;
use crate::error::AppwriteError;

pub const DEFAULT_QR_SIZE: i64 = 400;
pub const DEFAULT_QR_MARGIN: i64 = 1;
pub const DEFAULT_QR_DOWNLOAD: bool = false;

/// 外部 QR 服务的抽象。
///
/// 实现方负责真正的请求；参数必须原样使用，不得在此之前被改写。
pub trait QrBackend {
    type Output;
    type Error;

    fn get_qr(
        &self,
        text: &str,
        size: i64,
        margin: i64,
        download: bool,
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}

/// 一次二维码请求的参数。
///
/// 反序列化时缺省字段取默认值（400 / 1 / false）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrRequest {
    pub text: String,
    #[serde(default = "default_size")]
    pub size: i64,
    #[serde(default = "default_margin")]
    pub margin: i64,
    #[serde(default)]
    pub download: bool,
}

fn default_size() -> i64 {
    DEFAULT_QR_SIZE
}

fn default_margin() -> i64 {
    DEFAULT_QR_MARGIN
}

impl QrRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size: DEFAULT_QR_SIZE,
            margin: DEFAULT_QR_MARGIN,
            download: DEFAULT_QR_DOWNLOAD,
        }
    }

    pub fn size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    pub fn margin(mut self, margin: i64) -> Self {
        self.margin = margin;
        self
    }

    pub fn download(mut self, download: bool) -> Self {
        self.download = download;
        self
    }
}

/// 二维码生成器，持有一个已配置的后端句柄。
#[derive(Debug, Clone)]
pub struct QrLinkGenerator<B> {
    backend: B,
}

impl<B: QrBackend> QrLinkGenerator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 按原顺序转发四个参数。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use qr_link::{Avatars, Client, QrLinkGenerator};
    ///
    /// let client = Client::new()
    ///     .set_endpoint("https://fra.cloud.appwrite.io/v1")
    ///     .set_project("688230070011fbf10e1a");
    /// let generator = QrLinkGenerator::new(Avatars::new(client));
    /// let image = generator.generate_qr("hello", 200, 2, true).await?;
    /// # Ok::<(), qr_link::AppwriteError>(())
    /// ```
    pub async fn generate_qr(
        &self,
        text: &str,
        size: i64,
        margin: i64,
        download: bool,
    ) -> Result<B::Output, B::Error> {
        log::debug!(
            "🔳 生成二维码 - text_len={}, size={}, margin={}, download={}",
            text.chars().count(),
            size,
            margin,
            download
        );
        self.backend.get_qr(text, size, margin, download).await
    }

    /// 使用默认尺寸 400、边距 1、非下载模式。
    pub async fn generate_qr_default(&self, text: &str) -> Result<B::Output, B::Error> {
        self.generate_qr(text, DEFAULT_QR_SIZE, DEFAULT_QR_MARGIN, DEFAULT_QR_DOWNLOAD)
            .await
    }

    pub async fn generate(&self, request: &QrRequest) -> Result<B::Output, B::Error> {
        self.generate_qr(&request.text, request.size, request.margin, request.download)
            .await
    }
}

type SharedGenerator = Result<QrLinkGenerator<Avatars>, AppwriteError>;

static SHARED: Lazy<SharedGenerator> = Lazy::new(init_shared);

fn init_shared() -> SharedGenerator {
    init_shared_with(|key| std::env::var(key).ok())
}

fn init_shared_with<F>(lookup: F) -> SharedGenerator
where
    F: Fn(&str) -> Option<String>,
{
    let config = AppwriteConfig::from_env_with(lookup).inspect_err(|err| {
        log::error!("二维码生成器初始化失败：{err}");
    })?;
    Ok(QrLinkGenerator::new(Avatars::new(Client::from_config(&config))))
}

fn shared_from(
    cell: &'static Lazy<SharedGenerator>,
) -> Result<&'static QrLinkGenerator<Avatars>, AppwriteError> {
    match &**cell {
        Ok(generator) => Ok(generator),
        Err(err) => Err(err.clone()),
    }
}

/// 进程级共享生成器，首次调用时按环境变量初始化，之后不再重建。
pub fn shared() -> Result<&'static QrLinkGenerator<Avatars>, AppwriteError> {
    shared_from(&SHARED)
}
