//! # Avatars 服务
//!
//! ## 设计思路
//!
//! 对应 Appwrite 的 Avatars 接口，这里只覆盖二维码（`/avatars/qr`）。
//! 参数 `text / size / margin / download` 原样拼进查询串，本地不做范围或空值校验，
//! 是否合法由服务端判定。
//!
//! ## 实现思路
//!
//! - `qr_url`：只拼地址、不发请求，对应 Web SDK 中 `getQR` 返回链接的行为。
//! - `get_qr`：发起 GET，返回 `QrImage`（原始字节 + MIME + 请求地址）。
//! - `AvatarLinks`：把 `qr_url` 包装为 `QrBackend`，供只需要链接的调用方使用。

mod image;

use reqwest::Url;

use crate::client::Client;
use crate::error::AppwriteError;
use crate::qr::QrBackend;

pub use image::QrImage;

const QR_PATH: [&str; 2] = ["avatars", "qr"];

#[derive(Debug, Clone)]
pub struct Avatars {
    client: Client,
}

impl Avatars {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// 生成二维码图片地址（不发起网络请求）。
    ///
    /// 项目 ID 同时作为 `project` 查询参数附带，使链接可以脱离请求头单独使用。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use qr_link::{Avatars, Client};
    ///
    /// let avatars = Avatars::new(Client::new().set_project("demo"));
    /// let url = avatars.qr_url("hello", 400, 1, false)?;
    /// # Ok::<(), qr_link::AppwriteError>(())
    /// ```
    pub fn qr_url(
        &self,
        text: &str,
        size: i64,
        margin: i64,
        download: bool,
    ) -> Result<Url, AppwriteError> {
        let mut url = self.client.build_url(&QR_PATH)?;
        url.query_pairs_mut()
            .append_pair("text", text)
            .append_pair("size", &size.to_string())
            .append_pair("margin", &margin.to_string())
            .append_pair("download", if download { "true" } else { "false" })
            .append_pair("project", self.client.project());
        Ok(url)
    }

    /// 请求 QR 服务并返回图片。
    pub async fn get_qr(
        &self,
        text: &str,
        size: i64,
        margin: i64,
        download: bool,
    ) -> Result<QrImage, AppwriteError> {
        let url = self.qr_url(text, size, margin, download)?;
        let raw = self.client.get(url.clone()).await?;
        Ok(QrImage::from_response(url, raw.content_type, raw.bytes))
    }
}

impl QrBackend for Avatars {
    type Output = QrImage;
    type Error = AppwriteError;

    async fn get_qr(
        &self,
        text: &str,
        size: i64,
        margin: i64,
        download: bool,
    ) -> Result<QrImage, AppwriteError> {
        Avatars::get_qr(self, text, size, margin, download).await
    }
}

/// 只返回二维码链接的后端。
#[derive(Debug, Clone)]
pub struct AvatarLinks {
    avatars: Avatars,
}

impl AvatarLinks {
    pub fn new(avatars: Avatars) -> Self {
        Self { avatars }
    }

    pub fn avatars(&self) -> &Avatars {
        &self.avatars
    }
}

impl QrBackend for AvatarLinks {
    type Output = Url;
    type Error = AppwriteError;

    async fn get_qr(
        &self,
        text: &str,
        size: i64,
        margin: i64,
        download: bool,
    ) -> Result<Url, AppwriteError> {
        self.avatars.qr_url(text, size, margin, download)
    }
}
