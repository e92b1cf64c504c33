//! 二维码响应体。

use base64::{Engine as _, engine::general_purpose};
use bytes::Bytes;
use reqwest::Url;

const FALLBACK_MIME: &str = "application/octet-stream";

/// QR 服务返回的图片。
///
/// 内容不做解码或二次处理，`bytes()` 即服务端原始响应体。
#[derive(Debug, Clone)]
pub struct QrImage {
    url: Url,
    content_type: String,
    bytes: Bytes,
}

impl QrImage {
    /// 服务端未给出 `Content-Type` 时，按文件签名推断。
    pub(crate) fn from_response(url: Url, content_type: Option<String>, bytes: Bytes) -> Self {
        let content_type = content_type
            .filter(|ct| !ct.trim().is_empty())
            .or_else(|| infer::get(&bytes).map(|kind| kind.mime_type().to_string()))
            .unwrap_or_else(|| FALLBACK_MIME.to_string());

        Self {
            url,
            content_type,
            bytes,
        }
    }

    /// 本次请求的完整地址（含查询参数）。
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// 去掉参数部分的 MIME，例如 `image/png; charset=binary` -> `image/png`。
    pub fn mime(&self) -> &str {
        self.content_type
            .split(';')
            .next()
            .map(str::trim)
            .unwrap_or(FALLBACK_MIME)
    }

    pub fn is_image(&self) -> bool {
        self.mime().to_ascii_lowercase().starts_with("image/")
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// 转为 `data:` URL，可直接用于 `<img src>`。
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime(),
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}
