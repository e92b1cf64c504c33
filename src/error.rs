//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 本 crate 不对二维码参数做任何本地校验，因此错误只来自两处：
//! 客户端配置（地址 / 项目 ID 缺失或非法）与外部服务调用（网络、超时、服务端拒绝）。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 服务端拒绝时原样保留状态码、`type` 与 `message`，不做二次解释。
//! - 实现 `Serialize` 将错误序列化为字符串，便于跨 IPC / JSON 边界透传。

use serde::Serialize;

/// Appwrite 客户端统一错误类型。
#[derive(Debug, Clone, thiserror::Error)]
pub enum AppwriteError {
    /// 配置缺失或无法读取
    #[error("配置错误：{0}")]
    Config(String),

    /// 服务地址无法解析为 URL
    #[error("无效的服务地址：{0}")]
    InvalidEndpoint(String),

    #[error("网络错误：{0}")]
    Network(String),

    #[error("超时错误：{0}")]
    Timeout(String),

    /// 响应体超出 `max_body_bytes`
    #[error("资源限制：{0}")]
    ResourceLimit(String),

    /// 服务端返回非 2xx 状态。
    ///
    /// `kind` 对应 Appwrite 错误体中的 `type` 字段（如 `general_argument_invalid`）。
    #[error("服务端拒绝（{code}）：{message}")]
    Service {
        code: u16,
        kind: Option<String>,
        message: String,
    },
}

impl AppwriteError {
    /// 服务端错误的 HTTP 状态码；其他错误返回 `None`。
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Service { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<AppwriteError> for String {
    fn from(error: AppwriteError) -> Self {
        error.to_string()
    }
}

impl Serialize for AppwriteError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_keeps_code_and_message() {
        let err = AppwriteError::Service {
            code: 404,
            kind: Some("project_not_found".to_string()),
            message: "Project with the requested ID could not be found.".to_string(),
        };

        assert_eq!(err.status_code(), Some(404));
        assert_eq!(
            err.to_string(),
            "服务端拒绝（404）：Project with the requested ID could not be found."
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let err = AppwriteError::Network("connection refused".to_string());
        let json = serde_json::to_string(&err).expect("serialize failed");

        assert_eq!(json, "\"网络错误：connection refused\"");
        assert_eq!(err.status_code(), None);
    }
}
