//! # 配置模块
//!
//! ## 设计思路
//!
//! 服务地址与项目 ID 不写死在代码里，统一由 `AppwriteConfig` 承载，
//! 来源可以是 JSON 配置文件、环境变量，或两者叠加（环境变量优先）。
//!
//! ## 实现思路
//!
//! - `Default` 给出公有云地址与常用超时，项目 ID 留空。
//! - `from_env` / `apply_env_overrides` 内部走 `*_with` 版本，
//!   读取函数可注入，测试时无需修改进程环境变量。
//! - `ensure_complete` 只检查“能否构造客户端”，不涉及任何二维码参数。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppwriteError;

pub const DEFAULT_ENDPOINT: &str = "https://fra.cloud.appwrite.io/v1";

pub const ENV_ENDPOINT: &str = "APPWRITE_ENDPOINT";
pub const ENV_PROJECT_ID: &str = "APPWRITE_PROJECT_ID";
pub const ENV_LOCALE: &str = "APPWRITE_LOCALE";

/// Appwrite 客户端配置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppwriteConfig {
    /// API 地址，例如 `https://fra.cloud.appwrite.io/v1`。
    pub endpoint: String,
    /// 项目 ID。
    pub project_id: String,
    /// 可选语言区域，随请求头 `X-Appwrite-Locale` 发送。
    pub locale: Option<String>,
    /// 单次请求总超时（秒）。
    pub request_timeout_secs: u64,
    /// 建立连接（TCP/TLS）超时（秒）。
    pub connect_timeout_secs: u64,
    /// 允许读取的最大响应体（字节）。
    pub max_body_bytes: u64,
}

impl Default for AppwriteConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            project_id: String::new(),
            locale: None,
            request_timeout_secs: 30,
            connect_timeout_secs: 8,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

impl AppwriteConfig {
    /// 从进程环境变量构造配置。
    ///
    /// `APPWRITE_ENDPOINT` 缺省时回落到 [`DEFAULT_ENDPOINT`]，
    /// `APPWRITE_PROJECT_ID` 必须存在。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use qr_link::AppwriteConfig;
    ///
    /// let config = AppwriteConfig::from_env()?;
    /// # Ok::<(), qr_link::AppwriteError>(())
    /// ```
    pub fn from_env() -> Result<Self, AppwriteError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_env_with<F>(lookup: F) -> Result<Self, AppwriteError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_env_overrides_with(lookup);
        config.ensure_complete()?;
        Ok(config)
    }

    /// 读取 JSON 配置文件，再叠加环境变量覆盖。
    pub fn load_from_path(path: &Path) -> Result<Self, AppwriteError> {
        Self::load_from_path_with(path, |key| std::env::var(key).ok())
    }

    pub(crate) fn load_from_path_with<F>(path: &Path, lookup: F) -> Result<Self, AppwriteError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let content = fs::read_to_string(path).map_err(|e| {
            AppwriteError::Config(format!("读取配置文件失败（{}）：{}", path.display(), e))
        })?;
        let mut config: Self = serde_json::from_str(&content)
            .map_err(|e| AppwriteError::Config(format!("解析配置文件失败：{}", e)))?;

        config.apply_env_overrides_with(lookup);
        config.ensure_complete()?;

        log::debug!("已从 {} 加载 Appwrite 配置", path.display());
        Ok(config)
    }

    /// 用环境变量覆盖已有字段（仅覆盖非空值）。
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_with(|key| std::env::var(key).ok());
    }

    pub(crate) fn apply_env_overrides_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(endpoint) = non_empty(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(project_id) = non_empty(ENV_PROJECT_ID) {
            self.project_id = project_id;
        }
        if let Some(locale) = non_empty(ENV_LOCALE) {
            self.locale = Some(locale);
        }
    }

    /// 确认地址与项目 ID 均已提供。
    pub fn ensure_complete(&self) -> Result<(), AppwriteError> {
        if self.endpoint.trim().is_empty() {
            return Err(AppwriteError::Config(format!(
                "缺少服务地址（可通过 {} 设置）",
                ENV_ENDPOINT
            )));
        }
        if self.project_id.trim().is_empty() {
            return Err(AppwriteError::Config(format!(
                "缺少项目 ID（可通过 {} 设置）",
                ENV_PROJECT_ID
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn temp_config_path(tag: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("qr_link_{}_{}_{}.json", tag, std::process::id(), nanos))
    }

    #[test]
    fn from_env_falls_back_to_default_endpoint() {
        let config =
            AppwriteConfig::from_env_with(lookup_from(&[(ENV_PROJECT_ID, "688230070011fbf10e1a")]))
                .expect("config should load");

        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.project_id, "688230070011fbf10e1a");
        assert_eq!(config.locale, None);
    }

    #[test]
    fn from_env_requires_project_id() {
        let result = AppwriteConfig::from_env_with(lookup_from(&[(
            ENV_ENDPOINT,
            "https://self-hosted.example.com/v1",
        )]));

        assert!(matches!(result, Err(AppwriteError::Config(_))));
    }

    #[test]
    fn blank_env_values_do_not_override() {
        let mut config = AppwriteConfig {
            project_id: "from-file".to_string(),
            ..AppwriteConfig::default()
        };
        config.apply_env_overrides_with(lookup_from(&[
            (ENV_PROJECT_ID, "   "),
            (ENV_LOCALE, "zh-CN"),
        ]));

        assert_eq!(config.project_id, "from-file");
        assert_eq!(config.locale.as_deref(), Some("zh-CN"));
    }

    #[test]
    fn load_from_path_reads_partial_json() {
        let path = temp_config_path("partial");
        fs::write(
            &path,
            r#"{ "endpoint": "http://localhost/v1", "projectId": "local-project" }"#,
        )
        .expect("write config failed");

        let result = AppwriteConfig::load_from_path_with(&path, lookup_from(&[]));
        let _ = fs::remove_file(&path);
        let config = result.expect("config should load");

        assert_eq!(config.endpoint, "http://localhost/v1");
        assert_eq!(config.project_id, "local-project");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.connect_timeout_secs, 8);
        assert_eq!(config.max_body_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn load_from_path_reports_missing_file() {
        let path = temp_config_path("missing");
        let result = AppwriteConfig::load_from_path_with(&path, lookup_from(&[]));

        assert!(matches!(result, Err(AppwriteError::Config(_))));
    }
}
