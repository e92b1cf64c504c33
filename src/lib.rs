//! # QR 链接生成器 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  调用方 (前端 / 服务)                     │
//! │                                                          │
//! │   QrLinkGenerator::generate_qr(text, size, margin, dl)   │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓ 参数原样转发，结果 / 错误原样返回
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↓            本 crate                              │
//! │                                                          │
//! │  ┌─ qr ───────── 生成器 + QrBackend 注入点                │
//! │  ├─ avatars ──── /avatars/qr 地址拼接 / 请求              │
//! │  ├─ client ───── endpoint + project 句柄 (reqwest)       │
//! │  ├─ config ───── JSON 文件 / 环境变量                     │
//! │  └─ error ────── AppwriteError                           │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↓ HTTPS
//!   Appwrite Avatars QR 服务
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`qr`] | `QrLinkGenerator`、`QrRequest`、进程级共享实例 |
//! | [`avatars`] | 拼接二维码地址、请求图片、`QrImage` |
//! | [`client`] | 绑定服务地址与项目 ID 的客户端句柄 |
//! | [`config`] | 配置加载与环境变量覆盖 |
//! | [`error`] | 统一错误类型 `AppwriteError` |

pub mod avatars;
pub mod client;
pub mod config;
pub mod error;
pub mod qr;

pub use avatars::{AvatarLinks, Avatars, QrImage};
pub use client::Client;
pub use config::AppwriteConfig;
pub use error::AppwriteError;
pub use qr::{QrBackend, QrLinkGenerator, QrRequest};
