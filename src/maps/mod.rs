//! # 静态地图模块（maps）
//!
//! 根据 GPS 坐标生成 Geoapify 静态地图请求，并下载地图图片。
//!
//! - `config`：`MapConfig`（可由配置文件覆盖）
//! - `client`：URL 组装与异步下载
//! - `save`：把下载结果转为 PNG，保存为 `map_<stem>.png`
//! - `error`：`MapError`

mod client;
mod config;
mod error;
mod save;

pub use client::{MapClient, static_map_url};
pub use config::{DEFAULT_BASE_URL, MapConfig};
pub use error::MapError;
pub use save::{MAP_OUTPUT_PREFIX, save_map_png};
