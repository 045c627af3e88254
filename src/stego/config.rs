//! # 配置模块
//!
//! ## 设计思路
//!
//! 将隐写链路中“可调的策略”集中到 `StegoConfig`：解码像素上限、
//! 有损格式识别列表、临时文件目录。
//! 帧分隔符与输出文件命名属于跨实现的兼容契约，不放进配置，固定为常量。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的配置。
//! - 通过 `serde(default)` 支持从设置文件部分覆盖。
//! - `is_lossy_extension` 统一做大小写无关的扩展名判断。

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// 消息帧分隔符，编码与解码两端必须一致。
pub const DELIMITER: &str = "~~~";

/// 默认输出文件名前缀：`encoded_<stem>.png`。
pub const OUTPUT_PREFIX: &str = "encoded_";

/// 每个像素参与嵌入的通道数（R、G、B）。
pub const EMBED_CHANNELS: usize = 3;

/// 隐写处理配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 视为有损格式的扩展名（小写，不含点）。
    ///
    /// 命中后会先无损转存为 PNG 临时文件，再进行嵌入。
    pub lossy_extensions: Vec<String>,
    /// 临时 PNG 的存放目录，未设置时使用系统临时目录。
    pub temp_dir: Option<PathBuf>,
}

impl Default for StegoConfig {
    fn default() -> Self {
        Self {
            max_decoded_pixels: 40_000_000,
            lossy_extensions: vec!["jpg".to_string(), "jpeg".to_string(), "jfif".to_string()],
            temp_dir: None,
        }
    }
}

impl StegoConfig {
    /// 判断扩展名是否属于有损格式。
    pub fn is_lossy_extension(&self, extension: &str) -> bool {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        self.lossy_extensions
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(&extension))
    }

    /// 临时文件目录。
    pub fn resolve_temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
