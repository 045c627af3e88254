//! # 静态地图配置

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://maps.geoapify.com/v1/staticmap";

/// 静态地图请求参数。
///
/// 所有字段都有默认值，配置文件中可只写需要覆盖的部分。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub api_key: String,
    pub base_url: String,
    pub style: String,
    pub width: u32,
    pub height: u32,
    pub zoom: u8,
    /// 标记颜色，`#rrggbb`
    pub marker_color: String,
    pub timeout_secs: u64,
    /// 响应体上限（字节）
    pub max_response_bytes: u64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            style: "osm-bright-smooth".to_string(),
            width: 400,
            height: 400,
            zoom: 10,
            marker_color: "#ff0000".to_string(),
            timeout_secs: 15,
            max_response_bytes: 10 * 1024 * 1024,
        }
    }
}

impl MapConfig {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
