//! # 静态地图请求错误模型

/// 地图请求失败的原因。
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// 未配置 API Key（配置文件与 `GEOAPIFY_API_KEY` 均为空）。
    #[error("no map API key configured (set GEOAPIFY_API_KEY)")]
    MissingApiKey,

    #[error("invalid map request URL: {0}")]
    InvalidUrl(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("map service returned HTTP {0}")]
    Status(u16),

    #[error("map service did not return an image: {0}")]
    InvalidResponse(String),

    /// 地图图片落盘失败
    #[error("failed to save map: {0}")]
    Storage(String),
}
