//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载隐写链路（加载 → 校验 → 嵌入 → 落盘）中的所有错误来源。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! “图片中没有隐藏消息”不是错误，见 [`super::HiddenMessage::NotFound`]。

/// 隐写处理统一错误类型。
///
/// 该类型会在 CLI 层被上转为 `AppError`，最终原样展示给用户。
#[derive(Debug, thiserror::Error)]
pub enum StegoError {
    /// 消息帧位数超过图片可嵌入容量（`width * height * 3`）。
    #[error("message too long: needs {required_bits} bits, image holds {available_bits}")]
    CapacityExceeded {
        required_bits: u64,
        available_bits: u64,
    },

    #[error("unsupported carrier image: {0}")]
    UnsupportedSource(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("file error: {0}")]
    FileSystem(String),

    #[error("resource limit: {0}")]
    ResourceLimit(String),
}
