//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 各功能模块各自定义领域错误（`StegoError` / `GeoError` / `MapError`），
//! 命令行入口只面对一个 `AppError`，通过 `#[from]` 自动汇总，
//! 不在调用处手动 `map_err`。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息，领域错误原样透传。
//! - 实现 `Serialize` 将错误序列化为其展示字符串。

use serde::Serialize;

use crate::geo::GeoError;
use crate::maps::MapError;
use crate::stego::StegoError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 隐写编码 / 解码失败
    #[error("{0}")]
    Stego(#[from] StegoError),

    /// 坐标换算或 EXIF 读取失败
    #[error("{0}")]
    Geo(#[from] GeoError),

    /// 静态地图请求失败
    #[error("{0}")]
    Map(#[from] MapError),

    /// 文件系统 I/O 错误
    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),

    /// 配置文件读写失败
    #[error("settings error: {0}")]
    Settings(String),
}

impl Serialize for AppError {
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
    fn serializes_as_display_string() {
        let error = AppError::from(GeoError::NoGps);
        assert_eq!(serde_json::to_string(&error).unwrap(), "\"No GPS data found\"");
    }

    #[test]
    fn user_facing_messages_are_english() {
        let error = AppError::from(StegoError::CapacityExceeded {
            required_bits: 104,
            available_bits: 96,
        });
        assert_eq!(error.to_string(), "message too long: needs 104 bits, image holds 96");
        assert_eq!(
            AppError::from(MapError::MissingApiKey).to_string(),
            "no map API key configured (set GEOAPIFY_API_KEY)"
        );
        assert!(error.to_string().is_ascii());
    }

    #[test]
    fn domain_errors_convert_with_question_mark() {
        fn fails() -> Result<(), AppError> {
            Err(StegoError::Decode("broken".to_string()))?
        }
        assert!(matches!(fails(), Err(AppError::Stego(StegoError::Decode(_)))));
    }
}
