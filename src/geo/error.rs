//! # 坐标与 EXIF 错误模型

/// 坐标转换与 GPS 提取的统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// 半球参考不在 N/S/E/W 之内。
    #[error("invalid hemisphere reference: {0} (expected N, S, E or W)")]
    InvalidCoordinateRef(String),

    #[error("rational denominator must be non-zero")]
    ZeroDenominator,

    #[error("cannot parse DMS string: {0}")]
    InvalidDms(String),

    #[error("No EXIF data found")]
    NoExif,

    #[error("No GPS data found")]
    NoGps,

    #[error("malformed EXIF data: {0}")]
    MalformedExif(String),
}
