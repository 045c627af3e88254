//! # 地理坐标模块（geo）
//!
//! ## 设计思路
//!
//! - `dms`：度分秒与十进制度的纯函数换算，以及可读字符串的格式化/解析
//! - `exif`：从 JPEG/PNG/TIFF 字节中提取 GPS 纬度、经度
//! - `error`：统一的 `GeoError`
//!
//! ```text
//! 图片字节 ──exif::read_gps──► GpsFix(DmsCoordinate × 2)
//!                                  │
//!                  ┌───────────────┴───────────────┐
//!           to_decimal() (地图请求)          readable() (展示)
//! ```

mod dms;
mod error;
mod exif;

pub use dms::{
    Axis, DmsCoordinate, Hemisphere, Rational, decimal_to_dms, dms_to_decimal, dms_to_decimal_str,
    parse_dms,
};
pub use error::GeoError;
pub use exif::{GpsFix, read_gps};
