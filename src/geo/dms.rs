//! 度分秒（DMS）与十进制度互转模块
//!
//! # 设计思路
//!
//! EXIF 中的 GPS 坐标以三个有理数（度、分、秒）加半球字母给出，
//! 地图请求需要带符号的十进制度，界面展示又需要可读的 DMS 字符串。
//! 本模块只做这三种表示之间的同步换算，不做任何 I/O。
//!
//! # 实现思路
//!
//! - `Rational` 构造时拒绝 0 分母，之后求值不会出现除零。
//! - DMS → 十进制：`度 + 分/60 + 秒/3600`，S/W 取负；不做数值范围校验。
//! - 十进制 → DMS：先取绝对值再拆分，方向完全由基点字母表达，
//!   避免 `-0.x` 度截断为整数 0 后丢失符号。
//! - 字符串格式固定为 `"{度}° {分}' {秒:.2}\" {N|S|E|W}"`，
//!   `parse_dms` 使用预编译正则反向解析。

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::GeoError;

/// 可读 DMS 字符串的解析正则，与 `decimal_to_dms` 的输出格式逐字符对应。
static DMS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*(\d+)° (\d+)' ([\d.]+)" ([NSEW])\s*$"#).expect("DMS 正则无效")
});

/// `numerator / denominator` 形式的有理数，分母非零且有限。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rational {
    numerator: f64,
    denominator: f64,
}

impl Rational {
    pub fn new(numerator: f64, denominator: f64) -> Result<Self, GeoError> {
        if denominator == 0.0 || !denominator.is_finite() {
            return Err(GeoError::ZeroDenominator);
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// EXIF `RATIONAL` 字段（两个无符号 32 位整数）。
    pub fn from_u32(numerator: u32, denominator: u32) -> Result<Self, GeoError> {
        Self::new(numerator as f64, denominator as f64)
    }

    /// 分母为 1 的有理数。
    pub fn whole(value: f64) -> Self {
        Self {
            numerator: value,
            denominator: 1.0,
        }
    }

    pub fn value(&self) -> f64 {
        self.numerator / self.denominator
    }
}

/// 坐标轴：决定基点字母取 N/S 还是 E/W。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// 根据原始带符号数值的正负选择基点字母。
    pub fn cardinal(self, negative: bool) -> Hemisphere {
        match (self, negative) {
            (Self::Latitude, false) => Hemisphere::North,
            (Self::Latitude, true) => Hemisphere::South,
            (Self::Longitude, false) => Hemisphere::East,
            (Self::Longitude, true) => Hemisphere::West,
        }
    }
}

impl FromStr for Axis {
    type Err = GeoError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "lat" | "latitude" => Ok(Self::Latitude),
            "lon" | "lng" | "long" | "longitude" => Ok(Self::Longitude),
            other => Err(GeoError::InvalidCoordinateRef(other.to_string())),
        }
    }
}

/// 半球参考字母。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// S 与 W 对应负值。
    pub fn is_negative(self) -> bool {
        matches!(self, Self::South | Self::West)
    }

    pub fn axis(self) -> Axis {
        match self {
            Self::North | Self::South => Axis::Latitude,
            Self::East | Self::West => Axis::Longitude,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
            Self::East => 'E',
            Self::West => 'W',
        }
    }
}

impl TryFrom<char> for Hemisphere {
    type Error = GeoError;

    fn try_from(letter: char) -> Result<Self, Self::Error> {
        match letter {
            'N' => Ok(Self::North),
            'S' => Ok(Self::South),
            'E' => Ok(Self::East),
            'W' => Ok(Self::West),
            other => Err(GeoError::InvalidCoordinateRef(other.to_string())),
        }
    }
}

impl FromStr for Hemisphere {
    type Err = GeoError;

    /// EXIF ASCII 字段以 NUL 结尾，这里一并去掉。
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim_matches(|c: char| c == '\0' || c.is_whitespace());
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => Self::try_from(letter),
            _ => Err(GeoError::InvalidCoordinateRef(trimmed.to_string())),
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// 度、分、秒三个有理数加半球参考。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DmsCoordinate {
    pub degrees: Rational,
    pub minutes: Rational,
    pub seconds: Rational,
    pub reference: Hemisphere,
}

impl DmsCoordinate {
    pub fn new(parts: [Rational; 3], reference: Hemisphere) -> Self {
        let [degrees, minutes, seconds] = parts;
        Self {
            degrees,
            minutes,
            seconds,
            reference,
        }
    }

    pub fn parts(&self) -> [Rational; 3] {
        [self.degrees, self.minutes, self.seconds]
    }

    pub fn to_decimal(&self) -> f64 {
        dms_to_decimal(self.parts(), self.reference)
    }

    /// 可读字符串（先换算为十进制再格式化）。
    pub fn to_readable(&self) -> String {
        decimal_to_dms(self.to_decimal(), self.reference.axis())
    }
}

/// DMS → 带符号十进制度。
///
/// # 示例
/// ```rust
/// use image_inspector::geo::{Hemisphere, Rational, dms_to_decimal};
///
/// let parts = [Rational::whole(40.0), Rational::whole(26.0), Rational::whole(46.0)];
/// let decimal = dms_to_decimal(parts, Hemisphere::North);
/// assert!((decimal - 40.446111).abs() < 1e-6);
/// ```
pub fn dms_to_decimal(parts: [Rational; 3], reference: Hemisphere) -> f64 {
    let [degrees, minutes, seconds] = parts.map(|part| part.value());
    let decimal = degrees + minutes / 60.0 + seconds / 3600.0;

    if reference.is_negative() { -decimal } else { decimal }
}

/// 与 [`dms_to_decimal`] 相同，但半球参考以 EXIF 原始文本给出。
pub fn dms_to_decimal_str(parts: [Rational; 3], reference: &str) -> Result<f64, GeoError> {
    let reference = reference.parse::<Hemisphere>()?;
    Ok(dms_to_decimal(parts, reference))
}

/// 带符号十进制度 → 可读 DMS 字符串，秒保留两位小数。
///
/// 分与秒不做进位：秒在四舍五入后可能显示为 `60.00`，
/// 例如 `10.999999` 得到 `10° 59' 60.00" N`，[`parse_dms`] 解析回去仍在误差范围内。
///
/// # 示例
/// ```rust
/// use image_inspector::geo::{Axis, decimal_to_dms};
///
/// assert_eq!(decimal_to_dms(-0.0001, Axis::Latitude), "0° 0' 0.36\" S");
/// ```
pub fn decimal_to_dms(decimal: f64, axis: Axis) -> String {
    let magnitude = decimal.abs();
    let degrees = magnitude.floor();
    let minutes_float = (magnitude - degrees) * 60.0;
    let minutes = minutes_float.floor();
    let seconds = (minutes_float - minutes) * 60.0;
    let cardinal = axis.cardinal(decimal < 0.0);

    format!(
        "{}° {}' {:.2}\" {}",
        degrees as u64, minutes as u64, seconds, cardinal
    )
}

/// 解析 [`decimal_to_dms`] 产生的字符串。
pub fn parse_dms(text: &str) -> Result<DmsCoordinate, GeoError> {
    let captures = DMS_PATTERN
        .captures(text)
        .ok_or_else(|| GeoError::InvalidDms(text.to_string()))?;

    let number = |index: usize| -> Result<f64, GeoError> {
        captures
            .get(index)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .ok_or_else(|| GeoError::InvalidDms(text.to_string()))
    };

    let parts = [
        Rational::whole(number(1)?),
        Rational::whole(number(2)?),
        Rational::whole(number(3)?),
    ];
    let reference = captures
        .get(4)
        .map(|m| m.as_str())
        .ok_or_else(|| GeoError::InvalidDms(text.to_string()))?
        .parse::<Hemisphere>()?;

    Ok(DmsCoordinate::new(parts, reference))
}
