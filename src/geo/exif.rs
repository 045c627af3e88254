//! EXIF GPS 读取
//!
//! 只解析定位 GPS 所需的最小 TIFF 子集：字节序头、IFD0、
//! `GPSInfo`(0x8825) 指向的 GPS IFD，以及其中的纬度/经度与参考字母。
//!
//! EXIF 块的来源：
//! - JPEG：`APP1` 段且以 `Exif\0\0` 开头（遇到 SOS/EOI 停止扫描）
//! - PNG：`eXIf` 块
//! - 直接以 TIFF 头开头的数据（`II*\0` / `MM\0*`）

use serde::Serialize;

use super::dms::{DmsCoordinate, Hemisphere, Rational};
use super::{Axis, GeoError};

const EXIF_HEADER: &[u8] = b"Exif\0\0";
const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

const TAG_GPS_IFD: u16 = 0x8825;
const TAG_LATITUDE_REF: u16 = 0x0001;
const TAG_LATITUDE: u16 = 0x0002;
const TAG_LONGITUDE_REF: u16 = 0x0003;
const TAG_LONGITUDE: u16 = 0x0004;

const TYPE_ASCII: u16 = 2;
const TYPE_RATIONAL: u16 = 5;

const IFD_ENTRY_SIZE: usize = 12;

/// 一次读取得到的 GPS 定位。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GpsFix {
    pub latitude: DmsCoordinate,
    pub longitude: DmsCoordinate,
}

impl GpsFix {
    /// `(纬度, 经度)` 十进制度。
    pub fn to_decimal(&self) -> (f64, f64) {
        (self.latitude.to_decimal(), self.longitude.to_decimal())
    }

    /// `(纬度, 经度)` 可读 DMS 字符串。
    pub fn readable(&self) -> (String, String) {
        (self.latitude.to_readable(), self.longitude.to_readable())
    }
}

/// 从整张图片的字节中读取 GPS 坐标。
///
/// # 错误
/// - 找不到 EXIF 块：[`GeoError::NoExif`]
/// - EXIF 中没有完整的 GPS 四元组：[`GeoError::NoGps`]
/// - 偏移越界、类型不符：[`GeoError::MalformedExif`]
pub fn read_gps(bytes: &[u8]) -> Result<GpsFix, GeoError> {
    let tiff = find_tiff(bytes)?;
    let reader = TiffReader::new(tiff)?;

    let ifd0 = reader.read_ifd(reader.first_ifd_offset()?)?;
    let gps_pointer = find_entry(&ifd0, TAG_GPS_IFD).ok_or(GeoError::NoGps)?;
    let gps_offset = reader.u32_at(gps_pointer.value_field)? as usize;
    let gps = reader.read_ifd(gps_offset)?;

    let latitude = read_coordinate(&reader, &gps, TAG_LATITUDE_REF, TAG_LATITUDE, Axis::Latitude)?;
    let longitude =
        read_coordinate(&reader, &gps, TAG_LONGITUDE_REF, TAG_LONGITUDE, Axis::Longitude)?;

    log::debug!(
        "📍 读取到 GPS - 纬度: {:.6} 经度: {:.6}",
        latitude.to_decimal(),
        longitude.to_decimal()
    );

    Ok(GpsFix {
        latitude,
        longitude,
    })
}

fn read_coordinate(
    reader: &TiffReader<'_>,
    entries: &[IfdEntry],
    ref_tag: u16,
    value_tag: u16,
    axis: Axis,
) -> Result<DmsCoordinate, GeoError> {
    let reference_entry = find_entry(entries, ref_tag).ok_or(GeoError::NoGps)?;
    let value_entry = find_entry(entries, value_tag).ok_or(GeoError::NoGps)?;

    let reference = reader.read_ascii(reference_entry)?.parse::<Hemisphere>()?;
    if reference.axis() != axis {
        return Err(GeoError::InvalidCoordinateRef(reference.to_string()));
    }

    let parts = reader.read_rationals(value_entry)?;
    Ok(DmsCoordinate::new(parts, reference))
}

fn find_entry(entries: &[IfdEntry], tag: u16) -> Option<&IfdEntry> {
    entries.iter().find(|entry| entry.tag == tag)
}

/// 定位 TIFF 数据起点（EXIF 内偏移均相对于此）。
fn find_tiff(bytes: &[u8]) -> Result<&[u8], GeoError> {
    if bytes.starts_with(&[0xFF, 0xD8]) {
        find_tiff_in_jpeg(bytes)
    } else if bytes.starts_with(PNG_SIGNATURE) {
        find_tiff_in_png(bytes)
    } else if bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*") {
        Ok(bytes)
    } else {
        Err(GeoError::NoExif)
    }
}

fn find_tiff_in_jpeg(bytes: &[u8]) -> Result<&[u8], GeoError> {
    let mut pos = 2;

    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return Err(GeoError::MalformedExif(format!("misplaced JPEG marker at offset {}", pos)));
        }

        let marker = bytes[pos + 1];
        match marker {
            // 填充字节
            0xFF => {
                pos += 1;
                continue;
            }
            // SOS / EOI 之后不再有元数据段
            0xDA | 0xD9 => break,
            0x01 | 0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            _ => {}
        }

        let length = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        if length < 2 {
            return Err(GeoError::MalformedExif(format!("invalid JPEG segment length: {}", length)));
        }
        let end = pos + 2 + length;
        let segment = bytes
            .get(pos + 4..end)
            .ok_or_else(|| GeoError::MalformedExif("JPEG segment out of bounds".to_string()))?;

        if marker == 0xE1 && segment.starts_with(EXIF_HEADER) {
            return Ok(&segment[EXIF_HEADER.len()..]);
        }
        pos = end;
    }

    Err(GeoError::NoExif)
}

fn find_tiff_in_png(bytes: &[u8]) -> Result<&[u8], GeoError> {
    let mut pos = PNG_SIGNATURE.len();

    while pos + 8 <= bytes.len() {
        let length =
            u32::from_be_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]]) as usize;
        let chunk_type = &bytes[pos + 4..pos + 8];
        let data = bytes
            .get(pos + 8..pos + 8 + length)
            .ok_or_else(|| GeoError::MalformedExif("PNG chunk out of bounds".to_string()))?;

        match chunk_type {
            b"eXIf" => return Ok(data.strip_prefix(EXIF_HEADER).unwrap_or(data)),
            b"IEND" => break,
            _ => {}
        }
        // 长度 + 类型 + 数据 + CRC
        pos += 12 + length;
    }

    Err(GeoError::NoExif)
}

#[derive(Debug, Clone, Copy)]
enum ByteOrder {
    Little,
    Big,
}

#[derive(Debug, Clone, Copy)]
struct IfdEntry {
    tag: u16,
    field_type: u16,
    count: u32,
    /// 条目中 4 字节值/偏移字段在 TIFF 内的位置。
    value_field: usize,
}

struct TiffReader<'a> {
    data: &'a [u8],
    order: ByteOrder,
}

impl<'a> TiffReader<'a> {
    fn new(data: &'a [u8]) -> Result<Self, GeoError> {
        let order = match data.get(0..2) {
            Some(b"II") => ByteOrder::Little,
            Some(b"MM") => ByteOrder::Big,
            _ => return Err(GeoError::MalformedExif("unknown TIFF byte order".to_string())),
        };

        let reader = Self { data, order };
        if reader.u16_at(2)? != 42 {
            return Err(GeoError::MalformedExif("bad TIFF magic number".to_string()));
        }
        Ok(reader)
    }

    fn bytes_at<const N: usize>(&self, offset: usize) -> Result<[u8; N], GeoError> {
        self.data
            .get(offset..offset + N)
            .and_then(|slice| slice.try_into().ok())
            .ok_or_else(|| GeoError::MalformedExif(format!("offset out of bounds: {}", offset)))
    }

    fn u16_at(&self, offset: usize) -> Result<u16, GeoError> {
        let raw = self.bytes_at::<2>(offset)?;
        Ok(match self.order {
            ByteOrder::Little => u16::from_le_bytes(raw),
            ByteOrder::Big => u16::from_be_bytes(raw),
        })
    }

    fn u32_at(&self, offset: usize) -> Result<u32, GeoError> {
        let raw = self.bytes_at::<4>(offset)?;
        Ok(match self.order {
            ByteOrder::Little => u32::from_le_bytes(raw),
            ByteOrder::Big => u32::from_be_bytes(raw),
        })
    }

    fn first_ifd_offset(&self) -> Result<usize, GeoError> {
        Ok(self.u32_at(4)? as usize)
    }

    fn read_ifd(&self, offset: usize) -> Result<Vec<IfdEntry>, GeoError> {
        let count = self.u16_at(offset)? as usize;
        let mut entries = Vec::with_capacity(count);

        for index in 0..count {
            let base = offset + 2 + index * IFD_ENTRY_SIZE;
            entries.push(IfdEntry {
                tag: self.u16_at(base)?,
                field_type: self.u16_at(base + 2)?,
                count: self.u32_at(base + 4)?,
                value_field: base + 8,
            });
        }

        Ok(entries)
    }

    /// 总长度不超过 4 字节的值内联存放在条目中，否则条目存放偏移。
    fn data_offset(&self, entry: &IfdEntry, unit_size: usize) -> Result<usize, GeoError> {
        if entry.count as usize * unit_size <= 4 {
            Ok(entry.value_field)
        } else {
            Ok(self.u32_at(entry.value_field)? as usize)
        }
    }

    fn read_ascii(&self, entry: &IfdEntry) -> Result<String, GeoError> {
        if entry.field_type != TYPE_ASCII {
            return Err(GeoError::MalformedExif(format!(
                "tag {:#06x} should be ASCII, found type {}",
                entry.tag, entry.field_type
            )));
        }

        let start = self.data_offset(entry, 1)?;
        let bytes = self
            .data
            .get(start..start + entry.count as usize)
            .ok_or_else(|| GeoError::MalformedExif(format!("tag {:#06x} out of bounds", entry.tag)))?;

        Ok(String::from_utf8_lossy(bytes)
            .trim_end_matches('\0')
            .to_string())
    }

    fn read_rationals(&self, entry: &IfdEntry) -> Result<[Rational; 3], GeoError> {
        if entry.field_type != TYPE_RATIONAL || entry.count < 3 {
            return Err(GeoError::MalformedExif(format!(
                "tag {:#06x} should hold 3 RATIONALs",
                entry.tag
            )));
        }

        let start = self.data_offset(entry, 8)?;
        let mut parts = [Rational::whole(0.0); 3];
        for (index, part) in parts.iter_mut().enumerate() {
            let at = start + index * 8;
            *part = Rational::from_u32(self.u32_at(at)?, self.u32_at(at + 4)?)?;
        }
        Ok(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_bytes_have_no_exif() {
        assert!(matches!(read_gps(b"not an image"), Err(GeoError::NoExif)));
    }

    #[test]
    fn jpeg_without_app1_has_no_exif() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, 0xFF, 0xD9];
        assert!(matches!(read_gps(&jpeg), Err(GeoError::NoExif)));
    }

    #[test]
    fn truncated_jpeg_segment_is_malformed() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x40, b'E', b'x'];
        assert!(matches!(read_gps(&jpeg), Err(GeoError::MalformedExif(_))));
    }

    #[test]
    fn tiff_without_gps_pointer_has_no_gps() {
        // II*\0, IFD0 at 8, zero entries, next IFD 0
        let tiff = [b'I', b'I', 42, 0, 8, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(read_gps(&tiff), Err(GeoError::NoGps)));
    }

    #[test]
    fn bad_magic_is_malformed() {
        let tiff = [b'I', b'I', 42, 0, 8, 0, 0, 0];
        let mut broken = tiff;
        broken[2] = 43;
        // 43 不是 TIFF 头，直接视为没有 EXIF
        assert!(matches!(read_gps(&broken), Err(GeoError::NoExif)));

        let wrapped: Vec<u8> = [
            &[0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x10][..],
            &b"Exif\0\0"[..],
            &b"II+\0"[..],
            &[8, 0, 0, 0][..],
        ]
        .concat();
        assert!(matches!(read_gps(&wrapped), Err(GeoError::MalformedExif(_))));
    }
}
