//! # 解码与编码流水线模块
//!
//! ## 设计思路
//!
//! 将“字节 → 图像 → 像素网格”与“像素网格 → PNG”集中管理，
//! 并在完整解码前做尺寸检查，降低异常输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 猜测格式并读取 header 尺寸
//! 2. 按像素上限快速拒绝
//! 3. 完整解码
//! 4. 通过 `PixelImage::from_dynamic` 校验通道布局
//! 5. 输出统一编码为 PNG（无损）

use std::fs::File;
use std::io::{BufWriter, Cursor, Write};

use image::{DynamicImage, ImageFormat, ImageReader};

use super::source::RawCarrier;
use super::{PixelImage, StegoConfig, StegoError, StegoHandler};

impl StegoHandler {
    /// 将原始字节解码为可嵌入的像素网格。
    pub(super) fn decode_pixels(
        &self,
        raw: &RawCarrier,
        config: &StegoConfig,
    ) -> Result<PixelImage, StegoError> {
        let decoded = self.decode_dynamic(raw, config)?;
        let image = PixelImage::from_dynamic(decoded)?;

        log::info!(
            "✅ 载体解码成功 - 来源: {} 尺寸: {}x{} 通道: {} 容量: {} 位",
            raw.source_hint,
            image.width(),
            image.height(),
            image.channels(),
            image.capacity_bits()
        );

        Ok(image)
    }

    /// 校验尺寸后完整解码。
    pub(super) fn decode_dynamic(
        &self,
        raw: &RawCarrier,
        config: &StegoConfig,
    ) -> Result<DynamicImage, StegoError> {
        let (header_width, header_height) = Self::inspect_dimensions_from_memory(&raw.bytes)?;
        Self::validate_pixel_limits(config, header_width, header_height)?;

        let decoded = image::load_from_memory(&raw.bytes)
            .map_err(|e| StegoError::Decode(format!("image decoding failed: {}", e)))?;

        Self::validate_pixel_limits(config, decoded.width(), decoded.height())?;
        Ok(decoded)
    }

    /// 仅通过内存中的图片头信息读取宽高。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), StegoError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| StegoError::Decode(format!("unrecognized image format: {}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| StegoError::Decode(format!("cannot read image dimensions: {}", e)))
    }

    /// 校验像素数量是否超过配置上限。
    fn validate_pixel_limits(
        config: &StegoConfig,
        width: u32,
        height: u32,
    ) -> Result<(), StegoError> {
        let pixels = width as u64 * height as u64;

        if pixels > config.max_decoded_pixels {
            return Err(StegoError::ResourceLimit(format!(
                "image too large: {} pixels (limit {})",
                pixels, config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    /// 以 PNG 格式写入已打开的文件。
    pub(super) fn write_png(image: &DynamicImage, file: &File) -> Result<(), StegoError> {
        let mut writer = BufWriter::new(file);
        image
            .write_to(&mut writer, ImageFormat::Png)
            .map_err(|e| StegoError::Encode(format!("PNG encoding failed: {}", e)))?;
        writer
            .flush()
            .map_err(|e| StegoError::FileSystem(format!("cannot write PNG: {}", e)))
    }
}
