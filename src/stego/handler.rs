//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `StegoHandler` 只负责流程编排与配置管理，不直接与 CLI 绑定。
//! 编码链路固定为：
//! 1. 读取载体（有损来源先转存 PNG 临时文件）
//! 2. 解码并校验像素网格
//! 3. 预先计算容量，不足则立即失败（不占位、不写文件）
//! 4. 嵌入消息帧
//! 5. 原子占位输出路径并写入 PNG
//!
//! 解码链路：读取 → 解码 → 全图提取最低位 → 宽松 UTF-8 → 定位分隔符。
//!
//! ## 实现思路
//!
//! - 内存版 `encode_image` / `decode_image` 与文件版共用同一套帧与嵌入逻辑。
//! - 记录 `load/decode/embed/save/total` 阶段耗时，便于性能诊断。

use std::path::Path;
use std::time::Instant;

use super::codec::{LsbBits, embed_bits};
use super::frame::{self, MessageBits};
use super::{EncodeReport, HiddenMessage, PixelImage, StegoConfig, StegoError};
use crate::storage::{self, ReservedOutput};

/// 隐写处理器。
#[derive(Debug, Clone, Default)]
pub struct StegoHandler {
    config: StegoConfig,
}

impl StegoHandler {
    /// 根据配置创建处理器。
    ///
    /// # 示例
    /// ```rust
    /// use image_inspector::stego::{StegoConfig, StegoHandler};
    ///
    /// let handler = StegoHandler::new(StegoConfig::default());
    /// assert!(handler.config().is_lossy_extension("jpg"));
    /// ```
    pub fn new(config: StegoConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StegoConfig {
        &self.config
    }

    /// 在内存中嵌入消息，返回新的像素网格，原图不变。
    ///
    /// # 错误
    /// 消息帧位数超过 `width * height * 3` 时返回 [`StegoError::CapacityExceeded`]。
    pub fn encode_image(&self, image: &PixelImage, message: &str) -> Result<PixelImage, StegoError> {
        Self::ensure_capacity(image, message)?;

        let framed = frame::frame_message(message);
        let mut encoded = image.clone();
        embed_bits(&mut encoded, MessageBits::new(&framed))?;
        Ok(encoded)
    }

    /// 在内存中提取消息。
    ///
    /// 始终扫描整张图片；找不到成对分隔符时返回 [`HiddenMessage::NotFound`]。
    pub fn decode_image(&self, image: &PixelImage) -> HiddenMessage {
        let bytes = frame::pack_bytes(LsbBits::new(image));
        let text = String::from_utf8_lossy(&bytes);

        match frame::locate_payload(&text) {
            Some(message) => HiddenMessage::Found(message.to_string()),
            None => HiddenMessage::NotFound,
        }
    }

    /// 编码主入口：读取 `source`，嵌入 `message`，写入不重名的 PNG。
    ///
    /// `output` 为空时使用 `<源目录>/encoded_<stem>.png`；
    /// 无论是否显式指定，最终路径都会按 `_1`、`_2` … 去重，绝不覆盖已有文件。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use image_inspector::stego::{StegoConfig, StegoHandler};
    ///
    /// let handler = StegoHandler::new(StegoConfig::default());
    /// let report = handler.encode_file("photo.jpg".as_ref(), "hello", None)?;
    /// println!("{}", report.output_path.display());
    /// # Ok::<(), image_inspector::stego::StegoError>(())
    /// ```
    pub fn encode_file(
        &self,
        source: &Path,
        message: &str,
        output: Option<&Path>,
    ) -> Result<EncodeReport, StegoError> {
        let config = &self.config;
        let total_start = Instant::now();

        let load_start = Instant::now();
        let raw = self.load_from_file(source, config)?;
        let (_artifact, raw) = if raw.lossy {
            let (artifact, lossless) = self.transcode_to_lossless(raw, config)?;
            (Some(artifact), lossless)
        } else {
            (None, raw)
        };
        let load_elapsed = load_start.elapsed();

        let decode_start = Instant::now();
        let carrier = self.decode_pixels(&raw, config)?;
        let decode_elapsed = decode_start.elapsed();

        let embed_start = Instant::now();
        let encoded = self.encode_image(&carrier, message)?;
        let embedded_bits = frame::framed_bit_len(message);
        let capacity_bits = carrier.capacity_bits();
        let embed_elapsed = embed_start.elapsed();

        let save_start = Instant::now();
        let base = match output {
            Some(path) => path.to_path_buf(),
            None => storage::default_output_path(source),
        };
        let reserved = ReservedOutput::reserve(&base)
            .map_err(|e| StegoError::FileSystem(format!("cannot create output file: {}", e)))?;
        let dynamic = encoded.into_dynamic()?;
        Self::write_png(&dynamic, reserved.file())?;
        let output_path = reserved.commit();
        let save_elapsed = save_start.elapsed();

        log::info!(
            "✅ 消息编码完成 - 输出: {} 使用 {}/{} 位 load={}ms decode={}ms embed={}ms save={}ms total={}ms",
            output_path.display(),
            embedded_bits,
            capacity_bits,
            load_elapsed.as_millis(),
            decode_elapsed.as_millis(),
            embed_elapsed.as_millis(),
            save_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(EncodeReport {
            output_path,
            embedded_bits,
            capacity_bits,
        })
    }

    /// 解码主入口：读取 `source` 并提取隐藏消息。
    pub fn decode_file(&self, source: &Path) -> Result<HiddenMessage, StegoError> {
        let config = &self.config;
        let total_start = Instant::now();

        let raw = self.load_from_file(source, config)?;
        let carrier = self.decode_pixels(&raw, config)?;

        let extract_start = Instant::now();
        let message = self.decode_image(&carrier);

        log::info!(
            "🔎 消息解码完成 - 来源: {} 结果: {} extract={}ms total={}ms",
            source.display(),
            if message.is_found() { "找到消息" } else { "无隐藏消息" },
            extract_start.elapsed().as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(message)
    }

    /// 读取载体并返回其可嵌入容量（位）。
    pub fn capacity_of_file(&self, source: &Path) -> Result<u64, StegoError> {
        let raw = self.load_from_file(source, &self.config)?;
        let carrier = self.decode_pixels(&raw, &self.config)?;
        Ok(carrier.capacity_bits())
    }

    fn ensure_capacity(image: &PixelImage, message: &str) -> Result<(), StegoError> {
        let required_bits = frame::framed_bit_len(message);
        let available_bits = image.capacity_bits();

        if required_bits > available_bits {
            log::warn!(
                "⚠️ 消息超出载体容量：需要 {} 位，可用 {} 位",
                required_bits,
                available_bits
            );
            return Err(StegoError::CapacityExceeded {
                required_bits,
                available_bits,
            });
        }

        Ok(())
    }
}
