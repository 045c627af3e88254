//! # 加载与有损格式处理模块
//!
//! ## 设计思路
//!
//! 统一处理载体图片的读取，并在“尽可能早”的阶段识别有损格式。
//! LSB 嵌入无法在 JPEG 重新压缩后存活，因此有损来源在嵌入前
//! 必须先无损转存为 PNG 临时文件，再从该临时文件解码出像素网格。
//!
//! ## 实现思路
//!
//! - 文件：存在性 + 读取，I/O 错误统一映射到 `StegoError::FileSystem`。
//! - 有损识别：扩展名命中配置列表，或文件签名被 `infer` 识别为 JPEG。
//! - 签名被识别为非图片类型时直接拒绝，避免把任意文件交给解码器。
//! - 转存产物由 `TempArtifact` 持有，调用方作用域结束即删除（成功与失败路径一致）。

use std::fs;
use std::path::Path;

use super::source::RawCarrier;
use super::{StegoConfig, StegoError, StegoHandler};
use crate::storage::TempArtifact;

const LOSSY_MIME_TYPES: &[&str] = &["image/jpeg"];

impl StegoHandler {
    /// 从本地路径读取载体原始字节。
    pub(super) fn load_from_file(
        &self,
        path: &Path,
        config: &StegoConfig,
    ) -> Result<RawCarrier, StegoError> {
        log::info!("📁 开始读取载体图片 - 路径: {}", path.display());

        if !path.exists() {
            return Err(StegoError::FileSystem(format!(
                "file not found: {}",
                path.display()
            )));
        }

        let bytes = fs::read(path)
            .map_err(|e| StegoError::FileSystem(format!("cannot read image file: {}", e)))?;
        Self::validate_image_signature(&bytes)?;

        let lossy = Self::is_lossy_source(path, &bytes, config);
        if lossy {
            log::debug!("🔍 检测到有损格式来源: {}", path.display());
        }

        Ok(RawCarrier {
            bytes,
            source_hint: path.display().to_string(),
            lossy,
        })
    }

    /// 有损来源转存为 PNG 临时文件，并从临时文件重新读取字节。
    ///
    /// 返回的 `TempArtifact` 必须在嵌入完成前保持存活。
    pub(super) fn transcode_to_lossless(
        &self,
        raw: RawCarrier,
        config: &StegoConfig,
    ) -> Result<(TempArtifact, RawCarrier), StegoError> {
        let decoded = self.decode_dynamic(&raw, config)?;

        let artifact = TempArtifact::create(&config.resolve_temp_dir(), "stego_lossless", "png")
            .map_err(|e| StegoError::FileSystem(format!("cannot create temporary PNG: {}", e)))?;

        Self::write_png(&decoded, artifact.file())?;

        let bytes = fs::read(artifact.path())
            .map_err(|e| StegoError::FileSystem(format!("cannot read temporary PNG: {}", e)))?;

        log::info!(
            "🔁 有损来源已转存为 PNG - 来源: {} 临时文件: {}",
            raw.source_hint,
            artifact.path().display()
        );

        let lossless = RawCarrier {
            bytes,
            source_hint: raw.source_hint,
            lossy: false,
        };
        Ok((artifact, lossless))
    }

    /// 判断来源是否为有损格式：扩展名优先，其次看文件签名。
    pub(super) fn is_lossy_source(path: &Path, bytes: &[u8], config: &StegoConfig) -> bool {
        let by_extension = path
            .extension()
            .map(|ext| config.is_lossy_extension(&ext.to_string_lossy()))
            .unwrap_or(false);

        by_extension
            || infer::get(bytes)
                .map(|kind| LOSSY_MIME_TYPES.contains(&kind.mime_type()))
                .unwrap_or(false)
    }

    /// 签名可识别且不是图片时拒绝；无法识别的签名交给解码器判断。
    fn validate_image_signature(bytes: &[u8]) -> Result<(), StegoError> {
        if let Some(kind) = infer::get(bytes) {
            if kind.matcher_type() != infer::MatcherType::Image {
                return Err(StegoError::UnsupportedSource(format!(
                    "file signature is not an image: {}",
                    kind.mime_type()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn lossy_detected_by_extension() {
        let config = StegoConfig::default();
        assert!(StegoHandler::is_lossy_source(Path::new("a/photo.JPG"), PNG_SIGNATURE, &config));
        assert!(!StegoHandler::is_lossy_source(Path::new("a/photo.png"), PNG_SIGNATURE, &config));
    }

    #[test]
    fn lossy_detected_by_signature() {
        let config = StegoConfig::default();
        assert!(StegoHandler::is_lossy_source(Path::new("renamed.png"), JPEG_SIGNATURE, &config));
    }

    #[test]
    fn non_image_signature_rejected() {
        let zip = [b'P', b'K', 0x03, 0x04, 0, 0, 0, 0];
        assert!(matches!(
            StegoHandler::validate_image_signature(&zip),
            Err(StegoError::UnsupportedSource(_))
        ));
        assert!(StegoHandler::validate_image_signature(PNG_SIGNATURE).is_ok());
    }
}
