//! 图片附带信息的检查工具：PGP 公钥块与图片尺寸。

use std::path::Path;

use crate::error::AppError;
use crate::stego::StegoError;

pub const PGP_BEGIN_MARKER: &[u8] = b"-----BEGIN PGP PUBLIC KEY BLOCK-----";
pub const PGP_END_MARKER: &[u8] = b"-----END PGP PUBLIC KEY BLOCK-----";
pub const NO_PGP_KEY: &str = "No PGP key found";

/// 提取文件字节中附带的 PGP 公钥块（包含首尾标记）。
///
/// 结束标记只在开始标记之后查找；块内的非法 UTF-8 字节被丢弃。
///
/// # 示例
/// ```rust
/// use image_inspector::inspect::extract_pgp_key;
///
/// let data = b"\x89PNG...-----BEGIN PGP PUBLIC KEY BLOCK-----\nabc\n-----END PGP PUBLIC KEY BLOCK-----\x00";
/// let key = extract_pgp_key(data).unwrap();
/// assert!(key.starts_with("-----BEGIN"));
/// assert!(key.ends_with("BLOCK-----"));
/// ```
pub fn extract_pgp_key(bytes: &[u8]) -> Option<String> {
    let start = find_subslice(bytes, PGP_BEGIN_MARKER, 0)?;
    let end = find_subslice(bytes, PGP_END_MARKER, start)? + PGP_END_MARKER.len();

    let key: String = bytes[start..end]
        .utf8_chunks()
        .map(|chunk| chunk.valid())
        .collect();
    Some(key)
}

/// 只读取图片头获取宽高，不做完整解码。
pub fn image_dimensions(path: &Path) -> Result<(u32, u32), AppError> {
    if !path.exists() {
        return Err(StegoError::FileSystem(format!("file not found: {}", path.display())).into());
    }

    let dimensions = image::image_dimensions(path)
        .map_err(|e| StegoError::Decode(format!("cannot read image dimensions: {}", e)))?;
    log::debug!("📐 图片尺寸 - {}: {}x{}", path.display(), dimensions.0, dimensions.1);
    Ok(dimensions)
}

fn find_subslice(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| offset + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(body: &str) -> Vec<u8> {
        [PGP_BEGIN_MARKER, body.as_bytes(), PGP_END_MARKER].concat()
    }

    #[test]
    fn key_found_after_image_bytes() {
        let mut data = vec![0x89, b'P', b'N', b'G', 0x00, 0xFF];
        data.extend(block("\nmQENBF\n"));
        data.extend([0x00, 0x01]);

        let key = extract_pgp_key(&data).unwrap();
        assert_eq!(key.as_bytes(), block("\nmQENBF\n").as_slice());
    }

    #[test]
    fn missing_end_marker_means_no_key() {
        let mut data = PGP_BEGIN_MARKER.to_vec();
        data.extend(b"dangling");
        assert_eq!(extract_pgp_key(&data), None);
        assert_eq!(extract_pgp_key(b"plain image bytes"), None);
    }

    #[test]
    fn end_marker_before_begin_is_ignored() {
        let data = [PGP_END_MARKER, &b"junk"[..], &block("x")[..]].concat();
        assert_eq!(extract_pgp_key(&data).as_deref().map(str::len), Some(block("x").len()));
    }

    #[test]
    fn invalid_utf8_inside_block_is_dropped() {
        let data = [PGP_BEGIN_MARKER, &[b'a', 0xFF, b'b'][..], PGP_END_MARKER].concat();
        let key = extract_pgp_key(&data).unwrap();
        assert!(key.contains("ab"));
    }

    #[test]
    fn dimensions_of_missing_file_fail() {
        let result = image_dimensions(Path::new("definitely/not/here.png"));
        assert!(matches!(result, Err(AppError::Stego(StegoError::FileSystem(_)))));
    }
}
