//! 地图图片落盘：统一转码为 PNG，与隐写输出共用不重名占位逻辑。

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::ImageFormat;

use super::MapError;
use crate::storage::{self, ReservedOutput};

/// 地图文件名前缀：`map_<stem>.png`。
pub const MAP_OUTPUT_PREFIX: &str = "map_";

/// 将地图响应体保存到 `source` 同目录，返回实际写入的路径。
pub fn save_map_png(body: &[u8], source: &Path) -> Result<PathBuf, MapError> {
    let map = image::load_from_memory(body)
        .map_err(|e| MapError::InvalidResponse(format!("cannot decode map image: {}", e)))?;

    let base = storage::prefixed_png_path(source, MAP_OUTPUT_PREFIX);
    let reserved = ReservedOutput::reserve(&base)
        .map_err(|e| MapError::Storage(format!("cannot create output file: {}", e)))?;

    let mut writer = BufWriter::new(reserved.file());
    map.write_to(&mut writer, ImageFormat::Png)
        .map_err(|e| MapError::Storage(format!("PNG encoding failed: {}", e)))?;
    writer
        .flush()
        .map_err(|e| MapError::Storage(format!("cannot write PNG: {}", e)))?;
    drop(writer);

    let path = reserved.commit();
    log::info!("💾 地图已保存 - {}", path.display());
    Ok(path)
}
