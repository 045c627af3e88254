//! 输出文件与临时文件管理模块
//!
//! # 设计思路
//!
//! 统一管理编码结果、地图图片与临时 PNG 的落盘路径，保证：
//! - 永不覆盖已有文件：`encoded_photo.png` 已存在时依次尝试
//!   `encoded_photo_1.png`、`encoded_photo_2.png` …
//! - 并发安全：使用 `create_new` 原子创建占位，而不是“先判断存在再创建”。
//! - 失败不留垃圾：未提交的输出文件与所有临时文件都由 RAII 守卫在 `Drop` 时删除。
//!
//! # 实现思路
//!
//! - `ReservedOutput`：占位成功后持有文件句柄，`commit()` 之后才算正式产物。
//! - `TempArtifact`：临时文件守卫，无论成功失败，离开作用域即删除。
//! - 所有可能失败的操作均返回 `Result`，不使用 `expect()` / `unwrap()`。

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::stego::OUTPUT_PREFIX;

/// 去重编号的尝试上限，防止目录异常时无限循环。
const MAX_UNIQUE_ATTEMPTS: u32 = 100_000;

/// 根据源文件推导默认输出路径：同目录下的 `encoded_<stem>.png`。
pub fn default_output_path(source: &Path) -> PathBuf {
    prefixed_png_path(source, OUTPUT_PREFIX)
}

/// 同目录下的 `<prefix><stem>.png`。
pub fn prefixed_png_path(source: &Path, prefix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    let file_name = format!("{}{}.png", prefix, stem);

    match source.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// 第 `n` 个候选路径：`n == 0` 为原路径，否则在扩展名前插入 `_<n>`。
pub fn numbered_candidate(base: &Path, n: u32) -> PathBuf {
    if n == 0 {
        return base.to_path_buf();
    }

    let stem = base
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();
    let file_name = match base.extension() {
        Some(ext) => format!("{}_{}.{}", stem, n, ext.to_string_lossy()),
        None => format!("{}_{}", stem, n),
    };

    match base.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// 原子地创建第一个不存在的候选文件。
fn create_unique(base: &Path) -> io::Result<(PathBuf, File)> {
    for n in 0..MAX_UNIQUE_ATTEMPTS {
        let candidate = numbered_candidate(base, n);
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(file) => return Ok((candidate, file)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free file name for '{}'", base.display()),
    ))
}

// ============================================================================
// ReservedOutput — 输出文件占位
// ============================================================================

/// 已原子占位的输出文件。
///
/// 在 `commit()` 之前被丢弃（例如写入 PNG 失败）会删除占位文件，
/// 保证失败的编码不会留下“看似成功”的产物。
///
/// # 示例
/// ```rust,no_run
/// use std::io::Write;
/// use image_inspector::storage::ReservedOutput;
///
/// let reserved = ReservedOutput::reserve("out/encoded_photo.png".as_ref())?;
/// (&*reserved.file()).write_all(b"...")?;
/// let path = reserved.commit();
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct ReservedOutput {
    path: PathBuf,
    file: File,
    committed: bool,
}

impl ReservedOutput {
    /// 从 `base` 开始依次尝试 `_1`、`_2` … 直到原子创建成功。
    pub fn reserve(base: &Path) -> io::Result<Self> {
        let (path, file) = create_unique(base)?;
        log::debug!("📌 已占位输出文件: {}", path.display());
        Ok(Self {
            path,
            file,
            committed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 占位文件的写句柄（`&File` 同时实现了 `Write` 与 `Seek`）。
    pub fn file(&self) -> &File {
        &self.file
    }

    /// 确认产物有效，返回最终路径。
    pub fn commit(mut self) -> PathBuf {
        self.committed = true;
        std::mem::take(&mut self.path)
    }
}

impl Drop for ReservedOutput {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => log::debug!("🧹 已删除未完成的输出文件: {}", self.path.display()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => log::warn!(
                "⚠️ 删除未完成的输出文件失败 '{}': {}",
                self.path.display(),
                err
            ),
        }
    }
}

// ============================================================================
// TempArtifact — 临时文件 RAII 守卫
// ============================================================================

/// 临时文件守卫：构造时原子创建，`Drop` 时删除。
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
    file: File,
}

impl TempArtifact {
    /// 在 `dir` 下创建 `<prefix>_<时间戳>.<extension>` 临时文件。
    pub fn create(dir: &Path, prefix: &str, extension: &str) -> io::Result<Self> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }

        let timestamp = Local::now().format("%Y%m%d%H%M%S%f");
        let base = dir.join(format!("{}_{}.{}", prefix, timestamp, extension));
        let (path, file) = create_unique(&base)?;
        log::debug!("🗂️ 已创建临时文件: {}", path.display());

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self) -> &File {
        &self.file
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => log::debug!("🧹 已清理临时文件: {}", self.path.display()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => log::warn!("⚠️ 清理临时文件失败 '{}': {}", self.path.display(), err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn unique_temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock error")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("image-inspector-storage-test-{nanos}"));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn default_output_path_uses_prefix_and_png() {
        let path = default_output_path(Path::new("/photos/holiday.jpg"));
        assert_eq!(path, PathBuf::from("/photos/encoded_holiday.png"));

        let bare = default_output_path(Path::new("cat.png"));
        assert_eq!(bare, PathBuf::from("encoded_cat.png"));
    }

    #[test]
    fn numbered_candidate_inserts_suffix_before_extension() {
        let base = Path::new("/tmp/encoded_cat.png");
        assert_eq!(numbered_candidate(base, 0), PathBuf::from("/tmp/encoded_cat.png"));
        assert_eq!(numbered_candidate(base, 2), PathBuf::from("/tmp/encoded_cat_2.png"));
        assert_eq!(
            numbered_candidate(Path::new("/tmp/noext"), 1),
            PathBuf::from("/tmp/noext_1")
        );
    }

    #[test]
    fn reserve_never_reuses_existing_file() {
        let dir = unique_temp_dir();
        let base = dir.join("encoded_a.png");

        let first = ReservedOutput::reserve(&base).expect("first reserve");
        let second = ReservedOutput::reserve(&base).expect("second reserve");

        assert_eq!(first.path(), base.as_path());
        assert_eq!(second.path(), dir.join("encoded_a_1.png").as_path());

        let kept = first.commit();
        drop(second);

        assert!(kept.exists());
        assert!(!dir.join("encoded_a_1.png").exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn temp_artifact_is_removed_on_drop() {
        let dir = unique_temp_dir();
        let path = {
            let artifact = TempArtifact::create(&dir, "stego", "png").expect("temp artifact");
            (&*artifact.file()).write_all(b"png").expect("write temp");
            assert!(artifact.path().exists());
            artifact.path().to_path_buf()
        };

        assert!(!path.exists());
        let _ = fs::remove_dir_all(dir);
    }
}
