//! 配置文件读写
//!
//! 配置文件为 JSON，所有字段都可省略：
//!
//! ```json
//! {
//!   "stego": { "max_decoded_pixels": 40000000 },
//!   "map": { "zoom": 12 }
//! }
//! ```
//!
//! 路径优先取 `IMAGE_INSPECTOR_CONFIG`，否则为当前目录下的
//! `image-inspector.json`。文件不存在或无法解析时使用默认配置。

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::maps::MapConfig;
use crate::stego::StegoConfig;

pub const CONFIG_PATH_ENV: &str = "IMAGE_INSPECTOR_CONFIG";
pub const API_KEY_ENV: &str = "GEOAPIFY_API_KEY";
pub const DEFAULT_CONFIG_FILE: &str = "image-inspector.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub stego: StegoConfig,
    pub map: MapConfig,
}

pub fn settings_file_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// 读取配置文件并应用环境变量覆盖。
pub fn load_settings() -> AppSettings {
    let settings = load_settings_from_path(&settings_file_path());
    with_api_key_override(settings, env::var(API_KEY_ENV).ok())
}

pub fn load_settings_from_path(config_path: &Path) -> AppSettings {
    if !config_path.exists() {
        return AppSettings::default();
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            log::warn!("⚠️ 读取配置文件失败，使用默认配置：{} ({})", config_path.display(), e);
            return AppSettings::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(settings) => {
            log::debug!("⚙️ 已加载配置文件: {}", config_path.display());
            settings
        }
        Err(e) => {
            log::warn!("⚠️ 解析配置文件失败，使用默认配置：{} ({})", config_path.display(), e);
            AppSettings::default()
        }
    }
}

pub fn save_settings_to_path(config_path: &Path, settings: &AppSettings) -> Result<(), AppError> {
    let content = serde_json::to_string_pretty(settings)
        .map_err(|e| AppError::Settings(format!("cannot serialize settings: {}", e)))?;
    fs::write(config_path, content)
        .map_err(|e| AppError::Settings(format!("cannot write settings file: {}", e)))?;
    Ok(())
}

/// 非空的环境变量值优先于配置文件中的 API Key。
pub fn with_api_key_override(mut settings: AppSettings, api_key: Option<String>) -> AppSettings {
    if let Some(key) = api_key.filter(|key| !key.trim().is_empty()) {
        settings.map.api_key = key;
    }
    settings
}
