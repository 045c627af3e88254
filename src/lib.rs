//! # image-inspector — 库入口
//!
//! 图片取证小工具：在像素最低位中隐藏/提取文本、读取 EXIF GPS、
//! 下载坐标处的静态地图、提取附带的 PGP 公钥。
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  main.rs ── cli::Cli ────── settings::AppSettings        │
//! │       │         (参数解析)      (JSON + 环境变量)         │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↓ Result<T, AppError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ stego ────── LSB 编码 / 解码                          │
//! │  │   ├─ loader         读取 + 有损来源转存 PNG             │
//! │  │   ├─ pipeline       解码 + 像素上限 + PNG 写出          │
//! │  │   └─ frame / codec  `~~~` 帧 + 通道最低位               │
//! │  │                                                       │
//! │  ├─ geo ──────── EXIF GPS + 度分秒换算                     │
//! │  ├─ maps ─────── 静态地图 URL·下载·保存 (reqwest)          │
//! │  ├─ inspect ──── PGP 公钥块 / 图片尺寸                     │
//! │  └─ storage ──── 不重名输出占位 + 临时文件 (RAII)          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`cli`] | 子命令与兼容参数解析 |
//! | [`settings`] | 配置文件读写与环境变量覆盖 |
//! | [`stego`] | 像素 LSB 隐写：容量预检、嵌入、提取 |
//! | [`geo`] | EXIF GPS 读取，DMS 与十进制度互转 |
//! | [`maps`] | Geoapify 静态地图请求与落盘 |
//! | [`inspect`] | PGP 公钥提取、图片尺寸 |
//! | [`storage`] | `encoded_<stem>.png` / `map_<stem>.png` 去重与临时文件 |

pub mod cli;
pub mod error;
pub mod geo;
pub mod inspect;
pub mod maps;
pub mod settings;
pub mod stego;
pub mod storage;
