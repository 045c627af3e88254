//! # 像素隐写模块（stego）
//!
//! ## 设计思路
//!
//! 将“载体读取 → 有损转存 → 解码校验 → 帧构造 → LSB 嵌入 → 去重落盘”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `handler`：编排整条编码/解码流程
//! - `loader`：负责文件读取、有损格式识别与 PNG 转存
//! - `pipeline`：负责解码、像素上限、PNG 编码
//! - `frame`：负责 `~~~消息~~~` 帧与比特流
//! - `codec`：负责比特与通道最低位之间的读写
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 调用链
//!
//! ```text
//! encode_file
//!    ├─ loader.rs（读取 + 有损识别 + 转存 PNG 临时文件）
//!    ├─ pipeline.rs（解码 + 像素限制 + 通道校验）
//!    ├─ frame.rs + codec.rs（容量预检 + 嵌入）
//!    └─ storage.rs（原子占位 + 写入 PNG）
//!    ↓
//! EncodeReport / StegoError
//! ```

mod codec;
mod config;
mod error;
mod frame;
mod handler;
mod loader;
mod pipeline;
mod source;

pub use codec::{LsbBits, embed_bits};
pub use config::{DELIMITER, EMBED_CHANNELS, OUTPUT_PREFIX, StegoConfig};
pub use error::StegoError;
pub use frame::{MessageBits, frame_message, framed_bit_len, locate_payload, pack_bytes};
pub use handler::StegoHandler;
pub use source::{EncodeReport, HiddenMessage, NO_HIDDEN_MESSAGE, PixelImage};
