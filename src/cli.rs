//! 命令行参数定义
//!
//! 子命令由 `clap` 派生，同时兼容早期版本的单横线参数：
//! `-dim <image>`、`-map <image>`（读取 GPS）、`-steg <image>`（提取 PGP 公钥）。
//! 兼容参数在交给 `clap` 之前被改写为对应的子命令名。

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::geo::Axis;

/// Hide text in image pixels, read GPS metadata and inspect images.
#[derive(Parser, Debug)]
#[command(name = "image-inspector")]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
#[command(after_help = "Environment:\n  \
    IMAGE_INSPECTOR_CONFIG  settings file (default: image-inspector.json)\n  \
    GEOAPIFY_API_KEY        static map API key\n  \
    RUST_LOG                log filter (default: info)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Hide a message in an image and save it as encoded_<stem>.png
    Encode {
        /// Carrier image
        image: PathBuf,
        /// Text to hide
        message: String,
        /// Output path (a `_n` suffix is added if it already exists)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract a hidden message
    Decode { image: PathBuf },

    /// Print how many message bytes an image can carry
    Capacity { image: PathBuf },

    /// Print EXIF GPS coordinates (legacy: -map)
    Gps { image: PathBuf },

    /// Download a static map of the EXIF GPS position
    Map { image: PathBuf },

    /// Extract an appended PGP public key block (legacy: -steg)
    Pgp { image: PathBuf },

    /// Print image dimensions (legacy: -dim)
    #[command(name = "dim")]
    Dimensions { image: PathBuf },

    /// Render a decimal degree value as degrees, minutes and seconds
    Dms {
        /// Signed decimal degrees
        #[arg(allow_negative_numbers = true, value_parser = parse_finite)]
        decimal: f64,
        /// lat | lon
        #[arg(value_parser = parse_axis)]
        axis: Axis,
    },
}

impl Cli {
    /// 解析完整的参数列表（含程序名），先改写兼容参数。
    pub fn parse_args<I, S>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        if let Some(first) = args.get_mut(1) {
            if let Some(subcommand) = first.to_str().and_then(legacy_subcommand) {
                *first = OsString::from(subcommand);
            }
        }
        Self::try_parse_from(args)
    }
}

fn legacy_subcommand(flag: &str) -> Option<&'static str> {
    match flag {
        "-dim" => Some("dim"),
        "-map" => Some("gps"),
        "-steg" => Some("pgp"),
        _ => None,
    }
}

fn parse_finite(value: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .ok()
        .filter(|decimal| decimal.is_finite())
        .ok_or_else(|| format!("not a finite decimal: {value}"))
}

fn parse_axis(value: &str) -> Result<Axis, String> {
    value.parse::<Axis>().map_err(|e| e.to_string())
}
