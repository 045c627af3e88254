//! # image-inspector — 命令行入口
//!
//! 本文件只负责日志初始化、参数解析与结果输出，
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::fs;
use std::process::ExitCode;

use clap::error::ErrorKind;
use image_inspector::cli::{Cli, Command};
use image_inspector::error::AppError;
use image_inspector::geo::{self, decimal_to_dms};
use image_inspector::inspect::{self, NO_PGP_KEY};
use image_inspector::maps::{self, MapClient};
use image_inspector::settings::{self, AppSettings};
use image_inspector::stego::{StegoHandler, framed_bit_len};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    let settings = settings::load_settings();
    match run(cli.command, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("命令执行失败: {err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, settings: AppSettings) -> Result<(), AppError> {
    match command {
        Command::Encode {
            image,
            message,
            output,
        } => {
            let handler = StegoHandler::new(settings.stego);
            let report = handler.encode_file(&image, &message, output.as_deref())?;
            println!("{report}");
        }
        Command::Decode { image } => {
            let handler = StegoHandler::new(settings.stego);
            println!("{}", handler.decode_file(&image)?);
        }
        Command::Capacity { image } => {
            let handler = StegoHandler::new(settings.stego);
            let bits = handler.capacity_of_file(&image)?;
            println!(
                "Capacity: {bits} bits ({} message bytes)",
                bits.saturating_sub(framed_bit_len("")) / 8
            );
        }
        Command::Gps { image } => {
            let fix = geo::read_gps(&fs::read(&image)?)?;
            let (lat, lon) = fix.to_decimal();
            let (lat_dms, lon_dms) = fix.readable();
            println!("Latitude: {lat_dms} ({lat:.6})");
            println!("Longitude: {lon_dms} ({lon:.6})");
        }
        Command::Map { image } => {
            let fix = geo::read_gps(&fs::read(&image)?)?;
            let (lat, lon) = fix.to_decimal();
            let body = MapClient::new(settings.map)?.fetch(lat, lon).await?;
            let path = maps::save_map_png(&body, &image)?;
            println!("Map saved to {}", path.display());
        }
        Command::Pgp { image } => {
            let bytes = fs::read(&image)?;
            match inspect::extract_pgp_key(&bytes) {
                Some(key) => println!("PGP Key:\n{key}"),
                None => println!("{NO_PGP_KEY}"),
            }
        }
        Command::Dimensions { image } => {
            let (width, height) = inspect::image_dimensions(&image)?;
            println!("Dimensions: {width}x{height}");
        }
        Command::Dms { decimal, axis } => println!("{}", decimal_to_dms(decimal, axis)),
    }

    Ok(())
}
