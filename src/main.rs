mod app;
mod blob;
mod canvas;
mod config;
mod download;
mod image;
mod util;

use app::FiltergramApp;
use config::AppConfig;
use std::io::Write as _;

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("egui_glow", log::LevelFilter::Warn)
        .filter_module("eframe", log::LevelFilter::Warn)
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "[{} {style}{}{style:#} {}:{}] {}",
                buf.timestamp_seconds(),
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

fn main() -> eframe::Result<()> {
    init_logger();
    let config = AppConfig::load();
    log::debug!("Using {config:?}");
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 760.0])
            .with_min_inner_size([360.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "Filtergram",
        native_options,
        Box::new(move |cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(FiltergramApp::new(config)))
        }),
    )
}
