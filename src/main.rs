use anyhow::{Context, anyhow};
use eframe::{NativeOptions, egui};

use lumberjack_range::AppConfig;

mod app;
mod aws;
mod worker;

use crate::app::App;
use crate::worker::spawn_worker;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args_os().nth(1).map(std::path::PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;
    log::info!(
        "starting with region {:?}, page size {}",
        config.aws.region,
        config.toolbar.page_size
    );

    let worker_handle = spawn_worker().context("failed to start the AWS worker")?;

    let native_options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 600.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "Lumberjack",
        native_options,
        Box::new(move |cc| Ok(Box::new(App::new(cc, worker_handle, config)) as Box<dyn eframe::App>)),
    )
    .map_err(|err| anyhow!("viewer exited with an error: {err}"))
}
