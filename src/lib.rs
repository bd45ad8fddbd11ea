pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod poller;
pub mod renderer;

use crate::client::{HttpTransport, Transport};
use crate::config::AppConfig;
use crate::renderer::fonts::Fonts;
use crate::renderer::surface::{Surface, SurfaceHandle};
use anyhow::Context;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    info!("Starting application");

    match main_loop(config).await {
        Ok(_) => info!("Application completed successfully"),
        Err(e) => {
            error!("Application error: {e:#}");
            // Print chain of error causes
            let mut source = e.source();
            while let Some(e) = source {
                error!("Caused by: {e}");
                source = e.source();
            }
            return Err(e).context("Application failed to run");
        }
    }

    Ok(())
}

fn load_fonts(config: &AppConfig) -> Option<Fonts> {
    if !config.dashboard.save_to_file {
        return None;
    }

    let Some(path) = &config.dashboard.font else {
        warn!("Dashboard snapshots need a font; set [dashboard] font");
        return None;
    };

    match Fonts::load(path) {
        Ok(fonts) => Some(fonts),
        Err(e) => {
            warn!("Dashboard snapshots disabled: {e:#}");
            None
        }
    }
}

async fn main_loop(config: AppConfig) -> anyhow::Result<()> {
    let transport: Arc<dyn Transport> = Arc::new(
        HttpTransport::new(&config.server.url, config.timeout())
            .context("Failed to create HTTP client")?,
    );
    let policy = config.poll_policy();

    let devices = config.build_devices();
    if devices.is_empty() {
        warn!("No devices configured");
    }

    let mut surfaces: Vec<SurfaceHandle> = Vec::new();
    let mut pollers = Vec::new();
    for device in devices {
        if config.dashboard.enabled {
            let surface = Surface::handle();
            device.attach(surface.clone())?;
            surfaces.push(surface);
        }
        pollers.push(poller::spawn(device, Arc::clone(&transport), policy));
    }

    let fonts = load_fonts(&config);
    let mut interval = tokio::time::interval(Duration::from_millis(config.dashboard.interval.max(1)));

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping {} pollers", pollers.len());
                break;
            }
        }

        if let Some(fonts) = &fonts {
            let image = dashboard::create_image(&config.dashboard, fonts, &surfaces);
            if let Err(e) = dashboard::save_image(&config.dashboard, &image) {
                error!("{e:#}");
            }
        } else {
            dashboard::log_surfaces(&surfaces);
        }

        if pollers.iter().all(|poller| poller.is_finished()) {
            info!("All pollers have stopped");
            break;
        }
    }

    for poller in pollers {
        debug!("Detaching {}", poller.name());
        poller.detach().await;
    }

    Ok(())
}
