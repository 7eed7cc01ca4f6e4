mod app;
mod canvas;
mod config;
mod effects;
mod gpu;
mod simulation;
mod viewport;

use anyhow::Context;
use winit::event_loop::{ControlFlow, EventLoop};

use app::App;

fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Particle Field");
    log::info!("Controls:");
    log::info!("  Shift+F - Toggle FPS counter");
    log::info!("  Escape  - Quit");

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new();
    event_loop
        .run_app(&mut app)
        .context("event loop terminated with an error")?;

    Ok(())
}
