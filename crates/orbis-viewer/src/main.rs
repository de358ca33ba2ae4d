use anyhow::Result;
use winit::dpi::LogicalSize;

use orbis_engine::device::GpuInit;
use orbis_engine::logging::{init_logging, LoggingConfig};
use orbis_engine::window::{Runtime, RuntimeConfig};

mod app;
mod mesh;
mod render;
mod shape;

use app::ViewerApp;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    ViewerApp::print_help();

    let config = RuntimeConfig {
        title: "orbis - tessellated sphere".to_string(),
        initial_size: LogicalSize::new(1280.0, 720.0),
    };

    let gpu_init = GpuInit {
        // The clear color and tc gradients are authored for a linear target;
        // an sRGB surface would gamma-brighten them on present.
        prefer_srgb: false,
        // Wireframe toggle wants line polygon mode, but it must not be a
        // hard requirement: software adapters commonly lack it.
        optional_features: wgpu::Features::POLYGON_MODE_LINE,
        ..GpuInit::default()
    };

    Runtime::run(config, gpu_init, ViewerApp::new())
}
