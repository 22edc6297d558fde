use std::path::PathBuf;

use anyhow::Context;
use teapot_rig::{AppConfig, MeshSource, TeapotRigApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = AppConfig::from_env();
    if let Some(path) = std::env::args_os().nth(1) {
        config = config.with_mesh(MeshSource::Obj(PathBuf::from(path)));
    }
    log::info!("Mesh source: {:?}", config.mesh);

    TeapotRigApp::new(config)
        .run()
        .context("teapot rig terminated with an error")
}
