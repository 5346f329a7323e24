//! Duet stage
//!
//! Two avatars on a metal disc. Steer them from the floating control menu or
//! the keyboard (arrows / WASD), switch their animation clips, and swap in
//! custom glTF models by URL.
//!
//! Usage: `duet-stage [CONFIG]`. Without an argument the config comes from
//! `$DUET_CONFIG`, then `./duet.json`, then built-in defaults.

use duet_core::StageConfig;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => StageConfig::from_file(&path)?,
        None => StageConfig::load()?,
    };
    config.validate()?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let _enter = rt.enter();

    log::info!("Starting {}", config.window.title);
    duet_app::run(config)?;
    Ok(())
}
