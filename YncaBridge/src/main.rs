use std::process;

use tracing::info;
use tracing_subscriber::EnvFilter;

use yncaconfig::Config;
use yncacontrol::{BridgeSettings, MpdPlayer, PlaybackController, YncaTcpLink};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Configuration problems are the only reason this process ever exits on
    // its own; everything after this point retries forever.
    let config = match Config::load_default() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err:#}");
            process::exit(1);
        }
    };

    let receiver = YncaTcpLink::new(&config.receiver.host, config.receiver.port);
    let settings = BridgeSettings {
        input: config.receiver.input.clone(),
        scene: config.receiver.scene.clone(),
        default_program: config.receiver.default_program.clone(),
        startup_delay: config.startup_delay(),
    };
    let player_addr = config.player_addr();

    info!(
        "Bridging player daemon at {} to receiver at {}:{}",
        player_addr, config.receiver.host, config.receiver.port
    );

    let mut controller = PlaybackController::new(receiver, settings);
    controller.run_forever(|| MpdPlayer::connect(&player_addr));
}
