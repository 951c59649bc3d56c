#[cfg(not(feature = "playback"))]
fn main() {
    eprintln!(
        "The sound-motion daemon requires the \"playback\" feature. Rebuild with `--features hardware` to enable audio output and the PIR sensor."
    );
}

#[cfg(feature = "playback")]
mod cli {
    use std::path::PathBuf;
    use std::thread;

    use anyhow::Context;
    use clap::Parser;
    use tracing_subscriber::EnvFilter;

    use sound_motion::config::{DEFAULT_BASE_DIR, DEFAULT_CONFIG_FILE};
    use sound_motion::{sensor, Config, PresenceController, RodioPlayer, SystemClock};

    #[derive(Parser, Debug)]
    #[command(name = "sound-motion", version)]
    #[command(about = "Play an audio file while a PIR sensor sees people around")]
    struct Args {
        /// Directory holding the config file and the audio asset
        #[arg(long, default_value = DEFAULT_BASE_DIR)]
        base_dir: PathBuf,

        /// Config file, relative to the base directory unless absolute
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Log every tick (overridden by RUST_LOG)
        #[arg(short, long)]
        verbose: bool,
    }

    fn init_tracing(verbose: bool) {
        let default_level = if verbose { "debug" } else { "info" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    pub fn run() -> anyhow::Result<()> {
        let args = Args::parse();
        init_tracing(args.verbose);

        let config_path = args.base_dir.join(&args.config);
        let config = Config::load(&config_path, &args.base_dir)
            .with_context(|| format!("loading {}", config_path.display()))?;
        tracing::info!(
            file = %config.audio_file.display(),
            sensor_enabled = config.sensor_enabled,
            "configuration loaded"
        );

        let sensor = sensor::from_config(&config).context("setting up the motion sensor")?;
        let player = RodioPlayer::new().context("opening the audio output")?;
        let mut controller =
            PresenceController::new(config.controller_settings(), SystemClock, sensor, player);

        let settings = controller.settings();
        tracing::info!(
            interval_ms = config.tick_interval.as_millis() as u64,
            max_silence_secs = settings.max_silence.as_secs(),
            restart_pause_secs = settings.restart_pause.as_secs(),
            fade_out_ms = settings.fade_out.as_millis() as u64,
            "watching for listeners"
        );
        loop {
            controller.tick().context("controller tick")?;
            thread::sleep(config.tick_interval);
        }
    }
}

#[cfg(feature = "playback")]
fn main() -> anyhow::Result<()> {
    cli::run()
}
