use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use modalkit_core::logging::{LogFormat, init_subscriber};
use modalkit_widgets::config::ModalConfig;
use modalkit_widgets::modal::{AnimationSpec, Viewport};

use crate::catalog::{CATALOG, resolve};
use crate::error::{DemoError, Result};
use crate::player::{PlayerOptions, Recording, play_entry, rapid_toggle};

#[derive(Debug, Parser)]
#[command(
    name = "modalkit-demo",
    about = "Headless showcase for modalkit animated overlays",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Base overlay configuration (`.toml` or `.json`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Viewport width in logical pixels.
    #[arg(long, default_value_t = 390.0, global = true)]
    pub width: f64,

    /// Viewport height in logical pixels.
    #[arg(long, default_value_t = 844.0, global = true)]
    pub height: f64,

    /// Milliseconds between sampled frames.
    #[arg(long = "frame-ms", default_value_t = 50, global = true)]
    pub frame_ms: u64,

    /// Frames to hold the shown overlay before dismissing it.
    #[arg(long = "hold-frames", default_value_t = 4, global = true)]
    pub hold_frames: usize,

    /// Print frames as JSON lines instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[arg(long = "log-format", value_enum, default_value_t = LogFormatArg::Pretty, global = true)]
    pub log_format: LogFormatArg,

    /// Log filter in `EnvFilter` syntax.
    #[arg(long = "log-filter", default_value = "warn", global = true)]
    pub log_filter: String,
}

impl Default for GlobalArgs {
    fn default() -> Self {
        Self {
            config: None,
            width: 390.0,
            height: 844.0,
            frame_ms: 50,
            hold_frames: 4,
            json: false,
            log_format: LogFormatArg::Pretty,
            log_filter: "warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the showcase catalog.
    List,

    /// Play showcase entries (all of them when none are named).
    Play(PlayArgs),

    /// Show, hide mid-entry, and show again mid-exit.
    #[command(name = "rapid-toggle")]
    RapidToggle,
}

#[derive(Debug, Clone, Default, Args)]
pub struct PlayArgs {
    /// Entry names from `list`.
    #[arg(value_name = "ENTRY")]
    pub entries: Vec<String>,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_subscriber(cli.global.log_format.into(), &cli.global.log_filter)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Commands::List => print_catalog(out),
        Commands::Play(args) => {
            let options = player_options(&cli.global)?;
            let base = base_spec(&cli.global)?;
            for entry in resolve(&args.entries)? {
                let recording = play_entry(entry, &base, options);
                if !cli.global.json {
                    writeln!(out, "== {} ==", entry.title)?;
                    writeln!(out, "   {}", entry.description)?;
                }
                print_recording(out, &recording, cli.global.json)?;
            }
            Ok(())
        }
        Commands::RapidToggle => {
            let options = player_options(&cli.global)?;
            let base = base_spec(&cli.global)?;
            let recording = rapid_toggle(&base, options);
            if !cli.global.json {
                writeln!(out, "== Rapid Toggle ==")?;
            }
            print_recording(out, &recording, cli.global.json)
        }
    }
}

fn print_catalog(out: &mut dyn Write) -> Result<()> {
    for entry in &CATALOG {
        writeln!(out, "{:<12} {:<24} {}", entry.name, entry.title, entry.description)?;
    }
    Ok(())
}

fn print_recording(out: &mut dyn Write, recording: &Recording, json: bool) -> Result<()> {
    for frame in &recording.frames {
        if json {
            writeln!(out, "{}", serde_json::to_string(&frame.to_json(&recording.scene))?)?;
        } else {
            writeln!(out, "{}", frame.to_line())?;
        }
    }
    if !json {
        writeln!(
            out,
            "   surface opened {}x, closed {}x; dismiss callback ran {}x",
            recording.opens(),
            recording.closes(),
            recording.dismissals
        )?;
    }
    Ok(())
}

pub fn player_options(global: &GlobalArgs) -> Result<PlayerOptions> {
    if global.frame_ms == 0 {
        return Err(DemoError::invalid("--frame-ms must be > 0"));
    }
    for (flag, value) in [("--width", global.width), ("--height", global.height)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(DemoError::invalid(format!("{flag} must be a positive number")));
        }
    }
    Ok(PlayerOptions {
        viewport: Viewport::new(global.width, global.height),
        frame: Duration::from_millis(global.frame_ms),
        hold_frames: global.hold_frames,
    })
}

/// The spec every entry is layered over: the config file if given, else defaults.
pub fn base_spec(global: &GlobalArgs) -> Result<AnimationSpec> {
    let Some(path) = &global.config else {
        return Ok(AnimationSpec::default());
    };
    let config = ModalConfig::from_path(path)?;
    for problem in config.validate() {
        tracing::warn!(
            target: "modalkit.demo",
            path = %path.display(),
            %problem,
            "config problem, using default for this field"
        );
    }
    Ok(config.to_spec())
}
