use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use lyric_player_core::{
    effects, lyrics, styles, AnimationEffect, AppConfig, Cue, EffectContext, LyricEngine,
    LyricTrack, PlaybackClock, PlaybackSource, RenderTarget, Selection, StyleVariation, Theme,
    Timeline, TranscriptTarget, Transition, Viewport,
};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Extra playback time simulated after the last line when no duration is given.
const TAIL_SECONDS: f64 = 5.0;
/// Frames printed by `preview`, besides the first.
const PREVIEW_STEPS: usize = 4;

fn main() -> lyric_player_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Play { lyrics, playback } => run_play(&lyrics, &playback, config),
        Commands::Cues {
            lyrics,
            output,
            playback,
        } => run_cues(&lyrics, &output, &playback, config),
        Commands::Effects => {
            list_effects();
            Ok(())
        }
        Commands::Styles => {
            list_styles();
            Ok(())
        }
        Commands::Inspect { lyrics } => run_inspect(&lyrics),
        Commands::Preview(args) => run_preview(&args, &config),
    }
}

fn load_config(path: Option<&Path>) -> lyric_player_core::Result<AppConfig> {
    match path {
        Some(path) => {
            tracing::info!(?path, "loading configuration");
            AppConfig::from_json_file(path)
        }
        None => Ok(AppConfig::default()),
    }
}

fn run_play(
    lyrics: &Path,
    playback: &PlaybackArgs,
    config: AppConfig,
) -> lyric_player_core::Result<()> {
    tracing::info!(?lyrics, "starting playback simulation");

    let mut target = ConsoleTarget;
    simulate(lyrics, playback, config, &mut target)?;
    Ok(())
}

fn run_cues(
    lyrics: &Path,
    output: &Path,
    playback: &PlaybackArgs,
    config: AppConfig,
) -> lyric_player_core::Result<()> {
    tracing::info!(?lyrics, ?output, "exporting cue sheet");

    let mut target = TranscriptTarget::new();
    let track = simulate(lyrics, playback, config, &mut target)?;

    let sheet = CueSheet {
        source: lyrics.display().to_string(),
        lines: track.len(),
        cues: target.into_cues(),
    };
    let json = serde_json::to_string_pretty(&sheet)?;
    std::fs::write(output, json)?;

    tracing::info!(cues = sheet.cues.len(), "cue sheet written");
    Ok(())
}

/// Drives the engine from a simulated clock until the media ends.
fn simulate<T: RenderTarget>(
    lyrics: &Path,
    playback: &PlaybackArgs,
    mut config: AppConfig,
    target: &mut T,
) -> lyric_player_core::Result<LyricTrack> {
    playback.apply(&mut config);

    let tick = config.player.tick_seconds;
    if !(tick.is_finite() && tick > 0.0) {
        return Err(format!("tick must be a positive number of seconds, got {tick}").into());
    }

    let track = LyricTrack::from_path(lyrics)?;
    if track.is_empty() {
        tracing::warn!(?lyrics, "no timed lyrics found");
    }

    let duration = media_duration(playback.duration, &track)?;

    let mut clock = PlaybackClock::with_duration(duration);
    clock.set_volume(config.player.volume);
    clock.seek(playback.start_at);
    clock.play();

    let mut engine = LyricEngine::from_config(track, &config);
    if let Some(seed) = playback.seed {
        engine = engine.with_seed(seed);
    }

    engine.update(clock.current_time(), target);
    while !clock.advance(tick) {
        engine.update(clock.current_time(), target);
    }

    tracing::info!(duration, "playback finished");
    Ok(engine.track().clone())
}

/// Length of the simulated media. Without an explicit length the clock runs a
/// few seconds past the last line so it always reaches the end.
fn media_duration(requested: Option<f64>, track: &LyricTrack) -> lyric_player_core::Result<f64> {
    match requested {
        Some(seconds) if seconds.is_finite() && seconds > 0.0 => Ok(seconds),
        Some(seconds) => {
            Err(format!("duration must be a positive number of seconds, got {seconds}").into())
        }
        None => Ok(track
            .last_time()
            .map_or(TAIL_SECONDS, |last| last.max(0.0) + TAIL_SECONDS)),
    }
}

fn list_effects() {
    for effect in effects::all_animation_effects() {
        println!(
            "{:<12} {:<16} {}",
            effect.id,
            effect.name,
            effect.description.unwrap_or_default()
        );
    }
}

fn list_styles() {
    for style in styles::all_style_variations() {
        println!(
            "{:<12} {:<16} {}",
            style.id,
            style.name,
            style.description.unwrap_or_default()
        );
    }
}

fn run_inspect(path: &Path) -> lyric_player_core::Result<()> {
    let track = LyricTrack::from_path(path)?;
    for (index, line) in track.lines().iter().enumerate() {
        let gap = track
            .duration_after(index)
            .map(|seconds| format!("{seconds:.3}s"))
            .unwrap_or_else(|| "-".to_string());
        println!("{} {:>9} {}", lyrics::format_tag(line.time), gap, line.text);
    }
    tracing::info!(lines = track.len(), "inspected lyric file");
    Ok(())
}

/// An effect and style applied to arbitrary text, outside any playback.
struct PreviewFrame {
    effect: &'static AnimationEffect,
    style: &'static StyleVariation,
    timeline: Timeline,
}

fn build_preview(
    args: &PreviewArgs,
    config: &AppConfig,
    viewport: Viewport,
    rng: &mut StdRng,
) -> PreviewFrame {
    let selection = Selection::new(
        args.effect.clone().or_else(|| config.engine.effect_id.clone()),
        args.style.clone().or_else(|| config.engine.style_id.clone()),
    );
    let effect = selection.effect(rng);
    let style = selection.style(rng);

    let mut ctx = EffectContext {
        text: &args.text,
        available: args.available,
        viewport,
        rng,
    };
    let timeline = effect.animate(&mut ctx);

    PreviewFrame {
        effect,
        style,
        timeline,
    }
}

fn run_preview(args: &PreviewArgs, config: &AppConfig) -> lyric_player_core::Result<()> {
    if let Some(available) = args.available {
        if !(available.is_finite() && available > 0.0) {
            return Err(
                format!("available must be a positive number of seconds, got {available}").into(),
            );
        }
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let frame = build_preview(args, config, config.viewport, &mut rng);
    let duration = frame.timeline.duration();

    println!(
        "{} ({}) / {} ({})",
        frame.effect.name, frame.effect.id, frame.style.name, frame.style.id
    );
    println!(
        "{} layers, {} tweens, {duration:.3}s{}",
        frame.timeline.layers().len(),
        frame.timeline.tweens().len(),
        if frame.timeline.loops() { ", looping" } else { "" }
    );

    for step in 0..=PREVIEW_STEPS {
        let at = duration * step as f64 / PREVIEW_STEPS as f64;
        let states = frame.timeline.sample(at);
        for (layer, state) in frame.timeline.layers().iter().zip(&states) {
            if layer.text.is_empty() {
                continue;
            }
            println!(
                "{at:>7.3}s {:<24} opacity {:.2} x {:>8.1} y {:>6.1} scale {:.2}",
                frame.style.presentation.transform(&layer.text),
                state.opacity,
                state.x,
                state.y,
                state.scale
            );
        }
    }
    Ok(())
}

/// Prints each transition as it happens.
struct ConsoleTarget;

impl RenderTarget for ConsoleTarget {
    fn present(&mut self, transition: &Transition) {
        let text = transition.style.presentation.transform(&transition.text);
        println!(
            "{} #{:<3} {:<12} {:<10} {}",
            lyrics::format_timestamp(transition.at),
            transition.index,
            transition.effect.id,
            transition.style.id,
            text
        );
        if let Some(backdrop) = &transition.backdrop {
            tracing::debug!(color = %backdrop.color, "backdrop changed");
        }
    }

    fn clear(&mut self, at: f64) {
        println!("{} (blank)", lyrics::format_timestamp(at));
    }
}

#[derive(Serialize)]
struct CueSheet {
    source: String,
    lines: usize,
    cues: Vec<Cue>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Lyric-synchronised music player", long_about = None)]
struct Cli {
    /// JSON configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate playback of a lyric file and print each transition.
    Play {
        /// Path to the `.lrc` lyric file.
        lyrics: PathBuf,
        #[command(flatten)]
        playback: PlaybackArgs,
    },
    /// Simulate playback and write every transition to a JSON cue sheet.
    Cues {
        /// Path to the `.lrc` lyric file.
        lyrics: PathBuf,
        /// Output path for the cue sheet.
        output: PathBuf,
        #[command(flatten)]
        playback: PlaybackArgs,
    },
    /// List the built-in animation effects.
    Effects,
    /// List the built-in text styles.
    Styles,
    /// Print the parsed lines of a lyric file.
    Inspect {
        /// Path to the `.lrc` lyric file.
        lyrics: PathBuf,
    },
    /// Animate arbitrary text with an effect and style and print sampled frames.
    Preview(PreviewArgs),
}

#[derive(Args, Debug, Default)]
struct PreviewArgs {
    /// Text to animate.
    text: String,
    /// Effect id; random when omitted or unknown.
    #[arg(long)]
    effect: Option<String>,
    /// Style id; random when omitted or unknown.
    #[arg(long)]
    style: Option<String>,
    /// Seconds until a following line, if any.
    #[arg(long)]
    available: Option<f64>,
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug, Default)]
struct PlaybackArgs {
    /// Media length in seconds; defaults to a few seconds past the last line.
    #[arg(long)]
    duration: Option<f64>,
    /// Interval between position updates, in seconds.
    #[arg(long)]
    tick: Option<f64>,
    /// Effect id used for every line instead of a random one.
    #[arg(long)]
    effect: Option<String>,
    /// Style id used for every line instead of a random one.
    #[arg(long)]
    style: Option<String>,
    #[arg(long, value_enum)]
    theme: Option<ThemeArg>,
    /// Position to start playing from, in seconds.
    #[arg(long, default_value_t = 0.0)]
    start_at: f64,
    /// Seed for reproducible effect, style and backdrop picks.
    #[arg(long)]
    seed: Option<u64>,
}

impl PlaybackArgs {
    /// Command line flags win over the configuration file.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(tick) = self.tick {
            config.player.tick_seconds = tick;
        }
        if let Some(effect) = &self.effect {
            config.engine.effect_id = Some(effect.clone());
        }
        if let Some(style) = &self.style {
            config.engine.style_id = Some(style.clone());
        }
        if let Some(theme) = self.theme {
            config.theme = theme.into();
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeArg {
    Color,
    Bw,
}

impl From<ThemeArg> for Theme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Color => Theme::Color,
            ThemeArg::Bw => Theme::BlackAndWhite,
        }
    }
}

#[cfg(test)]
mod tests {
    use lyric_player_core::LyricError;

    use super::*;

    const SONG: &str = "[00:00.500]first\n[00:01.500]second\n[00:02.000]third";

    fn write_lrc(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "lyric-player-{}-{name}.lrc",
            std::process::id()
        ));
        std::fs::write(&path, SONG).unwrap();
        path
    }

    #[test]
    fn invalid_durations_are_rejected() {
        let track = LyricTrack::parse(SONG);
        for seconds in [0.0, -3.0, f64::INFINITY, f64::NAN] {
            assert!(media_duration(Some(seconds), &track).is_err(), "{seconds}");
        }
        assert_eq!(media_duration(Some(12.0), &track).unwrap(), 12.0);
    }

    #[test]
    fn default_duration_runs_past_last_line() {
        let track = LyricTrack::parse(SONG);
        assert_eq!(media_duration(None, &track).unwrap(), 2.0 + TAIL_SECONDS);
        assert_eq!(media_duration(None, &LyricTrack::default()).unwrap(), TAIL_SECONDS);
    }

    #[test]
    fn zero_duration_fails_instead_of_playing_forever() {
        let lrc = write_lrc("zero");
        let playback = PlaybackArgs {
            duration: Some(0.0),
            ..PlaybackArgs::default()
        };

        let result = simulate(&lrc, &playback, AppConfig::default(), &mut TranscriptTarget::new());
        std::fs::remove_file(&lrc).ok();
        assert!(matches!(result, Err(LyricError::Message(_))));
    }

    #[test]
    fn simulation_stops_at_media_end() {
        let lrc = write_lrc("ends");
        let playback = PlaybackArgs {
            duration: Some(3.0),
            tick: Some(0.25),
            seed: Some(7),
            ..PlaybackArgs::default()
        };
        let mut target = TranscriptTarget::new();

        let track = simulate(&lrc, &playback, AppConfig::default(), &mut target).unwrap();
        std::fs::remove_file(&lrc).ok();

        assert_eq!(track.len(), 3);
        let indices: Vec<Option<usize>> = target.cues().iter().map(|cue| cue.index).collect();
        assert_eq!(indices, vec![Some(0), None, Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn preview_uses_requested_effect_and_style() {
        let args = PreviewArgs {
            text: "hello preview world".to_string(),
            effect: Some("typewriter".to_string()),
            style: Some("uppercase".to_string()),
            available: Some(1.0),
            seed: None,
        };
        let mut rng = StdRng::seed_from_u64(3);

        let frame = build_preview(&args, &AppConfig::default(), Viewport::default(), &mut rng);

        assert_eq!(frame.effect.id, "typewriter");
        assert_eq!(frame.style.id, "uppercase");
        assert_eq!(frame.timeline.layers().len(), 3);
        assert!(frame.timeline.duration() <= 0.95 + 1e-9);
    }

    #[test]
    fn preview_falls_back_to_configured_ids() {
        let mut config = AppConfig::default();
        config.engine.effect_id = Some("train".to_string());
        let args = PreviewArgs {
            text: "choo".to_string(),
            ..PreviewArgs::default()
        };
        let mut rng = StdRng::seed_from_u64(9);

        let frame = build_preview(&args, &config, Viewport::default(), &mut rng);
        assert_eq!(frame.effect.id, "train");
    }
}
