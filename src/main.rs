mod catalogue;
mod colors;
mod config;
mod error;
mod form;
mod globe;
mod help;
mod hud;
mod logging;
mod render;
mod rings;
mod scene;
mod settings;
mod terminal;
mod viewport;

use catalogue::FlightArc;
use clap::{Parser, Subcommand};
use config::{AnimationConfig, RunConfig};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use error::GlobeError;
use form::SettingsForm;
use globe::params::{AnimationParams, OutlineParams, RingDatum, SurfaceMaterial};
use globe::RenderEngine;
use hud::Hud;
use logging::LogTarget;
use render::TerminalEngine;
use scene::Scene;
use serde::Serialize;
use settings::Settings;
use std::path::{Path, PathBuf};
use std::time::Instant;
use terminal::Terminal;
use viewport::ZoomDirection;

#[derive(Parser)]
#[command(name = "flightglobe")]
#[command(version)]
#[command(about = "Terminal flight globe: animated arcs, pulsing rings and an orbit camera", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive globe
    Run {
        /// Frame delay in seconds
        #[arg(short, long, default_value = "0.03")]
        time: f32,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Flight data JSON file (defaults to the bundled set)
        #[arg(short, long)]
        flights: Option<PathBuf>,

        /// Override a setting, e.g. --set color=teal --set num_rings=2
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,

        /// Start with the HUD hidden
        #[arg(long)]
        no_hud: bool,

        /// Disable the log file
        #[arg(long)]
        no_log: bool,
    },

    /// Print the derived render parameters as JSON
    Params {
        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Flight data JSON file (defaults to the bundled set)
        #[arg(short, long)]
        flights: Option<PathBuf>,

        /// Override a setting
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,
    },
}

fn main() -> Result<(), GlobeError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            time,
            seed,
            flights,
            overrides,
            no_hud,
            no_log,
        } => {
            let target = if no_log {
                LogTarget::Off
            } else {
                LogTarget::File(logging::default_log_path())
            };
            logging::init(&target);

            let config = RunConfig {
                time_step: time.max(0.0),
                seed,
                flights,
                overrides,
                show_hud: !no_hud,
            };
            run(config)?;
        }
        Commands::Params {
            seed,
            flights,
            overrides,
        } => {
            logging::init(&LogTarget::Stderr);
            print_params(seed, flights.as_deref(), &overrides)?;
        }
    }

    Ok(())
}

fn load_flights(path: Option<&Path>) -> Result<Vec<FlightArc>, GlobeError> {
    match path {
        Some(path) => catalogue::load_flights(path),
        None => Ok(catalogue::bundled_flights()),
    }
}

/// Everything the render engine received for one frame
#[derive(Default, Serialize)]
struct ParamsReport {
    config: Option<AnimationConfig>,
    material: Option<SurfaceMaterial>,
    outline: Option<OutlineParams>,
    animation: Option<AnimationParams>,
    rings: Vec<RingDatum>,
}

impl RenderEngine for ParamsReport {
    fn is_ready(&self) -> bool {
        true
    }

    fn apply_outline(&mut self, outline: &OutlineParams) {
        self.outline = Some(outline.clone());
    }

    fn apply_animation(&mut self, animation: &AnimationParams) {
        self.animation = Some(animation.clone());
        self.rings.clear();
    }

    fn apply_rings(&mut self, rings: &[RingDatum]) {
        self.rings = rings.to_vec();
    }

    fn apply_material(&mut self, material: &SurfaceMaterial) {
        self.material = Some(*material);
    }
}

fn print_params(seed: Option<u64>, flights: Option<&Path>, overrides: &[String]) -> Result<(), GlobeError> {
    let settings = Settings::load();
    let form = SettingsForm::from_pairs(overrides)?;

    let mut scene = Scene::new(
        load_flights(flights)?,
        settings.scene(),
        settings.viewport,
        ParamsReport::default(),
        seed,
    );
    if !form.is_empty() {
        scene.apply_settings(&form);
    }
    scene.frame(0.0);

    let config = scene.globe().config().clone();
    let report = scene.engine_mut();
    report.config = Some(config);
    println!("{}", serde_json::to_string_pretty(&*report)?);
    Ok(())
}

fn run(config: RunConfig) -> Result<(), GlobeError> {
    let settings = Settings::load();
    let form = SettingsForm::from_pairs(&config.overrides)?;
    let flights = load_flights(config.flights.as_deref())?;

    let mut term = Terminal::new(true)?;
    let (width, height) = term.size();
    let mut engine = TerminalEngine::new();
    engine.resize(width, height);

    let mut scene = Scene::new(flights, settings.scene(), settings.viewport, engine, config.seed);
    if !form.is_empty() {
        scene.apply_settings(&form);
    }
    tracing::info!(width, height, "globe view started");

    let mut show_hud = config.show_hud;
    let mut show_help = false;
    let mut paused = false;
    let mut auto_rotate = scene.viewport().settings().auto_rotate;
    let mut preset = 0usize;
    let mut anchor: Option<(u16, u16)> = None;
    let mut last = Instant::now();

    'frames: loop {
        let (_, rows) = term.size();
        let dot_height = rows as f64 * 4.0;

        while let Some(event) = term.check_event()? {
            match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        break 'frames;
                    }
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break 'frames,
                        KeyCode::Char('?') => show_help = !show_help,
                        KeyCode::Char(' ') => paused = !paused,
                        KeyCode::Char('h') => show_hud = !show_hud,
                        KeyCode::Char('l') => {
                            // command-line overrides stay on top of the file
                            let reloaded = Settings::load();
                            scene.replace_settings(form.apply(&reloaded.scene()));
                            tracing::info!(path = %Settings::config_path().display(), "settings reloaded");
                        }
                        KeyCode::Char('r') => {
                            auto_rotate = !auto_rotate;
                            scene.viewport_mut().set_auto_rotate(auto_rotate);
                        }
                        KeyCode::Char('c') => {
                            preset = (preset + 1) % colors::GLOBE_PRESETS.len();
                            scene.set_color(colors::GLOBE_PRESETS[preset]);
                        }
                        KeyCode::Char('+') | KeyCode::Char('=') => scene.zoom(ZoomDirection::In),
                        KeyCode::Char('-') | KeyCode::Char('_') => scene.zoom(ZoomDirection::Out),
                        KeyCode::Left => scene.viewport_mut().drag_by(-16.0, 0.0, dot_height),
                        KeyCode::Right => scene.viewport_mut().drag_by(16.0, 0.0, dot_height),
                        KeyCode::Up => scene.viewport_mut().drag_by(0.0, -16.0, dot_height),
                        KeyCode::Down => scene.viewport_mut().drag_by(0.0, 16.0, dot_height),
                        _ => {}
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        anchor = Some((mouse.column, mouse.row));
                        scene.viewport_mut().begin_drag();
                    }
                    MouseEventKind::Drag(MouseButton::Left) => {
                        if let Some((ax, ay)) = anchor {
                            // cells to braille dots
                            let dx = (mouse.column as f64 - ax as f64) * 2.0;
                            let dy = (mouse.row as f64 - ay as f64) * 4.0;
                            scene.viewport_mut().drag_by(dx, dy, dot_height);
                        }
                        anchor = Some((mouse.column, mouse.row));
                    }
                    MouseEventKind::Up(MouseButton::Left) => {
                        anchor = None;
                        scene.viewport_mut().end_drag();
                    }
                    MouseEventKind::ScrollUp => scene.viewport_mut().wheel(-1.0),
                    MouseEventKind::ScrollDown => scene.viewport_mut().wheel(1.0),
                    _ => {}
                },
                Event::Resize(w, h) => {
                    term.resize(w, h);
                    term.clear_screen()?;
                    tracing::debug!(w, h, "terminal resized");
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f64();
        last = now;
        if !paused {
            scene.frame(dt);
        }

        let hud = if show_hud { scene.hud() } else { Hud::hidden() };
        let view = scene.viewport().camera_view();
        scene.engine_mut().draw(&mut term, &view, &hud);
        if show_help {
            let (w, h) = term.size();
            help::render_help_overlay(&mut term, w, h, help::HELP);
        }
        term.render()?;
        term.sleep(config.time_step);
    }

    scene.teardown();
    tracing::info!("globe view closed");
    Ok(())
}
