//! Lookout dashboard
//! Browse the UTXOs of an address as a bubble field and assemble a draft
//! transaction from them in the terminal

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Config, Environment};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lookout_module_tx_builder::{open_draft_store, TxBuilder};
use lookout_module_utxo_field::{FieldConfig, UtxoField};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{filter, fmt, EnvFilter, Registry};

mod app;
mod events;
mod settings;
mod source;
mod ui;

use app::{App, View};
use settings::DashboardConfig;

#[derive(Parser, Debug)]
#[command(name = "lookout-dashboard")]
#[command(about = "Browse Cardano UTXOs and draft a transaction from them")]
struct Args {
    /// Configuration files, later ones overriding earlier ones
    #[arg(long, value_name = "PATH", default_values_t = vec!["lookout.toml".to_string()])]
    config: Vec<String>,

    /// UTXO list in the indexer's /addresses/{address}/utxos shape
    #[arg(short, long)]
    utxos: Option<PathBuf>,

    /// Validate the saved draft, write its JSON to this file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut builder = Config::builder();
    for file in &args.config {
        builder = builder.add_source(config::File::with_name(file).required(false));
    }
    if let Some(utxos) = &args.utxos {
        builder = builder.set_override("utxo-file", utxos.to_string_lossy().to_string())?;
    }
    Ok(builder.add_source(Environment::with_prefix("LOOKOUT")).build()?)
}

/// Log to a file; the terminal belongs to the dashboard
fn init_logging(log_file: &Path) -> Result<()> {
    let file = File::create(log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;
    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_filter(EnvFilter::from_default_env().add_directive(filter::LevelFilter::INFO.into()))
        .with_filter(filter::filter_fn(|meta| meta.is_event()));
    Registry::default().with(fmt_layer).init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    let settings = DashboardConfig::from(&config);
    init_logging(&settings.log_file)?;

    let builder = TxBuilder::new(open_draft_store(&config)?);

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        let json = builder.export_json()?;
        std::fs::write(&export_path, json)
            .with_context(|| format!("Failed to write {}", export_path.display()))?;
        info!("Exported transaction to {}", export_path.display());
        println!("Exported transaction to: {}", export_path.display());
        return Ok(());
    }

    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let field = UtxoField::new(FieldConfig::from(&config), rng);
    let tick_interval = settings.tick_interval;

    let mut app = App::new(settings, field, builder);
    if let Err(e) = app.reload_utxos() {
        warn!("No UTXOs loaded: {e:#}");
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, &mut app, tick_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_interval: std::time::Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();

    while app.running {
        terminal.draw(|frame| {
            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(10),   // Content
                Constraint::Length(1), // Status bar
            ])
            .split(frame.area());

            if app.current_view == View::Field {
                app.sync_canvas(ui::field::canvas_area(chunks[2]));
            }

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Field => ui::field::render(frame, app, chunks[2]),
                View::Builder => ui::builder::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.prompt.is_some() {
                ui::common::render_prompt(frame, app, frame.area());
            }

            if app.show_help {
                ui::common::render_help(frame, frame.area());
            }
        })?;

        // Wait for input until the next frame is due
        let timeout = tick_interval.saturating_sub(last_tick.elapsed());
        if let Some(event) = events::poll_event(timeout)? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Canvas is resized on next draw
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_interval {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
