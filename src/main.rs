mod choropleth;
mod config;
mod country;
mod data;
mod error;
mod format;
mod geometry;
mod interaction;
mod iso;
mod map_draw;
mod projection;
mod scale;
mod state;
mod svg;
mod ui;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, DEFAULT_CONFIG_FILE};
use crate::data::{DashboardReport, DashboardRequest, OrganizationInfo, ProductInfo};
use crate::geometry::WORLD;
use state::AppState;

#[derive(Parser)]
#[command(name = "trade-atlas", version, about = "Import geography dashboard for the terminal")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive dashboard with map, ranking and side panels
    View { report: PathBuf },
    /// Write the print version of a report as SVG
    Export {
        report: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show how each country of a report is identified
    Resolve { report: PathBuf },
    /// Print the JSON body that requests a report
    Request {
        #[arg(long)]
        product: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        organization: String,
        #[arg(long)]
        inn: Option<String>,
    },
}

fn init_logging(cfg: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.logging.filter));
    if to_file {
        let file = File::create(&cfg.logging.file)
            .with_context(|| format!("Failed to create log file: {:?}", cfg.logging.file))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::load_from_file(&cli.config)
        .with_context(|| format!("Failed to load config: {:?}", cli.config))?;
    init_logging(&cfg, matches!(cli.command, Command::View { .. }))?;

    match cli.command {
        Command::View { report } => view(cfg, &report),
        Command::Export { report, output } => export(&cfg, &report, output),
        Command::Resolve { report } => resolve(&cfg, &report),
        Command::Request { product, code, organization, inn } => {
            let request = DashboardRequest {
                product: ProductInfo { name: product, code },
                organization: OrganizationInfo { name: organization, inn },
            };
            println!("{}", serde_json::to_string_pretty(&request)?);
            Ok(())
        }
    }
}

fn view(cfg: AppConfig, report: &Path) -> Result<()> {
    let mut state = AppState::new(cfg, report)
        .with_context(|| format!("Failed to open report: {:?}", report))?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut state);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, state: &mut AppState) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, state))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) => {
                    if state.handle_input(code) {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => state.handle_mouse(mouse),
                _ => {}
            }
        }
    }
}

fn export(cfg: &AppConfig, report_path: &Path, output: Option<PathBuf>) -> Result<()> {
    let geometry = WORLD
        .get_or_load(&cfg.data.world_geometry)
        .with_context(|| format!("Failed to load world geometry: {:?}", cfg.data.world_geometry))?;
    let report = DashboardReport::load(report_path)
        .with_context(|| format!("Failed to open report: {:?}", report_path))?;
    let doc = svg::render_report(&report, geometry, &cfg.resolver(), &cfg.map_options(), cfg.export.width);
    let out = output.unwrap_or_else(|| cfg.export.output.clone());
    svg::write_report(&out, &doc)?;
    info!(report = %report_path.display(), "export finished");
    println!("{}", out.display());
    Ok(())
}

fn resolve(cfg: &AppConfig, report_path: &Path) -> Result<()> {
    let report = DashboardReport::load(report_path)
        .with_context(|| format!("Failed to open report: {:?}", report_path))?;
    let resolver = cfg.resolver();
    for record in &report.geography {
        let res = resolver.resolve_detailed(&record.country, record.country_code.as_deref());
        let shown = resolver.display_name(&res.key).unwrap_or("-");
        let numeric = res.key.numeric_id().map_or_else(|| "-".to_string(), |n| format!("{n:03}"));
        println!(
            "{:<28} {:<6} {:<14} {:<4} {:<10} {}",
            record.country,
            record.country_code.as_deref().unwrap_or("-"),
            res.key.to_string(),
            numeric,
            res.via.to_string(),
            shown
        );
    }
    Ok(())
}
