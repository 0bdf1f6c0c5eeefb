use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use canvas::doc::ElementKind;
use canvas::persist::{self, PersistError};
use canvas::store::Store;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use sketchboard::config::{BoardConfig, ConfigError};
use sketchboard::diagram::{Grammar, LayoutError, ParseError, StylePreset, layout_auto};
use sketchboard::import::{ImportError, import_diagram};
use tokio::io::AsyncReadExt;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to read {path}: {source}")]
    Input { path: String, source: std::io::Error },
    #[error("diagram parse failed [{code}]: {0}", code = .0.error_code())]
    Parse(#[from] ParseError),
    #[error("diagram layout failed [{code}]: {0}", code = .0.error_code())]
    Layout(#[from] LayoutError),
    #[error("import failed [{code}]: {0}", code = .0.error_code())]
    Import(#[from] ImportError),
    #[error("state file error [{code}]: {0}", code = .0.error_code())]
    State(#[from] PersistError),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "sketchboard", about = "Import text diagrams into a sketchboard canvas")]
struct Cli {
    /// Saved document to load and update.
    #[arg(long, env = "SKETCHBOARD_STATE_PATH")]
    state: Option<PathBuf>,

    #[arg(long, env = "SKETCHBOARD_STYLE")]
    style: Option<StylePreset>,

    /// Curve parallel edges apart.
    #[arg(long, env = "SKETCHBOARD_BEND")]
    bend: Option<bool>,

    #[arg(long, env = "SKETCHBOARD_CURVE_STRENGTH")]
    curve_strength: Option<f64>,

    #[arg(long, env = "SKETCHBOARD_ORIGIN_X", allow_negative_numbers = true)]
    origin_x: Option<f64>,

    #[arg(long, env = "SKETCHBOARD_ORIGIN_Y", allow_negative_numbers = true)]
    origin_y: Option<f64>,

    #[arg(long, env = "SKETCHBOARD_SCREEN_W")]
    screen_width: Option<f64>,

    #[arg(long, env = "SKETCHBOARD_SCREEN_H")]
    screen_height: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a diagram into the saved document.
    Import(DiagramArgs),
    /// Print the parsed graph and its layout as JSON.
    Layout(DiagramArgs),
    /// Summarize the saved document.
    Show,
}

#[derive(Args, Debug)]
struct DiagramArgs {
    #[arg(long, value_enum)]
    format: Grammar,

    #[arg(help = "Input file path; reads stdin when absent")]
    file: Option<PathBuf>,
}

impl Cli {
    /// Environment config with command-line flags layered on top.
    fn config(&self) -> Result<BoardConfig, CliError> {
        let mut config = BoardConfig::from_env()?;
        if let Some(path) = &self.state {
            config.state_path.clone_from(path);
        }
        if let Some(style) = self.style {
            config.style = style;
        }
        if let Some(bend) = self.bend {
            config.enable_bend = bend;
        }
        if let Some(strength) = self.curve_strength {
            config.curve_strength = strength;
        }
        if let Some(x) = self.origin_x {
            config.origin.x = x;
        }
        if let Some(y) = self.origin_y {
            config.origin.y = y;
        }
        if let Some(w) = self.screen_width {
            config.screen_width = w;
        }
        if let Some(h) = self.screen_height {
            config.screen_height = h;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = cli.config()?;

    match cli.command {
        Command::Import(args) => run_import(&config, args).await,
        Command::Layout(args) => run_layout(args).await,
        Command::Show => run_show(&config).await,
    }
}

async fn run_import(config: &BoardConfig, args: DiagramArgs) -> Result<(), CliError> {
    let text = read_input(args.file.as_deref()).await?;
    let mut store = load_store(&config.state_path).await?;
    let ids = import_diagram(&mut store, args.format, &text, &config.import_options())?;
    save_store(&config.state_path, &store).await?;

    print_json(&serde_json::json!({
        "format": args.format,
        "imported": ids.len(),
        "total": store.len(),
        "state": config.state_path.display().to_string(),
    }))
}

async fn run_layout(args: DiagramArgs) -> Result<(), CliError> {
    let text = read_input(args.file.as_deref()).await?;
    let graph = args.format.parse(&text)?;
    let layout = layout_auto(&graph)?;
    print_json(&serde_json::json!({ "graph": graph, "layout": layout }))
}

async fn run_show(config: &BoardConfig) -> Result<(), CliError> {
    let store = load_store(&config.state_path).await?;
    let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
    for el in store.elements() {
        *kinds.entry(kind_name(&el.kind)).or_default() += 1;
    }
    print_json(&serde_json::json!({
        "state": config.state_path.display().to_string(),
        "elements": store.len(),
        "kinds": kinds,
        "selected": store.selected_ids().len(),
        "viewport": store.viewport(),
    }))
}

fn kind_name(kind: &ElementKind) -> &'static str {
    match kind {
        ElementKind::Rectangle(_) => "rectangle",
        ElementKind::RoundedRectangle(_) => "rounded-rectangle",
        ElementKind::Circle(_) => "circle",
        ElementKind::Triangle(_) => "triangle",
        ElementKind::Arrow(_) => "arrow",
        ElementKind::Image(_) => "image",
        ElementKind::Text(_) => "text",
        ElementKind::Group(_) => "group",
    }
}

async fn read_input(file: Option<&Path>) -> Result<String, CliError> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CliError::Input { path: path.display().to_string(), source }),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .map_err(|source| CliError::Input { path: "stdin".to_owned(), source })?;
            Ok(text)
        }
    }
}

/// A missing or unusable state file starts an empty document.
async fn load_store(path: &Path) -> Result<Store, CliError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(persist::load_state(&text).map_or_else(Store::new, Store::from_snapshot)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no saved state; starting empty");
            Ok(Store::new())
        }
        Err(e) => Err(PersistError::Io(e).into()),
    }
}

async fn save_store(path: &Path, store: &Store) -> Result<(), CliError> {
    let text = persist::save_state(&store.snapshot())?;
    tokio::fs::write(path, text).await.map_err(PersistError::Io)?;
    tracing::info!(path = %path.display(), elements = store.len(), "saved state");
    Ok(())
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
