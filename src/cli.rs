use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::commands::{self, SessionOptions};
use crate::config::{self, InspectorConfig};
use crate::errors::InspectorResult;
use crate::geometry::{Point, Rect};

#[derive(Debug, Parser)]
#[command(
    name = "droidpick",
    version,
    about = "Inspect Android screenshots: colours, crops and UI hierarchy dumps"
)]
pub struct Cli {
    /// Screenshot to inspect.
    #[arg(long, global = true)]
    pub image: Option<PathBuf>,

    /// uiautomator hierarchy dump that belongs to the screenshot.
    #[arg(long, global = true)]
    pub xml: Option<PathBuf>,

    /// Fit the screenshot into a WIDTHxHEIGHT canvas (display space).
    #[arg(long, global = true, value_parser = parse_size)]
    pub container: Option<(f64, f64)>,

    /// Config file. Defaults to droidpick.toml next to the binary or in the
    /// working directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Record the loaded screenshot in the capture history.
    #[arg(long, global = true)]
    pub remember: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the hierarchy as a tree.
    Tree {
        #[arg(long)]
        max_depth: Option<usize>,
    },
    /// Case-insensitive search over tag, id, text, description, class and package.
    Search { query: String },
    /// Most specific node at an original-image point.
    Hit {
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
    },
    /// Click at a canvas (display-space) point: colour, coordinates and node.
    Pick {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
    /// Grid-sample an original-image rectangle.
    Area {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        #[arg(long)]
        points: Option<usize>,
    },
    /// Crop an original-image rectangle to PNG.
    Crop {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        #[arg(long)]
        out: PathBuf,
        /// Also write the down-scaled preview.
        #[arg(long)]
        preview: Option<PathBuf>,
    },
    /// Sample the given points and areas and write a JSON export.
    Export {
        #[arg(long)]
        out: PathBuf,
        /// Display-space point `X,Y`; repeatable.
        #[arg(long = "pick", value_parser = parse_point)]
        picks: Vec<Point>,
        /// Original-space rectangle `X,Y,W,H`; repeatable.
        #[arg(long = "area", value_parser = parse_rect)]
        areas: Vec<Rect>,
        #[arg(long)]
        points: Option<usize>,
    },
    /// Show or edit the capture history.
    History {
        #[command(subcommand)]
        command: Option<HistoryCommand>,
    },
    /// Print the effective configuration.
    Config {
        /// Write it back to droidpick.toml.
        #[arg(long)]
        save: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    List,
    Remove { id: String },
    Clear,
}

fn parse_numbers(s: &str, sep: char, expected: usize) -> Result<Vec<f64>, String> {
    let parts: Vec<f64> = s
        .split(sep)
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("'{p}': {e}")))
        .collect::<Result<_, _>>()?;
    if parts.len() != expected {
        return Err(format!("expected {expected} values separated by '{sep}'"));
    }
    Ok(parts)
}

fn parse_size(s: &str) -> Result<(f64, f64), String> {
    let v = parse_numbers(&s.to_lowercase(), 'x', 2)?;
    Ok((v[0], v[1]))
}

fn parse_point(s: &str) -> Result<Point, String> {
    let v = parse_numbers(s, ',', 2)?;
    Ok(Point::new(v[0], v[1]))
}

fn parse_rect(s: &str) -> Result<Rect, String> {
    let v = parse_numbers(s, ',', 4)?;
    Ok(Rect::new(v[0] as i32, v[1] as i32, v[2] as i32, v[3] as i32))
}

fn load_config(path: Option<&PathBuf>) -> InspectorResult<InspectorConfig> {
    match path {
        Some(path) => config::load_config_from(path),
        None => Ok(config::load_or_default()),
    }
}

pub async fn run_cli(cli: Cli) -> InspectorResult<()> {
    let config = load_config(cli.config.as_ref())?;
    let opts = SessionOptions {
        image: cli.image.clone(),
        xml: cli.xml.clone(),
        container: cli.container,
        remember: cli.remember,
    };

    let output: Value = match cli.command {
        Commands::History { command } => {
            let mut history = commands::open_history(&config);
            match command.unwrap_or(HistoryCommand::List) {
                HistoryCommand::List => commands::history_list(&history),
                HistoryCommand::Remove { id } => commands::history_remove(&mut history, &id)?,
                HistoryCommand::Clear => commands::history_clear(&mut history),
            }
        }
        Commands::Config { save } => commands::show_config(&config, save)?,
        command => {
            let mut inspector = commands::open_session(&config, &opts).await?;
            match command {
                Commands::Tree { max_depth } => commands::tree(&inspector, max_depth)?,
                Commands::Search { query } => commands::search(&inspector, &query)?,
                Commands::Hit { x, y } => commands::hit(&mut inspector, x, y)?,
                Commands::Pick { x, y } => commands::pick(&mut inspector, x, y)?,
                Commands::Area {
                    x,
                    y,
                    width,
                    height,
                    points,
                } => commands::area(&mut inspector, Rect::new(x, y, width, height), points)?,
                Commands::Crop {
                    x,
                    y,
                    width,
                    height,
                    out,
                    preview,
                } => commands::crop(
                    &inspector,
                    Rect::new(x, y, width, height),
                    &out,
                    preview.as_deref(),
                )?,
                Commands::Export {
                    out,
                    picks,
                    areas,
                    points,
                } => commands::export(&mut inspector, &picks, &areas, points, &out)?,
                Commands::History { .. } | Commands::Config { .. } => Value::Null,
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
