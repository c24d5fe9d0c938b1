#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for the war board client.
//!
//! Headless subcommands inspect a board snapshot; `play` opens a macroquad
//! window over an offline server that serves the snapshot and logs every
//! command it receives.

mod config;
mod inspect;
mod offline;
mod play;

use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use warboard_core::Coord;
use warboard_rendering::SceneOptions;
use warboard_rendering_macroquad::MacroquadBackend;
use warboard_session::{Session, SilentPushChannel};
use warboard_system_interaction::{Modifiers, PointerAction};

use self::{config::ClientConfig, inspect::RenderFormat, offline::OfflineServer};

/// Board client for a turn-based grid strategy game.
#[derive(Parser, Debug)]
#[command(name = "warboard")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Client configuration file
    #[arg(long, default_value = "warboard.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the scene composed from a board snapshot
    Render {
        /// Board snapshot JSON file
        snapshot: PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: RenderFormat,

        /// Draw blank tiles instead of terrain
        #[arg(long)]
        no_terrain: bool,
    },

    /// Print the commands a click on a tile would send
    Click {
        /// Board snapshot JSON file
        snapshot: PathBuf,
        /// Tile column
        x: u32,
        /// Tile row
        y: u32,

        /// Treat the press as a double click
        #[arg(long)]
        double: bool,

        /// Hold the control modifier
        #[arg(long)]
        ctrl: bool,

        /// Hold the alt modifier
        #[arg(long)]
        alt: bool,
    },

    /// Print the cursor hint for hovering a tile
    Hover {
        /// Board snapshot JSON file
        snapshot: PathBuf,
        /// Tile column
        x: u32,
        /// Tile row
        y: u32,
    },

    /// List the sheet regions every terrain and unit kind resolves to
    Atlas {
        /// Only list combinations without art
        #[arg(long)]
        missing: bool,
    },

    /// Open a window over an offline server serving a snapshot
    Play {
        /// Board snapshot JSON file
        snapshot: PathBuf,

        /// Sprite sheet manifest
        #[arg(long, default_value = "assets/sheets.toml")]
        manifest: PathBuf,

        /// Zoom applied to board pixels
        #[arg(long, default_value = "2.0")]
        scale: f32,

        /// Draw placeholders instead of loading sprite sheets
        #[arg(long)]
        no_sprites: bool,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = ClientConfig::load(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Commands::Render {
            snapshot,
            format,
            no_terrain,
        } => {
            let board = offline::load_board(&snapshot)?;
            let options = SceneOptions {
                show_terrain: config.scene_options().show_terrain && !no_terrain,
            };
            inspect::render(&board, options, format, &mut out)
        }
        Commands::Click {
            snapshot,
            x,
            y,
            double,
            ctrl,
            alt,
        } => {
            let board = offline::load_board(&snapshot)?;
            let action = if double {
                PointerAction::DoubleClick
            } else {
                PointerAction::Click
            };
            inspect::click(
                &board,
                Coord::new(x, y),
                action,
                Modifiers::new(ctrl, alt),
                &mut out,
            )
        }
        Commands::Hover { snapshot, x, y } => {
            let board = offline::load_board(&snapshot)?;
            inspect::hover(&board, Coord::new(x, y), &mut out)
        }
        Commands::Atlas { missing } => inspect::atlas(missing, &mut out),
        Commands::Play {
            snapshot,
            manifest,
            scale,
            no_sprites,
        } => {
            let server = OfflineServer::from_path(&snapshot)?;
            let session = Session::new(config.session_config(), server, SilentPushChannel);
            let backend = MacroquadBackend::new()
                .with_manifest_path(manifest)
                .with_scale(scale)
                .with_texture_debounce(config.texture_debounce())
                .with_sprite_loading(!no_sprites);
            play::play(
                session,
                backend,
                config.double_click_window(),
                config.scene_options(),
            )
        }
    }?;

    out.flush().context("failed to flush stdout")
}

/// Entry point for the war board command-line interface.
fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
