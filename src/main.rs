//! Command-line front end for the Go rules engine.
//!
//! ## Usage
//!
//! - `goban-engine` - Show a demo
//! - `goban-engine gtp` - Start the GTP server for GUI integration
//! - `goban-engine demo` - Run the scripted demo

use anyhow::Result;
use clap::{Parser, Subcommand};

use goban_engine::game::{Game, GameOptions, RepeatPolicy};
use goban_engine::gtp::GtpEngine;
use goban_engine::position::Color;

/// Goban-engine: a Go rules kernel with a GTP front end
#[derive(Parser)]
#[command(name = "goban-engine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Board edge length
    #[arg(long, default_value_t = 19)]
    size: usize,

    /// Enforce positional superko instead of classic ko
    #[arg(long)]
    superko: bool,

    /// Allow self-capture moves
    #[arg(long)]
    allow_suicide: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp,
    /// Run a short scripted demo of the rules engine
    Demo,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let options = GameOptions {
        size: cli.size,
        repeat: if cli.superko {
            RepeatPolicy::Superko
        } else {
            RepeatPolicy::Ko
        },
        allow_suicide: cli.allow_suicide,
        ..GameOptions::default()
    };

    match cli.command {
        Some(Commands::Gtp) => {
            let mut engine = GtpEngine::new(options);
            engine.run()?;
        }
        Some(Commands::Demo) | None => run_demo()?,
    }
    Ok(())
}

fn run_demo() -> Result<()> {
    println!("Goban-engine: Go rules kernel\n");

    let mut game = Game::with_options(GameOptions {
        size: 9,
        ..GameOptions::default()
    });

    // Black surrounds the white stone at (4,4); the last move captures it.
    game.play(4, 3, Some(Color::Black))?;
    game.play(4, 4, Some(Color::White))?;
    game.play(3, 4, Some(Color::Black))?;
    game.play(7, 7, Some(Color::White))?;
    game.play(5, 4, Some(Color::Black))?;
    game.play(7, 6, Some(Color::White))?;
    let captured = game.play(4, 5, Some(Color::Black))?;

    println!("{}", game.current_position());
    println!("Captured stones: {captured:?}");
    println!(
        "Captures - black: {}, white: {}",
        game.capture_count(Color::Black),
        game.capture_count(Color::White)
    );
    println!("Positions in history: {}", game.history_len());

    Ok(())
}
