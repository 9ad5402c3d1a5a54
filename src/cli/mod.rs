//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the stopwatch.

use clap::{Parser, Subcommand};

/// lapwatch - a stopwatch that remembers its state between runs.
#[derive(Parser, Debug)]
#[command(name = "lapwatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the stopwatch, or resume it from where it was paused.
    Start,

    /// Pause the stopwatch, freezing the elapsed time.
    Pause,

    /// Stop everything: elapsed time back to zero, laps cleared.
    Reset,

    /// Record a lap at the current elapsed time (only while running).
    Lap,

    /// Show the current state, elapsed time, and lap count.
    Status,

    /// List recorded laps.
    Laps {
        /// Print plain `Lap N: time` lines instead of a table.
        #[arg(long)]
        plain: bool,
    },

    /// Live display: redraws the elapsed time until Ctrl-C.
    Watch,

    /// Show or change the color theme.
    Theme {
        /// `dark` or `light` to set a sticky preference, `system` to clear
        /// it and follow the terminal again. Omit to show the current theme.
        mode: Option<String>,
    },

    /// Show the data directory and file paths being used.
    Paths,
}
