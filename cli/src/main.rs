use anyhow::Result;
use clap::{Parser, Subcommand};
use winkit_core::{Position, Size, WindowHandle};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "winkit", version)]
#[command(about = "Inspect, move and embed native windows")]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the windows of a process
    List {
        #[arg(long)]
        pid: u32,
        /// Include hidden windows
        #[arg(long)]
        all: bool,
        #[arg(long)]
        json: bool,
    },
    /// Show one window
    Info { handle: WindowHandle },
    /// Move a window, keeping its size
    Move {
        handle: WindowHandle,
        /// "x,y"
        #[arg(allow_hyphen_values = true)]
        position: Position,
    },
    /// Resize a window, keeping its position
    Resize {
        handle: WindowHandle,
        /// "WxH"
        size: Size,
    },
    /// Set one field (x, y, width, height, position, size, enabled, visible)
    Set {
        handle: WindowHandle,
        field: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Enable or disable input ("on" / "off")
    Enable { handle: WindowHandle, state: String },
    Show { handle: WindowHandle },
    Hide { handle: WindowHandle },
    /// Embed CHILD into PARENT
    Embed { parent: WindowHandle, child: WindowHandle },
    /// Make a window top-level again
    Detach { handle: WindowHandle },
    /// Saved layouts
    #[command(subcommand)]
    Layout(LayoutCommand),
}

#[derive(Subcommand, Debug)]
enum LayoutCommand {
    /// Apply a saved layout (by name) or a layout file (by path)
    Apply {
        layout: String,
        #[arg(long)]
        json: bool,
    },
    /// List saved layouts
    List,
    /// Print a saved layout
    Show { name: String },
    /// Copy a layout file into the layouts directory
    Import { path: std::path::PathBuf },
    /// Delete a saved layout
    Delete { name: String },
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "winkit=debug,winkit_platform=debug,winkit_core=debug"
    } else {
        "winkit=info,winkit_platform=info,winkit_core=info"
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    commands::run(cli.command)
}
