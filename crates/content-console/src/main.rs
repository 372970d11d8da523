//! Content Console - CLI entry point
//!
//! Thin terminal front-end over the `content_console` library: prints mapped
//! fields and rendered grids, manipulates persisted layouts, and hosts the
//! interactive editor.

mod commands;

use clap::{Args, Parser, Subcommand};
use content_console::config::{Config, ConfigLoader};
use content_console::{logging, FieldSize};
use std::path::PathBuf;
use std::process::ExitCode;

/// Schema-driven form and layout console
#[derive(Parser)]
#[command(name = "ccon")]
#[command(version, about = "Schema-driven form and layout console")]
struct Cli {
    /// Configuration file (defaults to $XDG_CONFIG_HOME/content-console/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the ccon CLI
#[derive(Subcommand)]
enum Commands {
    /// Print the field descriptors mapped from a schema file as JSON
    Fields {
        /// Schema description (JSON object of field name to raw descriptor)
        schema: PathBuf,
    },

    /// Render a model's form grid as text
    Render {
        /// Schema description file
        schema: PathBuf,
        /// Model key the layout is stored under
        #[arg(long)]
        model: String,
        /// Record values to show (JSON object)
        #[arg(long)]
        record: Option<PathBuf>,
        /// Output width in columns
        #[arg(long, default_value_t = 80)]
        width: u16,
        /// Show structure controls (drag handles, size badges)
        #[arg(long)]
        config_mode: bool,
    },

    /// Inspect or change a model's persisted layout
    Layout {
        #[command(subcommand)]
        action: LayoutAction,
    },

    /// Open the interactive editor
    Edit {
        /// Schema description file
        schema: PathBuf,
        /// Model key the layout is stored under
        #[arg(long)]
        model: String,
        /// Record values to edit (JSON object); `w` saves back to it
        #[arg(long)]
        record: Option<PathBuf>,
    },

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Model whose layout a `layout` action works on.
#[derive(Args)]
struct LayoutTarget {
    /// Model key the layout is stored under
    #[arg(long)]
    model: String,
    /// Schema description file
    schema: PathBuf,
}

/// Actions for the `layout` subcommand.
#[derive(Subcommand)]
enum LayoutAction {
    /// Print the reconciled layout
    Show {
        #[command(flatten)]
        target: LayoutTarget,
    },
    /// Regenerate the default layout
    Reset {
        #[command(flatten)]
        target: LayoutTarget,
    },
    /// Change one field's size
    Resize {
        /// Field key
        id: String,
        /// half or full
        size: FieldSize,
        #[command(flatten)]
        target: LayoutTarget,
    },
    /// Move the entry at one position to another (positions start at 0)
    Move {
        /// Current position
        from: usize,
        /// Target position
        to: usize,
        #[command(flatten)]
        target: LayoutTarget,
    },
}

impl LayoutAction {
    fn target(&self) -> &LayoutTarget {
        match self {
            LayoutAction::Show { target }
            | LayoutAction::Reset { target }
            | LayoutAction::Resize { target, .. }
            | LayoutAction::Move { target, .. } => target,
        }
    }
}

/// Actions for the `config` subcommand.
#[derive(Subcommand)]
enum ConfigAction {
    /// Create default configuration file
    Init {
        /// Overwrite existing configuration (creates backup)
        #[arg(long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
    /// Validate configuration file
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Commands::Config { action } = cli.command {
        let _ = logging::init(&Config::default().logging, false);
        return commands::run_config_command(action, cli.config.as_deref());
    }

    let config = match ConfigLoader::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let interactive = matches!(cli.command, Commands::Edit { .. });
    if let Err(e) = logging::init(&config.logging, interactive) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    rt.block_on(async move {
        match cli.command {
            Commands::Fields { schema } => commands::run_fields_command(&schema).await,
            Commands::Render {
                schema,
                model,
                record,
                width,
                config_mode,
            } => {
                commands::run_render_command(
                    &config,
                    &schema,
                    &model,
                    record.as_deref(),
                    width,
                    config_mode,
                )
                .await
            }
            Commands::Layout { action } => commands::run_layout_command(&config, action).await,
            Commands::Edit {
                schema,
                model,
                record,
            } => commands::run_edit_command(&config, &schema, &model, record.as_deref()).await,
            Commands::Config { .. } => ExitCode::SUCCESS,
        }
    })
}
