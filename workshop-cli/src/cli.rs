use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

#[derive(Parser, Debug)]
#[command(name = "workshop")]
#[command(version)]
#[command(about = "Plan shop projects on a kanban board")]
#[command(long_about = "
workshop drives a file-backed kanban board from the command line. Moves go
through the same drag and drop engine the board UI uses: the card is picked
up, hovered over its target and dropped, then the new order is written back.

Example usage:
  workshop init                                  # Create ./.workshop
  workshop add \"Router table\" --column todo      # Add a project
  workshop move 01J0ROUTER --onto 01J0SAW --after # Place below another card
  workshop move 01J0ROUTER --onto done --column   # Append to a column
  workshop move-column done --onto todo          # Put \"done\" first
  workshop --format yaml list                    # Show the board
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Board directory (overrides WORKSHOP_DATA_DIR and config files)
    #[arg(long, global = true, value_name = "DIR")]
    pub board: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format for `list`
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Create a board with the default columns
    Init {
        /// Overwrite an existing board
        #[arg(long)]
        force: bool,
    },
    /// Add a project to the end of a column
    Add {
        /// Project title
        title: String,
        /// Column to add to
        #[arg(long, default_value = "todo")]
        column: String,
        /// Longer description
        #[arg(long)]
        description: Option<String>,
    },
    /// Print every column with its projects
    List,
    /// Drag a project onto another project or a column
    Move {
        /// Id of the project to move
        item: String,
        /// Id of the project or column to drop on
        #[arg(long)]
        onto: String,
        /// Treat `--onto` as a column id and append
        #[arg(long)]
        column: bool,
        /// Drop on the lower half of the target project
        #[arg(long, conflicts_with = "column")]
        after: bool,
    },
    /// Drag a column onto another column
    MoveColumn {
        /// Id of the column to move
        column: String,
        /// Id of the column to drop on
        #[arg(long)]
        onto: String,
    },
}
