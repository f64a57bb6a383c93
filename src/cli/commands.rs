use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vl", about = concat!("vertiline v", env!("CARGO_PKG_VERSION"), " - history, one line at a time"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the timeline (default)
    Show(ShowArgs),
    /// Show one event in full
    Get(GetArgs),
    /// Create an event
    Add(AddArgs),
    /// Edit an event; changing its parent moves it with all sub-events
    Edit(EditArgs),
    /// Delete an event and all of its sub-events
    Rm(RmArgs),
    /// Expand or collapse one event
    Toggle(ToggleArgs),
    /// Expand every event that has sub-events
    ExpandAll,
    /// Collapse every event
    CollapseAll,
    /// List events that can be chosen as a parent
    Parents(ParentsArgs),
    /// Search titles, tags and content by regex
    Search(SearchArgs),
    /// Write a JSON backup of the timeline
    Export(ExportArgs),
    /// Replace the timeline with a JSON backup
    Import(ImportArgs),
    /// Remove every event
    Clear(ClearArgs),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args, Default)]
pub struct ShowArgs {
    /// Show every event regardless of expansion
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct GetArgs {
    /// Event ID
    pub id: String,
}

#[derive(Args)]
pub struct ParentsArgs {
    /// Regex filter on titles
    pub pattern: Option<String>,
    /// Leave out this event and its sub-events (the one being edited)
    #[arg(long)]
    pub exclude: Option<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Regex pattern to search for
    pub pattern: String,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

/// Date given either whole (`--date -000221-01-01`) or by component
#[derive(Args, Default)]
pub struct DateArgs {
    /// Full date, `[-]YYYY-MM-DD`; a leading `-` means BC
    #[arg(long, allow_hyphen_values = true)]
    pub date: Option<String>,
    #[arg(long)]
    pub year: Option<i64>,
    #[arg(long)]
    pub month: Option<i64>,
    #[arg(long)]
    pub day: Option<i64>,
    /// Year is BC
    #[arg(long, conflicts_with = "ad")]
    pub bc: bool,
    /// Year is AD
    #[arg(long)]
    pub ad: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Event title
    pub title: String,
    #[command(flatten)]
    pub date: DateArgs,
    /// Attach under this event
    #[arg(long, conflicts_with = "after")]
    pub parent: Option<String>,
    /// Place next to this event, dated between it and its next sibling
    #[arg(long)]
    pub after: Option<String>,
    /// Markdown body
    #[arg(long)]
    pub content: Option<String>,
    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,
    #[arg(long)]
    pub link: Option<String>,
    /// Attach a picture (repeatable)
    #[arg(long = "image")]
    pub images: Vec<PathBuf>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Event ID
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[command(flatten)]
    pub date: DateArgs,
    /// Move under this event
    #[arg(long, conflicts_with = "root")]
    pub parent: Option<String>,
    /// Move to the top level
    #[arg(long)]
    pub root: bool,
    #[arg(long)]
    pub content: Option<String>,
    /// Comma-separated tags (replaces existing)
    #[arg(long)]
    pub tags: Option<String>,
    /// Link URL; pass an empty string to remove
    #[arg(long)]
    pub link: Option<String>,
    /// Attach a picture (repeatable)
    #[arg(long = "image")]
    pub images: Vec<PathBuf>,
    /// Remove the picture at this position (repeatable, 0-based)
    #[arg(long = "remove-image")]
    pub remove_images: Vec<usize>,
}

#[derive(Args)]
pub struct RmArgs {
    /// Event ID
    pub id: String,
    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ToggleArgs {
    /// Event ID
    pub id: String,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Directory to write into (default: config `export.dir`, else current directory)
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Backup file to load
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}
