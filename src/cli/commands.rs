use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dl", about = concat!("daylist v", env!("CARGO_PKG_VERSION"), " - one list per day"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// Day to work on: YYYY-MM-DD, today, tomorrow, yesterday, +N, -N
    #[arg(short = 'd', long, global = true, allow_hyphen_values = true)]
    pub date: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the day's tasks and the global tasks visible on it
    List,
    /// List the dates that have stored tasks
    Days,
    /// Add a task
    Add(AddArgs),
    /// Change a task's fields
    Edit(EditArgs),
    /// Flip a task between open and done
    Toggle(TaskIdArgs),
    /// Delete a task
    Rm(TaskIdArgs),
    /// Search titles, descriptions and tag names by regex
    Search(SearchArgs),
    /// Tag management
    Tag(TagCmd),
    /// Show or set the color theme
    Theme(ThemeArgs),
    /// View the recovery log
    Recovery(RecoveryArgs),
}

// ---------------------------------------------------------------------------
// Task args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Longer description
    #[arg(long = "desc")]
    pub description: Option<String>,
    /// Tag name or id
    #[arg(long)]
    pub tag: Option<String>,
    /// Add to the global list instead of the day
    #[arg(long)]
    pub global: bool,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description
    #[arg(long = "desc")]
    pub description: Option<String>,
    /// Tag name or id, or "none" to clear
    #[arg(long)]
    pub tag: Option<String>,
    /// Set completion
    #[arg(long)]
    pub done: Option<bool>,
    /// The task is in the global list
    #[arg(long)]
    pub global: bool,
}

#[derive(Args)]
pub struct TaskIdArgs {
    /// Task ID
    pub id: String,
    /// The task is in the global list
    #[arg(long)]
    pub global: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Regex pattern to search for (case-insensitive)
    pub pattern: String,
}

// ---------------------------------------------------------------------------
// Tag management
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TagCmd {
    #[command(subcommand)]
    pub action: TagAction,
}

#[derive(Subcommand)]
pub enum TagAction {
    /// List all tags
    List,
    /// Create a tag
    Add(TagAddArgs),
    /// Rename or recolor a tag
    Edit(TagEditArgs),
    /// Delete a tag
    Rm(TagIdArg),
}

#[derive(Args)]
pub struct TagAddArgs {
    /// Tag name (2-24 characters)
    pub name: String,
    /// Palette color (default: random)
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(Args)]
pub struct TagEditArgs {
    /// Tag name or id
    pub id: String,
    /// New name
    #[arg(long)]
    pub name: Option<String>,
    /// New color
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(Args)]
pub struct TagIdArg {
    /// Tag name or id
    pub id: String,
}

// ---------------------------------------------------------------------------
// Theme and recovery
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ThemeArgs {
    /// light, dark or toggle (omit to show the current theme)
    pub mode: Option<String>,
}

#[derive(Args)]
pub struct RecoveryArgs {
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove entries older than 30 days
    Prune,
    /// Print the absolute path to the recovery log
    Path,
}
