use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use nab_types::VoteKind;

#[derive(Parser)]
#[command(
    name = "nab",
    about = "notabug peer: write and index content in a local graph snapshot",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// JSON snapshot of the graph store
    #[arg(long, global = true, default_value = "nab-store.json")]
    pub store: PathBuf,

    /// TOML peer configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Display name to write as
    #[arg(long, global = true, requires = "pub_key")]
    pub alias: Option<String>,

    /// Public key to write as
    #[arg(long, global = true, requires = "alias")]
    pub pub_key: Option<String>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Submit a link or text post
    Submit(SubmitArgs),
    /// Reply to a thing
    Comment(CommentArgs),
    /// Post a chat message
    Chat(ChatArgs),
    /// Create or edit a wiki page (requires an identity)
    Page(PageArgs),
    /// Vote on a thing
    Vote(VoteArgs),
    /// Print the node at a soul
    Show(ShowArgs),
    /// List the members of a bucket
    List(ListArgs),
}

#[derive(Args)]
pub struct SubmitArgs {
    #[arg(long)]
    pub topic: String,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub body: Option<String>,
}

#[derive(Args)]
pub struct CommentArgs {
    /// Id of the thread root
    #[arg(long)]
    pub op: String,
    /// Id of the parent, when not the thread root
    #[arg(long)]
    pub reply_to: Option<String>,
    /// Defaults to the thread root's topic
    #[arg(long)]
    pub topic: Option<String>,
    #[arg(long)]
    pub body: String,
}

#[derive(Args)]
pub struct ChatArgs {
    #[arg(long)]
    pub topic: String,
    #[arg(long)]
    pub body: String,
}

#[derive(Args)]
pub struct PageArgs {
    pub name: String,
    pub body: String,
}

#[derive(Args)]
pub struct VoteArgs {
    pub id: String,
    pub direction: Direction,
    pub nonce: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Direction {
    Up,
    Down,
}

impl From<Direction> for VoteKind {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => VoteKind::Up,
            Direction::Down => VoteKind::Down,
        }
    }
}

#[derive(Args)]
pub struct ShowArgs {
    pub soul: String,
}

#[derive(Args)]
pub struct ListArgs {
    pub bucket: BucketKind,
    /// Topic name, domain, url or raw soul
    pub key: String,
    /// Restrict a topic listing to one day, as YYYY/M/D
    #[arg(long)]
    pub day: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum BucketKind {
    Topic,
    Domain,
    Url,
    Soul,
}
