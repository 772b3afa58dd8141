use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "lookat", about = "LookAt - posts feed from the command line", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List posts, newest first
    List(ListArgs),
    /// Publish a new post
    Post(PostArgs),
    /// Delete one of your posts
    Delete(TargetArgs),
    /// Like a post
    Like(TargetArgs),
    /// Remove your like from a post
    Unlike(TargetArgs),
    /// Run a short scripted session against the configured store
    Demo,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only posts you wrote
    #[arg(long, conflicts_with = "liked")]
    pub mine: bool,
    /// Only posts you liked
    #[arg(long)]
    pub liked: bool,
    /// Case-insensitive filter over title, content and author
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct PostArgs {
    pub title: String,
    pub content: String,
    /// Image file to attach
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Args)]
pub struct TargetArgs {
    /// Post id
    pub id: Uuid,
}
