use clap::{Parser, Subcommand};

mod args;
mod parsers;


pub use args::{ArticlesArgs, FetchArgs, MergeArgs, WordlistArgs};

#[derive(Debug, Parser)]
#[command(name = "cytoword")]
#[command(about = "Build and reconcile the cytokine wordle word lists", version)]
pub struct Cli {
    /// Only log warnings and errors.
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
    /// Log per-batch query details.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge extra symbols into an existing valid-guesses array file.
    Merge(MergeArgs),
    /// Look up an English Wikipedia article for every word in a word list.
    Articles(ArticlesArgs),
    /// Build the solution and valid-guess lists from ranked Wikidata symbols.
    Wordlist(WordlistArgs),
}
