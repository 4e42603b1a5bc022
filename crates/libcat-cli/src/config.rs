use clap::{Parser, Subcommand};

use crate::commands::{add_book::AddBookCmd, list_books::ListBooksCmd};

#[derive(Parser)]
#[command(
    version,
    about,
    long_about = "CLI for libcat - manages catalog data directly in the database (books cannot be created over REST API)."
)]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    AddBook(AddBookCmd),
    ListBooks(ListBooksCmd),
}

impl crate::commands::Executor for Command {
    async fn run(self) -> anyhow::Result<()> {
        match self {
            Command::AddBook(cmd) => cmd.run().await,
            Command::ListBooks(cmd) => cmd.run().await,
        }
    }
}
