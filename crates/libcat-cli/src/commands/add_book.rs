use anyhow::Context as _;
use clap::Parser;
use garde::Validate as _;
use libcat_dal::book::{BookRepository, CreateBook};
use libcat_types::config::BackendConfig;
use tracing::info;

use crate::commands::Executor;

#[derive(Parser, Debug)]
pub struct AddBookCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(short, long, help = "Book title")]
    pub title: String,
    #[arg(short, long, help = "Book author")]
    pub author: String,
    #[arg(short, long, help = "ISBN, must be unique in catalog")]
    pub isbn: String,
}

impl AddBookCmd {
    fn payload(self) -> anyhow::Result<CreateBook> {
        let payload = CreateBook {
            title: self.title,
            author: self.author,
            isbn: self.isbn,
        };
        payload.validate()?;
        Ok(payload)
    }
}

impl Executor for AddBookCmd {
    async fn run(self) -> anyhow::Result<()> {
        let db_url = self.backend.database_url();
        let pool = libcat_dal::new_pool(&db_url).await?;
        let repository = BookRepository::new(pool);
        let payload = self.payload()?;
        let isbn = payload.isbn.clone();
        let book = repository.create(payload).await.map_err(|e| {
            if e.is_unique_violation() {
                anyhow::anyhow!("Book with ISBN {isbn} already exists")
            } else {
                e.into()
            }
        })?;
        info!("Added book {} ({})", book.id, book.isbn);
        println!(
            "{}",
            serde_json::to_string_pretty(&book).context("Cannot serialize book")?
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AddBookCmd {
        let mut full = vec!["add-book", "--data-dir", "/tmp/libcat-cli-test"];
        full.extend_from_slice(args);
        AddBookCmd::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_payload() {
        let cmd = parse(&["--title", "R.U.R.", "--author", "Karel Capek", "--isbn", "123"]);
        let payload = cmd.payload().unwrap();
        assert_eq!(payload.title, "R.U.R.");
        assert_eq!(payload.isbn, "123");
    }

    #[test]
    fn test_empty_isbn_rejected() {
        let cmd = parse(&["--title", "R.U.R.", "--author", "Karel Capek", "--isbn", ""]);
        assert!(cmd.payload().is_err());
    }

    #[tokio::test]
    async fn test_add_book_to_memory_db() {
        let cmd = parse(&[
            "--database-url",
            "sqlite::memory:",
            "-t",
            "Krakatit",
            "-a",
            "Karel Capek",
            "-i",
            "456",
        ]);
        cmd.run().await.unwrap();
    }
}
