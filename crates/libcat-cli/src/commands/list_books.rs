use clap::Parser;
use libcat_dal::book::BookRepository;
use libcat_types::config::BackendConfig;

use crate::commands::Executor;

#[derive(Parser, Debug)]
pub struct ListBooksCmd {
    #[command(flatten)]
    backend: BackendConfig,
    #[arg(short, long, help = "Only books with Available status")]
    pub available: bool,
    #[arg(short, long, default_value_t = 100, help = "Maximum number of books listed")]
    pub limit: usize,
}

impl Executor for ListBooksCmd {
    async fn run(self) -> anyhow::Result<()> {
        let pool = libcat_dal::new_pool(&self.backend.database_url()).await?;
        let repository = BookRepository::new(pool);
        let books = if self.available {
            let mut books = repository.list_available().await?;
            books.truncate(self.limit);
            books
        } else {
            repository
                .list(self.limit.min(libcat_dal::MAX_LIMIT))
                .await?
        };
        for book in books {
            println!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                book.id,
                book.isbn,
                book.title,
                book.author,
                book.status,
                book.borrower.unwrap_or_default()
            );
        }
        Ok(())
    }
}
