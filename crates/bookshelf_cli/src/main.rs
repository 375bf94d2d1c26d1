//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open the store described by an optional JSON config file.
//! - Print a deterministic summary of its contents.
//!
//! Usage: `bookshelf_cli [config.json]` (defaults to an in-memory store).
//! Set `BOOKSHELF_LOG_DIR` to an absolute path to enable file logging.

use bookshelf_core::{
    init_logging, open_book_repository, LogLevel, ReadOnlyBookService, StoreConfig,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run(std::env::args().nth(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("bookshelf: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: Option<String>) -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var("BOOKSHELF_LOG_DIR") {
        init_logging(LogLevel::build_default().as_str(), &log_dir)?;
    }
    println!("bookshelf_core version={}", bookshelf_core::core_version());

    let config = match config_path {
        Some(path) => StoreConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => StoreConfig::memory(),
    };
    let service = ReadOnlyBookService::new(open_book_repository(&config)?);

    let books = service.list_all()?;
    println!("backend={} books={}", config.backend.as_str(), books.len());
    for book in &books {
        println!("id={}", book.id());
    }
    Ok(())
}
