//! ebook-reader CLI: import books and read them from the terminal.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use ebook_reader::config::AppConfig;
use ebook_reader::ingest::{Book, BookmarkId};
use ebook_reader::library::{JsonFileRepository, Library, search_book};
use ebook_reader::paths::LazyPaths;
use ebook_reader::settings::{
    FontFamily, FontSize, LineHeight, ReadingSettings, SettingsPatch, Theme,
};

#[derive(Parser)]
#[command(name = "ebook-reader", version, about = "Terminal e-book library and reader")]
struct Cli {
    /// Directory holding library.json (overrides the config file).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Path to config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert EPUB, PDF, or TXT files and add them to the library.
    Import {
        /// Files to import, processed in order.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List books in the library.
    List {
        /// Only books whose title or author contains this text.
        #[arg(long)]
        filter: Option<String>,
    },

    /// Show a book's metadata.
    Show {
        /// Book ID, ID prefix, or title.
        book: String,
    },

    /// Print a book's table of contents.
    Toc {
        /// Book ID, ID prefix, or title.
        book: String,
    },

    /// Print a page and remember it as the reading position.
    Read {
        /// Book ID, ID prefix, or title.
        book: String,

        /// Page to open; defaults to the last read page.
        #[arg(long)]
        page: Option<usize>,
    },

    /// Search the text of a book.
    Search {
        /// Book ID, ID prefix, or title.
        book: String,
        /// Text to look for (case-insensitive).
        term: String,
    },

    /// Manage bookmarks.
    Bookmark {
        #[command(subcommand)]
        action: BookmarkAction,
    },

    /// Remove a book from the library.
    Remove {
        /// Book ID, ID prefix, or title.
        book: String,
    },

    /// Show or change reading settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum BookmarkAction {
    /// Bookmark a page.
    Add {
        /// Book ID, ID prefix, or title.
        book: String,
        /// Page number (1-based).
        page: usize,
        /// Character offset within the page.
        #[arg(long, default_value = "0")]
        position: usize,
        /// Free-form note.
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete a bookmark.
    Remove {
        /// Bookmark ID.
        bookmark: String,
    },
    /// List a book's bookmarks.
    List {
        /// Book ID, ID prefix, or title.
        book: String,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current settings.
    Show,
    /// Change one or more settings.
    Set {
        #[arg(long, value_enum)]
        theme: Option<Theme>,
        #[arg(long, value_enum)]
        font_size: Option<FontSize>,
        #[arg(long, value_enum)]
        font_family: Option<FontFamily>,
        #[arg(long, value_enum)]
        line_height: Option<LineHeight>,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut paths = LazyPaths::new();
    let config_file = paths.config_file_or(cli.config.clone())?;
    let settings_file = config_file.with_file_name("settings.toml");
    let config = AppConfig::load(&config_file)?;
    let library_dir =
        paths.data_dir_or(cli.data_dir.clone().or_else(|| config.library_dir.clone()))?;

    match cli.command {
        Commands::Import { files } => {
            let mut library = open_library(&library_dir)?;
            let report = library.import(files.as_slice(), &config.ingest)?;
            for book in &report.books {
                println!(
                    "Added \"{}\" by {} / {} ({} pages, {})",
                    book.title, book.author, book.id, book.total_pages, book.file_size
                );
            }
            for failure in &report.failures {
                eprintln!("Failed {}: {}", failure.file_name, failure.error);
            }
            println!(
                "Imported {} of {} files.",
                report.books.len(),
                report.books.len() + report.failures.len()
            );
        }

        Commands::List { filter } => {
            let library = open_library(&library_dir)?;
            let books = library.filter(filter.as_deref().unwrap_or(""));
            if books.is_empty() {
                println!("No books.");
            } else {
                println!("Books ({}):", books.len());
                for book in books {
                    println!(
                        "  {} / \"{}\" by {} [{}] {}/{}",
                        book.id,
                        book.title,
                        book.author,
                        book.format,
                        book.last_read_position,
                        book.total_pages
                    );
                }
            }
        }

        Commands::Show { book } => {
            let library = open_library(&library_dir)?;
            let book = library.resolve(&book)?;
            print_book(book);
        }

        Commands::Toc { book } => {
            let library = open_library(&library_dir)?;
            let book = library.resolve(&book)?;
            println!("{}", book.title);
            for (page, title) in book.table_of_contents() {
                println!("  {page:>4}  {title}");
            }
        }

        Commands::Read { book, page } => {
            let mut library = open_library(&library_dir)?;
            let book = library.resolve(&book)?.clone();
            let page = page.unwrap_or(book.last_read_position.max(1));
            library.set_progress(book.id, page)?;
            if let Some(chapter) = book.chapter(page) {
                println!("== {} ==\n", chapter.chapter_title);
                println!("{}\n", chapter.content);
                println!(
                    "-- {} · page {} of {} ({}%) --",
                    book.title,
                    page,
                    book.total_pages,
                    book.progress_percent(page)
                );
            }
        }

        Commands::Search { book, term } => {
            let library = open_library(&library_dir)?;
            let book = library.resolve(&book)?;
            let hits = search_book(book, &term);
            if hits.is_empty() {
                println!("No matches for \"{term}\".");
            }
            for hit in hits {
                if hit.snippet.is_empty() {
                    println!("  p.{} {}", hit.page_number, hit.chapter_title);
                } else {
                    println!(
                        "  p.{} {}: ...{}...",
                        hit.page_number,
                        hit.chapter_title,
                        hit.snippet.replace('\n', " ")
                    );
                }
            }
        }

        Commands::Bookmark { action } => {
            let mut library = open_library(&library_dir)?;
            match action {
                BookmarkAction::Add {
                    book,
                    page,
                    position,
                    note,
                } => {
                    let id = library.resolve(&book)?.id;
                    let bookmark = library.add_bookmark(id, page, position, note)?;
                    println!("Bookmarked page {page}: {bookmark}");
                }
                BookmarkAction::Remove { bookmark } => {
                    let id: BookmarkId = bookmark.parse().into_diagnostic()?;
                    let removed = library.remove_bookmark(id)?;
                    println!("Removed bookmark on page {}", removed.page_number);
                }
                BookmarkAction::List { book } => {
                    let id = library.resolve(&book)?.id;
                    let marks = library.bookmarks(id)?;
                    if marks.is_empty() {
                        println!("No bookmarks.");
                    }
                    for mark in marks {
                        println!(
                            "  {} p.{} @{} {}",
                            mark.id,
                            mark.page_number,
                            mark.position,
                            mark.note.as_deref().unwrap_or("")
                        );
                    }
                }
            }
        }

        Commands::Remove { book } => {
            let mut library = open_library(&library_dir)?;
            let id = library.resolve(&book)?.id;
            let removed = library.remove(id)?;
            println!("Removed \"{}\"", removed.title);
        }

        Commands::Settings { action } => run_settings(action, &settings_file)?,
    }

    Ok(())
}

fn open_library(dir: &Path) -> Result<Library<JsonFileRepository>> {
    Ok(Library::open(JsonFileRepository::new(dir))?)
}

fn run_settings(action: SettingsAction, settings_file: &Path) -> Result<()> {
    let mut settings = ReadingSettings::load(settings_file)?;
    if let SettingsAction::Set {
        theme,
        font_size,
        font_family,
        line_height,
    } = action
    {
        let patch = SettingsPatch {
            theme,
            font_size,
            font_family,
            line_height,
        };
        if patch.is_empty() {
            miette::bail!("nothing to change; pass at least one setting flag");
        }
        settings.apply(patch);
        settings.save(settings_file)?;
        println!("Saved {}", settings_file.display());
    }
    println!("theme:       {}", settings.theme);
    println!("font size:   {}", settings.font_size);
    println!("font family: {}", settings.font_family);
    println!("line height: {}", settings.line_height);
    Ok(())
}

fn print_book(book: &Book) {
    println!("Book: \"{}\"", book.title);
    println!("  id:        {}", book.id);
    println!("  author:    {}", book.author);
    println!("  format:    {}", book.format);
    println!("  size:      {}", book.file_size);
    println!("  pages:     {}", book.total_pages);
    println!(
        "  progress:  page {} ({}%)",
        book.last_read_position,
        book.progress_percent(book.last_read_position)
    );
    println!("  bookmarks: {}", book.bookmarks.len());
    println!("  added:     {}", book.date_added.to_rfc3339());
}
