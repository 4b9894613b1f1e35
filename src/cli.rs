//! Command-line arguments.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use shelf_library::query::{AuthorQuery, AuthorSort, BookQuery, BookSort, Era};
use shelf_models::{AuthorPatch, BookPatch, NewAuthor, NewBook, SeedSource};
use std::path::PathBuf;

/// Offline-first book and author catalog.
#[derive(Debug, Parser)]
#[command(name = "shelf", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to `shelf.toml` in the platform
    /// configuration directory, if present).
    #[arg(long, short, global = true, env = "SHELF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read the local cache but never write to it.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// More logging (`-v` for info, `-vv` for debug). `RUST_LOG` wins.
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Refresh the catalog from the remote and show its status.
    Sync,
    /// List books.
    Books(BooksArgs),
    /// List authors.
    Authors(AuthorsArgs),
    /// Add an author.
    AddAuthor(AuthorArgs),
    /// Change some fields of an author.
    EditAuthor {
        id: u64,
        #[command(flatten)]
        fields: AuthorPatchArgs,
    },
    /// Remove an author and all of their books.
    RmAuthor { id: u64 },
    /// Add a book.
    AddBook(BookArgs),
    /// Change some fields of a book.
    EditBook {
        id: u64,
        #[command(flatten)]
        fields: BookPatchArgs,
    },
    /// Remove a book.
    RmBook { id: u64 },
    /// Replace the catalog with a bundled seed catalog.
    Reset {
        #[arg(value_enum, default_value_t = SeedArg::Static)]
        seed: SeedArg,
    },
    /// Show the active seed catalog.
    Seed,
    /// Search for book metadata, optionally adding a result to the catalog.
    Lookup(LookupArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeedArg {
    /// Small demo library.
    #[value(alias = "compact", alias = "demo")]
    Static,
    /// Full server catalog.
    #[value(alias = "full")]
    Server,
}
impl From<SeedArg> for SeedSource {
    fn from(seed: SeedArg) -> Self {
        match seed {
            SeedArg::Static => Self::Compact,
            SeedArg::Server => Self::Server,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BookSortArg {
    Recent,
    TitleAsc,
    TitleDesc,
    YearNew,
    YearOld,
}
impl From<BookSortArg> for BookSort {
    fn from(sort: BookSortArg) -> Self {
        match sort {
            BookSortArg::Recent => Self::Recent,
            BookSortArg::TitleAsc => Self::TitleAsc,
            BookSortArg::TitleDesc => Self::TitleDesc,
            BookSortArg::YearNew => Self::YearNew,
            BookSortArg::YearOld => Self::YearOld,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EraArg {
    /// Published within the last 30 years.
    Modern,
    Classic,
}
impl From<EraArg> for Era {
    fn from(era: EraArg) -> Self {
        match era {
            EraArg::Modern => Self::Modern,
            EraArg::Classic => Self::Classic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthorSortArg {
    Alphabetical,
    BooksDesc,
    BirthNew,
    BirthOld,
}
impl From<AuthorSortArg> for AuthorSort {
    fn from(sort: AuthorSortArg) -> Self {
        match sort {
            AuthorSortArg::Alphabetical => Self::Alphabetical,
            AuthorSortArg::BooksDesc => Self::BooksDesc,
            AuthorSortArg::BirthNew => Self::BirthNew,
            AuthorSortArg::BirthOld => Self::BirthOld,
        }
    }
}

#[derive(Debug, Args)]
pub struct BooksArgs {
    /// Only books whose title or author contains this text.
    #[arg(long, short, default_value = "")]
    pub search: String,
    /// Only books by this author id.
    #[arg(long)]
    pub author: Option<u64>,
    #[arg(long, value_enum)]
    pub era: Option<EraArg>,
    #[arg(long, value_enum, default_value_t = BookSortArg::Recent)]
    pub sort: BookSortArg,
}
impl From<&BooksArgs> for BookQuery {
    fn from(args: &BooksArgs) -> Self {
        Self {
            search: args.search.clone(),
            author_id: args.author,
            era: args.era.map(Era::from),
            sort: args.sort.into(),
        }
    }
}

#[derive(Debug, Args)]
pub struct AuthorsArgs {
    /// Only authors whose name or bio contains this text.
    #[arg(long, short, default_value = "")]
    pub search: String,
    #[arg(long, value_enum, default_value_t = AuthorSortArg::Alphabetical)]
    pub sort: AuthorSortArg,
}
impl From<&AuthorsArgs> for AuthorQuery {
    fn from(args: &AuthorsArgs) -> Self {
        Self { search: args.search.clone(), sort: args.sort.into() }
    }
}

#[derive(Debug, Args)]
pub struct AuthorArgs {
    pub name: String,
    #[arg(long, default_value = "")]
    pub bio: String,
    #[arg(long, default_value_t = 0)]
    pub birth_year: i32,
    #[arg(long, default_value = "")]
    pub country: String,
}
impl From<AuthorArgs> for NewAuthor {
    fn from(args: AuthorArgs) -> Self {
        Self { name: args.name, bio: args.bio, birth_year: args.birth_year, country: args.country }
    }
}

#[derive(Debug, Args)]
pub struct AuthorPatchArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub bio: Option<String>,
    #[arg(long)]
    pub birth_year: Option<i32>,
    #[arg(long)]
    pub country: Option<String>,
}
impl From<AuthorPatchArgs> for AuthorPatch {
    fn from(args: AuthorPatchArgs) -> Self {
        Self { name: args.name, bio: args.bio, birth_year: args.birth_year, country: args.country }
    }
}

#[derive(Debug, Args)]
pub struct BookArgs {
    pub title: String,
    /// Primary author id.
    #[arg(long)]
    pub author: u64,
    #[arg(long)]
    pub isbn: String,
    #[arg(long)]
    pub year: i32,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub cover_url: String,
}
impl From<BookArgs> for NewBook {
    fn from(args: BookArgs) -> Self {
        Self {
            title: args.title,
            author_id: args.author,
            isbn: args.isbn,
            published_year: args.year,
            description: args.description,
            cover_url: args.cover_url,
            ..Default::default()
        }
    }
}

#[derive(Debug, Args)]
pub struct BookPatchArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub author: Option<u64>,
    #[arg(long)]
    pub isbn: Option<String>,
    #[arg(long)]
    pub year: Option<i32>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub cover_url: Option<String>,
}
impl From<BookPatchArgs> for BookPatch {
    fn from(args: BookPatchArgs) -> Self {
        Self {
            title: args.title,
            author_id: args.author,
            isbn: args.isbn,
            published_year: args.year,
            description: args.description,
            cover_url: args.cover_url,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LookupBy {
    Isbn,
    Title,
}

#[derive(Debug, Args)]
pub struct LookupArgs {
    #[arg(value_enum)]
    pub by: LookupBy,
    pub query: String,
    /// Add the n-th result (starting at 1) to the catalog.
    #[arg(long, value_name = "N")]
    pub accept: Option<usize>,
    /// ISBN to store with the accepted result, for results without one.
    #[arg(long, requires = "accept")]
    pub isbn: Option<String>,
    /// Publication year to store with the accepted result.
    #[arg(long, requires = "accept")]
    pub year: Option<i32>,
}
