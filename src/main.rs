/// MovieArc - browse TMDB through a key-hiding proxy
use clap::{Parser, Subcommand};
use moviearc_lib::client::render::{render_grid, DetailView};
use moviearc_lib::client::{ClientError, FileGenreCache, GenreCache, MovieArcClient};
use moviearc_lib::models::{AppConfig, GenreTable, Movie};
use moviearc_lib::modules;
use std::path::Path;

#[derive(Parser)]
#[command(name = "moviearc")]
#[command(about = "Browse TMDB movies through a key-hiding proxy", long_about = None)]
struct Cli {
    /// Proxy base URL used by the browsing commands (overrides MOVIEARC_PROXY_BASE)
    #[arg(long, global = true)]
    proxy_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the proxy server
    Serve {
        /// Listening port (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
        /// Bind host (defaults from allow_lan_access)
        #[arg(long)]
        host: Option<String>,
    },
    /// Write the configuration file with defaults filled in
    InitConfig,
    #[command(flatten)]
    Browse(BrowseCommand),
}

#[derive(Subcommand)]
enum BrowseCommand {
    /// List popular movies
    Popular,
    /// Search movies by title
    Search {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Discover movies by genre id and/or release year
    Discover {
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        year: Option<String>,
    },
    /// Show details for one movie
    Show {
        /// TMDB movie id
        id: String,
    },
    /// Print the genre table
    Genres {
        /// Drop the cached table and refetch
        #[arg(long)]
        refresh: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = modules::get_data_dir()?;
    let default_filter = match cli.command {
        Commands::Serve { .. } => "moviearc_lib=info,tower_http=info",
        _ => "warn",
    };
    modules::init_logger(&data_dir, default_filter);

    let mut config = modules::load_app_config()?;
    modules::apply_proxy_base_flag(&mut config, cli.proxy_base);

    match cli.command {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.proxy.port = port;
            }
            let host = host.unwrap_or_else(|| config.proxy.get_bind_address().to_string());
            moviearc_lib::serve(&host, config.proxy).await?;
        }
        Commands::InitConfig => {
            // Re-read the file alone so environment secrets are not persisted
            let file_config = modules::load_app_config_from(&data_dir)?;
            let path = modules::save_app_config(&file_config)?;
            println!("Wrote {}", path.display());
        }
        Commands::Browse(command) => {
            if let Err(e) = browse(command, &config, &data_dir).await {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn browse(command: BrowseCommand, config: &AppConfig, data_dir: &Path) -> Result<(), ClientError> {
    let client = MovieArcClient::from_config(&config.client)?;
    let cache = FileGenreCache::in_data_dir(data_dir);

    match command {
        BrowseCommand::Popular => {
            let (movies, genres) = tokio::join!(client.fetch_popular(), client.genre_table(&cache));
            print_grid(movies?, genres);
        }
        BrowseCommand::Search { title } => {
            let title = title.join(" ");
            let (movies, genres) = tokio::join!(client.search(&title), client.genre_table(&cache));
            print_grid(movies?, genres);
        }
        BrowseCommand::Discover { genre, year } => {
            let (movies, genres) = tokio::join!(
                client.discover(genre.as_deref(), year.as_deref()),
                client.genre_table(&cache)
            );
            print_grid(movies?, genres);
        }
        BrowseCommand::Show { id } => {
            let details = client.fetch_detail(&id).await?;
            println!("{}", DetailView(&details));
        }
        BrowseCommand::Genres { refresh } => {
            if refresh {
                cache.invalidate();
            }
            let table = client.genre_table(&cache).await?;
            for (id, name) in &table {
                println!("{:>6}  {}", id, name);
            }
        }
    }
    Ok(())
}

/// A genre failure is reported but the listing still renders, with `N/A` genres
fn print_grid(movies: Vec<Movie>, genres: Result<GenreTable, ClientError>) {
    let genres = genres.unwrap_or_else(|e| {
        eprintln!("{}", e);
        GenreTable::new()
    });
    println!("{}", render_grid(&movies, &genres));
}
