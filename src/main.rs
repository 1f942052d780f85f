use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use splcli::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// List your playlists
    Playlists(PlaylistsOptions),

    /// List tracks of a playlist
    Tracks(TracksOptions),

    /// Add tracks to a playlist
    Add(AddOptions),

    /// Replace the tracks of a playlist
    Replace(ReplaceOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Filter playlists by name
    #[clap(long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct TracksOptions {
    /// Playlist URI (spotify:playlist:<id>) or name fragment
    pub playlist: String,
}

#[derive(Parser, Debug, Clone)]
pub struct AddOptions {
    /// Playlist URI (spotify:playlist:<id>) or name fragment
    pub playlist: String,

    /// Track URIs to add, in order
    #[clap(required = true)]
    pub uris: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ReplaceOptions {
    /// Playlist URI (spotify:playlist:<id>) or name fragment
    pub playlist: String,

    /// Track URIs forming the new playlist content
    pub uris: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => cli::auth().await,
        Command::Playlists(opt) => cli::list_playlists(opt.search).await,
        Command::Tracks(opt) => cli::list_tracks(opt.playlist).await,
        Command::Add(opt) => cli::add_tracks(opt.playlist, opt.uris).await,
        Command::Replace(opt) => cli::replace_tracks(opt.playlist, opt.uris).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
