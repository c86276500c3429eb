use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use musicrpc::{
    config,
    discord::ipc::DiscordIpc,
    error, info,
    management::{CacheManager, MetadataResolver},
    player::AppleMusicObserver,
    presence::Synchronizer,
    search::HttpSearch,
    success,
};

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
    /// Run the presence daemon
    Run(RunOptions),

    /// Inspect or reset the extras cache
    Cache(CacheOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct RunOptions {
    /// Default poll interval in seconds
    #[clap(long)]
    pub interval: Option<u64>,
}

#[derive(Parser, Debug, Clone)]
pub struct CacheOptions {
    #[command(subcommand)]
    pub command: CacheSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CacheSubcommand {
    /// Print cache location and entry count
    Info,

    /// Delete all cached extras
    Clear,
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
        Command::Run(opt) => {
            let interval = opt
                .interval
                .map(std::time::Duration::from_secs)
                .unwrap_or_else(config::poll_interval);

            let observer = AppleMusicObserver::detect().await;
            info!("Watching the {} player", observer.app_name());

            let cache = CacheManager::load(config::cache_path(), config::cache_capacity()).await;
            let resolver = MetadataResolver::new(HttpSearch::new(), cache);
            let transport = DiscordIpc::new(config::discord_client_id());

            Synchronizer::new(observer, resolver, transport, interval)
                .run()
                .await;
        }

        Command::Cache(opt) => match opt.command {
            CacheSubcommand::Info => {
                let cache =
                    CacheManager::load(config::cache_path(), config::cache_capacity()).await;
                info!("Cache file: {}", config::cache_path().display());
                info!("Entries: {}", cache.len());
            }
            CacheSubcommand::Clear => {
                let mut cache =
                    CacheManager::load(config::cache_path(), config::cache_capacity()).await;
                match cache.clear().await {
                    Ok(()) => success!("Extras cache cleared"),
                    Err(e) => error!("Failed to clear cache: {:?}", e),
                }
            }
        },

        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
