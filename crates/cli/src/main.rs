use clap::{Parser, Subcommand};
use coursebot::matcher::{Intent, IntentMatcher};

#[derive(Parser)]
#[command(name = "coursebot")]
#[command(about = "Course catalog bot for LINE", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Write a default config file (skipped when one already exists).
    Init {
        /// Config file path (default: COURSEBOT_CONFIG_PATH or ~/.coursebot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Run the webhook server (POST /webhook, GET /test-courses, GET /).
    Serve {
        /// Config file path (default: COURSEBOT_CONFIG_PATH or ~/.coursebot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP port (default from PORT, config, or 3000)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Print the active course catalog as JSON.
    Catalog {
        /// Config file path (default: COURSEBOT_CONFIG_PATH or ~/.coursebot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Show how the bot would answer a message, without sending anything.
    Match {
        /// Config file path (default: COURSEBOT_CONFIG_PATH or ~/.coursebot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// Message text as a user would type it.
        text: String,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Version) => {
            println!("coursebot {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(Commands::Init { config }) => run_init(config),
        Some(Commands::Serve { config, port }) => run_serve(config, port).await,
        Some(Commands::Catalog { config }) => run_catalog(config).await,
        Some(Commands::Match { config, text }) => run_match(config, text).await,
        None => {
            println!("Run with --help for usage");
            Ok(())
        }
    };
    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run_init(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(coursebot::config::default_config_path);
    let path = coursebot::init::init_config_file(&path)?;
    println!("configuration at {}", path.display());
    Ok(())
}

async fn run_serve(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let (mut config, _) = coursebot::config::load_config(config_path)?;
    if let Some(p) = port {
        config.server.port = p;
    }
    log::info!("starting server on {}:{}", config.server.bind, config.server.port);
    coursebot::gateway::run_gateway(config).await
}

async fn load_catalog(
    config_path: Option<std::path::PathBuf>,
) -> anyhow::Result<(coursebot::config::Config, Vec<coursebot::catalog::CatalogItem>)> {
    let (config, _) = coursebot::config::load_config(config_path)?;
    let store = coursebot::catalog::store_from_config(&config)?;
    let items = coursebot::catalog::fetch_active_catalog(store.as_ref()).await;
    Ok((config, items))
}

async fn run_catalog(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let (_, items) = load_catalog(config_path).await?;
    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}

async fn run_match(config_path: Option<std::path::PathBuf>, text: String) -> anyhow::Result<()> {
    let (config, items) = load_catalog(config_path).await?;
    let matcher = IntentMatcher::new(config.features);
    match matcher.classify(&text.to_lowercase(), &items) {
        Intent::ShowItems(found) => {
            println!("show {} course(s):", found.len());
            for item in found {
                println!("  {}  {}", item.id, item.title);
            }
        }
        Intent::Prompt(reply) => println!("prompt: {}", reply),
        Intent::NotFoundWithQuickReply => println!("not found (quick reply)"),
        Intent::NotFoundPlain => println!("not found"),
    }
    Ok(())
}
