//! Social CLI - Command-line interface for the social graph.
//!
//! # Usage
//!
//! ```bash
//! # Run the sample network walkthrough on an embedded engine
//! social --memory demo
//!
//! # Build a network on a running server
//! social user create alice "Alice Johnson" 28 "New York"
//! social user create bob "Bob Smith" 32 "San Francisco"
//! social friend add alice bob
//! social interest add alice hiking
//!
//! # Query it
//! social fof alice
//! social path alice bob
//! social communities --min 2
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use social_cli::{commands, demo, output, OutputFormat};
use social_core::config::{LoggingConfig, SocialConfig};
use social_core::types::DEFAULT_MIN_COMMUNITY_SIZE;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "social")]
#[command(about = "Social - Relationship queries over a graph database", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Use a throwaway embedded engine instead of the configured server
    #[arg(long, global = true)]
    memory: bool,

    /// Output format (human, json)
    #[arg(long, global = true, default_value = "human")]
    format: OutputFormatArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the sample network and run every query
    Demo,

    /// User management
    #[command(subcommand)]
    User(UserCommands),

    /// Friendship management
    #[command(subcommand)]
    Friend(FriendCommands),

    /// Interest management
    #[command(subcommand)]
    Interest(InterestCommands),

    /// Suggest friends of friends
    Fof {
        /// User ID
        user_id: String,
    },

    /// Shortest friendship path between two users
    Path {
        /// Source user ID
        from: String,
        /// Target user ID
        to: String,
    },

    /// Recommend non-friends with shared interests
    Recommend {
        /// User ID
        user_id: String,
    },

    /// Interests shared by enough users to form a community
    Communities {
        /// Minimum number of members
        #[arg(long, default_value_t = DEFAULT_MIN_COMMUNITY_SIZE)]
        min: usize,
    },

    /// Friend, interest and reach counts for a user
    Stats {
        /// User ID
        user_id: String,
    },

    /// Delete every user, interest and friendship
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create or update a user
    Create {
        /// User ID
        user_id: String,
        /// Display name
        name: String,
        /// Age in years
        age: u32,
        /// Location
        location: String,
    },

    /// Show a user and their interests
    Show {
        /// User ID
        user_id: String,
    },
}

#[derive(Subcommand)]
enum FriendCommands {
    /// Make two users friends
    Add {
        /// First user ID
        user1_id: String,
        /// Second user ID
        user2_id: String,
        /// Friendship start (RFC 3339), defaults to now
        #[arg(long)]
        since: Option<String>,
    },

    /// List a user's friends
    List {
        /// User ID
        user_id: String,
    },
}

#[derive(Subcommand)]
enum InterestCommands {
    /// Tag a user with an interest
    Add {
        /// User ID
        user_id: String,
        /// Interest name
        interest: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        output::error(format!("{:#}", e));
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = SocialConfig::load(cli.config.as_deref()).await?;

    // Initialize logging
    init_logging(&config.logging, cli.verbose);

    let format = OutputFormat::from(cli.format);
    let graph = commands::open_graph(&config, cli.memory).await?;

    let result = match cli.command {
        Commands::Demo => demo::run(&graph, format).await,

        Commands::User(user_cmd) => match user_cmd {
            UserCommands::Create {
                user_id,
                name,
                age,
                location,
            } => commands::create_user(&graph, &user_id, &name, age, &location, format).await,
            UserCommands::Show { user_id } => commands::show_user(&graph, &user_id, format).await,
        },

        Commands::Friend(friend_cmd) => match friend_cmd {
            FriendCommands::Add {
                user1_id,
                user2_id,
                since,
            } => {
                commands::add_friendship(&graph, &user1_id, &user2_id, since.as_deref(), format)
                    .await
            }
            FriendCommands::List { user_id } => {
                commands::list_friends(&graph, &user_id, format).await
            }
        },

        Commands::Interest(InterestCommands::Add { user_id, interest }) => {
            commands::add_interest(&graph, &user_id, &interest, format).await
        }

        Commands::Fof { user_id } => commands::friends_of_friends(&graph, &user_id, format).await,

        Commands::Path { from, to } => commands::shortest_path(&graph, &from, &to, format).await,

        Commands::Recommend { user_id } => commands::recommend(&graph, &user_id, format).await,

        Commands::Communities { min } => commands::communities(&graph, min, format).await,

        Commands::Stats { user_id } => commands::statistics(&graph, &user_id, format).await,

        Commands::Clear { yes } => commands::clear(&graph, yes, format).await,
    };

    graph.close();
    result
}

fn init_logging(config: &LoggingConfig, verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("social=debug,social_cli=debug,social_core=debug,social_storage=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let level = &config.level;
            EnvFilter::new(format!(
                "social={level},social_cli={level},social_core={level},social_storage={level},warn"
            ))
        })
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
