use anyhow::Context;
use clap::{Parser, Subcommand};
use rally_backend_runtime::{telemetry, BackendServices};
use rally_config::load as load_config;
use rally_database::{CreateUserRequest, EventRepository, UserRepository};
use rally_gateway::{create_router, JwtManager};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "rally-backend")]
#[command(about = "Rally event engagement backend (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Print users and upcoming events from the database
    DumpData,
    /// Seed the user directory with sample members and interests
    SeedData,
    /// Issue a bearer token for local testing
    IssueToken {
        /// User id placed in the token subject
        #[arg(long)]
        user: String,
        /// Display name carried in the token
        #[arg(long)]
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::DumpData => dump_data().await,
        Commands::SeedData => seed_data().await,
        Commands::IssueToken { user, name } => issue_token(&user, &name),
    }
}

async fn run_server() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("starting Rally backend");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let app = create_router(services.gateway_state.clone());

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(rally_backend_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    services.db_pool.close().await;
    info!("backend shut down");
    Ok(())
}

async fn dump_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    let config = load_config().context("failed to load configuration")?;
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let users = UserRepository::new(services.db_pool.clone())
        .list_all()
        .await
        .context("failed to fetch users")?;

    println!("=== USERS ===");
    if users.is_empty() {
        println!("No users found in database");
    } else {
        println!("{:<26} {:<20} {:<30} Interests", "Public ID", "Name", "Email");
        println!("{}", "-".repeat(100));
        for user in users {
            println!(
                "{:<26} {:<20} {:<30} {}",
                user.public_id,
                user.display_name,
                user.email,
                user.interests.join(", ")
            );
        }
    }

    let events = EventRepository::new(services.db_pool.clone())
        .list_upcoming(50)
        .await
        .context("failed to fetch events")?;

    println!("\n=== EVENTS ===");
    if events.is_empty() {
        println!("No events found in database");
    } else {
        println!("{:<26} {:<30} {:<12} {:<15} Tags", "Public ID", "Title", "Date", "Time");
        println!("{}", "-".repeat(100));
        for event in events {
            println!(
                "{:<26} {:<30} {:<12} {:<15} {}",
                event.public_id,
                event.title,
                event.date,
                event.time_window(),
                event
                    .tags
                    .as_deref()
                    .map(|tags| tags.join(", "))
                    .unwrap_or_else(|| "none".to_string())
            );
        }
    }

    Ok(())
}

async fn seed_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("seeding user directory with sample members");

    let config = load_config().context("failed to load configuration")?;
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let users = UserRepository::new(services.db_pool.clone());
    let samples: [(&str, &str, &str, &[&str]); 3] = [
        ("alice", "Alice", "alice@example.com", &["AI", "Rust"]),
        ("bob", "Bob", "bob@example.com", &["Rust"]),
        ("carol", "Carol", "carol@example.com", &["Music"]),
    ];

    let mut created = 0;
    for (public_id, display_name, email, interests) in samples {
        if users
            .find_by_email(email)
            .await
            .context("failed to look up user")?
            .is_some()
        {
            continue;
        }

        users
            .create(&CreateUserRequest {
                public_id: Some(public_id.to_string()),
                display_name: display_name.to_string(),
                email: email.to_string(),
                interests: interests.iter().map(|tag| tag.to_string()).collect(),
            })
            .await
            .with_context(|| format!("failed to insert user {display_name}"))?;
        created += 1;
    }

    println!("Database seeded: {created} users created");
    println!("Run 'issue-token --user alice --name Alice' to get a bearer token");

    Ok(())
}

fn issue_token(user: &str, name: &str) -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;
    let token = JwtManager::from_config(&config.auth)
        .generate_token(user, name)
        .context("failed to issue token")?;

    println!("{token}");
    Ok(())
}
