use clap::Parser;
use recsync::cli::commands::{Cli, Commands};
use recsync::domain::values::resource_kind::ResourceKind;
use recsync::infrastructure::config::RecSyncConfig;
use recsync::RecSync;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let rs = match RecSyncConfig::load_with_dotenv().and_then(RecSync::new) {
        Ok(rs) => rs,
        Err(e) => {
            eprintln!("Error initializing recsync: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(&rs, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_env("RECSYNC_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn list_kind(archived: bool) -> ResourceKind {
    if archived {
        ResourceKind::Archived
    } else {
        ResourceKind::Active
    }
}

async fn run_command(rs: &RecSync, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Login { email, password } => {
            let status = rs.login(&email, &password).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Commands::Register {
            username,
            email,
            password,
        } => {
            rs.register(&username, &email, &password).await?;
            println!("Registered {username}");
        }
        Commands::Logout => {
            rs.logout()?;
            println!("Logged out");
        }
        Commands::Status => {
            println!("{}", serde_json::to_string_pretty(&rs.auth_status())?);
        }
        Commands::List {
            archived,
            search,
            tags,
            pages,
        } => {
            let query = rs.query(list_kind(archived), &search, tags).await?;
            while query.result().pages.len() < pages && query.fetch_next_page().await? {}

            let result = query.result();
            if result.is_empty() {
                eprintln!("{}", list_kind(archived).empty_label());
            }
            let records: Vec<_> = result.records().collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "showing": result.loaded_count(),
                    "total": result.total_items(),
                    "has_more": result.has_more(),
                    "records": records,
                }))?
            );
        }
        Commands::Tags { archived } => {
            let query = rs.query(list_kind(archived), "", vec![]).await?;
            let tags = query.result().available_tags().cloned().unwrap_or_default();
            println!("{}", serde_json::to_string_pretty(&tags)?);
        }
        Commands::Archive { id } => {
            let outcome = rs.archive(&id).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::Unarchive { id } => {
            let outcome = rs.unarchive(&id).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }
    Ok(())
}
