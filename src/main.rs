use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tutordesk::model::Role;
use tutordesk::{AppConfig, BillingMonth, EntityKind, MemStorage, Storage};

/// Reports over a tutoring center's in-memory dataset
#[derive(Debug, Parser)]
#[command(name = "tutordesk", version)]
struct Cli {
    /// Load demo data before running the command
    #[arg(long, conflicts_with = "no_seed")]
    seed: bool,

    /// Start from an empty store
    #[arg(long)]
    no_seed: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Admin dashboard snapshot
    Stats {
        /// Billing month for monthly revenue (YYYY-MM); defaults to the current one
        #[arg(long)]
        month: Option<BillingMonth>,
    },
    /// Print every record of one kind
    Dump { kind: EntityKind },
    /// List references to records that no longer exist
    Integrity,
    /// Dashboard for one tutor, looked up by email
    TutorStats { email: String },
}

impl Cli {
    fn seed_demo_data(&self, default: bool) -> bool {
        if self.no_seed {
            false
        } else {
            self.seed || default
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env().context("failed to load configuration")?;
    init_tracing(&config.log_filter);

    let store_config = config
        .store_config()
        .seed_demo_data(cli.seed_demo_data(config.seed_demo_data));
    let store: Arc<dyn Storage> = Arc::new(
        MemStorage::open(store_config)
            .await
            .context("failed to open store")?,
    );

    let output = run(cli.command, store.as_ref()).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(command: Command, store: &dyn Storage) -> Result<Value> {
    match command {
        Command::Stats { month } => {
            let stats = match month {
                Some(month) => store.admin_dashboard_stats_for(month).await?,
                None => store.admin_dashboard_stats().await?,
            };
            Ok(serde_json::to_value(stats)?)
        }
        Command::Dump { kind } => {
            info!(%kind, "dumping collection");
            Ok(store.dump(kind).await?)
        }
        Command::Integrity => {
            let dangling = store.dangling_references().await?;
            info!(count = dangling.len(), "integrity scan finished");
            Ok(serde_json::to_value(dangling)?)
        }
        Command::TutorStats { email } => {
            let tutor = store
                .get_user_by_email(&email)
                .await?
                .filter(|user| user.role == Role::Tutor)
                .with_context(|| format!("no tutor with email '{email}'"))?;
            let stats = store.tutor_dashboard_stats(tutor.id).await?;
            Ok(serde_json::to_value(stats)?)
        }
    }
}

fn init_tracing(filter: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(filter)
                .unwrap_or_else(|_| EnvFilter::new(AppConfig::DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutordesk::StoreConfig;

    async fn seeded() -> MemStorage {
        MemStorage::open(StoreConfig::new().seed_demo_data(true))
            .await
            .unwrap()
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["tutordesk", "--no-seed", "dump", "fees"]).unwrap();
        assert!(!cli.seed_demo_data(true));
        assert!(matches!(cli.command, Command::Dump { kind: EntityKind::Fee }));

        let cli = Cli::try_parse_from(["tutordesk", "stats", "--month", "2024-11"]).unwrap();
        assert!(cli.seed_demo_data(true));
        match cli.command {
            Command::Stats { month } => assert_eq!(month.unwrap().to_string(), "2024-11"),
            other => panic!("expected stats command, got {other:?}"),
        }

        assert!(Cli::try_parse_from(["tutordesk", "stats", "--month", "2024-13"]).is_err());
        assert!(Cli::try_parse_from(["tutordesk", "--seed", "--no-seed", "integrity"]).is_err());
    }

    #[tokio::test]
    async fn test_run_tutor_stats() {
        let store = seeded().await;
        let output = run(
            Command::TutorStats {
                email: "tutor@tutordesk.local".to_string(),
            },
            &store,
        )
        .await
        .unwrap();

        assert_eq!(output["totalClasses"], 1);
        assert_eq!(output["totalStudents"], 2);
    }

    #[tokio::test]
    async fn test_run_rejects_non_tutor() {
        let store = seeded().await;
        let result = run(
            Command::TutorStats {
                email: "parent@tutordesk.local".to_string(),
            },
            &store,
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_run_dump_and_integrity() {
        let store = seeded().await;

        let users = run(Command::Dump { kind: EntityKind::User }, &store)
            .await
            .unwrap();
        assert_eq!(users.as_array().map(Vec::len), Some(4));

        let dangling = run(Command::Integrity, &store).await.unwrap();
        assert_eq!(dangling, serde_json::json!([]));
    }
}
