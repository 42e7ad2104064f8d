//! Command-line entry point.
//!
//! flags -> credentials -> FirestoreBookStore (or JsonBookStore) -> SeedService

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::application::sync::{SeedService, SyncMode, SyncReport};
use crate::domain::catalog::CATALOG;
use crate::domain::repository::BookStore;
use crate::infra::credentials::{
    resolve_credentials, CredentialOrigin, CredentialSource, CredentialStrategy, Environment,
    ProcessEnvironment, SERVICE_ACCOUNT_FILE,
};
use crate::infra::firestore::{FirestoreBookStore, FirestoreClient, DEFAULT_COLLECTION};
use crate::infra::json_store::JsonBookStore;

/// CLI arguments for the seeder.
#[derive(Debug, Parser)]
#[command(name = "book-seeder")]
#[command(about = "Seed the book catalog into Firestore, upserting by ISBN")]
pub struct CliArgs {
    /// Perform lookups and log planned actions without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Service-account key file, tried before application default credentials.
    #[arg(long, default_value = SERVICE_ACCOUNT_FILE)]
    pub service_account: PathBuf,

    /// Target collection.
    #[arg(long, default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    /// Seed into a local JSON file instead of Firestore.
    #[arg(long)]
    pub local_store: Option<PathBuf>,
}

/// Plain line-oriented log output on stderr. `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

pub async fn run(args: CliArgs) -> anyhow::Result<SyncReport> {
    let mode = SyncMode::from_dry_run(args.dry_run);
    match &args.local_store {
        Some(path) => {
            tracing::info!("[STORE] Using local store: {}", path.display());
            seed(JsonBookStore::new(path), mode).await
        }
        None => {
            let store = connect(&args, &ProcessEnvironment)?;
            seed(store, mode).await
        }
    }
}

/// Resolves credentials and builds the Firestore store. Called once per process.
pub fn connect(args: &CliArgs, env: &impl Environment) -> anyhow::Result<FirestoreBookStore> {
    let chain = CredentialStrategy::default_chain(&args.service_account);
    let credentials =
        resolve_credentials(env, &chain).context("failed to resolve Firestore credentials")?;

    match &credentials.origin {
        CredentialOrigin::LocalKeyFile(path) => tracing::info!(
            "[AUTH] Using {} for project: {}",
            path.display(),
            credentials.project_id
        ),
        CredentialOrigin::ApplicationDefault => {
            tracing::info!("[AUTH] Using applicationDefault credentials (ADC).");
            tracing::debug!(
                project = %credentials.project_id,
                source = credentials.source.kind(),
                "resolved ambient credentials"
            );
        }
    }
    if let CredentialSource::Emulator { host } = &credentials.source {
        tracing::info!("[AUTH] FIRESTORE_EMULATOR_HOST set, writing to emulator at {host}");
    }

    let client =
        FirestoreClient::connect(credentials).context("failed to create Firestore client")?;
    Ok(FirestoreBookStore::new(client, &args.collection))
}

async fn seed<S: BookStore>(store: S, mode: SyncMode) -> anyhow::Result<SyncReport> {
    let report = SeedService::new(store).sync(CATALOG, mode).await?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = CliArgs::try_parse_from(["book-seeder"]).unwrap();
        assert!(!args.dry_run);
        assert_eq!(args.service_account, PathBuf::from("service-account.json"));
        assert_eq!(args.collection, "books");
        assert!(args.local_store.is_none());
    }

    #[test]
    fn dry_run_flag() {
        let args = CliArgs::try_parse_from(["book-seeder", "--dry-run"]).unwrap();
        assert!(args.dry_run);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(CliArgs::try_parse_from(["book-seeder", "--force"]).is_err());
    }

    #[tokio::test]
    async fn local_store_run_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");
        let args = |dry: &str| {
            let mut argv = vec!["book-seeder", "--local-store", path.to_str().unwrap()];
            if !dry.is_empty() {
                argv.push(dry);
            }
            CliArgs::try_parse_from(argv).unwrap()
        };

        let planned = run(args("--dry-run")).await.unwrap();
        assert_eq!((planned.created, planned.updated), (30, 0));
        assert!(!path.exists());

        let first = run(args("")).await.unwrap();
        assert_eq!((first.created, first.updated, first.total), (30, 0, 30));

        let second = run(args("")).await.unwrap();
        assert_eq!((second.created, second.updated, second.total), (0, 30, 30));

        let docs = JsonBookStore::new(&path).documents().await.unwrap();
        assert_eq!(docs.len(), 30);
    }
}
