//! Runtime configuration from flags and the environment.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;

use marcfix_core::{ApiUrl, BackupStore, Fixer, ValidatorChain};
use marcfix_file::{FileBackupRepository, FileRecordClient};
use marcfix_http::{Credentials, HttpRecordClient};

use crate::cli::GlobalArgs;
use crate::client::CliClient;

pub type CliFixer = Fixer<CliClient, ValidatorChain>;
pub type CliBackupStore = BackupStore<CliClient, FileBackupRepository>;

/// Connect to the configured record API for reading and rollback.
///
/// Credentials are optional here and passed along when set.
pub fn connect(globals: &GlobalArgs) -> Result<Arc<CliClient>> {
    open(globals, credentials(globals))
}

/// Connect to the configured record API for commands that validate or fix.
///
/// Missing credentials are a startup error, raised before any record is
/// touched.
pub fn connect_authenticated(globals: &GlobalArgs) -> Result<Arc<CliClient>> {
    let Some(credentials) = credentials(globals) else {
        bail!("Missing API credentials. Set MARCFIX_API_USERNAME and MARCFIX_API_PASSWORD.");
    };
    open(globals, Some(credentials))
}

fn credentials(globals: &GlobalArgs) -> Option<Credentials> {
    match (&globals.username, &globals.password) {
        (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
            Some(Credentials::new(username, password))
        }
        _ => None,
    }
}

fn open(globals: &GlobalArgs, credentials: Option<Credentials>) -> Result<Arc<CliClient>> {
    let api = globals
        .api
        .as_deref()
        .context("No record API configured. Set MARCFIX_API or pass --api.")?;
    let api = ApiUrl::new(api).context("Invalid MARCFIX_API")?;

    let client = if api.is_local() {
        tracing::debug!(api = %api, "using local record API");
        CliClient::File(FileRecordClient::from_url(&api)?)
    } else {
        CliClient::Http(HttpRecordClient::new(api, credentials)?)
    };

    Ok(Arc::new(client))
}

/// A fixer over the configured API and the built-in rule chain.
pub fn fixer(client: Arc<CliClient>) -> CliFixer {
    Fixer::new(client, Arc::new(ValidatorChain::with_default_rules(true)))
}

/// The backup store directory, created if missing.
pub fn backup_dir(globals: &GlobalArgs) -> Result<PathBuf> {
    let dir = match &globals.backup_dir {
        Some(dir) => dir.clone(),
        None => ProjectDirs::from("", "", "marcfix")
            .context("Could not determine data directory")?
            .data_dir()
            .join("backups"),
    };

    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create backup directory {}", dir.display()))?;
    Ok(dir)
}

/// The backup repository alone, for commands that never contact the API.
pub fn backup_repository(globals: &GlobalArgs) -> Result<FileBackupRepository> {
    Ok(FileBackupRepository::new(backup_dir(globals)?))
}

/// The backup store over the configured API.
pub fn backup_store(globals: &GlobalArgs, client: Arc<CliClient>) -> Result<CliBackupStore> {
    Ok(BackupStore::new(client, Arc::new(backup_repository(globals)?)))
}
