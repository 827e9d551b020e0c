//! Wiring from command-line options to an API client.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::debug;

use abacus_core::ApiUrl;
use abacus_file::FileCredentialStore;
use abacus_http::{ApiClient, AuthFacade, CalculatorApi, HttpClient, RefreshMode};

use crate::cli::Cli;
use crate::host::CliHost;

/// Everything a command needs.
pub struct App {
    client: ApiClient,
    host: Arc<CliHost>,
    store_path: PathBuf,
}

impl App {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let base = match &cli.api_url {
            Some(url) => ApiUrl::new(url).context("Invalid API URL")?,
            None => ApiUrl::default(),
        };

        let mut builder = HttpClient::builder(base);
        if let Some(secs) = cli.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to create HTTP client")?;

        let store_path = match &cli.store {
            Some(path) => path.clone(),
            None => default_store_path()?,
        };
        debug!(path = %store_path.display(), api = %http.base(), "Using credential store");

        let mode = if cli.single_flight {
            RefreshMode::SingleFlight
        } else {
            RefreshMode::PerCall
        };

        let host = Arc::new(CliHost::new());
        let store = Arc::new(FileCredentialStore::new(&store_path));
        let client = ApiClient::with_refresh_mode(http, store, host.clone(), mode);

        Ok(Self {
            client,
            host,
            store_path,
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn auth(&self) -> AuthFacade {
        AuthFacade::new(self.client.clone())
    }

    pub fn calculator(&self) -> CalculatorApi {
        CalculatorApi::new(self.client.clone())
    }

    pub fn host(&self) -> &CliHost {
        &self.host
    }

    pub fn store_path(&self) -> &PathBuf {
        &self.store_path
    }

    /// Fail early when no one is signed in.
    pub fn require_session(&self) -> Result<String> {
        self.client
            .state()
            .username()
            .context("No active session. Run 'abacus login' first.")
    }
}

fn default_store_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "abacus").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("credentials.json"))
}
