use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// An isolated home with its own credential file.
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("abacus").join("credentials.json")
    }

    /// Write a credential file as a previous login would have.
    pub fn store_session(&self, token: &str, refresh_token: &str, username: &str) {
        let path = self.store_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let content = serde_json::json!({
            "token": token,
            "refresh_token": refresh_token,
            "username": username,
        });
        std::fs::write(&path, content.to_string()).unwrap();
    }

    pub fn stored(&self) -> Option<serde_json::Value> {
        let content = std::fs::read_to_string(self.store_path()).ok()?;
        Some(serde_json::from_str(&content).unwrap())
    }
}

/// Run the CLI binary against `api_url` with isolated storage.
pub async fn run_cli(args: &[&str], home: &Path, store: &Path, api_url: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_abacus"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("ABACUS_STORE", store);
    cmd.env("ABACUS_API_URL", api_url);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("ABACUS_PASSWORD");
    cmd.env_remove("RUST_LOG");

    tokio::task::spawn_blocking(move || cmd.output().expect("Failed to execute CLI"))
        .await
        .unwrap()
}

/// Run the CLI and expect success.
pub async fn run_cli_success(args: &[&str], sandbox: &Sandbox, api_url: &str) -> String {
    let output = run_cli(args, sandbox.dir.path(), &sandbox.store_path(), api_url).await;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}
