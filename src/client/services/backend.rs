use std::time::Duration;

use log::{info, warn};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::timeout;

use crate::client::config::ClientConfig;
use crate::client::utils::credential_store::{CredentialStore, Credentials};

/// Credential storage plus the one data call the overlay needs.
///
/// `get_data` blocks and must be safe to call away from the UI thread.
/// `None` means the fetch failed; any `Some` value, empty or not, is data.
pub trait Backend: Send + Sync {
    fn credentials_present(&self) -> bool;
    fn save_credentials(&self, username: &str, password: &str) -> anyhow::Result<()>;
    fn get_data(&self) -> Option<Value>;

    /// Same call, reporting human-readable progress lines while it runs.
    /// Lines sent after the UI stopped listening are dropped.
    fn get_data_with_progress(&self, progress: &UnboundedSender<String>) -> Option<Value> {
        let _ = progress;
        self.get_data()
    }
}

/// Backend talking to the ERP gateway with a single line command per fetch.
pub struct RemoteBackend {
    store: CredentialStore,
    endpoint: String,
    timeout: Duration,
}

impl RemoteBackend {
    pub fn new(store: CredentialStore, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            store,
            endpoint: endpoint.into(),
            timeout,
        }
    }

    pub fn from_config(cfg: &ClientConfig) -> Self {
        Self::new(
            CredentialStore::from_config(cfg),
            cfg.backend_endpoint(),
            cfg.backend_timeout,
        )
    }

    async fn request(
        &self,
        credentials: &Credentials,
        progress: Option<&UnboundedSender<String>>,
    ) -> anyhow::Result<Value> {
        let report = |line: String| {
            if let Some(tx) = progress {
                let _ = tx.send(line);
            }
        };

        report(format!("Connecting to {}...", self.endpoint));
        let stream = timeout(self.timeout, TcpStream::connect(&self.endpoint))
            .await
            .map_err(|_| anyhow::anyhow!("connection to {} timed out", self.endpoint))??;
        let (reader, writer) = stream.into_split();
        let mut reader = BufReader::new(reader);
        let mut writer = BufWriter::new(writer);

        let cmd = format!("/get_data {}\n", serde_json::to_string(credentials)?);
        writer.write_all(cmd.as_bytes()).await?;
        writer.flush().await?;
        report("Waiting for data...".to_string());

        let mut line = String::new();
        let read = timeout(self.timeout, reader.read_line(&mut line))
            .await
            .map_err(|_| anyhow::anyhow!("no reply from {} in time", self.endpoint))??;
        if read == 0 {
            anyhow::bail!("connection closed before reply");
        }
        parse_reply(&line)
    }
}

impl Backend for RemoteBackend {
    fn credentials_present(&self) -> bool {
        self.store.is_present()
    }

    fn save_credentials(&self, username: &str, password: &str) -> anyhow::Result<()> {
        self.store.save(&Credentials {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    fn get_data(&self) -> Option<Value> {
        self.fetch(None)
    }

    fn get_data_with_progress(&self, progress: &UnboundedSender<String>) -> Option<Value> {
        self.fetch(Some(progress))
    }
}

impl RemoteBackend {
    fn fetch(&self, progress: Option<&UnboundedSender<String>>) -> Option<Value> {
        let Some(credentials) = self.store.load() else {
            warn!("[BACKEND] No stored credentials, skipping request");
            return None;
        };
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!("[BACKEND] get_data called outside a runtime: {}", e);
                return None;
            }
        };
        match handle.block_on(self.request(&credentials, progress)) {
            Ok(value) => {
                info!("[BACKEND] Data received from {}", self.endpoint);
                Some(value)
            }
            Err(e) => {
                warn!("[BACKEND] Fetch from {} failed: {}", self.endpoint, e);
                None
            }
        }
    }
}

/// Parses one reply line: `OK: <payload>` or `ERR: <reason>`.
/// A payload that is not JSON is kept as a plain string.
pub fn parse_reply(line: &str) -> anyhow::Result<Value> {
    let line = line.trim();
    if let Some(payload) = line.strip_prefix("OK:") {
        let payload = payload.trim();
        Ok(serde_json::from_str(payload).unwrap_or_else(|_| Value::String(payload.to_string())))
    } else if let Some(reason) = line.strip_prefix("ERR:") {
        anyhow::bail!("request rejected: {}", reason.trim())
    } else {
        anyhow::bail!("unexpected reply: {}", line)
    }
}
