use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use keyring::Entry;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::client::config::{ClientConfig, CredentialsBackend};

const SERVICE: &str = "erpsnap";
const ACCOUNT: &str = "erpsnap_credentials";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    fn is_blank(&self) -> bool {
        self.username.trim().is_empty()
    }
}

/// One secret value held outside the process.
trait SecretSlot: fmt::Debug + Send + Sync {
    fn set(&self, secret: &str) -> anyhow::Result<()>;
    fn get(&self) -> Option<String>;
    fn delete(&self);
}

#[derive(Debug)]
struct KeyringSlot;

impl SecretSlot for KeyringSlot {
    fn set(&self, secret: &str) -> anyhow::Result<()> {
        Entry::new(SERVICE, ACCOUNT)
            .set_password(secret)
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    fn get(&self) -> Option<String> {
        Entry::new(SERVICE, ACCOUNT).get_password().ok()
    }

    fn delete(&self) {
        let _ = Entry::new(SERVICE, ACCOUNT).delete_password();
    }
}

/// Persists one set of credentials in the OS keyring, with an opt-in plain
/// file used when the keyring is unavailable (or when asked to skip it).
#[derive(Debug, Clone)]
pub struct CredentialStore {
    keyring: Option<Arc<dyn SecretSlot>>,
    fallback: Option<PathBuf>,
}

impl CredentialStore {
    pub fn from_config(cfg: &ClientConfig) -> Self {
        match cfg.credentials_store {
            CredentialsBackend::File => Self::file_only(cfg.credentials_file.clone()),
            CredentialsBackend::Keyring => Self::with_slot(
                Arc::new(KeyringSlot),
                cfg.credentials_fallback.then(|| cfg.credentials_file.clone()),
            ),
        }
    }

    pub fn file_only(path: impl Into<PathBuf>) -> Self {
        Self {
            keyring: None,
            fallback: Some(path.into()),
        }
    }

    fn with_slot(slot: Arc<dyn SecretSlot>, fallback: Option<PathBuf>) -> Self {
        Self {
            keyring: Some(slot),
            fallback,
        }
    }

    pub fn save(&self, credentials: &Credentials) -> anyhow::Result<()> {
        let encoded = serde_json::to_string(credentials)?;
        if let Some(slot) = &self.keyring {
            match slot.set(&encoded) {
                Ok(()) => return Ok(()),
                Err(e) => warn!("[CREDENTIALS] Keyring unavailable: {}", e),
            }
        }
        match &self.fallback {
            Some(path) => {
                write_file(path, &encoded)?;
                info!("[CREDENTIALS] Credentials persisted to {}", path.display());
                Ok(())
            }
            // do not persist to disk silently
            None => Err(anyhow::anyhow!("keyring unavailable and file fallback disabled")),
        }
    }

    pub fn load(&self) -> Option<Credentials> {
        let stored = self.keyring.as_ref().and_then(|slot| slot.get());
        if let Some(credentials) = stored.and_then(|raw| decode(&raw)) {
            return Some(credentials);
        }
        let path = self.fallback.as_ref()?;
        let raw = std::fs::read_to_string(path).ok()?;
        decode(&raw)
    }

    pub fn is_present(&self) -> bool {
        self.load().is_some()
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        if let Some(slot) = &self.keyring {
            slot.delete();
        }
        if let Some(path) = &self.fallback {
            if path.exists() {
                std::fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

fn decode(raw: &str) -> Option<Credentials> {
    serde_json::from_str::<Credentials>(raw.trim())
        .ok()
        .filter(|c| !c.is_blank())
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}
