use std::{fs, net::SocketAddr, path::{Path, PathBuf}};

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct MailerConfig {
    /// Address the HTTP server binds to.
    pub listen: SocketAddr,
    /// Directory rendered credential mails are delivered into.
    pub outbox: PathBuf,
    /// Optional directory of static files served at the root.
    pub static_dir: Option<PathBuf>,
    /// From-line stamped on every rendered mail.
    pub sender: String,
}

impl MailerConfig {
    pub fn read(filepath: impl AsRef<Path>) -> anyhow::Result<Self> {
        let file_content = fs::read_to_string(filepath)
            .with_context(|| "failed to read config file")?;
        let config = toml::from_str(&file_content)
            .with_context(|| "failed to parse config file")?;
        Ok(config)
    }
}

impl Default for MailerConfig {
    fn default() -> Self {
        MailerConfig {
            listen: ([0, 0, 0, 0], 3001).into(),
            outbox: PathBuf::from("outbox"),
            static_dir: None,
            sender: "UNI Bank <no-reply@unibank.example>".to_owned(),
        }
    }
}
