use crate::{configuration::Configuration, persistence::DEFAULT_STORAGE_KEY};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "interview_scheduler")]
#[command(about = "Schedule interviews without double-booking anyone")]
pub struct ConfigurationHandler {
    /// Address to listen on
    #[arg(long, env = "INTERVIEWS_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "INTERVIEWS_PORT", default_value_t = 3000)]
    port: u16,

    /// Directory holding the interview snapshot
    #[arg(long, env = "INTERVIEWS_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Key the snapshot is stored under
    #[arg(long, env = "INTERVIEWS_STORAGE_KEY", default_value = DEFAULT_STORAGE_KEY)]
    storage_key: String,

    /// Keep interviews in memory only (lost on restart)
    #[arg(long)]
    ephemeral: bool,
}

impl ConfigurationHandler {
    /// Reads `.env` first so its values act as environment defaults.
    pub fn parse_arguments() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn host(&self) -> String {
        self.host.clone()
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn data_dir(&self) -> Option<PathBuf> {
        (!self.ephemeral).then(|| self.data_dir.clone())
    }

    fn storage_key(&self) -> String {
        self.storage_key.clone()
    }
}
