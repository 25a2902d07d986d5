use serde::{Deserialize, Serialize};

use crate::errors::LapdeckError;

const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct AppConfig {
    pub(crate) server_url: String,
    pub(crate) window_width: f32,
    pub(crate) window_height: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            window_width: 1280.,
            window_height: 860.,
        }
    }
}

impl AppConfig {
    pub(crate) fn from_local_file() -> Option<Self> {
        let config_path = dirs::config_dir()?.join("lapdeck").join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let file = std::fs::File::open(config_path).expect("Could not open config file");
            Some(serde_json::from_reader(file).expect("Could not parse config file"))
        } else {
            None
        }
    }

    pub(crate) fn save(&self) -> Result<(), LapdeckError> {
        let config_path = dirs::config_dir()
            .ok_or(LapdeckError::NoConfigDir)?
            .join("lapdeck")
            .join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            std::fs::create_dir_all(config_path.parent().unwrap())
                .map_err(|e| LapdeckError::ConfigIOError { source: e })?;
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| LapdeckError::ConfigIOError { source: e })?;
        serde_json::to_writer(file, self)
            .map_err(|e| LapdeckError::ConfigSerializeError { source: e })
    }
}
