use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_columns")]
    pub columns: usize,
    #[serde(default = "default_cell_width")]
    pub cell_width: u16,
    #[serde(default = "default_show_grid")]
    pub show_grid: bool,
}

fn default_columns() -> usize {
    22
}
fn default_cell_width() -> u16 {
    2
}
fn default_show_grid() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            cell_width: default_cell_width(),
            show_grid: default_show_grid(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let config_path = Self::config_path();
        if config_path.exists() {
            match fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str::<Config>(&content) {
                    Ok(config) => return config.sanitized(),
                    Err(e) => eprintln!("Failed to parse config: {}", e),
                },
                Err(e) => eprintln!("Failed to read config: {}", e),
            }
        }
        Self::default()
    }

    pub fn save(&self) -> io::Result<()> {
        let config_dir = Self::config_dir();
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(Self::config_path(), content)
    }

    // A zero-column or zero-width grid cannot lay anything out.
    fn sanitized(mut self) -> Self {
        self.columns = self.columns.max(1);
        self.cell_width = self.cell_width.max(1);
        self
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tianzige")
    }
}
