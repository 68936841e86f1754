use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::infra::sheets::range::column_index;
use crate::usecase::ports::sheet::ColumnLayout;

pub const ACCESS_TOKEN_ENV: &str = "RUMOUR_MAP_ACCESS_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetColumns {
    pub id: String,
    pub label: String,
    pub x: String,
    pub y: String,
}

impl Default for SheetColumns {
    fn default() -> Self {
        SheetColumns {
            id: "A".to_string(),
            label: "B".to_string(),
            x: "D".to_string(),
            y: "E".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub spreadsheet_id: String,
    pub sheet_name: String,
    #[serde(default)]
    pub columns: SheetColumns,
    #[serde(default = "default_first_data_row")]
    pub first_data_row: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_first_data_row() -> u32 {
    2
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Settings> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => default_config_path()?,
        };
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.spreadsheet_id.trim().is_empty() {
            anyhow::bail!("spreadsheet_id is required");
        }
        if self.sheet_name.trim().is_empty() {
            anyhow::bail!("sheet_name is required");
        }
        if self.first_data_row == 0 {
            anyhow::bail!("first_data_row is 1-indexed and must be at least 1");
        }
        self.column_layout()?;
        Ok(())
    }

    pub fn column_layout(&self) -> Result<ColumnLayout> {
        let id = parse_column(&self.columns.id, "id")?;
        let label = parse_column(&self.columns.label, "label")?;
        let x = parse_column(&self.columns.x, "x")?;
        let y = parse_column(&self.columns.y, "y")?;
        if x == y {
            anyhow::bail!("x and y must map to distinct columns");
        }
        Ok(ColumnLayout { id, label, x, y })
    }

    pub fn access_token() -> Result<String> {
        std::env::var(ACCESS_TOKEN_ENV).map_err(|_| {
            anyhow!("{ACCESS_TOKEN_ENV} is not set; export an OAuth access token with spreadsheet scope")
        })
    }
}

fn parse_column(label: &str, name: &str) -> Result<usize> {
    column_index(label)
        .ok_or_else(|| anyhow!("column {name} is not a valid sheet column letter: {label:?}"))
}

pub fn default_config_path() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("com", "rumourmap", "rumour-map")
        .ok_or_else(|| anyhow!("unable to resolve config directory"))?;
    Ok(project_dirs.config_dir().join("config.json"))
}
