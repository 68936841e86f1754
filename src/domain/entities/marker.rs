use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(String);

impl MarkerId {
    pub fn new(value: impl Into<String>) -> Self {
        MarkerId(value.into())
    }

    pub fn generate() -> Self {
        MarkerId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MarkerId {
    fn from(value: &str) -> Self {
        MarkerId(value.to_string())
    }
}

impl From<String> for MarkerId {
    fn from(value: String) -> Self {
        MarkerId(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: MarkerId,
    pub sheet_row: u32,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub last_saved_x: f64,
    pub last_saved_y: f64,
    pub is_modified: bool,
}

impl Marker {
    pub fn loaded(id: MarkerId, sheet_row: u32, label: String, x: f64, y: f64) -> Self {
        Marker {
            id,
            sheet_row,
            label,
            x,
            y,
            last_saved_x: x,
            last_saved_y: y,
            is_modified: false,
        }
    }

    pub fn position_differs_from_saved(&self) -> bool {
        self.x != self.last_saved_x || self.y != self.last_saved_y
    }
}

pub fn parse_coordinate(value: &str) -> Option<f64> {
    let parsed: f64 = value.trim().parse().ok()?;
    parsed.is_finite().then_some(parsed)
}
