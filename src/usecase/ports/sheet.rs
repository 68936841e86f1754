use async_trait::async_trait;

use crate::domain::entities::batch::BatchUpdate;
use crate::domain::entities::marker::Marker;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SheetError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("network failure: {0}")]
    Network(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl SheetError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, SheetError::Network(_))
    }

    pub fn user_guidance(&self) -> &'static str {
        match self {
            SheetError::PermissionDenied(_) => {
                "this account lacks write access to the spreadsheet; fix the sharing settings and retry"
            }
            SheetError::Network(_) => "the request did not complete; retrying is safe",
            SheetError::InvalidRequest(_) => {
                "the sheet or range configuration is wrong; retrying will not help until it is fixed"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PushError {
    #[error("a push is already in progress")]
    InFlight,
    #[error(transparent)]
    Sheet(#[from] SheetError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub row_number: u32,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteReceipt {
    pub updated_cells: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendReceipt {
    pub row_number: u32,
}

// Zero-based cell indexes of the marker fields within a fetched row,
// where index 0 is sheet column A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub id: usize,
    pub label: usize,
    pub x: usize,
    pub y: usize,
}

impl ColumnLayout {
    pub fn last_index(&self) -> usize {
        self.id.max(self.label).max(self.x).max(self.y)
    }
}

#[async_trait]
pub trait SheetReader: Send + Sync {
    async fn fetch_rows(&self) -> Result<Vec<SheetRow>, SheetError>;
}

#[async_trait]
pub trait SheetWriter: Send + Sync {
    async fn batch_write(&self, batch: &BatchUpdate) -> Result<WriteReceipt, SheetError>;

    async fn append_row(&self, marker: &Marker) -> Result<AppendReceipt, SheetError>;
}
