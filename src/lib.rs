pub mod domain;
pub mod infra;
pub mod settings;
pub mod usecase;

pub use domain::entities::batch::{BatchUpdate, BatchValidationError, CellUpdate};
pub use domain::entities::edit::PendingSet;
pub use domain::entities::marker::{Marker, MarkerId};
pub use usecase::ports::sheet::{
    AppendReceipt, ColumnLayout, PushError, SheetError, SheetReader, SheetRow, SheetWriter,
    WriteReceipt,
};
pub use usecase::services::load_service::{LoadReport, LoadService};
pub use usecase::services::sync_service::{PushOutcome, SyncService};
