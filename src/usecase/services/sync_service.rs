use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::entities::batch::{BatchUpdate, CellUpdate};
use crate::domain::entities::edit::PendingSet;
use crate::domain::entities::marker::{Marker, MarkerId};
use crate::usecase::ports::sheet::{PushError, SheetError, SheetWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    NoChanges,
    Updated { updated_cells: usize },
}

pub struct SyncService {
    writer: Arc<dyn SheetWriter>,
    pending: Mutex<PendingSet>,
    in_flight: AtomicBool,
    last_error: Mutex<Option<SheetError>>,
    last_pushed_at: Mutex<Option<DateTime<Utc>>>,
}

struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard { flag })
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct SentUpdate {
    x: f64,
    y: f64,
    mark: u64,
}

impl SyncService {
    pub fn new(writer: Arc<dyn SheetWriter>) -> Self {
        SyncService {
            writer,
            pending: Mutex::new(PendingSet::default()),
            in_flight: AtomicBool::new(false),
            last_error: Mutex::new(None),
            last_pushed_at: Mutex::new(None),
        }
    }

    pub fn mark_modified(&self, id: &MarkerId) {
        lock(&self.pending).insert(id.clone());
    }

    pub fn record_move(&self, marker: &mut Marker, x: f64, y: f64) {
        marker.x = x;
        marker.y = y;
        let mut pending = lock(&self.pending);
        if pending.contains(&marker.id) || marker.position_differs_from_saved() {
            pending.insert(marker.id.clone());
            marker.is_modified = true;
        }
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    pub fn has_pending_changes(&self) -> bool {
        !lock(&self.pending).is_empty()
    }

    pub fn is_pending(&self, id: &MarkerId) -> bool {
        lock(&self.pending).contains(id)
    }

    pub fn is_pushing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn last_error(&self) -> Option<SheetError> {
        lock(&self.last_error).clone()
    }

    pub fn last_pushed_at(&self) -> Option<DateTime<Utc>> {
        *lock(&self.last_pushed_at)
    }

    pub fn reset(&self, markers: &mut [Marker]) {
        lock(&self.pending).clear();
        *lock(&self.last_error) = None;
        for marker in markers {
            marker.is_modified = false;
        }
    }

    pub async fn push(&self, markers: &mut [Marker]) -> Result<PushOutcome, PushError> {
        let _guard = FlightGuard::acquire(&self.in_flight).ok_or(PushError::InFlight)?;

        let snapshot = lock(&self.pending).snapshot();
        let mut batch = BatchUpdate::default();
        let mut sent: HashMap<MarkerId, SentUpdate> = HashMap::new();
        for marker in markers.iter() {
            if let Some(&mark) = snapshot.get(&marker.id) {
                batch.push(CellUpdate {
                    row: marker.sheet_row,
                    x: marker.x,
                    y: marker.y,
                });
                sent.insert(
                    marker.id.clone(),
                    SentUpdate {
                        x: marker.x,
                        y: marker.y,
                        mark,
                    },
                );
            }
        }

        if batch.is_empty() {
            debug!("push requested with nothing pending");
            return Ok(PushOutcome::NoChanges);
        }

        if let Err(err) = batch.validate() {
            let classified = SheetError::InvalidRequest(err.to_string());
            *lock(&self.last_error) = Some(classified.clone());
            warn!(error = %classified, "rejecting batch before submission");
            return Err(classified.into());
        }

        info!(markers = batch.len(), "pushing pending positions");
        match self.writer.batch_write(&batch).await {
            Ok(receipt) => {
                let mut pending = lock(&self.pending);
                for marker in markers.iter_mut() {
                    let Some(update) = sent.get(&marker.id) else {
                        continue;
                    };
                    marker.last_saved_x = update.x;
                    marker.last_saved_y = update.y;
                    pending.remove_if_unchanged(&marker.id, update.mark);
                    marker.is_modified = pending.contains(&marker.id);
                }
                drop(pending);
                *lock(&self.last_error) = None;
                *lock(&self.last_pushed_at) = Some(Utc::now());
                info!(updated_cells = receipt.updated_cells, "push confirmed");
                Ok(PushOutcome::Updated {
                    updated_cells: receipt.updated_cells,
                })
            }
            Err(err) => {
                warn!(error = %err, "push failed; pending changes kept for retry");
                *lock(&self.last_error) = Some(err.clone());
                Err(err.into())
            }
        }
    }

    pub async fn add_marker(&self, label: &str, x: f64, y: f64) -> Result<Marker, SheetError> {
        let mut marker = Marker::loaded(MarkerId::generate(), 0, label.to_string(), x, y);
        let receipt = self.writer.append_row(&marker).await?;
        marker.sheet_row = receipt.row_number;
        info!(id = %marker.id, row = marker.sheet_row, "appended new marker");
        Ok(marker)
    }
}
