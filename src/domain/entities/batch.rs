#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellUpdate {
    pub row: u32,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchUpdate {
    pub updates: Vec<CellUpdate>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchValidationError {
    #[error("row {row} is outside the sheet; rows are 1-indexed")]
    RowOutOfRange { row: u32 },
    #[error("row {row} has a non-finite coordinate")]
    NonFiniteCoordinate { row: u32 },
}

impl BatchUpdate {
    pub fn push(&mut self, update: CellUpdate) {
        self.updates.push(update);
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn validate(&self) -> Result<(), BatchValidationError> {
        for update in &self.updates {
            if update.row == 0 {
                return Err(BatchValidationError::RowOutOfRange { row: update.row });
            }
            if !update.x.is_finite() || !update.y.is_finite() {
                return Err(BatchValidationError::NonFiniteCoordinate { row: update.row });
            }
        }
        Ok(())
    }
}
