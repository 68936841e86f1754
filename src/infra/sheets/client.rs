use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::domain::entities::batch::BatchUpdate;
use crate::domain::entities::marker::Marker;
use crate::infra::sheets::range::{append_range, position_range, read_range};
use crate::settings::Settings;
use crate::usecase::ports::sheet::{
    AppendReceipt, ColumnLayout, SheetError, SheetReader, SheetRow, SheetWriter, WriteReceipt,
};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

pub struct SheetsClient {
    http: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    sheet_name: String,
    layout: ColumnLayout,
    first_data_row: u32,
    access_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateRequest {
    value_input_option: &'static str,
    data: Vec<ValueRange>,
}

#[derive(Debug, Serialize)]
struct ValueRange {
    range: String,
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateResponse {
    #[serde(default)]
    total_updated_cells: usize,
}

#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
struct AppendRequest {
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct AppendResponse {
    updates: Option<AppendUpdates>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    updated_range: Option<String>,
}

impl SheetsClient {
    pub fn new(
        settings: &Settings,
        layout: ColumnLayout,
        access_token: String,
    ) -> Result<Self, SheetError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|err| SheetError::InvalidRequest(format!("failed to build http client: {err}")))?;
        Ok(SheetsClient {
            http,
            base_url: SHEETS_API_BASE.to_string(),
            spreadsheet_id: settings.spreadsheet_id.clone(),
            sheet_name: settings.sheet_name.clone(),
            layout,
            first_data_row: settings.first_data_row,
            access_token,
        })
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/{}/values/{}",
            self.base_url,
            self.spreadsheet_id,
            encode_range(range)
        )
    }
}

#[async_trait]
impl SheetReader for SheetsClient {
    async fn fetch_rows(&self) -> Result<Vec<SheetRow>, SheetError> {
        let range = read_range(&self.sheet_name, self.first_data_row, self.layout.last_index());
        let url = format!("{}?valueRenderOption=UNFORMATTED_VALUE", self.values_url(&range));
        debug!(%range, "fetching sheet rows");

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(classify_transport)?;
        let response = check_status(response).await?;
        let body: ValuesResponse = response.json().await.map_err(classify_transport)?;

        let rows = body
            .values
            .into_iter()
            .enumerate()
            .map(|(offset, cells)| SheetRow {
                row_number: self.first_data_row + offset as u32,
                cells: cells.iter().map(value_to_string).collect(),
            })
            .collect();
        Ok(rows)
    }
}

#[async_trait]
impl SheetWriter for SheetsClient {
    async fn batch_write(&self, batch: &BatchUpdate) -> Result<WriteReceipt, SheetError> {
        let data = batch
            .updates
            .iter()
            .map(|update| ValueRange {
                range: position_range(&self.sheet_name, self.layout.x, self.layout.y, update.row),
                values: vec![vec![json!(update.x), json!(update.y)]],
            })
            .collect();
        let request = BatchUpdateRequest {
            value_input_option: "RAW",
            data,
        };
        let url = format!("{}/{}/values:batchUpdate", self.base_url, self.spreadsheet_id);
        debug!(ranges = batch.len(), "submitting batch update");

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport)?;
        let response = check_status(response).await?;
        let body: BatchUpdateResponse = response.json().await.map_err(classify_transport)?;
        Ok(WriteReceipt {
            updated_cells: body.total_updated_cells,
        })
    }

    async fn append_row(&self, marker: &Marker) -> Result<AppendReceipt, SheetError> {
        let width = self.layout.last_index() + 1;
        let mut cells = vec![serde_json::Value::Null; width];
        cells[self.layout.id] = json!(marker.id.as_str());
        cells[self.layout.label] = json!(marker.label);
        cells[self.layout.x] = json!(marker.x);
        cells[self.layout.y] = json!(marker.y);

        let range = append_range(&self.sheet_name, self.layout.last_index());
        let url = format!(
            "{}:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
            self.values_url(&range)
        );
        let request = AppendRequest {
            values: vec![cells],
        };

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport)?;
        let response = check_status(response).await?;
        let body: AppendResponse = response.json().await.map_err(classify_transport)?;

        body.updates
            .and_then(|updates| updates.updated_range)
            .as_deref()
            .and_then(row_from_range)
            .map(|row_number| AppendReceipt { row_number })
            .ok_or_else(|| {
                SheetError::InvalidRequest("append response is missing the updated range".to_string())
            })
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SheetError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(classify_status(status.as_u16(), &body))
}

pub(crate) fn classify_status(status: u16, detail: &str) -> SheetError {
    let detail: String = detail.chars().take(200).collect();
    match status {
        401 | 403 => SheetError::PermissionDenied(format!("HTTP {status}: {detail}")),
        400 | 404 | 422 => SheetError::InvalidRequest(format!("HTTP {status}: {detail}")),
        _ => SheetError::Network(format!("HTTP {status}: {detail}")),
    }
}

fn classify_transport(err: reqwest::Error) -> SheetError {
    if err.is_timeout() || err.is_connect() {
        SheetError::Network(err.to_string())
    } else if err.is_builder() {
        SheetError::InvalidRequest(err.to_string())
    } else {
        SheetError::Network(err.to_string())
    }
}

fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

// Only spaces need escaping in an A1 range used as a URL path segment.
fn encode_range(range: &str) -> String {
    range.replace(' ', "%20")
}

pub(crate) fn row_from_range(range: &str) -> Option<u32> {
    let cell = range.rsplit('!').next()?;
    let start = cell.split(':').next()?;
    let digits: String = start.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
