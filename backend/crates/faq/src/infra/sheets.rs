//! Spreadsheet Repository Implementation
//!
//! Reads go through the API key; appends need a service-account bearer
//! token. Rows are `[number, question, answer, status, ...]` below a header.

use std::sync::Arc;

use platform::clock::Clock;
use platform::http::{HttpTransport, OutboundRequest};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::application::config::{ConfigError, SheetConfig};
use crate::domain::entities::QaRecord;
use crate::domain::repository::QaRepository;
use crate::domain::value_objects::SheetStatus;
use crate::error::{FaqError, FaqResult};
use crate::infra::token_manager::BearerTokenManager;

/// Marker written in the source column of appended rows
const SITE_SOURCE: &str = "Question issue du site";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchGetResponse {
    #[serde(default)]
    value_ranges: Vec<ValueRange>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

pub struct SheetQaStore<T> {
    config: SheetConfig,
    transport: Arc<T>,
    tokens: BearerTokenManager<T>,
}

impl<T: HttpTransport> SheetQaStore<T> {
    pub fn new(
        config: SheetConfig,
        transport: Arc<T>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        let tokens = BearerTokenManager::new(&config, transport.clone(), clock)?;
        Ok(Self {
            config,
            transport,
            tokens,
        })
    }

    /// Tab names may be configured URL-encoded
    fn tab_name(&self) -> String {
        self.config.tab.replace("%20", " ")
    }

    fn values_url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values",
            self.config.api_base.trim_end_matches('/'),
            self.config.spreadsheet_id
        )
    }
}

/// Leading integer of a cell: optional whitespace and sign, then digits.
/// Anything after the digits is ignored (`"5.0"` is 5).
fn leading_integer(cell: &str) -> Option<i64> {
    let trimmed = cell.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['-', '+']));
    let digits = trimmed[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len() - sign_len);
    if digits == 0 {
        return None;
    }
    trimmed[..sign_len + digits].parse().ok()
}

/// Cells of a row, only if every one of them is a string
fn string_cells(row: Vec<Value>) -> Option<Vec<String>> {
    row.into_iter()
        .map(|cell| match cell {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}

/// Map sheet rows to records, skipping the header. Each row is parsed on its
/// own: one without a numeric id or with a non-text cell is dropped.
pub fn parse_rows(rows: Vec<Vec<Value>>) -> Vec<QaRecord> {
    rows.into_iter()
        .skip(1)
        .filter_map(|raw| {
            let Some(row) = string_cells(raw) else {
                tracing::warn!("Skipping spreadsheet row with non-text cells");
                return None;
            };
            let cell = |i: usize| row.get(i).cloned().unwrap_or_default();
            let Some(id) = row.first().and_then(|c| leading_integer(c)) else {
                tracing::warn!(cell = %cell(0), "Skipping spreadsheet row without numeric id");
                return None;
            };
            Some(QaRecord {
                id,
                question: cell(1),
                answer: cell(2),
                asked_at: None,
                answered_at: None,
                validated: SheetStatus::is_validated(&cell(3)),
            })
        })
        .collect()
}

impl<T: HttpTransport + Send + Sync> QaRepository for SheetQaStore<T> {
    async fn create_entry(&self, question: &str, order_hint: u32) -> FaqResult<()> {
        let token = self.tokens.ensure_fresh_token().await.ok_or_else(|| {
            FaqError::BackendUnavailable("no spreadsheet access token".into())
        })?;

        let range = format!("{}!{}", self.tab_name(), self.config.fields);
        let request = OutboundRequest::post(format!("{}/{}:append", self.values_url(), range))
            .query("valueInputOption", "RAW")
            .query("insertDataOption", "INSERT_ROWS")
            .bearer(token)
            .json(json!({
                "range": range,
                "majorDimension": "ROWS",
                "values": [[
                    order_hint,
                    question,
                    "",
                    SheetStatus::Draft.to_string(),
                    SITE_SOURCE,
                    "",
                ]],
            }));

        let response = self.transport.send(request).await?;
        if !response.is_ok() {
            return Err(FaqError::BackendUnavailable(format!(
                "append returned status {}",
                response.status
            )));
        }

        tracing::info!(order_hint, "Question appended to spreadsheet");
        Ok(())
    }

    async fn update_entry(&self, _id: i64, _answer: &str, _validated: bool) -> FaqResult<()> {
        Err(FaqError::UnsupportedOperation("update_entry"))
    }

    async fn delete_entry(&self, _id: i64) -> FaqResult<()> {
        Err(FaqError::UnsupportedOperation("delete_entry"))
    }

    async fn list_validated(&self) -> FaqResult<Vec<QaRecord>> {
        let mut entries = self.list_all().await?;
        entries.retain(|e| e.validated);
        Ok(entries)
    }

    async fn list_all(&self) -> FaqResult<Vec<QaRecord>> {
        let request = OutboundRequest::get(format!("{}:batchGet", self.values_url()))
            .query("ranges", self.tab_name())
            .query("key", self.config.api_key.as_str());

        let response = self.transport.send(request).await?;
        if !response.is_ok() || response.body.is_empty() {
            return Err(FaqError::BackendUnavailable(format!(
                "batchGet returned status {}",
                response.status
            )));
        }

        let parsed: BatchGetResponse = serde_json::from_str(&response.body)?;
        let rows = parsed
            .value_ranges
            .into_iter()
            .next()
            .map(|range| range.values)
            .unwrap_or_default();

        Ok(parse_rows(rows))
    }
}
