//! In-memory sheet service for workflow tests.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};

use pump_gateway::{GatewayError, Result, SheetGateway};
use pump_model::{Attachment, Cell, PatchRequest, RawGrid};

pub const UPLOADED_URL: &str = "https://drive.example/file/abc";

/// Sheet with five decoration rows above the header, like Project Main.
pub fn project_main() -> Vec<Vec<String>> {
    let rows: Vec<Vec<&str>> = vec![
        vec!["PM-KUSUM Component B"],
        vec!["Vendor: Sunrise Pumps"],
        vec![],
        vec!["Generated", "2024-01-31"],
        vec![],
        vec![
            "Serial",
            "Reg Id",
            "Beneficiary Name",
            "Village",
            "Mobile",
            "FD Material Ageing",
            "FD Date",
            "FD Challan Link",
            "Installation Challan Link",
            "Planned 3",
            "Actual 3",
            "Planned 4",
            "Actual 4",
        ],
        vec!["1", "R-001", "Asha Patel", "Kheda", "9800000001", "", "", "", "", "2024-01-01", "", "", ""],
        vec!["2", "R-002", "Bhavin Shah", "Anand", "9800000002", "", "", "", "", "2024-01-03", "", "", ""],
        vec![
            "3", "R-003", "Chetna Rao", "Nadiad", "9800000003", "21 days", "2024-01-20", "", "",
            "2024-01-01", "2024/01/25 10:00:00", "2024-01-26", "",
        ],
        vec!["4", "R-004", "Dev Mehta", "Borsad", "9800000004", "", "", "", "", "", "", "", ""],
        vec!["", "", "Total", "", "", "", "", "", "", "", "", "", ""],
    ];
    rows.into_iter()
        .map(|row| row.into_iter().map(str::to_string).collect())
        .collect()
}

pub fn completed_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 2, 10)
        .and_then(|date| date.and_hms_opt(9, 0, 0))
        .expect("valid timestamp")
}

#[derive(Default)]
struct State {
    rows: Vec<Vec<String>>,
    updates: Vec<PatchRequest>,
    uploads: usize,
}

/// A sheet that applies patches to its rows the way the service does.
#[derive(Default)]
pub struct MemorySheet {
    state: Mutex<State>,
    failing_rows: BTreeSet<usize>,
    fail_upload: bool,
    fail_read: bool,
}

impl MemorySheet {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self {
            state: Mutex::new(State {
                rows,
                ..State::default()
            }),
            ..Self::default()
        }
    }

    pub fn failing_rows(mut self, rows: &[usize]) -> Self {
        self.failing_rows = rows.iter().copied().collect();
        self
    }

    pub fn failing_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    pub fn set_fail_read(&mut self, fail: bool) {
        self.fail_read = fail;
    }

    pub fn updates(&self) -> Vec<PatchRequest> {
        self.state.lock().expect("state lock").updates.clone()
    }

    pub fn uploads(&self) -> usize {
        self.state.lock().expect("state lock").uploads
    }

    /// Cell text at a 1-based row and zero-based column.
    pub fn cell(&self, row_index: usize, column: usize) -> String {
        let state = self.state.lock().expect("state lock");
        state
            .rows
            .get(row_index - 1)
            .and_then(|row| row.get(column))
            .cloned()
            .unwrap_or_default()
    }
}

impl SheetGateway for MemorySheet {
    async fn read(&self) -> Result<RawGrid> {
        if self.fail_read {
            return Err(GatewayError::Network("connection reset".to_string()));
        }
        let state = self.state.lock().expect("state lock");
        let rows = state
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| Cell::from(cell.as_str())).collect())
            .collect();
        Ok(RawGrid::new(rows))
    }

    async fn update(&self, patch: &PatchRequest) -> Result<()> {
        let mut state = self.state.lock().expect("state lock");
        state.updates.push(patch.clone());
        if self.failing_rows.contains(&patch.row_index) {
            return Err(GatewayError::UpdateRejected(format!(
                "row {} is protected",
                patch.row_index
            )));
        }
        let row = state
            .rows
            .get_mut(patch.row_index - 1)
            .ok_or_else(|| GatewayError::UpdateRejected("row out of range".to_string()))?;
        for (column, value) in &patch.fields {
            if row.len() <= *column {
                row.resize(column + 1, String::new());
            }
            row[*column] = value.clone();
        }
        Ok(())
    }

    async fn upload_file(&self, _attachment: &Attachment) -> Result<String> {
        let mut state = self.state.lock().expect("state lock");
        state.uploads += 1;
        if self.fail_upload {
            return Err(GatewayError::UploadFailed("quota exceeded".to_string()));
        }
        Ok(UPLOADED_URL.to_string())
    }
}
