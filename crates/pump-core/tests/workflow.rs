//! End-to-end stage workflows against an in-memory sheet.

mod common;

use common::{MemorySheet, UPLOADED_URL, completed_at, project_main};
use pump_core::{PatchError, StageBoard, SubmitError, find_stage};
use pump_model::{Attachment, FormSubmission};

fn board(key: &str) -> StageBoard {
    StageBoard::new(find_stage(key).expect("stage exists").clone())
}

fn challan() -> Attachment {
    Attachment {
        field: "challanLink".to_string(),
        file_name: "fd-challan.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        bytes: b"%PDF-1.4".to_vec(),
    }
}

fn sheet_rows(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
        .collect()
}

fn ids(reg_ids: &[&str]) -> Vec<String> {
    reg_ids.iter().map(|id| (*id).to_string()).collect()
}

#[tokio::test]
async fn buckets_follow_sentinels_below_decorated_header() {
    let sheet = MemorySheet::new(project_main());
    let mut foundation = board("foundation");
    let view = foundation.refresh(&sheet).await.expect("refresh");

    assert_eq!(view.header_map.as_ref().map(|map| map.header_row()), Some(5));
    let pending: Vec<&str> = view.bucket.pending.iter().map(|r| r.reg_id.as_str()).collect();
    let history: Vec<&str> = view.bucket.history.iter().map(|r| r.reg_id.as_str()).collect();
    assert_eq!(pending, vec!["R-001", "R-002"]);
    assert_eq!(history, vec!["R-003"]);
    assert_eq!(view.bucket.pending[0].row_index, 7);
    assert_eq!(view.bucket.pending[0].get("beneficiaryName"), "Asha Patel");

    let mut installation = board("installation");
    let view = installation.refresh(&sheet).await.expect("refresh");
    let pending: Vec<&str> = view.bucket.pending.iter().map(|r| r.reg_id.as_str()).collect();
    assert_eq!(pending, vec!["R-003"]);
    assert!(view.bucket.history.is_empty());
    // Unresolved columns read as the stage placeholder.
    assert_eq!(view.bucket.pending[0].get("pumpSerialNo"), "-");
}

#[tokio::test]
async fn submitted_record_moves_to_history_after_refresh() {
    let sheet = MemorySheet::new(project_main());
    let mut foundation = board("foundation");
    foundation.refresh(&sheet).await.expect("refresh");

    let selection = foundation.select(&ids(&["R-001"]));
    assert!(selection.missing.is_empty());
    let form = FormSubmission::new()
        .with_value("fdMaterialAgeing", "14 days")
        .with_attachment(challan());
    let report = foundation
        .submit(&sheet, &selection.records, &form, completed_at())
        .await
        .expect("submit");

    assert_eq!(report.updated, vec![("R-001".to_string(), 7)]);
    assert_eq!(report.document_url.as_deref(), Some(UPLOADED_URL));
    assert_eq!(sheet.cell(7, 5), "14 days");
    assert_eq!(sheet.cell(7, 7), UPLOADED_URL);
    assert_eq!(sheet.cell(7, 10), "2024/02/10 09:00:00");
    // Untouched cells keep their values.
    assert_eq!(sheet.cell(7, 9), "2024-01-01");
    assert_eq!(sheet.cell(7, 2), "Asha Patel");

    let view = foundation.refresh(&sheet).await.expect("refresh");
    assert!(view.bucket.pending_by_reg_id("R-001").is_none());
    let done = view.bucket.history_by_reg_id("R-001").expect("in history");
    assert_eq!(done.get("challanLink"), UPLOADED_URL);
    assert_eq!(done.actual, "2024/02/10 09:00:00");
}

#[tokio::test]
async fn installation_challan_link_lands_in_its_own_column() {
    let sheet = MemorySheet::new(sheet_rows(&[
        &[
            "Reg Id",
            "Beneficiary Name",
            "Village",
            "Installation Challan Link",
            "Planned 4",
            "Actual 4",
        ],
        &["R-1", "Asha", "Kheda", "", "2024-01-01", ""],
    ]));
    let mut installation = board("installation");
    let view = installation.refresh(&sheet).await.expect("refresh");
    let map = view.header_map.as_ref().expect("header located");
    assert_eq!(map.index_of("challanLink"), None);
    assert_eq!(map.index_of("installationChallanLink"), Some(3));

    let selection = installation.select(&ids(&["R-1"]));
    let form = FormSubmission::new().with_attachment(Attachment {
        field: "installationChallanLink".to_string(),
        ..challan()
    });
    installation
        .submit(&sheet, &selection.records, &form, completed_at())
        .await
        .expect("submit");

    assert_eq!(sheet.uploads(), 1);
    assert_eq!(sheet.cell(2, 3), UPLOADED_URL);
    assert_eq!(sheet.cell(2, 5), "2024/02/10 09:00:00");
}

#[tokio::test]
async fn attachment_without_document_column_is_refused_before_upload() {
    let sheet = MemorySheet::new(sheet_rows(&[
        &["Reg Id", "Beneficiary Name", "Village", "Planned 3", "Actual 3"],
        &["R-1", "Asha", "Kheda", "2024-01-01", ""],
    ]));
    let mut foundation = board("foundation");
    foundation.refresh(&sheet).await.expect("refresh");

    let selection = foundation.select(&ids(&["R-1"]));
    let form = FormSubmission::new().with_attachment(challan());
    let err = foundation
        .submit(&sheet, &selection.records, &form, completed_at())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        SubmitError::Patch(PatchError::DocumentUnresolved {
            field: "challanLink".to_string(),
        })
    );
    assert_eq!(sheet.uploads(), 0);
    assert!(sheet.updates().is_empty());
    assert_eq!(sheet.cell(2, 4), "");
}

#[tokio::test]
async fn bulk_submit_uploads_once_and_patches_each_row() {
    let sheet = MemorySheet::new(project_main());
    let mut foundation = board("foundation");
    foundation.refresh(&sheet).await.expect("refresh");

    let selection = foundation.select(&ids(&["R-001", "R-002", "R-001"]));
    assert_eq!(selection.records.len(), 2);
    let form = FormSubmission::new()
        .with_value("fdDate", "2024-02-09")
        .with_attachment(challan());
    let report = foundation
        .submit(&sheet, &selection.records, &form, completed_at())
        .await
        .expect("submit");

    assert_eq!(report.updated.len(), 2);
    assert_eq!(sheet.uploads(), 1);
    let updates = sheet.updates();
    let mut rows: Vec<usize> = updates.iter().map(|patch| patch.row_index).collect();
    rows.sort_unstable();
    assert_eq!(rows, vec![7, 8]);
    for patch in &updates {
        assert_eq!(patch.value_at(7), Some(UPLOADED_URL));
        assert_eq!(patch.value_at(6), Some("2024-02-09"));
        assert_eq!(patch.value_at(10), Some("2024/02/10 09:00:00"));
        assert_eq!(patch.fields.len(), 3);
    }
}

#[tokio::test]
async fn failed_upload_touches_no_rows() {
    let sheet = MemorySheet::new(project_main()).failing_upload();
    let mut foundation = board("foundation");
    foundation.refresh(&sheet).await.expect("refresh");

    let selection = foundation.select(&ids(&["R-001", "R-002"]));
    let form = FormSubmission::new().with_attachment(challan());
    let err = foundation
        .submit(&sheet, &selection.records, &form, completed_at())
        .await
        .unwrap_err();

    assert!(matches!(err, SubmitError::UploadFailed(_)));
    assert_eq!(sheet.uploads(), 1);
    assert!(sheet.updates().is_empty());
    assert_eq!(sheet.cell(7, 10), "");
}

#[tokio::test]
async fn partial_failure_reports_failed_rows_and_keeps_them_pending() {
    let sheet = MemorySheet::new(project_main()).failing_rows(&[8]);
    let mut foundation = board("foundation");
    foundation.refresh(&sheet).await.expect("refresh");

    let selection = foundation.select(&ids(&["R-001", "R-002"]));
    let err = foundation
        .submit(&sheet, &selection.records, &FormSubmission::new(), completed_at())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "1 of 2 updates failed");
    let failures = err.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].reg_id, "R-002");
    assert_eq!(failures[0].row_index, 8);

    let view = foundation.refresh(&sheet).await.expect("refresh");
    assert!(view.bucket.history_by_reg_id("R-001").is_some());
    assert!(view.bucket.pending_by_reg_id("R-002").is_some());
}

#[tokio::test]
async fn selecting_unknown_or_done_records_reports_them_missing() {
    let sheet = MemorySheet::new(project_main());
    let mut foundation = board("foundation");
    foundation.refresh(&sheet).await.expect("refresh");

    let selection = foundation.select(&ids(&[" R-002 ", "R-003", "R-999"]));
    assert_eq!(selection.records.len(), 1);
    assert_eq!(selection.records[0].reg_id, "R-002");
    assert_eq!(selection.missing, ids(&["R-003", "R-999"]));

    let err = foundation
        .submit(&sheet, &[], &FormSubmission::new(), completed_at())
        .await
        .unwrap_err();
    assert_eq!(err, SubmitError::NothingSelected);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_view() {
    let mut sheet = MemorySheet::new(project_main());
    let mut foundation = board("foundation");
    foundation.refresh(&sheet).await.expect("refresh");
    let before = foundation.view().clone();

    sheet.set_fail_read(true);
    assert!(foundation.refresh(&sheet).await.is_err());
    assert_eq!(foundation.view(), &before);
    assert_eq!(foundation.view().bucket.pending.len(), 2);
}

#[tokio::test]
async fn headerless_sheet_shows_nothing_and_refuses_submit() {
    let rows = vec![
        vec!["Monthly summary".to_string()],
        vec!["Total".to_string(), "42".to_string()],
    ];
    let sheet = MemorySheet::new(rows);
    let mut foundation = board("foundation");
    let view = foundation.refresh(&sheet).await.expect("refresh");
    assert!(view.header_map.is_none());
    assert!(view.bucket.is_empty());

    let record = pump_model::StageRecord {
        row_index: 2,
        reg_id: "R-1".to_string(),
        ..Default::default()
    };
    let err = foundation
        .submit(&sheet, &[record], &FormSubmission::new(), completed_at())
        .await
        .unwrap_err();
    assert_eq!(err, SubmitError::HeaderNotFound);
    assert!(sheet.updates().is_empty());
}
