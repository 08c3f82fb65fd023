use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use tracing::{debug, info, warn};

use pump_cli::config::{ConfigOverrides, TrackerConfig};
use pump_cli::logging::redact_value;
use pump_cli::mime::mime_for_path;
use pump_core::{StageBoard, all_stages, filter_records, find_stage};
use pump_gateway::{HttpGateway, SheetGateway};
use pump_model::{Attachment, FormSubmission};

use crate::cli::{Cli, ListArgs, StageArgs, SubmitArgs};
use crate::summary::{
    print_columns, print_failures, print_records, print_stages, print_submit_report,
};

/// Which bucket of a stage to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Pending,
    History,
}

/// Merges config file, environment and flags into a ready client.
pub fn connect(cli: &Cli) -> Result<HttpGateway> {
    let mut config = TrackerConfig::load(cli.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok());
    config.apply_overrides(ConfigOverrides {
        endpoint: cli.endpoint.clone(),
        sheet_id: cli.sheet_id.clone(),
        sheet_name: cli.sheet_name.clone(),
    });
    let gateway_config = config.gateway_config()?;
    debug!(
        endpoint = %gateway_config.endpoint,
        sheet = %gateway_config.sheet_name,
        "sheet service configured"
    );
    HttpGateway::new(gateway_config).context("build sheet client")
}

pub fn run_stages() {
    print_stages(all_stages());
}

pub async fn run_columns<G: SheetGateway>(gateway: &G, args: &StageArgs) -> Result<()> {
    let board = load_board(gateway, &args.stage).await?;
    let map = board
        .view()
        .header_map
        .as_ref()
        .ok_or_else(|| anyhow!("could not locate the header row of the sheet"))?;
    print_columns(board.stage(), map);
    Ok(())
}

pub async fn run_list<G: SheetGateway>(gateway: &G, args: &ListArgs, bucket: Bucket) -> Result<()> {
    let board = load_board(gateway, &args.stage.stage).await?;
    let view = board.view();
    let (records, title) = match bucket {
        Bucket::Pending => (&view.bucket.pending, "pending"),
        Bucket::History => (&view.bucket.history, "completed"),
    };
    let shown = filter_records(records, args.search.as_deref().unwrap_or_default());
    print_records(board.stage(), title, &shown);
    Ok(())
}

pub async fn run_submit<G: SheetGateway>(gateway: &G, args: &SubmitArgs) -> Result<()> {
    let board = load_board(gateway, &args.stage.stage).await?;
    let stage = board.stage();

    let selection = board.select(&args.reg_ids);
    for reg_id in &selection.missing {
        warn!(reg_id = %reg_id, stage = stage.key, "no pending record with this id");
        eprintln!("skipped {reg_id}: not pending for {stage}");
    }
    if selection.records.is_empty() {
        bail!("none of the given registration ids is pending for {stage}");
    }
    for record in &selection.records {
        debug!(
            reg_id = %record.reg_id,
            row_index = record.row_index,
            beneficiary = redact_value(record.get("beneficiaryName")),
            "selected for submission"
        );
    }

    let mut form = FormSubmission {
        values: args.values.clone(),
        attachment: None,
    };
    if let Some(path) = &args.file {
        let field = stage
            .document_field
            .ok_or_else(|| anyhow!("{stage} does not take a document"))?;
        form.attachment = Some(read_attachment(path, field, args.mime.as_deref())?);
    }

    let completed_at = Local::now().naive_local();
    match board
        .submit(gateway, &selection.records, &form, completed_at)
        .await
    {
        Ok(report) => {
            info!(stage = stage.key, updated = report.updated.len(), "stage submitted");
            print_submit_report(&report);
        }
        Err(err) => {
            if !err.failures().is_empty() {
                print_failures(err.failures());
            }
            return Err(err.into());
        }
    }
    if !selection.missing.is_empty() {
        bail!(
            "{} of {} registration ids were not pending",
            selection.missing.len(),
            selection.missing.len() + selection.records.len()
        );
    }
    Ok(())
}

async fn load_board<G: SheetGateway>(gateway: &G, query: &str) -> Result<StageBoard> {
    let stage = find_stage(query)?;
    let mut board = StageBoard::new(stage.clone());
    if let Err(err) = board.refresh(gateway).await {
        bail!("{} ({err})", err.user_message());
    }
    Ok(board)
}

fn read_attachment(path: &Path, field: &str, mime: Option<&str>) -> Result<Attachment> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("{} is not a file", path.display()))?;
    let mime_type = mime.map_or_else(|| mime_for_path(path), str::to_string);
    debug!(file = %file_name, mime = %mime_type, size = bytes.len(), "attachment read");
    Ok(Attachment {
        field: field.to_string(),
        file_name,
        mime_type,
        bytes,
    })
}
