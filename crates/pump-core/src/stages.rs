//! The eight sentinel stages of the beneficiary pipeline.
//!
//! Registration creates the row and carries no sentinel pair, so the catalog
//! starts at LOI/MR (`planned1` / `actual1`). Every stage projects the common
//! beneficiary columns plus its own form fields.

use std::sync::LazyLock;

use pump_map::DEFAULT_REQUIRED_HEADERS;
use pump_model::{ColumnRule, ModelError, StageDefinition};

// ============================================================================
// Common beneficiary columns
// ============================================================================

const COMMON_RULES: &[ColumnRule] = &[
    ColumnRule::new(
        "regId",
        &[&["regid"], &["registration", "id"], &["registration", "no"]],
    ),
    ColumnRule::new("beneficiaryName", &[&["beneficiary", "name"], &["farmer", "name"]]),
    ColumnRule::new("fatherName", &[&["father"], &["husband"]]),
    ColumnRule::new("village", &[&["village"]]),
    ColumnRule::new("block", &[&["block"], &["tehsil"]]),
    ColumnRule::new("district", &[&["district"]]),
    ColumnRule::new("mobile", &[&["mobile"], &["phone"], &["contact"]]),
    ColumnRule::new("pumpCapacity", &[&["pump", "capacity"], &["capacity"]]),
];

/// Projected by every stage, in display order.
pub const COMMON_FIELDS: &[&str] = &[
    "regId",
    "beneficiaryName",
    "fatherName",
    "village",
    "block",
    "district",
    "mobile",
    "pumpCapacity",
];

// ============================================================================
// Stage-specific columns
// ============================================================================

const LOI_MR_RULES: &[ColumnRule] = &[
    ColumnRule::new("loiNo", &[&["loi", "no"], &["loi", "number"]]),
    ColumnRule::new("loiDate", &[&["loi", "date"]]),
    ColumnRule::new("mrNo", &[&["mr", "no"], &["money", "receipt", "no"]]),
    ColumnRule::new("mrDate", &[&["mr", "date"], &["money", "receipt", "date"]]),
    ColumnRule::new("mrAmount", &[&["mr", "amount"], &["money", "receipt", "amount"]]),
    ColumnRule::new("loiLink", &[&["loi", "link"], &["loi", "file"], &["loi", "doc"]]),
    ColumnRule::new("planned1", &[&["planned1"]]),
    ColumnRule::new("actual1", &[&["actual1"]]),
];

const SANCTION_RULES: &[ColumnRule] = &[
    ColumnRule::new("sanctionNo", &[&["sanction", "no"], &["sanction", "number"]]),
    ColumnRule::new("sanctionDate", &[&["sanction", "date"]]),
    ColumnRule::new("vendorName", &[&["vendor"], &["supplier"]]),
    ColumnRule::new(
        "sanctionLink",
        &[&["sanction", "link"], &["sanction", "letter"]],
    ),
    ColumnRule::new("planned2", &[&["planned2"]]),
    ColumnRule::new("actual2", &[&["actual2"]]),
];

const FOUNDATION_RULES: &[ColumnRule] = &[
    ColumnRule::new(
        "fdMaterialAgeing",
        &[&["fd", "material", "ageing"], &["material", "ageing"], &["material", "aging"]],
    ),
    ColumnRule::new("fdDate", &[&["fd", "date"], &["foundation", "date"]]),
    ColumnRule::new("fdRemarks", &[&["fd", "remark"], &["foundation", "remark"]]),
    ColumnRule::new("challanLink", &[&["fd", "challan"], &["challan"]])
        .excluding(&["installation"]),
    ColumnRule::new("planned3", &[&["planned3"]]),
    ColumnRule::new("actual3", &[&["actual3"]]),
];

// The foundation challan is resolved first so the installation challan can
// steer clear of its column when both headers only say "Challan". It never
// takes a header naming the installation challan.
const INSTALLATION_RULES: &[ColumnRule] = &[
    ColumnRule::new("challanLink", &[&["fd", "challan"], &["challan"]])
        .excluding(&["installation"]),
    ColumnRule::new(
        "installationChallanLink",
        &[&["installation", "challan"], &["challan"]],
    )
    .distinct_from(&["challanLink"]),
    ColumnRule::new("installationDate", &[&["installation", "date"]]),
    ColumnRule::new("pumpSerialNo", &[&["pump", "serial"]]),
    ColumnRule::new("motorSerialNo", &[&["motor", "serial"]]),
    ColumnRule::new("panelSerialNo", &[&["panel", "serial"], &["controller", "serial"]]),
    ColumnRule::new("planned4", &[&["planned4"]]),
    ColumnRule::new("actual4", &[&["actual4"]]),
];

const INSURANCE_RULES: &[ColumnRule] = &[
    ColumnRule::new("insuranceNo", &[&["insurance", "no"], &["policy", "no"]]),
    ColumnRule::new("insuranceDate", &[&["insurance", "date"], &["policy", "date"]]),
    ColumnRule::new(
        "insuranceLink",
        &[&["insurance", "link"], &["policy", "link"], &["insurance", "doc"]],
    ),
    ColumnRule::new("planned5", &[&["planned5"]]),
    ColumnRule::new("actual5", &[&["actual5"]]),
];

const JCC_COMPLETION_RULES: &[ColumnRule] = &[
    ColumnRule::new("jccNo", &[&["jcc", "no"], &["jcc", "number"]]),
    ColumnRule::new("jccDate", &[&["jcc", "date"]]),
    ColumnRule::new("jccLink", &[&["jcc", "link"], &["jcc", "doc"]]),
    ColumnRule::new("planned6", &[&["planned6"]]),
    ColumnRule::new("actual6", &[&["actual6"]]),
];

const JCC_STATUS_RULES: &[ColumnRule] = &[
    ColumnRule::new("jccNo", &[&["jcc", "no"], &["jcc", "number"]]),
    ColumnRule::new("jccDate", &[&["jcc", "date"]]),
    ColumnRule::new("jccStatus", &[&["jcc", "status"]]),
    ColumnRule::new("jccRemarks", &[&["jcc", "remark"]]),
    ColumnRule::new("planned7", &[&["planned7"]]),
    ColumnRule::new("actual7", &[&["actual7"]]),
];

const PAYMENT_RULES: &[ColumnRule] = &[
    ColumnRule::new("paymentAmount", &[&["payment", "amount"], &["amount", "paid"]]),
    ColumnRule::new("paymentDate", &[&["payment", "date"]]),
    ColumnRule::new("utrNo", &[&["utr"], &["transaction", "ref"]]),
    ColumnRule::new("paymentLink", &[&["payment", "link"], &["payment", "proof"]]),
    ColumnRule::new("planned8", &[&["planned8"]]),
    ColumnRule::new("actual8", &[&["actual8"]]),
];

struct StageTemplate {
    number: u8,
    key: &'static str,
    name: &'static str,
    placeholder: &'static str,
    rules: &'static [ColumnRule],
    shown: &'static [&'static str],
    editable: &'static [&'static str],
    document_field: Option<&'static str>,
    planned_field: &'static str,
    actual_field: &'static str,
}

impl StageTemplate {
    fn build(&self) -> StageDefinition {
        let mut rules = COMMON_RULES.to_vec();
        rules.extend_from_slice(self.rules);
        let mut projected = COMMON_FIELDS.to_vec();
        projected.extend_from_slice(self.shown);
        StageDefinition {
            number: self.number,
            key: self.key,
            name: self.name,
            placeholder: self.placeholder,
            required_headers: DEFAULT_REQUIRED_HEADERS,
            rules,
            projected,
            editable: self.editable.to_vec(),
            document_field: self.document_field,
            planned_field: self.planned_field,
            actual_field: self.actual_field,
        }
    }
}

const STAGE_TEMPLATES: &[StageTemplate] = &[
    StageTemplate {
        number: 1,
        key: "loi-mr",
        name: "LOI / MR",
        placeholder: "",
        rules: LOI_MR_RULES,
        shown: &["loiNo", "loiDate", "mrNo", "mrDate", "mrAmount", "loiLink"],
        editable: &["loiNo", "loiDate", "mrNo", "mrDate", "mrAmount"],
        document_field: Some("loiLink"),
        planned_field: "planned1",
        actual_field: "actual1",
    },
    StageTemplate {
        number: 2,
        key: "sanction",
        name: "Sanction",
        placeholder: "",
        rules: SANCTION_RULES,
        shown: &["sanctionNo", "sanctionDate", "vendorName", "sanctionLink"],
        editable: &["sanctionNo", "sanctionDate", "vendorName"],
        document_field: Some("sanctionLink"),
        planned_field: "planned2",
        actual_field: "actual2",
    },
    StageTemplate {
        number: 3,
        key: "foundation",
        name: "Foundation",
        placeholder: "",
        rules: FOUNDATION_RULES,
        shown: &["fdMaterialAgeing", "fdDate", "fdRemarks", "challanLink"],
        editable: &["fdMaterialAgeing", "fdDate", "fdRemarks"],
        document_field: Some("challanLink"),
        planned_field: "planned3",
        actual_field: "actual3",
    },
    StageTemplate {
        number: 4,
        key: "installation",
        name: "Installation",
        placeholder: "-",
        rules: INSTALLATION_RULES,
        shown: &[
            "installationDate",
            "pumpSerialNo",
            "motorSerialNo",
            "panelSerialNo",
            "installationChallanLink",
        ],
        editable: &[
            "installationDate",
            "pumpSerialNo",
            "motorSerialNo",
            "panelSerialNo",
        ],
        document_field: Some("installationChallanLink"),
        planned_field: "planned4",
        actual_field: "actual4",
    },
    StageTemplate {
        number: 5,
        key: "insurance",
        name: "Insurance",
        placeholder: "-",
        rules: INSURANCE_RULES,
        shown: &["insuranceNo", "insuranceDate", "insuranceLink"],
        editable: &["insuranceNo", "insuranceDate"],
        document_field: Some("insuranceLink"),
        planned_field: "planned5",
        actual_field: "actual5",
    },
    StageTemplate {
        number: 6,
        key: "jcc-completion",
        name: "JCC Completion",
        placeholder: "-",
        rules: JCC_COMPLETION_RULES,
        shown: &["jccNo", "jccDate", "jccLink"],
        editable: &["jccNo", "jccDate"],
        document_field: Some("jccLink"),
        planned_field: "planned6",
        actual_field: "actual6",
    },
    StageTemplate {
        number: 7,
        key: "jcc-status",
        name: "JCC Status",
        placeholder: "-",
        rules: JCC_STATUS_RULES,
        shown: &["jccNo", "jccDate", "jccStatus", "jccRemarks"],
        editable: &["jccStatus", "jccRemarks"],
        document_field: None,
        planned_field: "planned7",
        actual_field: "actual7",
    },
    StageTemplate {
        number: 8,
        key: "payment",
        name: "Payment",
        placeholder: "-",
        rules: PAYMENT_RULES,
        shown: &["paymentAmount", "paymentDate", "utrNo", "paymentLink"],
        editable: &["paymentAmount", "paymentDate", "utrNo"],
        document_field: Some("paymentLink"),
        planned_field: "planned8",
        actual_field: "actual8",
    },
];

static STAGES: LazyLock<Vec<StageDefinition>> =
    LazyLock::new(|| STAGE_TEMPLATES.iter().map(StageTemplate::build).collect());

/// All pipeline stages in pipeline order.
#[must_use]
pub fn all_stages() -> &'static [StageDefinition] {
    &STAGES
}

/// Looks a stage up by key (`foundation`), number (`3`) or display name.
pub fn find_stage(query: &str) -> Result<&'static StageDefinition, ModelError> {
    all_stages()
        .iter()
        .find(|stage| stage.matches(query))
        .ok_or_else(|| ModelError::UnknownStage(query.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_numbered_in_pipeline_order() {
        let numbers: Vec<u8> = all_stages().iter().map(|stage| stage.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn every_stage_resolves_its_sentinels_and_fields() {
        for stage in all_stages() {
            assert_eq!(stage.planned_field, format!("planned{}", stage.number));
            assert_eq!(stage.actual_field, format!("actual{}", stage.number));
            assert!(stage.rule(stage.planned_field).is_some(), "{stage}");
            assert!(stage.rule(stage.actual_field).is_some(), "{stage}");
            for field in stage.projected.iter().chain(&stage.editable) {
                assert!(stage.rule(field).is_some(), "{stage}: {field}");
            }
            if let Some(field) = stage.document_field {
                assert!(stage.rule(field).is_some(), "{stage}: {field}");
                assert!(stage.is_editable(field));
            }
            assert!(!stage.is_editable(stage.actual_field));
        }
    }

    #[test]
    fn later_stages_use_dash_placeholder() {
        assert_eq!(find_stage("foundation").unwrap().placeholder, "");
        assert_eq!(find_stage("installation").unwrap().placeholder, "-");
    }

    #[test]
    fn finds_stage_by_key_number_or_name() {
        assert_eq!(find_stage("foundation").unwrap().number, 3);
        assert_eq!(find_stage("3").unwrap().key, "foundation");
        assert_eq!(find_stage("jcc status").unwrap().number, 7);
        assert_eq!(find_stage("JCC-STATUS").unwrap().number, 7);
        assert!(matches!(
            find_stage("registration"),
            Err(ModelError::UnknownStage(_))
        ));
    }
}
