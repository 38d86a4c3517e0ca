use super::categories::extract_categories;
use super::sections::{KeyedSections, Section, SectionSource};
use crate::config::ReportConfig;
use crate::determinism::fingerprint::{canonical_sha256, session_id_ulid};
use crate::error::{CoreError, CoreResult};
use crate::sanitize::value::RawValue;
use crate::sanitize::Sanitizer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{error, info};

pub const EMERGENCY_SUMMARY: &str = "Emergency report - partial data preserved";
pub const EMERGENCY_NEXT_STEP: &str = "Review the error and regenerate the full analysis";

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReportStatus {
    COMPLETE,
    EMERGENCY_CLEAN,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportMetadata {
    pub session_id: String,
    pub generated_at: String, // RFC3339 UTC
    pub engine_version: String,
    pub status: ReportStatus,
    pub modules_included: usize,
    pub clean_report: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CleanReport {
    pub metadata: ReportMetadata,
    pub report_sections: Map<String, Value>,
    pub all_categories_data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<String>,
    /// SHA-256 of the canonical JSON of `report_sections`.
    pub fingerprint_sha256: Option<String>,
}

impl CleanReport {
    pub fn is_emergency(&self) -> bool {
        self.metadata.status == ReportStatus::EMERGENCY_CLEAN
    }

    pub fn to_json_pretty(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Assembles clean reports. Construct one per caller; there is no shared
/// instance.
pub struct ReportGenerator<S = KeyedSections> {
    config: ReportConfig,
    sanitizer: Sanitizer,
    sections: S,
    clock: fn() -> OffsetDateTime,
}

impl ReportGenerator<KeyedSections> {
    pub fn new(config: ReportConfig) -> Self {
        Self::with_sections(config, KeyedSections::new())
    }
}

impl<S: SectionSource> ReportGenerator<S> {
    pub fn with_sections(config: ReportConfig, sections: S) -> Self {
        let sanitizer = Sanitizer::new(config.limits.clone());
        Self {
            config,
            sanitizer,
            sections,
            clock: OffsetDateTime::now_utc,
        }
    }

    /// Fixed clocks make report timestamps reproducible in tests.
    pub fn with_clock(mut self, clock: fn() -> OffsetDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Never fails: a section error yields the emergency report instead.
    pub fn generate_clean_report(&self, data: &RawValue, session_id: Option<&str>) -> CleanReport {
        let session_id = session_id
            .map(str::to_string)
            .unwrap_or_else(session_id_ulid);
        info!(session_id = session_id.as_str(), "generating clean report");

        match self.assemble(data, &session_id) {
            Ok(report) => {
                info!(
                    session_id = session_id.as_str(),
                    modules_included = report.metadata.modules_included,
                    "clean report generated"
                );
                report
            }
            Err(err) => {
                error!(session_id = session_id.as_str(), error = %err, "clean report failed, emitting emergency report");
                self.emergency_report(&session_id, &err)
            }
        }
    }

    fn assemble(&self, data: &RawValue, session_id: &str) -> CoreResult<CleanReport> {
        let cleaned = self.sanitizer.sanitize(data);

        let mut sections = Map::new();
        for section in Section::ALL {
            let value = self.sections.section(section, &cleaned)?;
            sections.insert(section.key().to_string(), value);
        }
        let modules_included = sections.values().filter(|v| is_populated(v)).count();
        let fingerprint = canonical_sha256(&sections)?;

        Ok(CleanReport {
            metadata: ReportMetadata {
                session_id: session_id.to_string(),
                generated_at: self.now_rfc3339_utc(),
                engine_version: self.config.engine_version.clone(),
                status: ReportStatus::COMPLETE,
                modules_included,
                clean_report: true,
                error: None,
            },
            report_sections: sections,
            all_categories_data: extract_categories(&cleaned),
            next_steps: None,
            fingerprint_sha256: Some(fingerprint),
        })
    }

    fn emergency_report(&self, session_id: &str, err: &CoreError) -> CleanReport {
        let mut sections = Map::new();
        sections.insert(
            Section::ExecutiveSummary.key().to_string(),
            Value::String(EMERGENCY_SUMMARY.to_string()),
        );
        let fingerprint = canonical_sha256(&sections).ok();
        CleanReport {
            metadata: ReportMetadata {
                session_id: session_id.to_string(),
                generated_at: self.now_rfc3339_utc(),
                engine_version: self.config.engine_version.clone(),
                status: ReportStatus::EMERGENCY_CLEAN,
                modules_included: 0,
                clean_report: true,
                error: Some(err.to_string()),
            },
            report_sections: sections,
            all_categories_data: Value::Object(Map::new()),
            next_steps: Some(EMERGENCY_NEXT_STEP.to_string()),
            fingerprint_sha256: fingerprint,
        }
    }

    fn now_rfc3339_utc(&self) -> String {
        (self.clock)().format(&Rfc3339).unwrap_or_default()
    }
}

/// Truthiness of a section value: null, false, zero and empty containers or
/// strings do not count as an included module.
fn is_populated(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
