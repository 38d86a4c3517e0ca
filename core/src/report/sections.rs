use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    ExecutiveSummary,
    Avatar,
    PsychologicalArsenal,
    MarketResearch,
    Competition,
    Insights,
    Predictions,
    SalesFunnel,
    Keywords,
    ImplementationStrategy,
    PerformanceMetrics,
    ArchaeologicalAnalysis,
    ForensicMetrics,
    ActionPlan,
}

impl Section {
    /// Report order.
    pub const ALL: [Section; 14] = [
        Section::ExecutiveSummary,
        Section::Avatar,
        Section::PsychologicalArsenal,
        Section::MarketResearch,
        Section::Competition,
        Section::Insights,
        Section::Predictions,
        Section::SalesFunnel,
        Section::Keywords,
        Section::ImplementationStrategy,
        Section::PerformanceMetrics,
        Section::ArchaeologicalAnalysis,
        Section::ForensicMetrics,
        Section::ActionPlan,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Section::ExecutiveSummary => "executive_summary",
            Section::Avatar => "avatar",
            Section::PsychologicalArsenal => "psychological_arsenal",
            Section::MarketResearch => "market_research",
            Section::Competition => "competition",
            Section::Insights => "insights",
            Section::Predictions => "predictions",
            Section::SalesFunnel => "sales_funnel",
            Section::Keywords => "keywords",
            Section::ImplementationStrategy => "implementation_strategy",
            Section::PerformanceMetrics => "performance_metrics",
            Section::ArchaeologicalAnalysis => "archaeological_analysis",
            Section::ForensicMetrics => "forensic_metrics",
            Section::ActionPlan => "action_plan",
        }
    }
}

/// Builds one report section from the sanitized analysis data.
pub trait SectionSource {
    fn section(&self, section: Section, data: &Value) -> CoreResult<Value>;
}

/// Lifts each section out of the sanitized data by key.
///
/// A section looks at its own key first, then at any aliases registered for
/// it, and resolves to an empty object when none is present.
#[derive(Debug, Clone, Default)]
pub struct KeyedSections {
    aliases: BTreeMap<Section, Vec<String>>,
}

impl KeyedSections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alias(mut self, section: Section, key: impl Into<String>) -> Self {
        self.aliases.entry(section).or_default().push(key.into());
        self
    }

    fn candidate_keys(&self, section: Section) -> impl Iterator<Item = &str> {
        std::iter::once(section.key()).chain(
            self.aliases
                .get(&section)
                .into_iter()
                .flat_map(|keys| keys.iter().map(String::as_str)),
        )
    }
}

impl SectionSource for KeyedSections {
    fn section(&self, section: Section, data: &Value) -> CoreResult<Value> {
        let root = data.as_object().ok_or_else(|| CoreError::Section {
            section: section.key().to_string(),
            reason: "analysis data is not a mapping".to_string(),
        })?;
        Ok(self
            .candidate_keys(section)
            .find_map(|key| root.get(key))
            .cloned()
            .unwrap_or_else(|| Value::Object(serde_json::Map::new())))
    }
}
