//! Enhancement option identifiers.
//!
//! Callers select enhancements by loosely formatted names ("Business Friendly
//! Column Names", "data-quality-rules", ...). Names are normalized to
//! snake_case and resolved to a closed set of identifiers; anything that does
//! not resolve is kept aside and never reaches a prompt.

use serde::{Deserialize, Serialize};

/// A recognized enhancement option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnhancementOption {
    BusinessFriendlyColumnNames,
    IndustrySpecificDescriptions,
    #[serde(rename = "data_governance_&_compliance")]
    DataGovernanceCompliance,
    DataQualityRules,
    TransformationSuggestions,
    BusinessKpiIdentification,
}

impl EnhancementOption {
    /// All recognized options in prompt order.
    pub const ALL: [EnhancementOption; 6] = [
        EnhancementOption::BusinessFriendlyColumnNames,
        EnhancementOption::IndustrySpecificDescriptions,
        EnhancementOption::DataGovernanceCompliance,
        EnhancementOption::DataQualityRules,
        EnhancementOption::TransformationSuggestions,
        EnhancementOption::BusinessKpiIdentification,
    ];

    /// Normalized identifier (lowercase, snake_case).
    pub fn key(&self) -> &'static str {
        match self {
            EnhancementOption::BusinessFriendlyColumnNames => "business_friendly_column_names",
            EnhancementOption::IndustrySpecificDescriptions => "industry_specific_descriptions",
            EnhancementOption::DataGovernanceCompliance => "data_governance_&_compliance",
            EnhancementOption::DataQualityRules => "data_quality_rules",
            EnhancementOption::TransformationSuggestions => "transformation_suggestions",
            EnhancementOption::BusinessKpiIdentification => "business_kpi_identification",
        }
    }

    /// The fixed instruction sentence this option contributes to a prompt.
    pub fn instruction(&self) -> &'static str {
        match self {
            EnhancementOption::BusinessFriendlyColumnNames => {
                "Suggest clear, business-friendly snake_case column names that replace cryptic legacy abbreviations."
            }
            EnhancementOption::IndustrySpecificDescriptions => {
                "Write one to two sentence business descriptions using terminology specific to the industry."
            }
            EnhancementOption::DataGovernanceCompliance => {
                "Identify PII and regulated data and note the compliance requirements that apply to each column."
            }
            EnhancementOption::DataQualityRules => {
                "Propose concrete data quality rules (null checks, ranges, formats, uniqueness) for each column."
            }
            EnhancementOption::TransformationSuggestions => {
                "Suggest transformations, cleansing or standardization steps needed for the target platform."
            }
            EnhancementOption::BusinessKpiIdentification => {
                "Identify business KPIs and metrics each column can support."
            }
        }
    }

    /// Resolves an already-normalized identifier.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.key() == key)
    }
}

impl std::fmt::Display for EnhancementOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Normalizes an option name: lowercase, spaces and hyphens become underscores.
///
/// # Example
///
/// ```rust
/// use schemalift_core::options::normalize_option_name;
///
/// assert_eq!(
///     normalize_option_name("Data Governance & Compliance"),
///     "data_governance_&_compliance"
/// );
/// assert_eq!(normalize_option_name("Data-Quality Rules"), "data_quality_rules");
/// ```
pub fn normalize_option_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// A parsed, deduplicated selection of enhancement options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancementOptions {
    selected: Vec<EnhancementOption>,
    unrecognized: Vec<String>,
}

impl EnhancementOptions {
    /// Parses caller-supplied option names.
    ///
    /// Recognized options keep their first-seen order; duplicates are
    /// dropped. Unrecognized names are normalized, deduplicated and reported
    /// through [`EnhancementOptions::unrecognized`].
    pub fn parse<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        for name in names {
            let normalized = normalize_option_name(name.as_ref());
            if normalized.is_empty() {
                continue;
            }
            match EnhancementOption::from_key(&normalized) {
                Some(option) => {
                    if !options.selected.contains(&option) {
                        options.selected.push(option);
                    }
                }
                None => {
                    if !options.unrecognized.contains(&normalized) {
                        tracing::warn!("Ignoring unrecognized enhancement option '{}'", normalized);
                        options.unrecognized.push(normalized);
                    }
                }
            }
        }
        options
    }

    /// Every recognized option.
    pub fn all() -> Self {
        Self {
            selected: EnhancementOption::ALL.to_vec(),
            unrecognized: Vec::new(),
        }
    }

    /// Recognized options in first-seen order.
    pub fn selected(&self) -> &[EnhancementOption] {
        &self.selected
    }

    /// Normalized names that did not resolve to an option.
    pub fn unrecognized(&self) -> &[String] {
        &self.unrecognized
    }

    /// Whether an option was selected.
    pub fn contains(&self, option: EnhancementOption) -> bool {
        self.selected.contains(&option)
    }

    /// True if no recognized option was selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
