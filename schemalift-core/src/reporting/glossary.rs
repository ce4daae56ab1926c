//! Business glossary entries.

use serde::{Deserialize, Serialize};

use crate::industry::Industry;
use crate::models::{BusinessImportance, EnhancedColumn};

/// A business glossary entry for one enriched column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    pub business_name: String,
    pub business_definition: String,
    pub business_context: String,
    pub data_steward: String,
    pub business_owner: String,
    pub usage_guidelines: String,
    pub related_metrics: Vec<String>,
}

impl GlossaryEntry {
    /// Builds a glossary entry for a column within an industry.
    pub fn from_column(column: &EnhancedColumn, industry: &str) -> Self {
        let business_name = if column.suggested_name.trim().is_empty() {
            column.column_name().to_string()
        } else {
            column.suggested_name.clone()
        };

        let related_metrics = if column.potential_kpis.is_empty() {
            default_metrics(column.column_name(), industry)
        } else {
            column.potential_kpis.clone()
        };

        Self {
            business_name,
            business_definition: column.business_description.clone(),
            business_context: column.industry_context.clone(),
            data_steward: format!("{} Data Team", industry),
            business_owner: format!("{} Business Unit", industry),
            usage_guidelines: usage_guidelines(column),
            related_metrics,
        }
    }
}

/// Glossary entries for every column of an enriched schema.
pub fn build_glossary(columns: &[EnhancedColumn], industry: &str) -> Vec<GlossaryEntry> {
    columns
        .iter()
        .map(|column| GlossaryEntry::from_column(column, industry))
        .collect()
}

fn usage_guidelines(column: &EnhancedColumn) -> String {
    let mut guidelines = Vec::new();

    if column.original.potential_pii {
        guidelines.push("Requires approval for access due to PII content");
    }
    if column.business_importance == BusinessImportance::High {
        guidelines.push("Critical business field - changes require business approval");
    }
    if !column.compliance_notes.trim().is_empty() {
        guidelines.push("Subject to regulatory compliance requirements");
    }

    if guidelines.is_empty() {
        "Standard business data usage applies".to_string()
    } else {
        guidelines.join("; ")
    }
}

fn metrics(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn default_metrics(column_name: &str, industry: &str) -> Vec<String> {
    let name = column_name.to_lowercase();
    let has = |marker: &str| name.contains(marker);

    if Industry::from_label(industry) == Industry::OnlineTravelAgency {
        return if has("booking") {
            metrics(&[
                "Booking Conversion Rate",
                "Cancellation Rate",
                "Revenue per Booking",
            ])
        } else if has("commission") || has("revenue") {
            metrics(&[
                "Average Commission Rate",
                "Partner Revenue",
                "Margin Analysis",
            ])
        } else if has("guest") || has("customer") {
            metrics(&[
                "Guest Satisfaction Score",
                "Repeat Booking Rate",
                "Customer Lifetime Value",
            ])
        } else if has("property") {
            metrics(&[
                "Property Performance Score",
                "Occupancy Rate",
                "Average Daily Rate",
            ])
        } else if has("search") {
            metrics(&[
                "Search Conversion Rate",
                "Click-through Rate",
                "Abandonment Rate",
            ])
        } else {
            Vec::new()
        };
    }

    if has("revenue") || has("sales") {
        metrics(&[
            "Monthly Revenue",
            "Year-over-Year Growth",
            "Revenue per Customer",
        ])
    } else if has("customer") && has("id") {
        metrics(&[
            "Customer Count",
            "Customer Acquisition Rate",
            "Customer Retention",
        ])
    } else if has("order") {
        metrics(&[
            "Order Volume",
            "Average Order Value",
            "Order Conversion Rate",
        ])
    } else if has("product") {
        metrics(&[
            "Product Performance",
            "Inventory Turnover",
            "Product Profitability",
        ])
    } else {
        Vec::new()
    }
}
