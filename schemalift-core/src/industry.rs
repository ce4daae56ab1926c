//! Industry context table.
//!
//! The table is an immutable value built once (usually via
//! [`IndustryContextTable::builtin`]) and handed to the enricher, so tests can
//! substitute their own profiles.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Industries with a built-in context profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Industry {
    FinancialServices,
    Healthcare,
    RetailEcommerce,
    OnlineTravelAgency,
    /// Unrecognized or unspecified industry
    General,
}

impl Industry {
    /// Resolves a display label into an industry.
    ///
    /// Matching is case-insensitive on the canonical labels. Anything else,
    /// including `"General"`, resolves to [`Industry::General`].
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "financial services" => Self::FinancialServices,
            "healthcare" => Self::Healthcare,
            "retail/e-commerce" => Self::RetailEcommerce,
            "online travel agency (ota)" => Self::OnlineTravelAgency,
            _ => Self::General,
        }
    }

    /// Canonical display label.
    pub fn label(&self) -> &'static str {
        match self {
            Industry::FinancialServices => "Financial Services",
            Industry::Healthcare => "Healthcare",
            Industry::RetailEcommerce => "Retail/E-commerce",
            Industry::OnlineTravelAgency => "Online Travel Agency (OTA)",
            Industry::General => "General",
        }
    }
}

impl std::fmt::Display for Industry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Patterns, compliance frameworks and metrics characteristic of an industry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryProfile {
    pub common_patterns: Vec<String>,
    pub compliance_requirements: Vec<String>,
    pub key_metrics: Vec<String>,
}

impl IndustryProfile {
    fn from_static(patterns: &[&str], compliance: &[&str], metrics: &[&str]) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect();
        Self {
            common_patterns: owned(patterns),
            compliance_requirements: owned(compliance),
            key_metrics: owned(metrics),
        }
    }
}

/// Immutable mapping from industry to its context profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryContextTable {
    profiles: BTreeMap<Industry, IndustryProfile>,
}

impl IndustryContextTable {
    /// Creates an empty table; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder method to register a profile.
    ///
    /// Profiles for [`Industry::General`] are ignored: unrecognized industries
    /// never receive an industry-specific prompt section.
    pub fn with_profile(mut self, industry: Industry, profile: IndustryProfile) -> Self {
        if industry != Industry::General {
            self.profiles.insert(industry, profile);
        }
        self
    }

    /// The four built-in industry profiles.
    pub fn builtin() -> Self {
        Self::empty()
            .with_profile(
                Industry::FinancialServices,
                IndustryProfile::from_static(
                    &["acct", "txn", "amt", "bal", "cust_id", "acct_nbr"],
                    &["PCI DSS", "SOX", "GDPR", "CCPA", "KYC", "AML", "BASEL III"],
                    &[
                        "Net Interest Margin",
                        "Loan Default Rate",
                        "Customer Acquisition Cost",
                        "Assets Under Management",
                    ],
                ),
            )
            .with_profile(
                Industry::Healthcare,
                IndustryProfile::from_static(
                    &["pt", "dx", "proc", "prov", "dos", "icd", "cpt"],
                    &["HIPAA", "HITECH", "FDA 21 CFR Part 11", "GDPR"],
                    &[
                        "Readmission Rate",
                        "Average Length of Stay",
                        "Patient Satisfaction Score",
                        "Claim Denial Rate",
                    ],
                ),
            )
            .with_profile(
                Industry::RetailEcommerce,
                IndustryProfile::from_static(
                    &["cust", "prod", "sku", "ord", "qty", "price"],
                    &["PCI DSS", "GDPR", "CCPA", "COPPA", "CAN-SPAM Act"],
                    &[
                        "Average Order Value",
                        "Conversion Rate",
                        "Customer Lifetime Value",
                        "Inventory Turnover",
                    ],
                ),
            )
            .with_profile(
                Industry::OnlineTravelAgency,
                IndustryProfile::from_static(
                    &["bkng", "prop", "guest", "rate", "checkin", "checkout", "dest"],
                    &[
                        "GDPR",
                        "PCI DSS",
                        "CCPA",
                        "Package Travel Directive",
                        "Price Transparency Laws",
                        "Data Localization Laws",
                    ],
                    &[
                        "Booking Conversion Rate",
                        "Cancellation Rate",
                        "Average Daily Rate",
                        "Revenue per Available Room",
                        "Commission Revenue",
                    ],
                ),
            )
    }

    /// Looks up the profile for an industry label.
    ///
    /// Returns `None` for unrecognized industries and for `General`.
    pub fn lookup(&self, label: &str) -> Option<&IndustryProfile> {
        self.profiles.get(&Industry::from_label(label))
    }

    /// Number of registered profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// True if no profile is registered.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
