//! Post-enrichment reporting.
//!
//! Everything here reads an enriched schema and never modifies it:
//! - **Checklist**: counts that drive migration task lists
//! - **Naming**: target-platform identifier validation
//! - **Summary**: project metrics and migration readiness
//! - **Glossary**: business glossary entries per column

mod checklist;
mod glossary;
mod naming;
mod summary;

pub use checklist::{ChecklistCounts, migration_checklist};
pub use glossary::{GlossaryEntry, build_glossary};
pub use naming::{
    NamingReport, PlatformRules, RESERVED_WORDS, TargetPlatform, validate_column_names,
    validate_schema_names,
};
pub use summary::{
    BusinessImpact, MigrationReadiness, ProjectSummary, ReadinessLevel, SchemaMetrics,
};
