//! Column quality and migration complexity scoring.
//!
//! Two pure functions drive every derived score in an enriched schema:
//! - **Data quality**: a 0.0-1.0 score built from completeness, uniqueness and
//!   PII governance coverage
//! - **Migration complexity**: an additive Low/Medium/High estimate of the
//!   transformation work a column needs
//!
//! # Example
//! ```rust
//! use schemalift_core::models::{ColumnRecord, MigrationComplexity};
//! use schemalift_core::quality::{data_quality_score, migration_complexity};
//!
//! let record = ColumnRecord::new("CUST_ID", "integer")
//!     .with_completeness(100.0)
//!     .with_counts(1000, 1000);
//!
//! let score = data_quality_score(&record, &[], true);
//! assert_eq!(score, 1.0);
//!
//! let complexity = migration_complexity(&record, "customer_id", &[]);
//! assert_eq!(complexity, MigrationComplexity::Medium);
//! ```

mod complexity;
mod score;
mod scorer;

pub use complexity::{complexity_points, has_meaningful_pattern, migration_complexity};
pub use score::{data_quality_score, raw_quality_score};
pub use scorer::ColumnScorer;
