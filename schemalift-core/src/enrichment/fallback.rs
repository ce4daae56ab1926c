//! Heuristic enrichment used when the model cannot produce a usable chunk.
//!
//! Everything here is deterministic: the same column and industry always
//! produce the same suggested name and description.

use crate::models::{BusinessImportance, ColumnRecord, EnhancedColumn, ProjectContext};
use crate::quality::ColumnScorer;

/// Confidence reported for heuristic enrichment.
pub const FALLBACK_CONFIDENCE: f64 = 0.6;

/// Ordered suffix rewrites; the first match wins.
const SUFFIX_RULES: [(&str, &str); 8] = [
    ("_id_nbr", "_id"),
    ("_nbr", "_number"),
    ("_amt", "_amount"),
    ("_dt", "_date"),
    ("_cd", "_code"),
    ("_qty", "_quantity"),
    ("_desc", "_description"),
    ("_flg", "_flag"),
];

/// Ordered prefix rewrites; the first match wins.
const PREFIX_RULES: [(&str, &str); 3] = [
    ("cust_", "customer_"),
    ("prod_", "product_"),
    ("txn_", "transaction_"),
];

const CUSTOMER_MARKERS: [&str; 4] = ["cust", "customer", "client", "guest"];
const ORDER_MARKERS: [&str; 4] = ["order", "bkng", "booking", "reservation"];
const PRODUCT_MARKERS: [&str; 3] = ["prod", "product", "item"];
const AMOUNT_MARKERS: [&str; 2] = ["amount", "amt"];
const DATE_MARKERS: [&str; 2] = ["date", "dt"];

/// Naive rename of a legacy column name.
///
/// The name is lowercased, then at most one suffix rule and at most one
/// prefix rule are applied.
///
/// # Example
/// ```rust
/// use schemalift_core::enrichment::heuristic_column_name;
///
/// assert_eq!(heuristic_column_name("BKNG_ID_NBR"), "bkng_id");
/// assert_eq!(heuristic_column_name("CUST_NBR"), "customer_number");
/// assert_eq!(heuristic_column_name("Status"), "status");
/// ```
pub fn heuristic_column_name(column_name: &str) -> String {
    let mut name = column_name.trim().to_lowercase();

    if let Some((suffix, replacement)) = SUFFIX_RULES
        .iter()
        .find(|(suffix, _)| name.ends_with(suffix) && name.len() > suffix.len())
    {
        name.truncate(name.len().saturating_sub(suffix.len()));
        name.push_str(replacement);
    }

    if let Some((prefix, replacement)) = PREFIX_RULES
        .iter()
        .find(|(prefix, _)| name.starts_with(prefix) && name.len() > prefix.len())
    {
        name = format!("{}{}", replacement, &name[prefix.len()..]);
    }

    name
}

/// Heuristic business description for a column.
pub fn heuristic_description(column_name: &str, industry: &str) -> String {
    let name = column_name.to_lowercase();
    let has_any = |markers: &[&str]| markers.iter().any(|marker| name.contains(marker));

    if has_any(&CUSTOMER_MARKERS) {
        "Customer-related data".to_string()
    } else if has_any(&ORDER_MARKERS) {
        format!("Order/booking information for {}", industry)
    } else if has_any(&PRODUCT_MARKERS) {
        format!("Product/service data for {}", industry)
    } else if has_any(&AMOUNT_MARKERS) {
        format!("Financial amount for {} transactions", industry)
    } else if has_any(&DATE_MARKERS) {
        format!("Date/time field for {} operations", industry)
    } else {
        format!("{} operational data field", industry)
    }
}

/// Enriches a column without a model call.
pub fn fallback_column(
    record: &ColumnRecord,
    context: &ProjectContext,
    scorer: &ColumnScorer,
) -> EnhancedColumn {
    let industry = context.industry.as_str();

    let mut compliance_notes =
        format!("Review against {} data governance requirements", industry);
    if record.potential_pii {
        compliance_notes.push_str("; potential PII requires access controls");
    }

    let mut column = EnhancedColumn {
        original: record.clone(),
        original_name: record.column_name.clone(),
        suggested_name: heuristic_column_name(&record.column_name),
        business_description: heuristic_description(&record.column_name, industry),
        industry_context: format!("Standard {} data element", industry),
        compliance_notes,
        data_quality_rules: vec![
            "Validate completeness".to_string(),
            "Check data type consistency".to_string(),
        ],
        transformation_suggestions: vec![
            "Standardize column naming".to_string(),
            "Review data types for target platform".to_string(),
        ],
        business_importance: BusinessImportance::Medium,
        potential_kpis: Vec::new(),
        modernization_notes: format!(
            "Heuristic enrichment; review before migrating to {}",
            context.target
        ),
        confidence_score: FALLBACK_CONFIDENCE,
        enhanced: true,
        industry: industry.to_string(),
        fallback_used: true,
        data_quality_score: 0.0,
        migration_complexity: Default::default(),
    };
    scorer.score(&mut column);
    column
}

/// Enriches every column of a chunk without a model call.
pub fn fallback_chunk(
    columns: &[ColumnRecord],
    context: &ProjectContext,
    scorer: &ColumnScorer,
) -> Vec<EnhancedColumn> {
    columns
        .iter()
        .map(|record| fallback_column(record, context, scorer))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MigrationComplexity;
    use proptest::prelude::*;

    #[test]
    fn test_heuristic_names() {
        assert_eq!(heuristic_column_name("BKNG_ID_NBR"), "bkng_id");
        assert_eq!(heuristic_column_name("TOT_AMT"), "tot_amount");
        assert_eq!(heuristic_column_name("ORD_DT"), "ord_date");
        assert_eq!(heuristic_column_name("STATUS_CD"), "status_code");
        assert_eq!(heuristic_column_name("CUST_NBR"), "customer_number");
        assert_eq!(heuristic_column_name("prod_desc"), "product_description");
        assert_eq!(heuristic_column_name("TXN_QTY"), "transaction_quantity");
        assert_eq!(heuristic_column_name("ACTIVE_FLG"), "active_flag");
        assert_eq!(heuristic_column_name("email"), "email");
    }

    #[test]
    fn test_rule_needs_a_stem() {
        assert_eq!(heuristic_column_name("_AMT"), "_amt");
        assert_eq!(heuristic_column_name("CUST_"), "cust_");
    }

    #[test]
    fn test_descriptions_follow_marker_order() {
        let ota = "Online Travel Agency (OTA)";
        assert_eq!(
            heuristic_description("GUEST_BKNG_ID", ota),
            "Customer-related data"
        );
        assert_eq!(
            heuristic_description("BKNG_ID_NBR", ota),
            "Order/booking information for Online Travel Agency (OTA)"
        );
        assert_eq!(
            heuristic_description("ITEM_SKU", "Retail/E-commerce"),
            "Product/service data for Retail/E-commerce"
        );
        assert_eq!(
            heuristic_description("TOT_AMT", "General"),
            "Financial amount for General transactions"
        );
        assert_eq!(
            heuristic_description("LAST_UPD_DT", "Healthcare"),
            "Date/time field for Healthcare operations"
        );
        assert_eq!(
            heuristic_description("STATUS", "Healthcare"),
            "Healthcare operational data field"
        );
    }

    #[test]
    fn test_booking_scenario() {
        let record = ColumnRecord::new("BKNG_ID_NBR", "string")
            .with_completeness(98.0)
            .with_counts(9900, 10000);
        let context = ProjectContext::for_industry("Online Travel Agency (OTA)");

        let column = fallback_column(&record, &context, &ColumnScorer::default());

        assert_eq!(column.suggested_name, "bkng_id");
        assert_eq!(
            column.business_description,
            "Order/booking information for Online Travel Agency (OTA)"
        );
        assert_eq!(column.original_name, "BKNG_ID_NBR");
        assert_eq!(column.business_importance, BusinessImportance::Medium);
        assert_eq!(column.confidence_score, FALLBACK_CONFIDENCE);
        assert!(column.enhanced);
        assert!(column.fallback_used);
        assert_eq!(column.industry, "Online Travel Agency (OTA)");
        assert_eq!(column.data_quality_score, 1.0);
        // rename + two rules
        assert_eq!(column.migration_complexity, MigrationComplexity::High);
    }

    #[test]
    fn test_fallback_chunk_preserves_order() {
        let records = vec![
            ColumnRecord::new("A_DT", "date"),
            ColumnRecord::new("B_AMT", "float"),
            ColumnRecord::new("C", "string"),
        ];
        let output = fallback_chunk(&records, &ProjectContext::default(), &ColumnScorer::default());
        let names: Vec<&str> = output.iter().map(|c| c.column_name()).collect();
        assert_eq!(names, vec!["A_DT", "B_AMT", "C"]);
    }

    proptest! {
        #[test]
        fn prop_fallback_is_deterministic(name in "[A-Za-z_]{1,24}", industry in "[A-Za-z ]{0,16}") {
            let record = ColumnRecord::new(name, "string");
            let context = ProjectContext::for_industry(industry);
            let scorer = ColumnScorer::default();

            let first = fallback_column(&record, &context, &scorer);
            let second = fallback_column(&record, &context, &scorer);
            prop_assert_eq!(first, second);
        }
    }
}
