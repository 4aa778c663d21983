// Lineage search filters

use super::mapping::LineageMapping;
use crate::types::{active, contains_ignore_case};
use serde::{Deserialize, Serialize};

/// Lineage search. Every populated field must match; empty fields match all.
///
/// `schema` and `table` are compared to the target case-insensitively as
/// whole names. `column` and `change_ref` are case-insensitive substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageFilter {
    pub schema: Option<String>,
    pub table: Option<String>,
    pub column: Option<String>,
    pub change_ref: Option<String>,
}

impl LineageFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.to_string());
        self
    }

    pub fn table(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    pub fn column(mut self, column: &str) -> Self {
        self.column = Some(column.to_string());
        self
    }

    pub fn change_ref(mut self, change_ref: &str) -> Self {
        self.change_ref = Some(change_ref.to_string());
        self
    }

    /// True when no field restricts the result
    pub fn is_empty(&self) -> bool {
        active(&self.schema).is_none()
            && active(&self.table).is_none()
            && active(&self.column).is_none()
            && active(&self.change_ref).is_none()
    }

    pub fn matches(&self, mapping: &LineageMapping) -> bool {
        if let Some(schema) = active(&self.schema) {
            if !mapping.target_schema.eq_ignore_ascii_case(schema) {
                return false;
            }
        }

        if let Some(table) = active(&self.table) {
            if !mapping.target_table.eq_ignore_ascii_case(table) {
                return false;
            }
        }

        if let Some(column) = active(&self.column) {
            if !contains_ignore_case(&mapping.target_column, column) {
                return false;
            }
        }

        if let Some(change_ref) = active(&self.change_ref) {
            if !contains_ignore_case(&mapping.change_ref_number, change_ref) {
                return false;
            }
        }

        true
    }
}

/// Mappings matching `filter`, in their original order
pub fn filter_lineage<'a>(
    records: &'a [LineageMapping],
    filter: &'a LineageFilter,
) -> impl Iterator<Item = &'a LineageMapping> + Clone + 'a {
    records.iter().filter(move |m| filter.matches(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineage::mapping::{MappingSources, TransformationType};
    use crate::types::now;

    fn mapping(id: u64, schema: &str, table: &str, column: &str, change_ref: &str) -> LineageMapping {
        LineageMapping {
            id,
            target_schema: schema.to_string(),
            target_table: table.to_string(),
            target_column: column.to_string(),
            transformation_type: TransformationType::Direct,
            transformation_logic: String::new(),
            sources: MappingSources::SystemField,
            change_ref_number: change_ref.to_string(),
            created_at: now(),
            created_by: "system".to_string(),
        }
    }

    fn records() -> Vec<LineageMapping> {
        vec![
            mapping(1, "SALES", "customer_summary", "customer_id", "CHG-2024-001"),
            mapping(2, "SALES", "order_analytics", "total_amount", "CHG-2024-002"),
            mapping(3, "HR_SCHEMA", "employees", "customer_rank", "CHG-2024-003"),
        ]
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let records = records();
        let filter = LineageFilter::new();
        assert!(filter.is_empty());
        let all: Vec<LineageMapping> = filter_lineage(&records, &filter).cloned().collect();
        assert_eq!(all, records);
    }

    #[test]
    fn test_blank_fields_count_as_absent() {
        let records = records();
        let filter = LineageFilter::new().schema("").column("  ");
        assert!(filter.is_empty());
        assert_eq!(filter_lineage(&records, &filter).count(), 3);
    }

    #[test]
    fn test_change_ref_case_insensitive() {
        let records = records();
        let filter = LineageFilter::new().change_ref("chg-2024-001");
        let ids: Vec<_> = filter_lineage(&records, &filter).map(|m| m.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_change_ref_suffix() {
        let records = records();
        let filter = LineageFilter::new().change_ref("002");
        let ids: Vec<_> = filter_lineage(&records, &filter).map(|m| m.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_fields_combine_conjunctively() {
        let records = records();
        let filter = LineageFilter::new().schema("sales").column("CUSTOMER");
        let ids: Vec<_> = filter_lineage(&records, &filter).map(|m| m.id).collect();
        assert_eq!(ids, vec![1]);

        let filter = LineageFilter::new().schema("SALES").table("employees");
        assert_eq!(filter_lineage(&records, &filter).count(), 0);
    }

    #[test]
    fn test_table_is_whole_name() {
        let records = records();
        let filter = LineageFilter::new().table("order");
        assert_eq!(filter_lineage(&records, &filter).count(), 0);
        let filter = LineageFilter::new().table("ORDER_ANALYTICS");
        assert_eq!(filter_lineage(&records, &filter).count(), 1);
    }
}
