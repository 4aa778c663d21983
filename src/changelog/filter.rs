// Change log search filters

use super::record::{ChangeRecord, ChangeType};
use crate::types::{active, contains_ignore_case};
use serde::{Deserialize, Serialize};

/// Change log search. Populated fields combine conjunctively.
///
/// `search` matches table, column, description, user and change reference.
/// `table`, `column` and `change_ref` are case-insensitive substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeFilter {
    pub search: Option<String>,
    pub table: Option<String>,
    pub column: Option<String>,
    pub change_type: Option<ChangeType>,
    pub change_ref: Option<String>,
}

impl ChangeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: &str) -> Self {
        self.search = Some(term.to_string());
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

    pub fn change_type(mut self, change_type: ChangeType) -> Self {
        self.change_type = Some(change_type);
        self
    }

    pub fn change_ref(mut self, change_ref: &str) -> Self {
        self.change_ref = Some(change_ref.to_string());
        self
    }

    pub fn matches(&self, record: &ChangeRecord) -> bool {
        if let Some(term) = active(&self.search) {
            let hit = [
                &record.table,
                &record.column,
                &record.description,
                &record.user,
                &record.change_ref_number,
            ]
            .into_iter()
            .any(|field| contains_ignore_case(field, term));
            if !hit {
                return false;
            }
        }

        if let Some(table) = active(&self.table) {
            if !contains_ignore_case(&record.table, table) {
                return false;
            }
        }

        if let Some(column) = active(&self.column) {
            if !contains_ignore_case(&record.column, column) {
                return false;
            }
        }

        if let Some(change_type) = self.change_type {
            if record.change_type != change_type {
                return false;
            }
        }

        if let Some(change_ref) = active(&self.change_ref) {
            if !contains_ignore_case(&record.change_ref_number, change_ref) {
                return false;
            }
        }

        true
    }
}

/// Records matching `filter`, in their original order
pub fn filter_changes<'a>(
    records: &'a [ChangeRecord],
    filter: &'a ChangeFilter,
) -> impl Iterator<Item = &'a ChangeRecord> + Clone + 'a {
    records.iter().filter(move |r| filter.matches(r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::now;

    fn change(id: u64, change_ref: &str, user: &str, change_type: ChangeType, table: &str, column: &str, description: &str) -> ChangeRecord {
        ChangeRecord {
            id,
            project_id: 1,
            change_ref_number: change_ref.to_string(),
            timestamp: now(),
            user: user.to_string(),
            change_type,
            table: table.to_string(),
            column: column.to_string(),
            description: description.to_string(),
        }
    }

    fn records() -> Vec<ChangeRecord> {
        vec![
            change(1, "CHG-2024-001", "john.doe", ChangeType::Create, "employees", "emp_id", "Added primary key column"),
            change(2, "CHG-2024-002", "jane.smith", ChangeType::Alter, "departments", "dept_name", "Increased length to 100"),
            change(3, "CHG-2024-003", "mike.wilson", ChangeType::Update, "employees", "salary", "Updated business definition"),
        ]
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let records = records();
        let filter = ChangeFilter::new();
        let all: Vec<ChangeRecord> = filter_changes(&records, &filter).cloned().collect();
        assert_eq!(all, records);
    }

    #[test]
    fn test_search_spans_fields() {
        let records = records();
        let by_user = ChangeFilter::new().search("JANE");
        let ids: Vec<_> = filter_changes(&records, &by_user).map(|r| r.id).collect();
        assert_eq!(ids, vec![2]);

        let by_description = ChangeFilter::new().search("business");
        let ids: Vec<_> = filter_changes(&records, &by_description).map(|r| r.id).collect();
        assert_eq!(ids, vec![3]);

        let by_ref = ChangeFilter::new().search("chg-2024-001");
        assert_eq!(filter_changes(&records, &by_ref).count(), 1);
    }

    #[test]
    fn test_type_and_table_combine() {
        let records = records();
        let filter = ChangeFilter::new().table("EMPLOY").change_type(ChangeType::Update);
        let ids: Vec<_> = filter_changes(&records, &filter).map(|r| r.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_change_ref_suffix() {
        let records = records();
        let filter = ChangeFilter::new().change_ref("002").column("");
        let ids: Vec<_> = filter_changes(&records, &filter).map(|r| r.id).collect();
        assert_eq!(ids, vec![2]);
    }
}
