// Column lineage graph for impact analysis

use super::mapping::LineageMapping;
use crate::types::ColumnRef;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// Traversal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalDirection {
    /// Towards sources
    Upstream,
    /// Towards consumers
    Downstream,
}

/// Risk level for impact analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Risk of changing a column read by `dependencies` mappings
    pub fn for_dependencies(dependencies: usize) -> Self {
        match dependencies {
            d if d >= 10 => RiskLevel::High,
            d if d >= 5 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => f.write_str("low"),
            RiskLevel::Medium => f.write_str("medium"),
            RiskLevel::High => f.write_str("high"),
        }
    }
}

/// Column-to-column graph built from a snapshot of lineage mappings.
///
/// An edge runs from each source column to the mapping's target column.
/// System fields contribute the target as a node with no incoming edge.
#[derive(Debug, Default)]
pub struct ColumnGraph {
    /// Outgoing: source -> targets
    outgoing: HashMap<ColumnRef, Vec<ColumnRef>>,
    /// Incoming: target -> sources
    incoming: HashMap<ColumnRef, Vec<ColumnRef>>,
}

impl ColumnGraph {
    /// Builds the graph from mappings
    pub fn build(mappings: &[LineageMapping]) -> Self {
        let mut graph = Self::default();
        for mapping in mappings {
            let target = mapping.target();
            graph.incoming.entry(target.clone()).or_default();
            // A column listed twice in one mapping is still one edge
            let mut seen = HashSet::new();
            for source in mapping.source_columns() {
                let source = source.column_ref();
                if !seen.insert(source.clone()) {
                    continue;
                }
                graph
                    .outgoing
                    .entry(source.clone())
                    .or_default()
                    .push(target.clone());
                graph
                    .incoming
                    .entry(target.clone())
                    .or_default()
                    .push(source);
            }
        }
        graph
    }

    /// Columns whose values feed `column`, nearest first
    pub fn upstream(&self, column: &ColumnRef, depth: usize) -> Vec<ColumnRef> {
        self.traverse(column, depth, TraversalDirection::Upstream)
    }

    /// Columns fed by `column`, nearest first
    pub fn downstream(&self, column: &ColumnRef, depth: usize) -> Vec<ColumnRef> {
        self.traverse(column, depth, TraversalDirection::Downstream)
    }

    /// Every column that appears as a source
    pub fn source_columns(&self) -> impl Iterator<Item = &ColumnRef> {
        self.outgoing.keys()
    }

    /// Number of mappings reading `column` directly
    pub fn direct_dependents(&self, column: &ColumnRef) -> usize {
        self.outgoing.get(column).map_or(0, Vec::len)
    }

    fn traverse(&self, start: &ColumnRef, max_depth: usize, direction: TraversalDirection) -> Vec<ColumnRef> {
        let adjacency = match direction {
            TraversalDirection::Upstream => &self.incoming,
            TraversalDirection::Downstream => &self.outgoing,
        };

        let mut visited = HashSet::new();
        let mut result = Vec::new();
        let mut queue = VecDeque::new();

        queue.push_back((start, 0usize));
        visited.insert(start);

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            let Some(next) = adjacency.get(current) else {
                continue;
            };
            for column in next {
                if visited.insert(column) {
                    result.push(column.clone());
                    queue.push_back((column, depth + 1));
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineage::mapping::{MappingSources, SourceColumn, TransformationType};
    use crate::types::now;

    fn mapping(target: ColumnRef, sources: Vec<ColumnRef>) -> LineageMapping {
        let sources: Vec<_> = sources
            .into_iter()
            .map(|c| SourceColumn::new(c, TransformationType::Direct))
            .collect();
        LineageMapping {
            id: 0,
            target_schema: target.schema,
            target_table: target.table,
            target_column: target.column,
            transformation_type: TransformationType::Direct,
            transformation_logic: String::new(),
            sources: MappingSources::many_to_one(sources).unwrap(),
            change_ref_number: String::new(),
            created_at: now(),
            created_by: "test".to_string(),
        }
    }

    fn col(table: &str, column: &str) -> ColumnRef {
        ColumnRef::new("SALES", table, column)
    }

    #[test]
    fn test_downstream_is_transitive() {
        let mappings = vec![
            mapping(col("orders", "customer_id"), vec![col("customers", "id")]),
            mapping(col("customer_summary", "customer_id"), vec![col("orders", "customer_id")]),
        ];
        let graph = ColumnGraph::build(&mappings);

        let downstream = graph.downstream(&col("customers", "id"), 10);
        assert_eq!(
            downstream,
            vec![col("orders", "customer_id"), col("customer_summary", "customer_id")]
        );
        assert_eq!(graph.downstream(&col("customers", "id"), 1).len(), 1);
    }

    #[test]
    fn test_upstream_and_cycles() {
        let mappings = vec![
            mapping(col("b", "x"), vec![col("a", "x")]),
            mapping(col("a", "x"), vec![col("b", "x")]),
        ];
        let graph = ColumnGraph::build(&mappings);
        assert_eq!(graph.upstream(&col("a", "x"), 10), vec![col("b", "x")]);
        assert_eq!(graph.direct_dependents(&col("a", "x")), 1);
    }

    #[test]
    fn test_repeated_source_counts_once_per_mapping() {
        let mappings = vec![
            mapping(
                col("order_analytics", "total_amount"),
                vec![col("order_items", "price"), col("order_items", "price")],
            ),
            mapping(col("order_summary", "total"), vec![col("order_items", "price")]),
        ];
        let graph = ColumnGraph::build(&mappings);
        assert_eq!(graph.direct_dependents(&col("order_items", "price")), 2);
        assert_eq!(graph.upstream(&col("order_analytics", "total_amount"), 1).len(), 1);
    }

    #[test]
    fn test_risk_thresholds() {
        assert_eq!(RiskLevel::for_dependencies(15), RiskLevel::High);
        assert_eq!(RiskLevel::for_dependencies(8), RiskLevel::Medium);
        assert_eq!(RiskLevel::for_dependencies(3), RiskLevel::Low);
    }
}
