//! Lineage reports.
//!
//! Pure functions over catalog and lineage snapshots:
//! - Coverage: how many columns of each table have lineage
//! - Impact: what a change to a source column would touch
//! - Summary: mappings per mapping type

use crate::catalog::{Column, Table};
use crate::lineage::{ColumnGraph, LineageMapping, RiskLevel};
use crate::types::{ColumnRef, TableRef};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

pub use crate::lineage::MappingSummary;

/// Coverage band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageBand {
    Good,
    Fair,
    Poor,
}

impl CoverageBand {
    pub fn for_percent(percent: u32) -> Self {
        match percent {
            p if p >= 90 => CoverageBand::Good,
            p if p >= 70 => CoverageBand::Fair,
            _ => CoverageBand::Poor,
        }
    }
}

impl fmt::Display for CoverageBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageBand::Good => f.write_str("good"),
            CoverageBand::Fair => f.write_str("fair"),
            CoverageBand::Poor => f.write_str("poor"),
        }
    }
}

/// Lineage coverage of one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCoverage {
    pub table: TableRef,
    pub total_columns: usize,
    pub mapped_columns: usize,
    /// Rounded to the nearest whole percent
    pub coverage: u32,
    pub band: CoverageBand,
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part * 100 + whole / 2) / whole) as u32
}

/// Coverage for every table, in table order.
///
/// A column is mapped when it is the target of at least one mapping.
pub fn lineage_coverage(tables: &[Table], columns: &[Column], mappings: &[LineageMapping]) -> Vec<TableCoverage> {
    let targets: HashSet<ColumnRef> = mappings.iter().map(LineageMapping::target).collect();

    tables
        .iter()
        .map(|table| {
            let table_ref = table.table_ref();
            let (total, mapped) = columns
                .iter()
                .filter(|c| c.table_ref == table_ref)
                .fold((0, 0), |(total, mapped), c| {
                    let target = ColumnRef::new(&c.table_ref.schema, &c.table_ref.table, &c.name);
                    (total + 1, mapped + usize::from(targets.contains(&target)))
                });
            let coverage = percent(mapped, total);
            TableCoverage {
                table: table_ref,
                total_columns: total,
                mapped_columns: mapped,
                coverage,
                band: CoverageBand::for_percent(coverage),
            }
        })
        .collect()
}

/// Coverage across all tables together
pub fn overall_coverage(report: &[TableCoverage]) -> u32 {
    let (mapped, total) = report
        .iter()
        .fold((0, 0), |(m, t), r| (m + r.mapped_columns, t + r.total_columns));
    percent(mapped, total)
}

/// What changing one source column would affect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnImpact {
    pub source: ColumnRef,
    /// Tables reached downstream, sorted and distinct
    pub impacted_tables: Vec<TableRef>,
    /// Mappings reading the column directly
    pub dependencies: usize,
    pub risk: RiskLevel,
}

/// Impact of every source column, most depended upon first.
/// Ties are ordered by column reference.
pub fn impact_analysis(mappings: &[LineageMapping]) -> Vec<ColumnImpact> {
    let graph = ColumnGraph::build(mappings);

    let mut report: Vec<ColumnImpact> = graph
        .source_columns()
        .map(|source| {
            let impacted_tables: BTreeSet<TableRef> = graph
                .downstream(source, usize::MAX)
                .iter()
                .map(ColumnRef::table_ref)
                .collect();
            let dependencies = graph.direct_dependents(source);
            ColumnImpact {
                source: source.clone(),
                impacted_tables: impacted_tables.into_iter().collect(),
                dependencies,
                risk: RiskLevel::for_dependencies(dependencies),
            }
        })
        .collect();

    report.sort_by(|a, b| {
        b.dependencies
            .cmp(&a.dependencies)
            .then_with(|| a.source.cmp(&b.source))
    });
    report
}

/// Number of entries at `risk`
pub fn count_at_risk(report: &[ColumnImpact], risk: RiskLevel) -> usize {
    report.iter().filter(|i| i.risk == risk).count()
}
