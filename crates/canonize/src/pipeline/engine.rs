//! Engine that executes an [`EntitySpec`] against a raw table.
//!
//! Cleaning runs in three stages:
//!
//! 1. every cell is mapped through its column rule (or passed through),
//! 2. rows failing the entity's required-field condition are removed,
//! 3. exact duplicate rows are removed, keeping the first occurrence.

use std::collections::HashSet;

use indexmap::IndexSet;
use tracing::{debug, info, warn};

use super::entity::{EntitySpec, Requirement};
use super::report::{CleaningReport, ColumnChange, DistinctKeys};
use super::rules::{Rule, passthrough};
use crate::input::{Cell, RawTable};
use crate::schema::{CleanTable, Value};

/// A cleaned table together with its report.
#[derive(Debug, Clone)]
pub struct CleanResult {
    /// The canonical table.
    pub table: CleanTable,
    /// What the cleaner did to produce it.
    pub report: CleaningReport,
}

/// How one output column is produced.
#[derive(Debug, Clone, Copy)]
enum Conversion {
    Rule { rule: Rule, text_first: bool },
    Passthrough,
}

impl Conversion {
    fn apply(&self, cell: &Cell) -> Value {
        match self {
            Conversion::Rule { rule, text_first: true } => rule.apply(&cell.to_text_cell()),
            Conversion::Rule { rule, .. } => rule.apply(cell),
            Conversion::Passthrough => passthrough(cell),
        }
    }

    fn rule(&self) -> Option<Rule> {
        match self {
            Conversion::Rule { rule, .. } => Some(*rule),
            Conversion::Passthrough => None,
        }
    }
}

#[derive(Debug, Clone)]
struct OutputColumn {
    name: String,
    source: usize,
    conversion: Conversion,
}

/// Engine for running declarative entity pipelines.
#[derive(Debug, Default, Clone, Copy)]
pub struct CleaningEngine;

impl CleaningEngine {
    /// Create a new cleaning engine.
    pub fn new() -> Self {
        Self
    }

    /// Clean `raw` according to `spec`.
    pub fn clean(&self, spec: &EntitySpec, raw: &RawTable) -> CleanResult {
        let mut report = CleaningReport::new(spec.kind, raw.row_count());
        let plan = self.plan(spec, raw, &mut report);

        // Stage 1: per-column rules
        let headers: Vec<String> = plan.iter().map(|c| c.name.clone()).collect();
        let converted: Vec<Vec<Value>> = raw
            .rows
            .iter()
            .map(|row| {
                plan.iter()
                    .map(|column| match row.get(column.source) {
                        Some(cell) => column.conversion.apply(cell),
                        None => Value::Null,
                    })
                    .collect()
            })
            .collect();

        for (index, column) in plan.iter().enumerate() {
            let mut change = ColumnChange {
                rule: column.conversion.rule(),
                ..ColumnChange::default()
            };
            for (raw_row, row) in raw.rows.iter().zip(&converted) {
                if row[index].is_null() {
                    change.null_count += 1;
                    let was_present = raw_row
                        .get(column.source)
                        .is_some_and(|cell| !cell.is_missing());
                    if was_present {
                        change.values_nulled += 1;
                    }
                }
            }
            if change.values_nulled > 0 {
                debug!(
                    entity = %spec.kind,
                    column = %column.name,
                    nulled = change.values_nulled,
                    "values failed conversion"
                );
            }
            report.columns.insert(column.name.clone(), change);
        }

        // Stage 2: required fields
        let required = self.required_indices(spec, &headers, &mut report);
        let before_filter = converted.len();
        let kept: Vec<Vec<Value>> = converted
            .into_iter()
            .filter(|row| satisfies(&required, row))
            .collect();
        report.dropped_missing_required = before_filter - kept.len();
        debug!(
            entity = %spec.kind,
            requirement = %spec.required.describe(),
            dropped = report.dropped_missing_required,
            "required-field filter"
        );

        // Stage 3: exact duplicates, first occurrence wins
        let before_dedup = kept.len();
        let unique: IndexSet<Vec<Value>> = kept.into_iter().collect();
        report.dropped_duplicates = before_dedup - unique.len();
        debug!(
            entity = %spec.kind,
            dropped = report.dropped_duplicates,
            "duplicate rows removed"
        );

        let table = CleanTable::new(headers, unique.into_iter().collect());
        report.rows_out = table.row_count();
        report.distinct_keys = spec
            .distinct_key
            .and_then(|key| distinct_keys(key, raw, &table));

        info!(
            entity = %spec.kind,
            rows_in = report.rows_in,
            rows_out = report.rows_out,
            "cleaned {}",
            spec.kind.table_name()
        );

        CleanResult { table, report }
    }

    /// Decide the output columns, in input order.
    fn plan(
        &self,
        spec: &EntitySpec,
        raw: &RawTable,
        report: &mut CleaningReport,
    ) -> Vec<OutputColumn> {
        let derive_source = spec
            .derive
            .filter(|d| raw.column_index(d.from).is_some());

        let mut plan = Vec::with_capacity(raw.column_count());
        for (source, header) in raw.headers.iter().enumerate() {
            let name = header.as_str();
            if spec.drop_columns.contains(&name) {
                report.dropped_columns.push(header.clone());
                continue;
            }

            let column = match (spec.derive, derive_source) {
                // The derived column takes the place of its source.
                (_, Some(derive)) if name == derive.from => OutputColumn {
                    name: derive.into.to_string(),
                    source,
                    conversion: Conversion::Rule {
                        rule: derive.rule,
                        text_first: false,
                    },
                },
                (_, Some(derive)) if name == derive.into => {
                    report.dropped_columns.push(header.clone());
                    continue;
                }
                (Some(derive), None) if name == derive.into => OutputColumn {
                    name: header.clone(),
                    source,
                    conversion: Conversion::Rule {
                        rule: derive.reparse,
                        text_first: false,
                    },
                },
                _ => OutputColumn {
                    name: header.clone(),
                    source,
                    conversion: match spec.rule_for(name) {
                        Some(rule) => Conversion::Rule {
                            rule: rule.rule,
                            text_first: rule.text_first,
                        },
                        None => Conversion::Passthrough,
                    },
                },
            };
            plan.push(column);
        }

        if let Some(derive) = derive_source {
            report.dropped_columns.push(derive.from.to_string());
        }

        for rule in spec.rules {
            if raw.column_index(rule.column).is_none() {
                warn!(entity = %spec.kind, column = rule.column, "rule column absent from input");
                report.absent_columns.push(rule.column.to_string());
            }
        }

        plan
    }

    /// Output indices for each requirement group. An empty group means no
    /// column of that group is present, so no row can satisfy it.
    fn required_indices(
        &self,
        spec: &EntitySpec,
        headers: &[String],
        report: &mut CleaningReport,
    ) -> Vec<Vec<usize>> {
        match spec.required {
            Requirement::AllColumns => (0..headers.len()).map(|i| vec![i]).collect(),
            Requirement::Columns(groups) => groups
                .iter()
                .map(|group| {
                    let indices: Vec<usize> = group
                        .iter()
                        .filter_map(|name| headers.iter().position(|h| h == name))
                        .collect();
                    if indices.is_empty() {
                        warn!(
                            entity = %spec.kind,
                            columns = %group.join(", "),
                            "required column absent, every row will be dropped"
                        );
                        for name in group.iter() {
                            if !report.absent_columns.iter().any(|c| c == name) {
                                report.absent_columns.push(name.to_string());
                            }
                        }
                    }
                    indices
                })
                .collect(),
        }
    }
}

fn satisfies(required: &[Vec<usize>], row: &[Value]) -> bool {
    required
        .iter()
        .all(|group| group.iter().any(|&i| !row[i].is_null()))
}

fn distinct_keys(column: &str, raw: &RawTable, table: &CleanTable) -> Option<DistinctKeys> {
    let before: HashSet<String> = raw
        .column_by_name(column)?
        .into_iter()
        .filter_map(|cell| cell.as_text().map(|s| s.into_owned()))
        .collect();
    let after: HashSet<&Value> = table
        .column_by_name(column)
        .unwrap_or_default()
        .into_iter()
        .filter(|v| !v.is_null())
        .collect();

    Some(DistinctKeys {
        column: column.to_string(),
        before: before.len(),
        after: after.len(),
    })
}
