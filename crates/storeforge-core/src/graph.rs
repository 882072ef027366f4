use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::{EntityKind, Table};

/// Summary of FK graph structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencySummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Report for FK dependency ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyReport {
    pub summary: DependencySummary,
    pub topo_order: Option<Vec<EntityKind>>,
    pub cycle: Option<Vec<EntityKind>>,
}

/// Build a deterministic FK dependency report for the given tables.
///
/// Parents always precede children; ties are broken by declaration order,
/// so the stock catalog loads as customers, products, orders, order_items,
/// reviews.
pub fn build_dependency_report(tables: &[Table]) -> Result<DependencyReport> {
    let graph = build_adjacency(tables)?;
    let nodes = graph.len();
    let edges = graph.iter().map(|targets| targets.len()).sum();
    let summary = DependencySummary { nodes, edges };

    let report = match toposort(&graph) {
        Ok(order) => DependencyReport {
            summary,
            topo_order: Some(order.into_iter().map(|idx| tables[idx].kind).collect()),
            cycle: None,
        },
        Err(cycle) => DependencyReport {
            summary,
            topo_order: None,
            cycle: Some(cycle.into_iter().map(|idx| tables[idx].kind).collect()),
        },
    };
    Ok(report)
}

/// Load order for `tables`, parents before children.
pub fn dependency_order(tables: &[Table]) -> Result<Vec<EntityKind>> {
    let report = build_dependency_report(tables)?;
    report.topo_order.ok_or_else(|| {
        Error::InvalidSchema(format!(
            "foreign key graph contains a cycle through {:?}",
            report.cycle.unwrap_or_default()
        ))
    })
}

/// Edges point from a referenced (parent) table to the tables referencing it.
fn build_adjacency(tables: &[Table]) -> Result<Vec<BTreeSet<usize>>> {
    let mut graph = vec![BTreeSet::new(); tables.len()];

    for (child, table) in tables.iter().enumerate() {
        for parent_name in table.parents() {
            let parent = tables
                .iter()
                .position(|candidate| candidate.name == parent_name)
                .ok_or_else(|| {
                    Error::InvalidSchema(format!(
                        "table '{}' references unknown table '{}'",
                        table.name, parent_name
                    ))
                })?;
            if parent != child {
                graph[parent].insert(child);
            }
        }
    }

    Ok(graph)
}

fn toposort(graph: &[BTreeSet<usize>]) -> std::result::Result<Vec<usize>, Vec<usize>> {
    let mut indegree = vec![0_usize; graph.len()];
    for targets in graph {
        for target in targets {
            indegree[*target] += 1;
        }
    }

    let mut ready: BTreeSet<usize> = indegree
        .iter()
        .enumerate()
        .filter_map(|(node, count)| (*count == 0).then_some(node))
        .collect();

    let mut order = Vec::with_capacity(graph.len());

    while let Some(node) = ready.pop_first() {
        order.push(node);
        for target in &graph[node] {
            let count = &mut indegree[*target];
            *count = count.saturating_sub(1);
            if *count == 0 {
                ready.insert(*target);
            }
        }
    }

    if order.len() == graph.len() {
        Ok(order)
    } else {
        Err(indegree
            .into_iter()
            .enumerate()
            .filter_map(|(node, count)| (count > 0).then_some(node))
            .collect())
    }
}
