//! Offline pattern learning over a corpus of project files.
//!
//! Same interface shape as the curated knowledge graph, different data
//! source: observed frequency instead of hand-authored rules. Counters are
//! plain serde state, persisted as one JSON snapshot.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::extract;
use crate::graph::TerrainGraph;
use crate::knowledge::{NodePattern, jaccard};
use crate::model::{PropValue, Workflow};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WorkflowAnalyzer {
    pub projects_analyzed: usize,
    /// node type → times seen.
    node_frequency: BTreeMap<String, u64>,
    /// from type → to type → times seen connected.
    adjacency: BTreeMap<String, BTreeMap<String, u64>>,
    /// node type → property → observed samples.
    property_values: BTreeMap<String, BTreeMap<String, Vec<PropValue>>>,
    patterns: Vec<NodePattern>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectStats {
    pub path: String,
    pub node_count: usize,
    pub connection_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectoryStats {
    pub projects: Vec<ProjectStats>,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recommendations {
    /// (type, observed frequency share).
    pub next_nodes: Vec<(String, f64)>,
    /// Types that similar learned patterns contain but the input lacks.
    pub missing_nodes: Vec<String>,
    /// type → property → median (numeric) or mode (other).
    pub property_suggestions: BTreeMap<String, BTreeMap<String, PropValue>>,
    pub similar_patterns: Vec<(String, f64)>,
}

impl WorkflowAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patterns(&self) -> &[NodePattern] {
        &self.patterns
    }

    pub fn node_frequency(&self, node_type: &str) -> u64 {
        self.node_frequency.get(node_type).copied().unwrap_or(0)
    }

    // =========================================================================
    // INGESTION
    // =========================================================================

    pub fn record_workflow(&mut self, workflow: &Workflow) {
        self.projects_analyzed += 1;

        for node in &workflow.nodes {
            *self.node_frequency.entry(node.node_type.clone()).or_insert(0) += 1;
            let samples = self
                .property_values
                .entry(node.node_type.clone())
                .or_default();
            for (name, value) in &node.properties {
                samples.entry(name.clone()).or_default().push(value.clone());
            }
        }

        for conn in &workflow.connections {
            let (Some(from), Some(to)) = (workflow.node(conn.from_node), workflow.node(conn.to_node))
            else {
                continue;
            };
            *self
                .adjacency
                .entry(from.node_type.clone())
                .or_default()
                .entry(to.node_type.clone())
                .or_insert(0) += 1;
        }

        if let Some(path) = main_path(workflow) {
            self.learn_pattern(path);
        }
    }

    pub fn analyze_project(&mut self, path: &Path) -> Result<ProjectStats, DocumentError> {
        let raw = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let document: serde_json::Value = serde_json::from_str(&raw)?;
        let workflow = extract::extract(&document)?;
        let stats = ProjectStats {
            path: path.display().to_string(),
            node_count: workflow.nodes.len(),
            connection_count: workflow.connections.len(),
        };
        self.record_workflow(&workflow);
        Ok(stats)
    }

    /// Scan every `.json` / `.terrain` file in a directory. Unreadable files
    /// are skipped and counted, not fatal.
    pub fn analyze_directory(&mut self, dir: &Path) -> Result<DirectoryStats, DocumentError> {
        let entries = fs::read_dir(dir).map_err(|source| DocumentError::Io {
            path: dir.display().to_string(),
            source,
        })?;

        let mut stats = DirectoryStats::default();
        for entry in entries.flatten() {
            let path = entry.path();
            let is_project = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == "json" || e == "terrain");
            if !is_project {
                continue;
            }
            match self.analyze_project(&path) {
                Ok(project) => stats.projects.push(project),
                Err(e) => {
                    warn!("skipping '{}': {}", path.display(), e);
                    stats.failed += 1;
                }
            }
        }
        Ok(stats)
    }

    /// Merge a learned main path into the pattern set: identical type
    /// sequences bump frequency instead of duplicating.
    fn learn_pattern(&mut self, path: Vec<String>) {
        if path.len() < 2 {
            return;
        }
        if let Some(existing) = self.patterns.iter_mut().find(|p| p.nodes == path) {
            existing.frequency += 1.0;
            return;
        }
        let name = path
            .iter()
            .take(3)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("-");
        let edges = path.windows(2).map(|w| (w[0].clone(), w[1].clone())).collect();
        self.patterns.push(NodePattern {
            name,
            nodes: path,
            edges,
            tags: vec!["learned".to_string()],
            frequency: 1.0,
        });
    }

    // =========================================================================
    // RECOMMENDATIONS
    // =========================================================================

    pub fn recommendations(&self, current: &[String]) -> Recommendations {
        let mut rec = Recommendations::default();
        let present: HashSet<&str> = current.iter().map(String::as_str).collect();

        // empirical "what follows the tail of this sequence"
        if let Some(last) = current.last() {
            if let Some(followers) = self.adjacency.get(last) {
                let total: u64 = followers.values().sum();
                if total > 0 {
                    let mut ranked: Vec<(String, f64)> = followers
                        .iter()
                        .filter(|(t, _)| !present.contains(t.as_str()))
                        .map(|(t, count)| (t.clone(), *count as f64 / total as f64))
                        .collect();
                    ranked.sort_by(|a, b| {
                        b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal)
                    });
                    rec.next_nodes = ranked;
                }
            }
        }

        // observed value distributions for the types already present
        for node_type in &present {
            let Some(props) = self.property_values.get(*node_type) else {
                continue;
            };
            let mut suggested = BTreeMap::new();
            for (name, samples) in props {
                if let Some(value) = typical_value(samples) {
                    suggested.insert(name.clone(), value);
                }
            }
            if !suggested.is_empty() {
                rec.property_suggestions.insert((*node_type).to_string(), suggested);
            }
        }

        // learned patterns that resemble the input
        for pattern in &self.patterns {
            let similarity = jaccard(&present, &pattern.node_set());
            if similarity >= 0.5 {
                rec.similar_patterns.push((pattern.name.clone(), similarity));
                for node_type in &pattern.nodes {
                    if !present.contains(node_type.as_str())
                        && !rec.missing_nodes.contains(node_type)
                    {
                        rec.missing_nodes.push(node_type.clone());
                    }
                }
            }
        }
        rec.similar_patterns
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        rec
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let raw = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Walk the project's main path: from the first root along single-successor
/// links until a dead end, fork, or cycle.
fn main_path(workflow: &Workflow) -> Option<Vec<String>> {
    let graph = TerrainGraph::build(workflow);
    let start = graph.roots().into_iter().next()?;

    let mut visited = HashSet::new();
    let mut path = Vec::new();
    let mut current = Some(start);
    while let Some(id) = current {
        if !visited.insert(id) {
            break;
        }
        let node = workflow.node(id)?;
        path.push(node.node_type.clone());
        current = graph.sole_successor(id);
    }
    Some(path)
}

/// Median of the numeric samples, or the most frequent non-numeric value.
fn typical_value(samples: &[PropValue]) -> Option<PropValue> {
    let numeric: Vec<f64> = samples.iter().filter_map(PropValue::as_f64).collect();
    if !numeric.is_empty() {
        let mut sorted = numeric;
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let median = sorted[sorted.len() / 2];
        let all_ints = samples.iter().all(|s| matches!(s, PropValue::Int(_)));
        return Some(if all_ints {
            PropValue::Int(median as i64)
        } else {
            PropValue::Float(median)
        });
    }

    let mut counts: BTreeMap<String, (u64, &PropValue)> = BTreeMap::new();
    for sample in samples {
        let entry = counts.entry(sample.to_string()).or_insert((0, sample));
        entry.0 += 1;
    }
    counts
        .into_values()
        .max_by_key(|(count, _)| *count)
        .map(|(_, value)| value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Connection, Node};

    fn chain() -> Workflow {
        Workflow {
            nodes: vec![
                Node::new(1, "Mountain").with_property("Height", PropValue::Float(0.7)),
                Node::new(2, "Erosion2"),
                Node::new(3, "SatMap"),
            ],
            connections: vec![Connection::new(1, 2), Connection::new(2, 3)],
        }
    }

    #[test]
    fn repeated_sightings_merge_into_one_pattern() {
        let mut analyzer = WorkflowAnalyzer::new();
        analyzer.record_workflow(&chain());
        analyzer.record_workflow(&chain());
        assert_eq!(analyzer.patterns().len(), 1);
        assert_eq!(analyzer.patterns()[0].frequency, 2.0);
        assert_eq!(analyzer.patterns()[0].name, "Mountain-Erosion2-SatMap");
    }

    #[test]
    fn adjacency_drives_next_node() {
        let mut analyzer = WorkflowAnalyzer::new();
        analyzer.record_workflow(&chain());
        let rec = analyzer.recommendations(&["Mountain".to_string()]);
        assert_eq!(rec.next_nodes[0].0, "Erosion2");
    }

    #[test]
    fn median_suggestion_for_numeric_property() {
        let mut analyzer = WorkflowAnalyzer::new();
        for height in [0.5, 0.7, 0.9] {
            let mut w = chain();
            w.nodes[0].properties.insert("Height".into(), PropValue::Float(height));
            analyzer.record_workflow(&w);
        }
        let rec = analyzer.recommendations(&["Mountain".to_string()]);
        assert_eq!(
            rec.property_suggestions["Mountain"]["Height"],
            PropValue::Float(0.7)
        );
    }
}
