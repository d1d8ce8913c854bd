use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

use crate::path;
use crate::summary::{CodeIntelSummary, PreciseIndex, PreciseIndexState};
use crate::tree::{PathTree, TreeNode};

/// One available indexer suggestion for a single root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerDescription {
    pub root: String,
    pub index: String,
    pub url: String,
}

impl IndexerDescription {
    pub fn label(&self) -> String {
        format!("Configure {}?", self.index)
    }
}

/// Visual classification of a precise index state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeKind {
    Success,
    InProgress,
    Queued,
    Errored,
    Inactive,
}

impl BadgeKind {
    pub fn for_state(state: PreciseIndexState) -> Self {
        match state {
            PreciseIndexState::Completed => BadgeKind::Success,
            PreciseIndexState::Indexing
            | PreciseIndexState::Processing
            | PreciseIndexState::UploadingIndex => BadgeKind::InProgress,
            PreciseIndexState::QueuedForIndexing | PreciseIndexState::QueuedForProcessing => {
                BadgeKind::Queued
            }
            PreciseIndexState::IndexingErrored | PreciseIndexState::ProcessingErrored => {
                BadgeKind::Errored
            }
            _ => BadgeKind::Inactive,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BadgeKind::Success => "✓",
            BadgeKind::InProgress => "⟳",
            BadgeKind::Queued => "◷",
            BadgeKind::Errored => "✗",
            BadgeKind::Inactive => "·",
        }
    }
}

/// State icons for every index of one indexer at one root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexBadge {
    pub indexer: String,
    /// Id of the first index in the bucket, the one the badge links to
    pub index_id: String,
    pub kinds: Vec<BadgeKind>,
}

impl IndexBadge {
    fn from_bucket(indexes: &[PreciseIndex]) -> Option<Self> {
        let first = indexes.first()?;
        Some(Self {
            indexer: first.indexer_name().to_string(),
            index_id: first.id.clone(),
            kinds: indexes.iter().map(|index| BadgeKind::for_state(index.state)).collect(),
        })
    }

    pub fn label(&self) -> String {
        let symbols: String = self.kinds.iter().map(|kind| kind.symbol()).collect();
        format!("{} {}", symbols, self.indexer)
    }
}

/// A rendered tree line joined with the data recorded for its path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardRow {
    pub id: usize,
    pub depth: usize,
    pub name: String,
    pub display_name: String,
    pub badges: Vec<IndexBadge>,
    pub suggestions: Vec<IndexerDescription>,
}

impl DashboardRow {
    /// Badge and suggestion labels, space separated
    pub fn annotations(&self) -> String {
        self.badges
            .iter()
            .map(IndexBadge::label)
            .chain(self.suggestions.iter().map(IndexerDescription::label))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

pub type IndexesByIndexer = BTreeMap<String, Vec<PreciseIndex>>;

/// View model of the code intelligence dashboard for one repository
#[derive(Debug, Clone)]
pub struct RepoDashboard {
    pub repo: String,
    pub last_index_scan: Option<DateTime<Utc>>,
    pub last_upload_retention_scan: Option<DateTime<Utc>>,
    pub indexes_by_indexer_by_root: BTreeMap<String, IndexesByIndexer>,
    pub available_indexers_by_root: BTreeMap<String, Vec<IndexerDescription>>,
    pub tree: PathTree,
}

impl RepoDashboard {
    pub fn new(repo: impl Into<String>, summary: CodeIntelSummary) -> Self {
        let indexes_by_indexer_by_root: BTreeMap<String, IndexesByIndexer> =
            group_by(summary.recent_activity, PreciseIndex::root)
                .into_iter()
                .map(|(root, indexes)| {
                    let by_indexer = group_by(indexes, |index| index.indexer_name().to_string());
                    (root, by_indexer)
                })
                .collect();

        let available_indexers_by_root = group_by(
            summary.available_indexers.into_iter().flat_map(|available| {
                available
                    .roots
                    .into_iter()
                    .map(move |root| IndexerDescription {
                        root: path::sanitize(&root),
                        index: available.index.clone(),
                        url: available.url.clone(),
                    })
            }),
            |description| description.root.clone(),
        );

        let tree = PathTree::build(
            indexes_by_indexer_by_root
                .keys()
                .chain(available_indexers_by_root.keys()),
        );

        let repo = repo.into();
        log::info!(
            "📊 RepoDashboard::new: {} - {} roots with indexes, {} roots with suggestions, {} tree nodes",
            repo,
            indexes_by_indexer_by_root.len(),
            available_indexers_by_root.len(),
            tree.len()
        );

        Self {
            repo,
            last_index_scan: summary.last_index_scan,
            last_upload_retention_scan: summary.last_upload_retention_scan,
            indexes_by_indexer_by_root,
            available_indexers_by_root,
            tree,
        }
    }

    /// True if any index or suggestion is recorded for the given path
    pub fn has_data(&self, name: &str) -> bool {
        let name = path::sanitize(name);
        self.indexes_by_indexer_by_root.contains_key(&name)
            || self.available_indexers_by_root.contains_key(&name)
    }

    /// Every distinct root that has indexes or suggestions
    pub fn data_roots(&self) -> BTreeSet<&str> {
        self.indexes_by_indexer_by_root
            .keys()
            .chain(self.available_indexers_by_root.keys())
            .map(String::as_str)
            .collect()
    }

    /// True when nothing at all is recorded for this repository
    pub fn is_empty(&self) -> bool {
        self.indexes_by_indexer_by_root.is_empty() && self.available_indexers_by_root.is_empty()
    }

    /// One badge per indexer at this path, ordered by indexer name
    pub fn badges_for(&self, name: &str) -> Vec<IndexBadge> {
        self.indexes_by_indexer_by_root
            .get(name)
            .map(|by_indexer| {
                by_indexer
                    .values()
                    .filter_map(|indexes| IndexBadge::from_bucket(indexes))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn suggestions_for(&self, name: &str) -> &[IndexerDescription] {
        self.available_indexers_by_root
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn row(&self, node: &TreeNode, depth: usize) -> DashboardRow {
        DashboardRow {
            id: node.id,
            depth,
            name: node.name.clone(),
            display_name: node.display_name.clone(),
            badges: self.badges_for(&node.name),
            suggestions: self.suggestions_for(&node.name).to_vec(),
        }
    }

    /// Data recorded for the repository root itself, which the tree never renders
    pub fn root_row(&self) -> Option<DashboardRow> {
        let root = self.tree.root();
        if self.has_data(&root.name) {
            Some(self.row(root, 0))
        } else {
            None
        }
    }

    /// One row per rendered tree node, in display order
    pub fn rows(&self) -> Vec<DashboardRow> {
        self.tree
            .visible()
            .into_iter()
            .map(|(node, depth)| self.row(node, depth))
            .collect()
    }

    pub fn title(&self) -> String {
        format!("Code intelligence summary for {}", self.repo)
    }

    pub fn index_scan_line(&self) -> String {
        format!(
            "This repository was scanned for auto-indexing {}.",
            format_timestamp(self.last_index_scan)
        )
    }

    pub fn retention_scan_line(&self) -> String {
        format!(
            "The indexes of this repository were last considered for expiration {}.",
            format_timestamp(self.last_upload_retention_scan)
        )
    }

    /// Plain-text rendering of the whole dashboard
    pub fn outline(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title());
        out.push_str("\n\n");
        out.push_str(&self.index_scan_line());
        out.push('\n');
        out.push_str(&self.retention_scan_line());
        out.push_str("\n\n");

        if self.is_empty() {
            out.push_str("No code intel available.\n");
            return out;
        }

        if let Some(root) = self.root_row() {
            out.push_str(&format!("/  {}\n", root.annotations()));
        }
        for row in self.rows() {
            out.push_str(&"  ".repeat(row.depth));
            out.push_str(&row.display_name);
            let annotations = row.annotations();
            if !annotations.is_empty() {
                out.push_str("  ");
                out.push_str(&annotations);
            }
            out.push('\n');
        }
        out
    }
}

pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(ts) => format!("at {}", ts.format("%Y-%m-%d %H:%M UTC")),
        None => "never".to_string(),
    }
}

// Group values by key, preserving value order within each bucket
fn group_by<V, K, F>(values: impl IntoIterator<Item = V>, key: F) -> BTreeMap<K, Vec<V>>
where
    K: Ord,
    F: Fn(&V) -> K,
{
    let mut groups: BTreeMap<K, Vec<V>> = BTreeMap::new();
    for value in values {
        groups.entry(key(&value)).or_default().push(value);
    }
    groups
}
