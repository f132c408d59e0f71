use std::collections::{BTreeSet, HashMap, HashSet};

use chatweave_types::RawMessageEntry;
use tracing::debug;

use crate::fingerprint::{Fingerprint, fingerprint};

/// Arena index of a node inside one `GraphBuilder`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One distinct message in the merge graph
#[derive(Debug, Clone)]
pub struct MessageNode {
    pub fingerprint: Fingerprint,

    /// Entry from the first file that contained this message
    pub entry: RawMessageEntry,

    /// Fingerprints of recorded predecessors (set semantics)
    pub parents: Vec<Fingerprint>,

    /// Successors in first-linked order (set semantics)
    pub children: Vec<NodeId>,

    /// Indices of every file this message appeared in
    pub origin_files: BTreeSet<usize>,

    /// First conversational entry of at least one file
    pub is_file_root: bool,
}

/// Builds the shared message graph for one merge session.
///
/// Nodes live in an arena addressed by `NodeId`; a fingerprint lookup table
/// guarantees one node per distinct message. Feed it with `add_file` once per
/// export, then hand it to a [`Linearizer`](crate::Linearizer).
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<MessageNode>,
    index: HashMap<Fingerprint, NodeId>,
    root_candidates: Vec<NodeId>,
    entries_seen: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one export's entries, in file order.
    ///
    /// System entries are skipped; the next real entry links to the last real
    /// one. Repeated messages (same fingerprint) only extend `origin_files`.
    pub fn add_file(&mut self, entries: &[RawMessageEntry], file_index: usize) {
        let mut previous: Option<NodeId> = None;
        let mut created = 0;

        for entry in entries {
            if entry.is_system {
                continue;
            }
            self.entries_seen += 1;

            let fp = fingerprint(entry);
            let id = match self.index.get(&fp) {
                Some(&id) => id,
                None => {
                    created += 1;
                    self.insert(fp, entry)
                }
            };
            self.nodes[id.index()].origin_files.insert(file_index);

            match previous {
                None => {
                    self.nodes[id.index()].is_file_root = true;
                    if !self.root_candidates.contains(&id) {
                        self.root_candidates.push(id);
                    }
                }
                // Identical consecutive re-send; no self-loop
                Some(prev) if prev == id => {}
                Some(prev) => self.link(prev, id),
            }
            previous = Some(id);
        }

        debug!(
            file_index,
            entries = entries.len(),
            created,
            total_nodes = self.nodes.len(),
            "added file to merge graph"
        );
    }

    fn insert(&mut self, fp: Fingerprint, entry: &RawMessageEntry) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(MessageNode {
            fingerprint: fp.clone(),
            entry: entry.clone(),
            parents: Vec::new(),
            children: Vec::new(),
            origin_files: BTreeSet::new(),
            is_file_root: false,
        });
        self.index.insert(fp, id);
        id
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        let parent_fp = self.nodes[parent.index()].fingerprint.clone();

        let parent_node = &mut self.nodes[parent.index()];
        if !parent_node.children.contains(&child) {
            parent_node.children.push(child);
        }

        let child_node = &mut self.nodes[child.index()];
        if !child_node.parents.contains(&parent_fp) {
            child_node.parents.push(parent_fp);
        }
    }

    /// Fingerprints of nodes with no parent present in the graph.
    ///
    /// A node whose recorded parents were never added (a file starting
    /// mid-conversation) counts as a root. The set is unordered.
    pub fn find_true_roots(&self) -> HashSet<Fingerprint> {
        self.nodes
            .iter()
            .filter(|node| self.is_true_root(node))
            .map(|node| node.fingerprint.clone())
            .collect()
    }

    fn is_true_root(&self, node: &MessageNode) -> bool {
        node.parents.iter().all(|p| !self.index.contains_key(p))
    }

    /// True roots ordered by when they were first recorded as a file root.
    ///
    /// Roots that were never a file's first entry sort after all candidates,
    /// in arena order.
    pub(crate) fn ordered_true_roots(&self) -> Vec<NodeId> {
        let mut roots: Vec<NodeId> = (0..self.nodes.len())
            .map(|i| NodeId(i as u32))
            .filter(|id| self.is_true_root(&self.nodes[id.index()]))
            .collect();

        roots.sort_by_key(|id| {
            let position = self
                .root_candidates
                .iter()
                .position(|c| c == id)
                .unwrap_or(usize::MAX);
            (position, *id)
        });
        roots
    }

    pub fn node(&self, id: NodeId) -> Option<&MessageNode> {
        self.nodes.get(id.index())
    }

    pub fn lookup(&self, fp: &Fingerprint) -> Option<NodeId> {
        self.index.get(fp).copied()
    }

    pub fn get(&self, fp: &Fingerprint) -> Option<&MessageNode> {
        self.lookup(fp).and_then(|id| self.node(id))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &MessageNode> {
        self.nodes.iter()
    }

    /// File-root candidates in first-recorded order
    pub fn root_candidates(&self) -> &[NodeId] {
        &self.root_candidates
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Conversational entries read so far, duplicates included
    pub fn entries_seen(&self) -> usize {
        self.entries_seen
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
