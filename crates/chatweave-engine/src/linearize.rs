use chatweave_types::{BranchId, NormalizedMessage, VariantInfo};
use tracing::debug;
use uuid::Uuid;

use crate::fingerprint::Fingerprint;
use crate::graph::{GraphBuilder, MessageNode, NodeId};

/// Namespace used when the caller does not supply a session-specific one
pub const DEFAULT_NAMESPACE: Uuid = Uuid::from_u128(0x6a1f_3c2e_9b4d_4e51_8f07_52c9_d0e3_a1b6);

/// Turns a finished merge graph into one branch-tagged, pre-order history.
///
/// The linearizer owns the graph and is consumed by
/// [`generate_history`](Linearizer::generate_history), so a merge session can
/// only be linearized once:
///
/// ```compile_fail
/// use chatweave_engine::{GraphBuilder, Linearizer};
///
/// let linearizer = Linearizer::new(GraphBuilder::new());
/// let first = linearizer.generate_history();
/// let second = linearizer.generate_history();
/// ```
pub struct Linearizer {
    graph: GraphBuilder,
    visited: Vec<bool>,
    emitter: Emitter,
}

/// Output side of the traversal: uuid minting, branch numbering, history
struct Emitter {
    namespace: Uuid,
    branch_counter: usize,
    forks: Vec<Fork>,
    history: Vec<NormalizedMessage>,
}

/// Children of one emitted message waiting to be walked
struct Fork {
    branch: BranchId,
    level: u32,
    claimed: bool,
}

#[derive(Debug, Clone, Copy)]
struct ParentRef {
    uuid: Uuid,
    level: u32,
}

enum Slot {
    Assigned(BranchId, u32),
    /// Resolved when the child is popped: the first emitted child continues
    /// the fork's branch, later ones get a fresh id
    Fork(usize),
}

struct Pending {
    node: NodeId,
    parent: Option<ParentRef>,
    slot: Slot,
}

impl Linearizer {
    pub fn new(graph: GraphBuilder) -> Self {
        Self::with_namespace(graph, DEFAULT_NAMESPACE)
    }

    /// Use a session-specific namespace for the generated message uuids
    pub fn with_namespace(graph: GraphBuilder, namespace: Uuid) -> Self {
        let visited = vec![false; graph.node_count()];
        Self {
            graph,
            visited,
            emitter: Emitter {
                namespace,
                branch_counter: 0,
                forks: Vec::new(),
                history: Vec::new(),
            },
        }
    }

    pub fn graph(&self) -> &GraphBuilder {
        &self.graph
    }

    /// Walk every root and emit the flattened history.
    ///
    /// The first root owns `main` at level 0; each later root opens a fresh
    /// `branch_N` at level 1. Nodes reached more than once are emitted only
    /// the first time.
    pub fn generate_history(mut self) -> Vec<NormalizedMessage> {
        let roots = self.graph.ordered_true_roots();

        // Candidates that a duplicate-content cycle hid from the root set
        let stranded: Vec<NodeId> = self
            .graph
            .root_candidates()
            .iter()
            .copied()
            .filter(|c| !roots.contains(c))
            .collect();

        debug!(
            roots = roots.len(),
            stranded = stranded.len(),
            nodes = self.graph.node_count(),
            "linearizing merge graph"
        );

        let mut first = true;
        for root in roots.into_iter().chain(stranded) {
            if self.visited[root.index()] {
                continue;
            }
            let slot = if first {
                Slot::Assigned(BranchId::main(), 0)
            } else {
                Slot::Assigned(self.emitter.next_branch(), 1)
            };
            first = false;
            self.walk(root, slot);
        }

        self.emitter.history
    }

    /// Pre-order depth-first walk using an explicit stack
    fn walk(&mut self, start: NodeId, slot: Slot) {
        let mut stack = vec![Pending {
            node: start,
            parent: None,
            slot,
        }];

        while let Some(pending) = stack.pop() {
            let Some(node) = self.graph.node(pending.node) else {
                continue;
            };
            if self.visited[pending.node.index()] {
                continue;
            }
            self.visited[pending.node.index()] = true;

            let (branch, level) = match pending.slot {
                Slot::Assigned(branch, level) => (branch, level),
                Slot::Fork(fork) => self.emitter.claim(fork),
            };

            let continuation = self.emitter.emit_node(node, pending.parent, &branch, level);

            if node.children.is_empty() {
                continue;
            }

            let fork = self.emitter.open_fork(branch, level);
            let parent = Some(ParentRef {
                uuid: continuation,
                level,
            });
            for child in node.children.iter().rev() {
                stack.push(Pending {
                    node: *child,
                    parent,
                    slot: Slot::Fork(fork),
                });
            }
        }
    }
}

impl Emitter {
    fn next_branch(&mut self) -> BranchId {
        self.branch_counter += 1;
        BranchId::numbered(self.branch_counter)
    }

    fn open_fork(&mut self, branch: BranchId, level: u32) -> usize {
        self.forks.push(Fork {
            branch,
            level,
            claimed: false,
        });
        self.forks.len() - 1
    }

    fn claim(&mut self, fork: usize) -> (BranchId, u32) {
        let (branch, level, claimed) = {
            let f = &self.forks[fork];
            (f.branch.clone(), f.level, f.claimed)
        };
        if claimed {
            (self.next_branch(), level + 1)
        } else {
            self.forks[fork].claimed = true;
            (branch, level)
        }
    }

    fn mint(&self, fp: &Fingerprint, variant: usize) -> Uuid {
        let name = format!("{}#{}@{}", fp, variant, self.history.len());
        Uuid::new_v5(&self.namespace, name.as_bytes())
    }

    /// Emit one node (or all of its variants) and return the uuid that its
    /// children hang from.
    fn emit_node(
        &mut self,
        node: &MessageNode,
        parent: Option<ParentRef>,
        branch: &BranchId,
        level: u32,
    ) -> Uuid {
        let entry = &node.entry;
        let fans_out = node.children.len() > 1;
        let sender_label = if entry.name.is_empty() {
            entry.role().default_label().to_string()
        } else {
            entry.name.clone()
        };
        let timestamp = entry.timestamp.clone().unwrap_or_default();

        if !entry.has_variants() {
            let uuid = self.mint(&node.fingerprint, 0);
            self.history.push(NormalizedMessage {
                display_index: self.history.len(),
                uuid,
                parent_uuid: parent.map(|p| p.uuid),
                sender: entry.role(),
                sender_label,
                timestamp,
                content: entry.content_or_empty().to_string(),
                branch_id: branch.clone(),
                branch_level: level,
                is_branch_point: fans_out,
                variant_info: None,
            });
            return uuid;
        }

        let total = entry.variants.len();
        let selected = entry.selected_index();
        let sibling_level = parent.map_or(level, |p| p.level) + 1;
        let mut continuation = None;

        for (variant_index, text) in entry.variants.iter().enumerate() {
            let is_selected = variant_index == selected;
            let (branch_id, branch_level) = if is_selected {
                (branch.clone(), level)
            } else {
                (self.next_branch(), sibling_level)
            };

            let uuid = self.mint(&node.fingerprint, variant_index);
            if is_selected {
                continuation = Some(uuid);
            }

            self.history.push(NormalizedMessage {
                display_index: self.history.len(),
                uuid,
                parent_uuid: parent.map(|p| p.uuid),
                sender: entry.role(),
                sender_label: sender_label.clone(),
                timestamp: timestamp.clone(),
                content: text.clone(),
                branch_id,
                branch_level,
                is_branch_point: variant_index == 0 || (is_selected && fans_out),
                variant_info: Some(VariantInfo {
                    total,
                    is_selected,
                    variant_index,
                }),
            });
        }

        // selected_index() is always in range when variants exist
        continuation.unwrap_or_else(|| self.history[self.history.len() - total].uuid)
    }
}
