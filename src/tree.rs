//! Huffman code tree construction.
//!
//! Nodes own their children, so dropping a [`CodeTree`] releases the whole
//! structure on every path out of the function that built it.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use tracing::debug;

use crate::error::{CompressError, Result};
use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: Symbol,
        count: u64,
    },
    Internal {
        count: u64,
        zero: Box<Node>,
        one: Box<Node>,
    },
}

impl Node {
    pub fn count(&self) -> u64 {
        match self {
            Node::Leaf { count, .. } | Node::Internal { count, .. } => *count,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// Heap entry ordered by `(count, rank)`, reversed so `BinaryHeap` pops the
/// smallest first. Leaves take ranks in symbol order and each merged node
/// takes the next unused rank, so no two entries compare equal.
struct Ranked {
    count: u64,
    rank: usize,
    node: Node,
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.rank == other.rank
    }
}
impl Eq for Ranked {}
impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.count, other.rank).cmp(&(self.count, self.rank)) // min-heap
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree {
    root: Node,
}

impl CodeTree {
    /// Build the tree by repeatedly merging the two lightest nodes.
    ///
    /// The first node popped becomes the zero-child. A table with a single
    /// entry yields a tree whose root is that leaf.
    pub fn build(table: &FrequencyTable) -> Result<Self> {
        if table.is_empty() {
            return Err(CompressError::EmptyFrequencyTable);
        }

        let mut heap: BinaryHeap<Ranked> = table
            .iter()
            .enumerate()
            .map(|(rank, (symbol, count))| Ranked {
                count,
                rank,
                node: Node::Leaf { symbol, count },
            })
            .collect();
        let mut next_rank = heap.len();

        while heap.len() > 1 {
            let (Some(zero), Some(one)) = (heap.pop(), heap.pop()) else {
                break;
            };
            let count = zero.count + one.count;
            heap.push(Ranked {
                count,
                rank: next_rank,
                node: Node::Internal {
                    count,
                    zero: Box::new(zero.node),
                    one: Box::new(one.node),
                },
            });
            next_rank += 1;
        }

        let root = heap.pop().ok_or(CompressError::EmptyFrequencyTable)?.node;
        let tree = Self { root };
        debug!(
            leaves = table.len(),
            depth = tree.depth(),
            weight = tree.root.count(),
            "built code tree"
        );
        Ok(tree)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(&self.root, 0usize)];
        while let Some((node, d)) = stack.pop() {
            match node {
                Node::Leaf { .. } => max = max.max(d),
                Node::Internal { zero, one, .. } => {
                    stack.push((&**zero, d + 1));
                    stack.push((&**one, d + 1));
                }
            }
        }
        max
    }

    pub fn leaf_count(&self) -> usize {
        let mut leaves = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf { .. } => leaves += 1,
                Node::Internal { zero, one, .. } => {
                    stack.push(&**zero);
                    stack.push(&**one);
                }
            }
        }
        leaves
    }
}

impl fmt::Display for CodeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(&self.root, 0usize, "root")];
        while let Some((node, depth, label)) = stack.pop() {
            let indent = "  ".repeat(depth);
            match node {
                Node::Leaf { symbol, count } => {
                    writeln!(f, "{}{} -> {} [count: {}]", indent, label, symbol, count)?;
                }
                Node::Internal { count, zero, one } => {
                    writeln!(f, "{}{} -> * [count: {}]", indent, label, count)?;
                    stack.push((&**one, depth + 1, "1"));
                    stack.push((&**zero, depth + 1, "0"));
                }
            }
        }
        Ok(())
    }
}
