//! Dijkstra's and A* search on top of a [`DecreaseKeyHeap`]
//!
//! Each discovered node is inserted into the heap once. When a shorter route
//! to an open node is found, its heap entry is lowered in place with
//! `decrease_key` through the handle kept in the node's metadata, so the open
//! set never holds stale duplicates.
//!
//! # Design
//!
//! Only lightweight [`SearchKey`]s (scores plus a node index) live in the heap.
//! Node states are interned into a dense table, with an `FxHashMap` from state
//! to index for lookups.
//!
//! Dijkstra is A* with h(n) = 0.
//!
//! # Example
//!
//! ```rust
//! use addressable_heap::pathfinding::{dijkstra, SearchNode};
//! use addressable_heap::AddressableHeap;
//!
//! #[derive(Clone, PartialEq, Eq, Hash)]
//! struct GridPos { x: i32, y: i32, goal_x: i32, goal_y: i32 }
//!
//! impl SearchNode for GridPos {
//!     type Cost = u32;
//!
//!     fn successors(&self) -> Vec<(Self, Self::Cost)> {
//!         [(1, 0), (-1, 0), (0, 1), (0, -1)]
//!             .iter()
//!             .map(|&(dx, dy)| (GridPos { x: self.x + dx, y: self.y + dy, ..self.clone() }, 1))
//!             .collect()
//!     }
//!
//!     fn is_goal(&self) -> bool {
//!         self.x == self.goal_x && self.y == self.goal_y
//!     }
//! }
//!
//! let start = GridPos { x: 0, y: 0, goal_x: 2, goal_y: 2 };
//! let (path, cost) = dijkstra::<_, AddressableHeap<_>>(&start).unwrap();
//! assert_eq!(cost, 4);
//! assert_eq!(path.len(), 5);
//! ```

use crate::traits::{DecreaseKeyHeap, Handle};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::hash::Hash;
use std::ops::Add;
use tracing::{debug, warn};

/// Trait for types that can be used as path costs.
///
/// `Default` must be the zero cost.
pub trait Cost: Ord + Copy + Add<Output = Self> + Default + std::fmt::Debug {}

impl<T> Cost for T where T: Ord + Copy + Add<Output = Self> + Default + std::fmt::Debug {}

/// Trait for nodes in a search graph.
///
/// The node carries whatever context it needs to enumerate its neighbours and
/// to recognise a goal.
pub trait SearchNode: Clone + Eq + Hash {
    /// The edge weight type
    type Cost: Cost;

    /// Returns all successors along with the cost to reach them.
    fn successors(&self) -> Vec<(Self, Self::Cost)>;

    /// Returns true if this node is a goal state.
    fn is_goal(&self) -> bool;
}

/// Trait for nodes that can estimate their remaining distance for A*.
pub trait AStarNode: SearchNode {
    /// Estimated cost from this node to the nearest goal.
    ///
    /// Must never overestimate for A* to return optimal paths.
    fn heuristic(&self) -> Self::Cost;
}

/// Index of an interned node.
pub type NodeIndex = usize;

/// Heap key for an open node.
///
/// Ordered by `f_score` only; ties are broken by the heap's layout.
#[derive(Debug, Clone, Copy)]
pub struct SearchKey<C> {
    /// g + h (h = 0 for Dijkstra)
    pub f_score: C,
    /// Cost from the start node
    pub g_score: C,
    /// The node this key belongs to
    pub node: NodeIndex,
}

impl<C: Ord> PartialEq for SearchKey<C> {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score
    }
}

impl<C: Ord> Eq for SearchKey<C> {}

impl<C: Ord> PartialOrd for SearchKey<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Ord> Ord for SearchKey<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score.cmp(&other.f_score)
    }
}

/// Metadata for each discovered node.
struct NodeEntry<N: SearchNode, H> {
    node: N,
    /// Best known cost from start
    g_score: N::Cost,
    /// Heap handle while the node is open
    handle: Option<H>,
    came_from: Option<NodeIndex>,
    closed: bool,
}

/// Interned node table for one search.
struct PathFinder<N: SearchNode, H> {
    entries: Vec<NodeEntry<N, H>>,
    index_of: FxHashMap<N, NodeIndex>,
}

impl<N: SearchNode, H: Handle> PathFinder<N, H> {
    fn new() -> Self {
        PathFinder {
            entries: Vec::new(),
            index_of: FxHashMap::default(),
        }
    }

    /// Returns the node's index and whether it was newly discovered.
    fn intern(&mut self, node: N, g_score: N::Cost) -> (NodeIndex, bool) {
        if let Some(&index) = self.index_of.get(&node) {
            return (index, false);
        }
        let index = self.entries.len();
        self.index_of.insert(node.clone(), index);
        self.entries.push(NodeEntry {
            node,
            g_score,
            handle: None,
            came_from: None,
            closed: false,
        });
        (index, true)
    }

    fn reconstruct_path(&self, mut current: NodeIndex) -> Vec<N> {
        let mut path = vec![self.entries[current].node.clone()];
        while let Some(previous) = self.entries[current].came_from {
            path.push(self.entries[previous].node.clone());
            current = previous;
        }
        path.reverse();
        path
    }
}

/// Exploration limits for a search.
#[derive(Debug, Clone, Copy)]
struct SearchLimits<C> {
    max_cost: Option<C>,
    max_nodes: Option<usize>,
}

impl<C> SearchLimits<C> {
    fn unbounded() -> Self {
        SearchLimits {
            max_cost: None,
            max_nodes: None,
        }
    }
}

/// Runs Dijkstra's algorithm from `start` until a node with `is_goal()` is settled.
///
/// # Returns
/// - `Some((path, cost))`, where `path` runs from `start` to the goal inclusive
/// - `None` if no goal is reachable
pub fn dijkstra<N, H>(start: &N) -> Option<(Vec<N>, N::Cost)>
where
    N: SearchNode,
    H: DecreaseKeyHeap<SearchKey<N::Cost>>,
{
    search_impl::<N, H>(
        start,
        |_| N::Cost::default(),
        SearchLimits::unbounded(),
        |node, _| node.is_goal(),
    )
}

/// Runs A* search from `start`, guided by the node's `heuristic()`.
///
/// Returns the same shape as [`dijkstra`].
pub fn astar<N, H>(start: &N) -> Option<(Vec<N>, N::Cost)>
where
    N: AStarNode,
    H: DecreaseKeyHeap<SearchKey<N::Cost>>,
{
    search_impl::<N, H>(
        start,
        |node| node.heuristic(),
        SearchLimits::unbounded(),
        |node, _| node.is_goal(),
    )
}

/// Returns every node reachable from `start` with total cost `<= max_cost`,
/// in order of increasing cost.
pub fn reachable_within<N, H>(start: &N, max_cost: N::Cost) -> Vec<(N, N::Cost)>
where
    N: SearchNode,
    H: DecreaseKeyHeap<SearchKey<N::Cost>>,
{
    let mut reached = Vec::new();
    let limits = SearchLimits {
        max_cost: Some(max_cost),
        max_nodes: None,
    };
    search_impl::<N, H>(
        start,
        |_| N::Cost::default(),
        limits,
        |node, cost| {
            reached.push((node.clone(), cost));
            false
        },
    );
    reached
}

/// Builder for searches with exploration limits.
pub struct PathFinderBuilder<N: SearchNode> {
    start: N,
    limits: SearchLimits<N::Cost>,
}

impl<N: SearchNode> PathFinderBuilder<N> {
    /// Creates a new builder starting from the given node.
    pub fn new(start: N) -> Self {
        PathFinderBuilder {
            start,
            limits: SearchLimits::unbounded(),
        }
    }

    /// Ignores routes whose cost exceeds `cost`.
    pub fn max_cost(mut self, cost: N::Cost) -> Self {
        self.limits.max_cost = Some(cost);
        self
    }

    /// Gives up after settling `count` nodes.
    pub fn max_nodes(mut self, count: usize) -> Self {
        self.limits.max_nodes = Some(count);
        self
    }

    /// Runs Dijkstra's algorithm with the configured limits.
    pub fn dijkstra<H>(self) -> Option<(Vec<N>, N::Cost)>
    where
        H: DecreaseKeyHeap<SearchKey<N::Cost>>,
    {
        search_impl::<N, H>(
            &self.start,
            |_| N::Cost::default(),
            self.limits,
            |node, _| node.is_goal(),
        )
    }

    /// Runs A* search with the configured limits.
    pub fn astar<H>(self) -> Option<(Vec<N>, N::Cost)>
    where
        N: AStarNode,
        H: DecreaseKeyHeap<SearchKey<N::Cost>>,
    {
        search_impl::<N, H>(
            &self.start,
            |node| node.heuristic(),
            self.limits,
            |node, _| node.is_goal(),
        )
    }
}

/// Shared search loop.
///
/// `settle` is called once per node in order of increasing f-score; returning
/// true stops the search and yields the path to that node.
fn search_impl<N, H>(
    start: &N,
    heuristic: impl Fn(&N) -> N::Cost,
    limits: SearchLimits<N::Cost>,
    mut settle: impl FnMut(&N, N::Cost) -> bool,
) -> Option<(Vec<N>, N::Cost)>
where
    N: SearchNode,
    H: DecreaseKeyHeap<SearchKey<N::Cost>>,
{
    let zero = N::Cost::default();
    let mut heap = H::new();
    let mut finder: PathFinder<N, H::Handle> = PathFinder::new();

    let (start_index, _) = finder.intern(start.clone(), zero);
    let handle = heap.insert(SearchKey {
        f_score: heuristic(start),
        g_score: zero,
        node: start_index,
    });
    finder.entries[start_index].handle = Some(handle);

    debug!(?limits, "search started");
    let mut settled = 0usize;

    while let Ok(key) = heap.delete_min() {
        if let Some(max) = limits.max_nodes {
            if settled >= max {
                debug!(settled, open = heap.len(), "search hit node limit");
                return None;
            }
        }
        settled += 1;

        let entry = &mut finder.entries[key.node];
        entry.closed = true;
        entry.handle = None;
        let current = entry.node.clone();
        let current_g = key.g_score;

        if settle(&current, current_g) {
            debug!(settled, cost = ?current_g, "search reached goal");
            return Some((finder.reconstruct_path(key.node), current_g));
        }

        for (neighbor, edge_cost) in current.successors() {
            let tentative_g = current_g + edge_cost;
            if limits.max_cost.is_some_and(|max| tentative_g > max) {
                continue;
            }

            let (index, is_new) = finder.intern(neighbor, tentative_g);
            let entry = &mut finder.entries[index];
            if entry.closed || (!is_new && tentative_g >= entry.g_score) {
                continue;
            }

            entry.g_score = tentative_g;
            entry.came_from = Some(key.node);
            let new_key = SearchKey {
                f_score: tentative_g + heuristic(&entry.node),
                g_score: tentative_g,
                node: index,
            };

            match entry.handle.clone() {
                Some(handle) => {
                    if let Err(error) = heap.decrease_key(&handle, new_key) {
                        warn!(%error, node = index, "failed to lower open node");
                    }
                }
                None => entry.handle = Some(heap.insert(new_key)),
            }
        }
    }

    debug!(settled, "search exhausted open set");
    None
}
