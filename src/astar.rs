//! A* over an implicit graph described by closures, shared by the waypoint and grid
//! solvers. Scratch state (running costs and predecessors) lives in a side table keyed
//! by node that is cleared at the start of every run, so the searched structure itself
//! is never mutated.
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::debug;
use num_traits::Zero;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Total order over costs that only implement [PartialOrd]; incomparable values tie.
#[inline]
fn cmp_cost<C: PartialOrd>(a: &C, b: &C) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

#[derive(Clone, Debug)]
struct SmallestCostHolder<K> {
    estimated_cost: K,
    heuristic: K,
    cost: K,
    index: usize,
    sequence: usize,
}

impl<K: PartialOrd> Eq for SmallestCostHolder<K> {}

impl<K: PartialOrd> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: PartialOrd> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: PartialOrd> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // The heap pops its maximum, so every comparison is reversed: lowest estimated
        // cost first, then lowest heuristic, then the entry pushed earliest.
        cmp_cost(&other.estimated_cost, &self.estimated_cost)
            .then_with(|| cmp_cost(&other.heuristic, &self.heuristic))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

fn reverse_path<N, V, F>(parents: &FxIndexMap<N, V>, mut parent: F, start: usize) -> Vec<N>
where
    N: Eq + Hash + Clone,
    F: FnMut(&V) -> usize,
{
    let mut path: Vec<N> = std::iter::successors(Some(start), |&i| {
        parents.get_index(i).map(|(_, value)| parent(value))
    })
    .map_while(|i| parents.get_index(i).map(|(node, _)| node.clone()))
    .collect();
    path.reverse();
    path
}

/// Reusable open set and side table for A* runs.
#[derive(Clone, Debug)]
pub struct SearchContext<N, C> {
    to_see: BinaryHeap<SmallestCostHolder<C>>,
    pub(crate) parents: FxIndexMap<N, (usize, C)>,
    sequence: usize,
    expanded: usize,
}

impl<N, C> Default for SearchContext<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + PartialOrd + Copy,
{
    fn default() -> Self {
        SearchContext::new()
    }
}

impl<N, C> SearchContext<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + PartialOrd + Copy,
{
    pub fn new() -> SearchContext<N, C> {
        SearchContext {
            to_see: BinaryHeap::new(),
            parents: FxIndexMap::default(),
            sequence: 0,
            expanded: 0,
        }
    }

    /// Number of expansions made by the last run, including re-expansions.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Number of distinct nodes discovered by the last run.
    pub fn discovered(&self) -> usize {
        self.parents.len()
    }

    fn push(&mut self, cost: C, heuristic: C, index: usize) {
        self.to_see.push(SmallestCostHolder {
            estimated_cost: cost + heuristic,
            heuristic,
            cost,
            index,
            sequence: self.sequence,
        });
        self.sequence += 1;
    }

    /// Searches from `start` until a node satisfying `success` is popped from the open
    /// set. Returns the path including both ends and its cost, or [None] once the open
    /// set runs dry.
    ///
    /// A node that is reached again with a strictly lower cost is pushed again even if it
    /// was already expanded, which keeps the result optimal when the heuristic is not
    /// consistent with the edge costs.
    pub fn astar<FN, IN, FH, FS>(
        &mut self,
        start: &N,
        mut successors: FN,
        mut heuristic: FH,
        mut success: FS,
    ) -> Option<(Vec<N>, C)>
    where
        FN: FnMut(&N) -> IN,
        IN: IntoIterator<Item = (N, C)>,
        FH: FnMut(&N) -> C,
        FS: FnMut(&N) -> bool,
    {
        self.to_see.clear();
        self.parents.clear();
        self.sequence = 0;
        self.expanded = 0;

        let h = heuristic(start);
        self.parents.insert(start.clone(), (usize::MAX, Zero::zero()));
        self.push(Zero::zero(), h, 0);
        while let Some(SmallestCostHolder { cost, index, .. }) = self.to_see.pop() {
            let successors = {
                let Some((node, &(_, c))) = self.parents.get_index(index) else {
                    continue;
                };
                // Entries superseded by a cheaper route to the same node are skipped.
                if cmp_cost(&cost, &c) == Ordering::Greater {
                    continue;
                }
                if success(node) {
                    let path = reverse_path(&self.parents, |&(p, _)| p, index);
                    return Some((path, cost));
                }
                self.expanded += 1;
                successors(node)
            };
            for (successor, move_cost) in successors {
                let new_cost = cost + move_cost;
                let h; // heuristic(&successor)
                let n; // index for successor
                match self.parents.entry(successor) {
                    Vacant(e) => {
                        h = heuristic(e.key());
                        n = e.index();
                        e.insert((index, new_cost));
                    }
                    Occupied(mut e) => {
                        if cmp_cost(&new_cost, &e.get().1) == Ordering::Less {
                            h = heuristic(e.key());
                            n = e.index();
                            e.insert((index, new_cost));
                        } else {
                            continue;
                        }
                    }
                }
                self.push(new_cost, h, n);
            }
        }
        debug!(
            "Open set exhausted after {} expansions without reaching the goal",
            self.expanded
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Small weighted digraph given as an edge list.
    fn successors_of(edges: &[(u8, u8, i32)], node: u8) -> Vec<(u8, i32)> {
        edges
            .iter()
            .filter(|(from, _, _)| *from == node)
            .map(|&(_, to, c)| (to, c))
            .collect()
    }

    #[test]
    fn start_is_goal() {
        let mut ct: SearchContext<u8, i32> = SearchContext::new();
        let (path, cost) = ct.astar(&0, |_| Vec::new(), |_| 0, |n| *n == 0).unwrap();
        assert_eq!(path, vec![0]);
        assert_eq!(cost, 0);
    }

    #[test]
    fn finds_cheapest_route() {
        let edges = [(0, 1, 1), (1, 3, 5), (0, 2, 2), (2, 3, 1)];
        let mut ct = SearchContext::new();
        let (path, cost) = ct
            .astar(&0, |n| successors_of(&edges, *n), |_| 0, |n| *n == 3)
            .unwrap();
        assert_eq!(path, vec![0, 2, 3]);
        assert_eq!(cost, 3);
    }

    #[test]
    fn exhausted_open_set_is_none() {
        let edges = [(0, 1, 1), (2, 3, 1)];
        let mut ct = SearchContext::new();
        assert!(ct
            .astar(&0, |n| successors_of(&edges, *n), |_| 0, |n| *n == 3)
            .is_none());
        assert_eq!(ct.discovered(), 2);
    }

    #[test]
    fn ties_prefer_lower_heuristic_then_encounter_order() {
        // Two equal-cost routes 0-1-3 and 0-2-3; node 2 looks closer to the goal.
        let edges = [(0, 1, 1), (0, 2, 1), (1, 3, 1), (2, 3, 1)];
        let h = |n: &u8| match n {
            1 => 1,
            2 => 0,
            _ => 0,
        };
        let mut ct = SearchContext::new();
        let (path, _) = ct
            .astar(&0, |n| successors_of(&edges, *n), h, |n| *n == 3)
            .unwrap();
        assert_eq!(path, vec![0, 2, 3]);

        // With a flat heuristic the first discovered branch wins, every time.
        for _ in 0..3 {
            let (path, _) = ct
                .astar(&0, |n| successors_of(&edges, *n), |_| 0, |n| *n == 3)
                .unwrap();
            assert_eq!(path, vec![0, 1, 3]);
        }
    }

    #[test]
    fn reopens_closed_node_on_cheaper_route() {
        // The heuristic overestimates at node 1, so node 2 is expanded through the
        // expensive edge first and has to be reopened once 1 is expanded.
        let edges = [(0, 1, 1), (0, 2, 5), (1, 2, 1), (2, 3, 3)];
        let h = |n: &u8| match n {
            1 => 5,
            _ => 0,
        };
        let mut ct = SearchContext::new();
        let (path, cost) = ct
            .astar(&0, |n| successors_of(&edges, *n), h, |n| *n == 3)
            .unwrap();
        assert_eq!(path, vec![0, 1, 2, 3]);
        assert_eq!(cost, 5);
        assert!(ct.expanded() > 3);
    }

    #[test]
    fn float_costs() {
        let mut ct: SearchContext<u8, f32> = SearchContext::new();
        let succ = |n: &u8| -> Vec<(u8, f32)> {
            match n {
                0 => vec![(1, 0.5), (2, 1.5)],
                1 => vec![(2, 0.5)],
                _ => vec![],
            }
        };
        let (path, cost) = ct.astar(&0, succ, |_| 0.0, |n| *n == 2).unwrap();
        assert_eq!(path, vec![0, 1, 2]);
        assert!((cost - 1.0).abs() < 1e-6);
    }
}
