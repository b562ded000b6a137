//! Strongly connected components and cycle extraction over small
//! dependency graphs (production left-corners, regex label references).

use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};

pub type Graph<K> = IndexMap<K, IndexSet<K>>;

/// Tarjan's algorithm. Components come out in reverse topological order;
/// members keep discovery order.
pub fn strongly_connected<K: Copy + Eq + Hash>(graph: &Graph<K>) -> Vec<Vec<K>> {
    let mut finder = SccFinder {
        graph,
        index: 0,
        stack: Vec::new(),
        on_stack: IndexSet::new(),
        indices: IndexMap::new(),
        lowlinks: IndexMap::new(),
        sccs: Vec::new(),
    };

    for &node in graph.keys() {
        if !finder.indices.contains_key(&node) {
            finder.strongconnect(node);
        }
    }

    finder.sccs
}

/// Whether a component actually loops: more than one member, or a self edge.
pub fn is_cyclic<K: Copy + Eq + Hash>(graph: &Graph<K>, scc: &[K]) -> bool {
    match scc {
        [single] => graph.get(single).is_some_and(|succ| succ.contains(single)),
        _ => !scc.is_empty(),
    }
}

struct SccFinder<'a, K> {
    graph: &'a Graph<K>,
    index: usize,
    stack: Vec<K>,
    on_stack: IndexSet<K>,
    indices: IndexMap<K, usize>,
    lowlinks: IndexMap<K, usize>,
    sccs: Vec<Vec<K>>,
}

impl<K: Copy + Eq + Hash> SccFinder<'_, K> {
    fn strongconnect(&mut self, node: K) {
        self.indices.insert(node, self.index);
        self.lowlinks.insert(node, self.index);
        self.index += 1;
        self.stack.push(node);
        self.on_stack.insert(node);

        if let Some(successors) = self.graph.get(&node) {
            for &succ in successors {
                if !self.indices.contains_key(&succ) {
                    self.strongconnect(succ);
                    let low = self.lowlinks[&succ].min(self.lowlinks[&node]);
                    self.lowlinks.insert(node, low);
                } else if self.on_stack.contains(&succ) {
                    let low = self.indices[&succ].min(self.lowlinks[&node]);
                    self.lowlinks.insert(node, low);
                }
            }
        }

        if self.lowlinks[&node] == self.indices[&node] {
            let mut scc = Vec::new();
            while let Some(w) = self.stack.pop() {
                self.on_stack.swap_remove(&w);
                scc.push(w);
                if w == node {
                    break;
                }
            }
            scc.reverse();
            self.sccs.push(scc);
        }
    }
}

/// Finds a cycle through `start` staying inside `domain`.
///
/// Returns the closed path `[start, ..., start]`.
pub fn find_cycle<K: Copy + Eq + Hash>(graph: &Graph<K>, domain: &[K], start: K) -> Option<Vec<K>> {
    let mut finder = CycleFinder {
        graph,
        domain,
        visited: IndexSet::new(),
        path: Vec::new(),
    };
    finder.dfs(start, start)
}

struct CycleFinder<'a, K> {
    graph: &'a Graph<K>,
    domain: &'a [K],
    visited: IndexSet<K>,
    path: Vec<K>,
}

impl<K: Copy + Eq + Hash> CycleFinder<'_, K> {
    fn dfs(&mut self, current: K, target: K) -> Option<Vec<K>> {
        if !self.visited.insert(current) {
            return None;
        }
        self.path.push(current);

        if let Some(successors) = self.graph.get(&current) {
            for &succ in successors {
                if !self.domain.contains(&succ) {
                    continue;
                }
                if succ == target {
                    let mut chain = self.path.clone();
                    chain.push(target);
                    return Some(chain);
                }
                if let Some(chain) = self.dfs(succ, target) {
                    return Some(chain);
                }
            }
        }

        self.path.pop();
        None
    }
}
