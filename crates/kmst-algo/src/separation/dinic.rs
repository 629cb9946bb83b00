//! Dinic's max-flow / min-cut on a small residual network.
//!
//! Arcs live in one arena; arc `2i` is a forward arc and `2i + 1` its
//! residual twin, so the partner of arc `a` is `a ^ 1`.

use std::collections::VecDeque;

/// Residual capacities at or below this are treated as saturated.
const CAPACITY_TOLERANCE: f64 = 1e-9;

/// Capacitated directed network supporting repeated s-t max-flow queries.
///
/// Queries run on a copy of the capacities, so the network can be reused.
#[derive(Debug, Clone)]
pub struct FlowNetwork {
    heads: Vec<usize>,
    capacity: Vec<f64>,
    leaving: Vec<Vec<usize>>,
}

/// Result of one s-t min-cut query.
#[derive(Debug, Clone, PartialEq)]
pub struct MinCut {
    pub value: f64,
    /// `true` for nodes on the source side (reachable in the final residual).
    pub source_side: Vec<bool>,
}

impl FlowNetwork {
    pub fn new(nodes: usize) -> Self {
        Self {
            heads: Vec::new(),
            capacity: Vec::new(),
            leaving: vec![Vec::new(); nodes],
        }
    }

    pub fn add_edge(&mut self, from: usize, to: usize, cap: f64) {
        let arc = self.heads.len();
        self.heads.extend([to, from]);
        self.capacity.extend([cap, 0.0]);
        self.leaving[from].push(arc);
        self.leaving[to].push(arc + 1);
    }

    /// Maximum s-t flow and the corresponding minimum cut.
    pub fn min_cut(&self, s: usize, t: usize) -> MinCut {
        let n = self.leaving.len();
        let mut residual = Residual {
            net: self,
            capacity: self.capacity.clone(),
            depth: vec![None; n],
            cursor: vec![0; n],
        };

        let mut value = 0.0;
        while residual.layer(s) && residual.depth[t].is_some() {
            residual.cursor.fill(0);
            while let Some(pushed) = residual.augment(s, t, f64::INFINITY) {
                value += pushed;
            }
        }

        MinCut {
            value,
            source_side: residual.depth.iter().map(Option::is_some).collect(),
        }
    }
}

/// Per-query state: residual capacities, BFS layers, arc cursors.
struct Residual<'a> {
    net: &'a FlowNetwork,
    capacity: Vec<f64>,
    depth: Vec<Option<usize>>,
    cursor: Vec<usize>,
}

impl Residual<'_> {
    /// Layer the nodes reachable from `s`. Always `true`, so it can sit at the
    /// head of a `while` condition.
    fn layer(&mut self, s: usize) -> bool {
        self.depth.fill(None);
        self.depth[s] = Some(0);
        let mut queue = VecDeque::from([s]);
        while let Some(v) = queue.pop_front() {
            let next = self.depth[v].map(|d| d + 1);
            for &arc in &self.net.leaving[v] {
                let w = self.net.heads[arc];
                if self.capacity[arc] > CAPACITY_TOLERANCE && self.depth[w].is_none() {
                    self.depth[w] = next;
                    queue.push_back(w);
                }
            }
        }
        true
    }

    /// Push one augmenting path along strictly increasing layers.
    fn augment(&mut self, v: usize, t: usize, limit: f64) -> Option<f64> {
        if v == t {
            return Some(limit);
        }
        while let Some(&arc) = self.net.leaving[v].get(self.cursor[v]) {
            let w = self.net.heads[arc];
            let room = self.capacity[arc];
            let downhill = matches!((self.depth[v], self.depth[w]), (Some(dv), Some(dw)) if dw == dv + 1);
            if room > CAPACITY_TOLERANCE && downhill {
                if let Some(pushed) = self.augment(w, t, limit.min(room)) {
                    if pushed > CAPACITY_TOLERANCE {
                        self.capacity[arc] -= pushed;
                        self.capacity[arc ^ 1] += pushed;
                        return Some(pushed);
                    }
                }
            }
            self.cursor[v] += 1;
        }
        None
    }
}
