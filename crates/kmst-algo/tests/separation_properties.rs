//! Randomized checks of the acyclicity and connectivity machinery

use kmst_algo::{build, separate_connectivity, separate_cycle, Formulation, KmstFormulation, EPSILON};
use kmst_core::{GraphBuilder, GraphInstance};
use kmst_solver_common::Snapshot;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Cycle 1..=m plus a pendant node m+1 hanging off node 1.
fn cycle_with_pendant(m: usize, rng: &mut StdRng) -> GraphInstance {
    let mut builder = GraphBuilder::new().nodes(1..=m + 1);
    for i in 1..=m {
        let j = if i == m { 1 } else { i + 1 };
        builder = builder.edge(i - 1, i, j, rng.gen_range(1..1000));
    }
    builder.edge(m, 1, m + 1, rng.gen_range(1..1000)).build().unwrap()
}

/// Select every node, orient the cycle edges one way round and feed the
/// pendant node from the root.
fn cyclic_assignment(built: &KmstFormulation, m: usize, clockwise: bool) -> Vec<f64> {
    let vars = &built.vars;
    let mut values = vec![0.0; built.model.num_vars()];
    for &x in &vars.select_node {
        values[x.index()] = 1.0;
    }
    for e in 0..m {
        let y = if clockwise { vars.forward(e) } else { vars.reverse(e) };
        values[y.index()] = 1.0;
    }
    values
}

#[test]
fn seq_rejects_every_cyclic_assignment() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let m = rng.gen_range(3..=7);
        let graph = cycle_with_pendant(m, &mut rng);
        let k = m + 1;
        let built = build(&graph, k, Formulation::Seq).unwrap();
        let vars = &built.vars;
        let root_arc = vars.root_arc.as_ref().unwrap();
        let order = vars.order.as_ref().unwrap();

        let mut values = cyclic_assignment(&built, m, rng.gen_bool(0.5));
        values[root_arc[m].index()] = 1.0;
        for &u in order {
            values[u.index()] = if rng.gen_bool(0.5) {
                rng.gen_range(0..=k + 1) as f64
            } else {
                rng.gen_range(0.0..=(k + 1) as f64)
            };
        }
        assert!(
            !built.model.is_feasible(&values, EPSILON),
            "cyclic assignment on a {m}-cycle accepted"
        );
    }
}

#[test]
fn seq_accepts_the_spanning_path_of_the_same_graphs() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..50 {
        let m = rng.gen_range(3..=7);
        let graph = cycle_with_pendant(m, &mut rng);
        let k = m + 1;
        let built = build(&graph, k, Formulation::Seq).unwrap();
        let vars = &built.vars;
        let root_arc = vars.root_arc.as_ref().unwrap();
        let order = vars.order.as_ref().unwrap();

        // root -> m+1 -> 1 -> 2 -> ... -> m
        let mut values = vec![0.0; built.model.num_vars()];
        for &x in &vars.select_node {
            values[x.index()] = 1.0;
        }
        values[root_arc[m].index()] = 1.0;
        values[order[m].index()] = 1.0;
        values[vars.reverse(m).index()] = 1.0;
        for e in 0..m - 1 {
            values[vars.forward(e).index()] = 1.0;
        }
        for node in 0..m {
            values[order[node].index()] = (node + 2) as f64;
        }
        assert!(built.model.is_feasible(&values, EPSILON));
    }
}

#[test]
fn cycle_cut_matches_cycle_length() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..100 {
        let m = rng.gen_range(3..=9);
        let graph = cycle_with_pendant(m, &mut rng);
        let built = build(&graph, m + 1, Formulation::Cec).unwrap();
        let values = cyclic_assignment(&built, m, rng.gen_bool(0.5));

        let cut = separate_cycle(&graph, &built.vars, &Snapshot::new(values.clone()))
            .unwrap()
            .expect("cycle must be cut");
        assert_eq!(cut.rhs, (m - 1) as f64);
        assert_eq!(cut.len(), 2 * m);
        assert!(!cut.is_satisfied(&values, EPSILON));
    }
}

#[test]
fn cycle_separation_ignores_forests() {
    let mut rng = StdRng::seed_from_u64(29);
    for _ in 0..100 {
        let m = rng.gen_range(3..=9);
        let graph = cycle_with_pendant(m, &mut rng);
        let built = build(&graph, m + 1, Formulation::Cec).unwrap();
        let mut values = cyclic_assignment(&built, m, true);
        // drop one random cycle edge and use the pendant edge
        let dropped = rng.gen_range(0..m);
        values[built.vars.forward(dropped).index()] = 0.0;
        values[built.vars.forward(m).index()] = 1.0;

        let cut = separate_cycle(&graph, &built.vars, &Snapshot::new(values)).unwrap();
        assert!(cut.is_none());
    }
}

#[test]
fn connectivity_cut_forces_an_entering_arc() {
    let mut rng = StdRng::seed_from_u64(31);
    for _ in 0..100 {
        let m = rng.gen_range(3..=8);
        let graph = cycle_with_pendant(m, &mut rng);
        let built = build(&graph, m + 1, Formulation::Dcc).unwrap();
        let vars = &built.vars;
        let is_root = vars.is_root.as_ref().unwrap();

        // pendant node is the root; the directed cycle floats on its own
        let mut values = cyclic_assignment(&built, m, rng.gen_bool(0.5));
        values[is_root[m].index()] = 1.0;

        let cut = separate_connectivity(&graph, vars, &Snapshot::new(values.clone()))
            .unwrap()
            .expect("floating cycle must be cut");
        assert!(!cut.is_satisfied(&values, EPSILON));

        // feeding node 1 from the pendant root satisfies it
        values[vars.reverse(m).index()] = 1.0;
        assert!(cut.is_satisfied(&values, EPSILON));
    }
}

#[test]
fn connected_arborescences_yield_no_connectivity_cut() {
    let mut rng = StdRng::seed_from_u64(37);
    for _ in 0..100 {
        let m = rng.gen_range(3..=8);
        let graph = cycle_with_pendant(m, &mut rng);
        let built = build(&graph, m + 1, Formulation::Dcc).unwrap();
        let vars = &built.vars;
        let is_root = vars.is_root.as_ref().unwrap();

        // root m+1 -> 1 -> 2 -> ... -> m
        let mut values = vec![0.0; built.model.num_vars()];
        for &x in &vars.select_node {
            values[x.index()] = 1.0;
        }
        values[is_root[m].index()] = 1.0;
        values[vars.reverse(m).index()] = 1.0;
        for e in 0..m - 1 {
            values[vars.forward(e).index()] = 1.0;
        }
        let cut = separate_connectivity(&graph, vars, &Snapshot::new(values)).unwrap();
        assert!(cut.is_none());
    }
}
