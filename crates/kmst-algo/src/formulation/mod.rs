//! Built-in k-MST formulations.
//!
//! Every variant shares the base model (node and arc selection, cardinality,
//! linking, one direction per edge, edge-cost objective). Each variant then
//! adds its own connectivity machinery through [`FormulationStrategy`].

mod cec;
mod dcc;
mod mcf;
mod scf;
mod seq;

pub use cec::CecFormulation;
pub use dcc::DccFormulation;
pub use mcf::McfFormulation;
pub use scf::ScfFormulation;
pub use seq::SeqFormulation;

use kmst_core::{GraphInstance, KmstError, KmstResult, ROOT_NODE_ID};
use kmst_solver_common::{LinearConstraint, LinearExpr, MipModel, VarId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Closed set of formulation variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formulation {
    Seq,
    Scf,
    Mcf,
    Cec,
    Dcc,
}

impl Formulation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Formulation::Seq => "seq",
            Formulation::Scf => "scf",
            Formulation::Mcf => "mcf",
            Formulation::Cec => "cec",
            Formulation::Dcc => "dcc",
        }
    }

    pub fn all() -> &'static [Formulation] {
        &[
            Formulation::Seq,
            Formulation::Scf,
            Formulation::Mcf,
            Formulation::Cec,
            Formulation::Dcc,
        ]
    }

    /// Strategy object implementing this variant.
    pub fn strategy(&self) -> &'static dyn FormulationStrategy {
        match self {
            Formulation::Seq => &SeqFormulation,
            Formulation::Scf => &ScfFormulation,
            Formulation::Mcf => &McfFormulation,
            Formulation::Cec => &CecFormulation,
            Formulation::Dcc => &DccFormulation,
        }
    }

    /// Whether the model is only correct with lazy constraints enabled.
    pub fn needs_separation(&self) -> bool {
        self.strategy().needs_separation()
    }
}

impl fmt::Display for Formulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Formulation {
    type Err = KmstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "seq" => Ok(Formulation::Seq),
            "scf" => Ok(Formulation::Scf),
            "mcf" => Ok(Formulation::Mcf),
            "cec" => Ok(Formulation::Cec),
            "dcc" => Ok(Formulation::Dcc),
            other => Err(KmstError::config(format!(
                "unknown formulation '{other}' (expected one of seq, scf, mcf, cec, dcc)"
            ))),
        }
    }
}

/// Variable families of a built model, indexed by dense node/arc indices.
///
/// Families a variant does not declare stay `None`.
#[derive(Debug, Clone, Default)]
pub struct KmstVars {
    /// `select_node[i]`, one per node.
    pub select_node: Vec<VarId>,
    /// `select_arc[a]`, one per directed arc of the instance.
    pub select_arc: Vec<VarId>,
    /// `root_arc[j]`: arc from the artificial root to node `j` (SEQ, SCF).
    pub root_arc: Option<Vec<VarId>>,
    /// `is_root[j]` (SCF, MCF, DCC). In SCF this aliases `root_arc`.
    pub is_root: Option<Vec<VarId>>,
    /// `order[j]` MTZ potentials (SEQ).
    pub order: Option<Vec<VarId>>,
    /// Potential of the artificial root, fixed to 0 (SEQ).
    pub root_order: Option<VarId>,
    /// `flow[a]` on instance arcs (SCF).
    pub flow: Option<Vec<VarId>>,
    /// `flow[0, j]` on root arcs (SCF).
    pub root_flow: Option<Vec<VarId>>,
    /// `flow[a, c]` per commodity node `c` (MCF), indexed `[c][a]`.
    pub commodity_flow: Option<Vec<Vec<VarId>>>,
    /// Number of variables in the model the ids refer to.
    pub num_vars: usize,
}

impl KmstVars {
    /// Arc variable for edge `e` in source -> target direction.
    pub fn forward(&self, edge: usize) -> VarId {
        self.select_arc[GraphInstance::forward_arc(edge)]
    }

    /// Arc variable for edge `e` in target -> source direction.
    pub fn reverse(&self, edge: usize) -> VarId {
        self.select_arc[GraphInstance::reverse_arc(edge)]
    }
}

/// A built model together with its variable map.
#[derive(Debug, Clone)]
pub struct KmstFormulation {
    pub formulation: Formulation,
    pub k: usize,
    pub model: MipModel,
    pub vars: KmstVars,
}

/// One formulation variant.
pub trait FormulationStrategy: Send + Sync {
    fn id(&self) -> Formulation;

    /// Whether lazy separation is needed for correctness.
    fn needs_separation(&self) -> bool {
        false
    }

    /// Declare the variant's variables and constraints on top of the base model.
    fn add_constraints(
        &self,
        graph: &GraphInstance,
        k: usize,
        model: &mut MipModel,
        vars: &mut KmstVars,
    ) -> KmstResult<()>;
}

/// Build the MIP model of `formulation` for selecting a `k`-tree of `graph`.
pub fn build(graph: &GraphInstance, k: usize, formulation: Formulation) -> KmstResult<KmstFormulation> {
    if k > graph.node_count() {
        return Err(KmstError::config(format!(
            "k = {k} exceeds the number of nodes ({})",
            graph.node_count()
        )));
    }
    if graph.contains_node(ROOT_NODE_ID) {
        return Err(KmstError::config(format!(
            "node id {ROOT_NODE_ID} is reserved for the artificial root"
        )));
    }

    let mut model = MipModel::new();
    let mut vars = add_base(graph, k, &mut model);
    formulation
        .strategy()
        .add_constraints(graph, k, &mut model, &mut vars)?;
    vars.num_vars = model.num_vars();

    debug!(
        formulation = %formulation,
        k,
        variables = model.num_vars(),
        constraints = model.constraints().len(),
        "built formulation"
    );

    Ok(KmstFormulation {
        formulation,
        k,
        model,
        vars,
    })
}

/// Right-hand side of the arc-count constraint.
pub(crate) fn arc_count(k: usize) -> f64 {
    k.saturating_sub(1) as f64
}

/// Number of root selections (0 for the empty tree).
pub(crate) fn root_count(k: usize) -> f64 {
    k.min(1) as f64
}

fn add_base(graph: &GraphInstance, k: usize, model: &mut MipModel) -> KmstVars {
    let select_node: Vec<VarId> = graph
        .nodes()
        .map(|id| model.add_binary(format!("node_{id}")))
        .collect();
    let select_arc: Vec<VarId> = graph
        .arcs()
        .iter()
        .map(|arc| {
            model.add_binary(format!(
                "arc_{}_{}",
                graph.node_id(arc.tail),
                graph.node_id(arc.head)
            ))
        })
        .collect();

    model.add_constraint(LinearConstraint::equals(
        select_node.iter().map(|&x| (x, 1.0)).collect::<LinearExpr>(),
        k as f64,
    ));
    model.add_constraint(LinearConstraint::equals(
        select_arc.iter().map(|&y| (y, 1.0)).collect::<LinearExpr>(),
        arc_count(k),
    ));
    for (a, arc) in graph.arcs().iter().enumerate() {
        let y = select_arc[a];
        model.add_constraint(LinearConstraint::le(
            LinearExpr::new().term(y, 1.0).term(select_node[arc.tail], -1.0),
            0.0,
        ));
        model.add_constraint(LinearConstraint::le(
            LinearExpr::new().term(y, 1.0).term(select_node[arc.head], -1.0),
            0.0,
        ));
    }

    let mut objective = LinearExpr::new();
    for (e, edge) in graph.edges().enumerate() {
        let forward = select_arc[GraphInstance::forward_arc(e)];
        let reverse = select_arc[GraphInstance::reverse_arc(e)];
        model.add_constraint(LinearConstraint::le(
            LinearExpr::new().term(forward, 1.0).term(reverse, 1.0),
            1.0,
        ));
        if edge.cost > 0 {
            objective.add_term(forward, edge.cost as f64);
            objective.add_term(reverse, edge.cost as f64);
        }
    }
    model.set_objective(objective);

    KmstVars {
        select_node,
        select_arc,
        ..KmstVars::default()
    }
}

/// Declare one binary root selector per node with `sum = min(k, 1)` and
/// `selector[j] <= select_node[j]`.
pub(crate) fn add_root_selectors(
    graph: &GraphInstance,
    k: usize,
    model: &mut MipModel,
    vars: &KmstVars,
    prefix: &str,
) -> Vec<VarId> {
    let selectors: Vec<VarId> = graph
        .nodes()
        .map(|id| model.add_binary(format!("{prefix}_{id}")))
        .collect();
    model.add_constraint(LinearConstraint::equals(
        selectors.iter().map(|&r| (r, 1.0)).collect::<LinearExpr>(),
        root_count(k),
    ));
    for (node, &r) in selectors.iter().enumerate() {
        model.add_constraint(LinearConstraint::le(
            LinearExpr::new().term(r, 1.0).term(vars.select_node[node], -1.0),
            0.0,
        ));
    }
    selectors
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use kmst_core::GraphBuilder;

    #[test]
    fn test_formulation_ids_round_trip() {
        for formulation in Formulation::all() {
            let parsed: Formulation = formulation.as_str().parse().unwrap();
            assert_eq!(parsed, *formulation);
            assert_eq!(formulation.strategy().id(), *formulation);
        }
        assert_eq!("DCC".parse::<Formulation>().unwrap(), Formulation::Dcc);
    }

    #[test]
    fn test_unknown_formulation_is_configuration_error() {
        let err = "mtz".parse::<Formulation>().unwrap_err();
        assert!(matches!(err, KmstError::Configuration(_)));
    }

    #[test]
    fn test_only_cut_formulations_need_separation() {
        let lazy: Vec<_> = Formulation::all()
            .iter()
            .filter(|f| f.needs_separation())
            .collect();
        assert_eq!(lazy, vec![&Formulation::Cec, &Formulation::Dcc]);
    }

    #[test]
    fn test_k_above_node_count_rejected() {
        for formulation in Formulation::all() {
            let err = build(&square(), 5, *formulation).unwrap_err();
            assert!(matches!(err, KmstError::Configuration(_)));
        }
    }

    #[test]
    fn test_node_zero_rejected_for_every_formulation() {
        let graph = GraphBuilder::new()
            .nodes(0..=2)
            .edge(0, 0, 1, 1)
            .edge(1, 1, 2, 1)
            .build()
            .unwrap();
        for formulation in Formulation::all() {
            let err = build(&graph, 2, *formulation).unwrap_err();
            assert!(err.to_string().contains("reserved"), "{formulation}");
        }
    }

    #[test]
    fn test_base_constraints_count_nodes_and_arcs() {
        let graph = square();
        let built = build(&graph, 3, Formulation::Cec).unwrap();
        let vars = &built.vars;

        // path 1 -> 2 -> 3
        let mut values = zeros(built.model.num_vars());
        for node in 0..3 {
            values[vars.select_node[node].index()] = 1.0;
        }
        values[vars.forward(0).index()] = 1.0;
        values[vars.forward(1).index()] = 1.0;
        assert!(built.model.is_feasible(&values, EPS));
        assert_eq!(built.model.objective_value(&values), 2.0);

        // one arc too many
        values[vars.forward(2).index()] = 1.0;
        assert!(!built.model.is_feasible(&values, EPS));
        values[vars.forward(2).index()] = 0.0;

        // four nodes selected
        values[vars.select_node[3].index()] = 1.0;
        assert!(!built.model.is_feasible(&values, EPS));
    }

    #[test]
    fn test_arc_requires_both_endpoints() {
        let graph = square();
        let built = build(&graph, 2, Formulation::Cec).unwrap();
        let vars = &built.vars;

        let mut values = zeros(built.model.num_vars());
        values[vars.select_node[0].index()] = 1.0;
        values[vars.select_node[2].index()] = 1.0;
        // edge 1-2 selected but node 2 is not
        values[vars.forward(0).index()] = 1.0;
        assert!(!built.model.is_feasible(&values, EPS));
    }

    #[test]
    fn test_both_directions_rejected() {
        let graph = square();
        let built = build(&graph, 3, Formulation::Cec).unwrap();
        let vars = &built.vars;

        let mut values = zeros(built.model.num_vars());
        for node in 0..3 {
            values[vars.select_node[node].index()] = 1.0;
        }
        values[vars.forward(0).index()] = 1.0;
        values[vars.reverse(0).index()] = 1.0;
        assert!(!built.model.is_feasible(&values, EPS));
    }

    #[test]
    fn test_empty_tree_for_k_zero() {
        for formulation in Formulation::all() {
            let built = build(&square(), 0, *formulation).unwrap();
            built.model.validate().unwrap();
            let values = zeros(built.model.num_vars());
            assert!(
                built.model.is_feasible(&values, EPS),
                "{formulation} rejects the empty tree"
            );
        }
    }

    #[test]
    fn test_every_formulation_validates() {
        for formulation in Formulation::all() {
            let built = build(&square(), 3, *formulation).unwrap();
            assert!(built.model.validate().is_ok());
            assert_eq!(built.vars.num_vars, built.model.num_vars());
        }
    }

    const EPS: f64 = crate::EPSILON;
}
