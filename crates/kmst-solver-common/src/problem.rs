//! Mixed-integer linear model representation.
//!
//! Formulations declare variables and constraints against a [`MipModel`];
//! solver adapters translate it into their own problem type.

use crate::error::{SolverError, SolverResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Dense handle of a declared variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VarId(usize);

impl VarId {
    #[inline]
    pub fn new(index: usize) -> Self {
        VarId(index)
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Domain of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarKind {
    Binary,
    Integer,
    Continuous,
}

impl VarKind {
    pub fn is_integral(&self) -> bool {
        matches!(self, VarKind::Binary | VarKind::Integer)
    }
}

/// Declared variable with bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDef {
    pub name: String,
    pub kind: VarKind,
    pub lower: f64,
    pub upper: f64,
}

/// Linear expression `sum coef * var + constant`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
    constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style term addition.
    pub fn term(mut self, var: VarId, coef: f64) -> Self {
        self.terms.push((var, coef));
        self
    }

    pub fn add_term(&mut self, var: VarId, coef: f64) {
        self.terms.push((var, coef));
    }

    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Value of the expression for a dense assignment indexed by [`VarId`].
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coef)| coef * values.get(var.index()).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant
    }
}

impl From<VarId> for LinearExpr {
    fn from(var: VarId) -> Self {
        LinearExpr::new().term(var, 1.0)
    }
}

impl FromIterator<(VarId, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VarId, f64)>>(iter: I) -> Self {
        LinearExpr {
            terms: iter.into_iter().collect(),
            constant: 0.0,
        }
    }
}

/// Relation between an expression and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sense {
    Le,
    Ge,
    Eq,
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sense::Le => write!(f, "<="),
            Sense::Ge => write!(f, ">="),
            Sense::Eq => write!(f, "="),
        }
    }
}

/// `expr (<=|>=|=) rhs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    pub expr: LinearExpr,
    pub sense: Sense,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn le(expr: impl Into<LinearExpr>, rhs: f64) -> Self {
        Self {
            expr: expr.into(),
            sense: Sense::Le,
            rhs,
        }
    }

    pub fn ge(expr: impl Into<LinearExpr>, rhs: f64) -> Self {
        Self {
            expr: expr.into(),
            sense: Sense::Ge,
            rhs,
        }
    }

    pub fn equals(expr: impl Into<LinearExpr>, rhs: f64) -> Self {
        Self {
            expr: expr.into(),
            sense: Sense::Eq,
            rhs,
        }
    }

    /// Amount by which the assignment violates the constraint (0 when satisfied).
    pub fn violation(&self, values: &[f64]) -> f64 {
        let lhs = self.expr.evaluate(values);
        match self.sense {
            Sense::Le => (lhs - self.rhs).max(0.0),
            Sense::Ge => (self.rhs - lhs).max(0.0),
            Sense::Eq => (lhs - self.rhs).abs(),
        }
    }

    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        self.violation(values) <= tolerance
    }

    pub fn len(&self) -> usize {
        self.expr.terms().len()
    }

    pub fn is_empty(&self) -> bool {
        self.expr.is_empty()
    }
}

/// Minimization MILP: variables, linear constraints and a linear objective.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MipModel {
    variables: Vec<VariableDef>,
    constraints: Vec<LinearConstraint>,
    objective: LinearExpr,
}

impl MipModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_var(&mut self, name: impl Into<String>, kind: VarKind, lower: f64, upper: f64) -> VarId {
        let id = VarId::new(self.variables.len());
        self.variables.push(VariableDef {
            name: name.into(),
            kind,
            lower,
            upper,
        });
        id
    }

    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.add_var(name, VarKind::Binary, 0.0, 1.0)
    }

    pub fn add_continuous(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarId {
        self.add_var(name, VarKind::Continuous, lower, upper)
    }

    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    pub fn variables(&self) -> &[VariableDef] {
        &self.variables
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    pub fn num_integer_vars(&self) -> usize {
        self.variables.iter().filter(|v| v.kind.is_integral()).count()
    }

    /// Check that the model is a well-formed MILP.
    ///
    /// Rejects models without integer variables, references to undeclared
    /// variables, non-finite coefficients and empty bound intervals.
    pub fn validate(&self) -> SolverResult<()> {
        if self.num_integer_vars() == 0 {
            return Err(SolverError::ModelShape(
                "model has no integer variables".to_string(),
            ));
        }
        for (index, var) in self.variables.iter().enumerate() {
            if var.lower.is_nan() || var.upper.is_nan() {
                return Err(SolverError::ModelShape(format!(
                    "variable {} ({index}) has a NaN bound",
                    var.name
                )));
            }
            if var.lower > var.upper {
                return Err(SolverError::ModelShape(format!(
                    "variable {} ({index}) has lower bound {} above upper bound {}",
                    var.name, var.lower, var.upper
                )));
            }
        }
        self.check_expr(&self.objective, "objective")?;
        for (index, constraint) in self.constraints.iter().enumerate() {
            self.check_expr(&constraint.expr, &format!("constraint {index}"))?;
            if !constraint.rhs.is_finite() {
                return Err(SolverError::ModelShape(format!(
                    "constraint {index} has non-finite right-hand side"
                )));
            }
        }
        debug!(
            variables = self.variables.len(),
            integer = self.num_integer_vars(),
            constraints = self.constraints.len(),
            "model shape validated"
        );
        Ok(())
    }

    fn check_expr(&self, expr: &LinearExpr, what: &str) -> SolverResult<()> {
        for (var, coef) in expr.terms() {
            if var.index() >= self.variables.len() {
                return Err(SolverError::ModelShape(format!(
                    "{what} references undeclared variable {var}"
                )));
            }
            if !coef.is_finite() {
                return Err(SolverError::ModelShape(format!(
                    "{what} has non-finite coefficient on {var}"
                )));
            }
        }
        if !expr.constant().is_finite() {
            return Err(SolverError::ModelShape(format!(
                "{what} has non-finite constant"
            )));
        }
        Ok(())
    }

    /// Index of the first constraint or bound the assignment violates.
    ///
    /// Bounds and integrality are reported as `Err(var)`, constraints as
    /// `Ok(index)`.
    pub fn first_violation(&self, values: &[f64], tolerance: f64) -> Option<Result<usize, VarId>> {
        for (index, var) in self.variables.iter().enumerate() {
            let value = values.get(index).copied().unwrap_or(0.0);
            let out_of_bounds = value < var.lower - tolerance || value > var.upper + tolerance;
            let fractional = var.kind.is_integral() && (value - value.round()).abs() > tolerance;
            if out_of_bounds || fractional {
                return Some(Err(VarId::new(index)));
            }
        }
        self.constraints
            .iter()
            .position(|c| !c.is_satisfied(values, tolerance))
            .map(Ok)
    }

    /// Whether the assignment satisfies every bound, integrality requirement
    /// and constraint.
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        self.first_violation(values, tolerance).is_none()
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.evaluate(values)
    }
}
