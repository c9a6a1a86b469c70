// Solver-agnostic description of a linear program

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub lower: f64,
    pub upper: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Eq,
    Le,
    Ge,
}

/// `Σ coefficient × variable  (sense)  rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub terms: Vec<(VarId, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms.iter().map(|&(var, coef)| coef * values[var.index()]).sum()
    }

    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.lhs(values);
        match self.sense {
            Sense::Eq => (lhs - self.rhs).abs() <= tolerance,
            Sense::Le => lhs <= self.rhs + tolerance,
            Sense::Ge => lhs >= self.rhs - tolerance,
        }
    }
}

/// Minimization problem over non-negative-by-default continuous variables.
#[derive(Debug, Clone, Default)]
pub struct LinearProgram {
    variables: Vec<Variable>,
    constraints: Vec<LinearConstraint>,
    objective: Vec<(VarId, f64)>,
}

impl LinearProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_variable(&mut self, name: impl Into<String>, lower: f64, upper: Option<f64>) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(Variable {
            name: name.into(),
            lower,
            upper,
        });
        id
    }

    pub fn add_constraint(&mut self, name: impl Into<String>, terms: Vec<(VarId, f64)>, sense: Sense, rhs: f64) {
        self.constraints.push(LinearConstraint {
            name: name.into(),
            terms,
            sense,
            rhs,
        });
    }

    pub fn add_objective_term(&mut self, var: VarId, coefficient: f64) {
        if coefficient != 0.0 {
            self.objective.push((var, coefficient));
        }
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, id: VarId) -> &Variable {
        &self.variables[id.index()]
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &[(VarId, f64)] {
        &self.objective
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn evaluate_objective(&self, values: &[f64]) -> f64 {
        self.objective.iter().map(|&(var, coef)| coef * values[var.index()]).sum()
    }
}

/// Optimal point returned by a solver.
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    values: Vec<f64>,
    objective: f64,
}

impl LpSolution {
    pub fn new(values: Vec<f64>, objective: f64) -> Self {
        Self { values, objective }
    }

    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.index()]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_and_evaluate() {
        let mut lp = LinearProgram::new();
        let x = lp.add_variable("x", 0.0, None);
        let y = lp.add_variable("y", 0.0, Some(4.0));
        lp.add_constraint("sum", vec![(x, 1.0), (y, 1.0)], Sense::Ge, 3.0);
        lp.add_objective_term(x, 2.0);
        lp.add_objective_term(y, 1.0);
        lp.add_objective_term(y, 0.0);

        assert_eq!(lp.num_variables(), 2);
        assert_eq!(lp.objective().len(), 2);
        assert_eq!(lp.variable(y).upper, Some(4.0));
        assert_eq!(lp.evaluate_objective(&[1.0, 2.0]), 4.0);
        assert!(lp.constraints()[0].is_satisfied(&[1.0, 2.0], 1e-9));
        assert!(!lp.constraints()[0].is_satisfied(&[1.0, 1.0], 1e-9));
    }
}
