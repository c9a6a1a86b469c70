// LP solving backends
use good_lp::{constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel};
use tracing::debug;

use crate::error::SolverError;
use crate::optimizer::lp::{LinearProgram, LpSolution, Sense};
use crate::utils::logging::{self, OperationCategory, OptimizationSubcategory};

/// Anything that can minimize a [`LinearProgram`].
pub trait LpSolver: Send + Sync {
    fn solve(&self, problem: &LinearProgram) -> Result<LpSolution, SolverError>;
}

/// Interior point solver via `good_lp`'s Clarabel backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClarabelSolver;

impl ClarabelSolver {
    pub fn new() -> Self {
        Self
    }
}

impl LpSolver for ClarabelSolver {
    fn solve(&self, problem: &LinearProgram) -> Result<LpSolution, SolverError> {
        let _timing = logging::start_timing(
            "clarabel_solve",
            OperationCategory::Optimization {
                subcategory: OptimizationSubcategory::Solve,
            },
        );

        let mut vars = ProblemVariables::new();
        let handles: Vec<good_lp::Variable> = problem
            .variables()
            .iter()
            .map(|v| {
                let mut definition = variable().min(v.lower);
                if let Some(upper) = v.upper {
                    definition = definition.max(upper);
                }
                vars.add(definition)
            })
            .collect();

        let objective: Expression = problem
            .objective()
            .iter()
            .map(|&(id, coef)| coef * handles[id.index()])
            .sum();

        let mut model = vars.minimise(objective).using(good_lp::clarabel);
        for c in problem.constraints() {
            // Ge rows are negated into Le rows
            let sign = if c.sense == Sense::Ge { -1.0 } else { 1.0 };
            let lhs: Expression = c
                .terms
                .iter()
                .map(|&(id, coef)| (sign * coef) * handles[id.index()])
                .sum();
            let rhs = sign * c.rhs;
            model = match c.sense {
                Sense::Eq => model.with(constraint!(lhs == rhs)),
                Sense::Le | Sense::Ge => model.with(constraint!(lhs <= rhs)),
            };
        }

        debug!(
            variables = problem.num_variables(),
            constraints = problem.num_constraints(),
            "Solving linear program"
        );

        match model.solve() {
            Ok(solution) => {
                let values: Vec<f64> = handles.iter().map(|&h| solution.value(h)).collect();
                let objective = problem.evaluate_objective(&values);
                Ok(LpSolution::new(values, objective))
            }
            Err(ResolutionError::Infeasible) => Err(SolverError::Infeasible),
            Err(ResolutionError::Unbounded) => Err(SolverError::Unbounded),
            Err(other) => Err(SolverError::Failed(other.to_string())),
        }
    }
}
