//! Nelder-Mead downhill simplex.

use log::{debug, trace};

use crate::error::{MathError, MathResult};
use crate::optimization::{
    EndCriteria, EndCriteriaType, OptimizationMethod, OptimizationResult, Problem,
};

/// Nelder-Mead downhill simplex minimizer.
///
/// The initial simplex is the starting point plus one vertex per axis,
/// displaced by `lambda` (halved back into the admissible region when
/// needed). Each iteration reflects the worst vertex through the centroid
/// of the others, then expands, contracts or shrinks. Trial points outside
/// the constraint are pulled towards the centroid until they are admissible.
///
/// Gradient-free, so it suits calibration objectives whose derivatives are
/// only available by finite differences.
///
/// # Example
///
/// ```rust
/// use quill_math::optimization::{
///     Constraint, EndCriteria, OptimizationMethod, Problem, Simplex,
/// };
///
/// let mut f = |x: &[f64]| (x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2);
/// let constraint = Constraint::NoConstraint;
/// let mut problem = Problem::new(&mut f, &constraint);
///
/// let mut simplex = Simplex::new(0.5, EndCriteria::default());
/// simplex.set_initial_value(vec![0.0, 0.0]);
/// let result = simplex.minimize(&mut problem).unwrap();
///
/// assert!((result.parameters[0] - 1.0).abs() < 1e-6);
/// assert!((result.parameters[1] + 2.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct Simplex {
    lambda: f64,
    end_criteria: EndCriteria,
    initial_value: Vec<f64>,
}

impl Simplex {
    /// Creates a simplex minimizer with initial vertex displacement `lambda`.
    #[must_use]
    pub fn new(lambda: f64, end_criteria: EndCriteria) -> Self {
        Self {
            lambda,
            end_criteria,
            initial_value: Vec::new(),
        }
    }

    /// Returns the initial vertex displacement.
    #[must_use]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    fn finish(
        problem: &mut Problem<'_>,
        vertices: &Vertices,
        lowest: usize,
        iterations: usize,
        end_criteria: EndCriteriaType,
    ) -> OptimizationResult {
        let parameters = vertices.points[lowest].clone();
        let value = vertices.values[lowest];
        problem.set_current_value(parameters.clone());
        problem.set_function_value(value);
        debug!("Simplex: stopped on {end_criteria} after {iterations} iterations, f = {value}");
        OptimizationResult {
            parameters,
            value,
            iterations,
            function_evaluations: problem.function_evaluations(),
            end_criteria,
        }
    }
}

impl OptimizationMethod for Simplex {
    fn name(&self) -> &'static str {
        "Simplex"
    }

    fn initial_value(&self) -> &[f64] {
        &self.initial_value
    }

    fn set_initial_value(&mut self, initial_value: Vec<f64>) {
        self.initial_value = initial_value;
    }

    fn end_criteria(&self) -> &EndCriteria {
        &self.end_criteria
    }

    fn end_criteria_mut(&mut self) -> &mut EndCriteria {
        &mut self.end_criteria
    }

    fn minimize(&mut self, problem: &mut Problem<'_>) -> MathResult<OptimizationResult> {
        let constraint = problem.constraint();
        let start = self.initial_value.clone();
        if !constraint.test(&start) {
            return Err(MathError::invalid_input(
                "initial simplex vertex violates the constraint",
            ));
        }

        let n = start.len();
        if n == 0 {
            let value = problem.value(&start)?;
            let vertices = Vertices {
                points: vec![start],
                values: vec![value],
                sum: Vec::new(),
            };
            return Ok(Self::finish(
                problem,
                &vertices,
                0,
                0,
                EndCriteriaType::StationaryPoint,
            ));
        }

        let mut points = vec![start; n + 1];
        for (i, vertex) in points.iter_mut().skip(1).enumerate() {
            let mut direction = vec![0.0; n];
            direction[i] = 1.0;
            constraint.update(vertex, &direction, self.lambda)?;
        }
        let values = points
            .iter()
            .map(|p| problem.value(p))
            .collect::<MathResult<Vec<f64>>>()?;
        let mut vertices = Vertices {
            points,
            values,
            sum: vec![0.0; n],
        };

        let mut iteration = 0;
        loop {
            vertices.recompute_sum();
            let (lowest, highest, next_highest) = vertices.rank();

            iteration += 1;
            let size = vertices.size();
            trace!(
                "Simplex: iteration {iteration}, size {size:e}, best f = {}",
                vertices.values[lowest]
            );
            let end = if size < self.end_criteria.root_epsilon {
                Some(EndCriteriaType::StationaryPoint)
            } else {
                self.end_criteria
                    .check_stationary_function_accuracy(vertices.values[lowest])
                    .or_else(|| self.end_criteria.check_max_iterations(iteration))
            };
            if let Some(end) = end {
                return Ok(Self::finish(problem, &vertices, lowest, iteration, end));
            }

            // Reflection, then expansion or contraction.
            let mut factor = -1.0;
            let v_try = vertices.extrapolate(problem, highest, &mut factor)?;
            if v_try <= vertices.values[lowest] && factor == -1.0 {
                factor = 2.0;
                vertices.extrapolate(problem, highest, &mut factor)?;
            } else if factor.abs() > f64::EPSILON && v_try >= vertices.values[next_highest] {
                let v_save = vertices.values[highest];
                factor = 0.5;
                let v_try = vertices.extrapolate(problem, highest, &mut factor)?;
                if v_try >= v_save && factor.abs() > f64::EPSILON {
                    vertices.shrink_towards(problem, lowest)?;
                }
            }

            // No admissible move left.
            if factor.abs() <= f64::EPSILON {
                return Ok(Self::finish(
                    problem,
                    &vertices,
                    lowest,
                    iteration,
                    EndCriteriaType::StationaryFunctionValue,
                ));
            }
        }
    }
}

struct Vertices {
    points: Vec<Vec<f64>>,
    values: Vec<f64>,
    sum: Vec<f64>,
}

impl Vertices {
    fn recompute_sum(&mut self) {
        self.sum.iter_mut().for_each(|s| *s = 0.0);
        for point in &self.points {
            for (s, p) in self.sum.iter_mut().zip(point) {
                *s += p;
            }
        }
    }

    /// Indices of the best, worst and second worst vertices.
    fn rank(&self) -> (usize, usize, usize) {
        let values = &self.values;
        let mut lowest = 0;
        let (mut highest, mut next_highest) = if values[0] < values[1] { (1, 0) } else { (0, 1) };
        for (i, &value) in values.iter().enumerate().skip(1) {
            if value > values[highest] {
                next_highest = highest;
                highest = i;
            } else if value > values[next_highest] && i != highest {
                next_highest = i;
            }
            if value < values[lowest] {
                lowest = i;
            }
        }
        (lowest, highest, next_highest)
    }

    /// Mean distance of the vertices from their centroid.
    fn size(&self) -> f64 {
        let count = self.points.len() as f64;
        let center: Vec<f64> = self.sum.iter().map(|s| s / count).collect();
        let total: f64 = self
            .points
            .iter()
            .map(|p| {
                p.iter()
                    .zip(&center)
                    .map(|(x, c)| (x - c) * (x - c))
                    .sum::<f64>()
                    .sqrt()
            })
            .sum();
        total / count
    }

    /// Tries the point `factor` of the way from the centroid of the other
    /// vertices through the worst one, halving `factor` until the point is
    /// admissible. Replaces the worst vertex if the trial improves on it.
    ///
    /// On return `factor` holds the factor used, or a value below machine
    /// epsilon if no admissible point was found.
    fn extrapolate(
        &mut self,
        problem: &mut Problem<'_>,
        highest: usize,
        factor: &mut f64,
    ) -> MathResult<f64> {
        let constraint = problem.constraint();
        let dimensions = (self.values.len() - 1) as f64;
        let trial = loop {
            let factor1 = (1.0 - *factor) / dimensions;
            let factor2 = factor1 - *factor;
            let trial: Vec<f64> = self
                .sum
                .iter()
                .zip(&self.points[highest])
                .map(|(s, h)| s * factor1 - h * factor2)
                .collect();
            *factor *= 0.5;
            if constraint.test(&trial) || factor.abs() <= f64::EPSILON {
                break trial;
            }
        };
        if factor.abs() <= f64::EPSILON {
            return Ok(self.values[highest]);
        }
        *factor *= 2.0;

        let value = problem.value(&trial)?;
        if value < self.values[highest] {
            self.values[highest] = value;
            for ((s, t), h) in self.sum.iter_mut().zip(&trial).zip(&self.points[highest]) {
                *s += t - h;
            }
            self.points[highest] = trial;
        }
        Ok(value)
    }

    fn shrink_towards(&mut self, problem: &mut Problem<'_>, lowest: usize) -> MathResult<()> {
        let best = self.points[lowest].clone();
        for i in 0..self.points.len() {
            if i == lowest {
                continue;
            }
            for (p, b) in self.points[i].iter_mut().zip(&best) {
                *p = 0.5 * (*p + b);
            }
            self.values[i] = problem.value(&self.points[i])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::Constraint;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadratic() {
        let mut f = |x: &[f64]| (x[0] - 1.0).powi(2) + 2.0 * (x[1] - 2.0).powi(2);
        let constraint = Constraint::NoConstraint;
        let mut problem = Problem::new(&mut f, &constraint);

        let mut simplex = Simplex::new(0.5, EndCriteria::default());
        simplex.set_initial_value(vec![0.0, 0.0]);
        let result = simplex.minimize(&mut problem).unwrap();

        assert!(result.converged());
        assert_relative_eq!(result.parameters[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(result.parameters[1], 2.0, epsilon = 1e-6);
        assert_eq!(problem.current_value(), result.parameters.as_slice());
        assert_relative_eq!(problem.function_value(), result.value);
    }

    #[test]
    fn test_rosenbrock() {
        let mut f = |x: &[f64]| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2);
        let constraint = Constraint::Null;
        let mut problem = Problem::new(&mut f, &constraint);

        let mut simplex = Simplex::new(0.1, EndCriteria::default().with_max_iterations(5000));
        simplex.set_initial_value(vec![-1.2, 1.0]);
        let result = simplex.minimize(&mut problem).unwrap();

        assert_relative_eq!(result.parameters[0], 1.0, epsilon = 1e-4);
        assert_relative_eq!(result.parameters[1], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_stays_inside_constraint() {
        // Unconstrained minimum at -1, admissible region x > 0.
        let mut f = |x: &[f64]| (x[0] + 1.0).powi(2);
        let constraint = Constraint::Positive;
        let mut problem = Problem::new(&mut f, &constraint);

        let mut simplex = Simplex::new(0.5, EndCriteria::default());
        simplex.set_initial_value(vec![1.0]);
        let result = simplex.minimize(&mut problem).unwrap();

        assert!(result.parameters[0] > 0.0);
        assert!(result.parameters[0] < 1e-3);
    }

    #[test]
    fn test_positive_mode_stops_on_function_accuracy() {
        let mut f = |x: &[f64]| x[0] * x[0] + x[1] * x[1];
        let constraint = Constraint::NoConstraint;
        let mut problem = Problem::new(&mut f, &constraint);

        let mut simplex = Simplex::new(0.5, EndCriteria::default());
        simplex.end_criteria_mut().set_positive_optimization();
        simplex.set_initial_value(vec![1.0, 1.0]);
        let result = simplex.minimize(&mut problem).unwrap();

        assert_eq!(result.end_criteria, EndCriteriaType::StationaryFunctionAccuracy);
        assert!(result.value < 1e-8);
    }

    #[test]
    fn test_iteration_budget() {
        let mut f = |x: &[f64]| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2);
        let constraint = Constraint::NoConstraint;
        let mut problem = Problem::new(&mut f, &constraint);

        let mut simplex = Simplex::new(0.1, EndCriteria::default().with_max_iterations(3));
        simplex.set_initial_value(vec![-1.2, 1.0]);
        let result = simplex.minimize(&mut problem).unwrap();

        assert_eq!(result.end_criteria, EndCriteriaType::MaxIterations);
        assert_eq!(result.iterations, 3);
        assert!(!result.converged());
    }

    #[test]
    fn test_rejects_inadmissible_start() {
        let mut f = |x: &[f64]| x[0];
        let constraint = Constraint::Positive;
        let mut problem = Problem::new(&mut f, &constraint);

        let mut simplex = Simplex::new(0.5, EndCriteria::default());
        simplex.set_initial_value(vec![-1.0]);

        assert!(matches!(
            simplex.minimize(&mut problem),
            Err(MathError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_empty_parameter_vector() {
        let mut f = |_x: &[f64]| 3.0;
        let constraint = Constraint::Null;
        let mut problem = Problem::new(&mut f, &constraint);

        let mut simplex = Simplex::new(0.5, EndCriteria::default());
        let result = simplex.minimize(&mut problem).unwrap();

        assert!(result.parameters.is_empty());
        assert_relative_eq!(result.value, 3.0);
        assert_eq!(result.function_evaluations, 1);
    }
}
