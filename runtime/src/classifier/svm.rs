//! Support vector machine evaluation over exported libsvm/liblinear parameters.
//!
//! Both estimators return the *position* of the winning class in the model's
//! class list; mapping that position to an output value is the artifact's job.

use crate::error::{ArtifactError, InferenceError};
use serde::{Deserialize, Serialize};

/// Kernel function of a fitted SVC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Kernel {
    Linear,
    Rbf { gamma: f64 },
    Poly { gamma: f64, coef0: f64, degree: u32 },
    Sigmoid { gamma: f64, coef0: f64 },
}

impl Kernel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Rbf { .. } => "rbf",
            Self::Poly { .. } => "poly",
            Self::Sigmoid { .. } => "sigmoid",
        }
    }

    /// Evaluate `K(a, b)`. Both slices must have the same length.
    pub fn apply(&self, a: &[f64], b: &[f64]) -> f64 {
        match *self {
            Self::Linear => dot(a, b),
            Self::Rbf { gamma } => {
                let sq: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
                (-gamma * sq).exp()
            }
            Self::Poly {
                gamma,
                coef0,
                degree,
            } => {
                let degree = i32::try_from(degree).unwrap_or(i32::MAX);
                (gamma * dot(a, b) + coef0).powi(degree)
            }
            Self::Sigmoid { gamma, coef0 } => (gamma * dot(a, b) + coef0).tanh(),
        }
    }

    /// Parameters are finite and a polynomial degree fits `powi`.
    fn params_valid(&self) -> bool {
        match *self {
            Self::Linear => true,
            Self::Rbf { gamma } => gamma.is_finite(),
            Self::Poly {
                gamma,
                coef0,
                degree,
            } => gamma.is_finite() && coef0.is_finite() && i32::try_from(degree).is_ok(),
            Self::Sigmoid { gamma, coef0 } => gamma.is_finite() && coef0.is_finite(),
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// One-vs-one kernel SVM in libsvm layout.
///
/// Support vectors are grouped by class, `n_support[c]` of them for class `c`.
/// `dual_coef` has `k - 1` rows; `intercept` has one entry per class pair in
/// the order `(0,1), (0,2), .., (0,k-1), (1,2), ..`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvcParams {
    pub kernel: Kernel,
    pub support_vectors: Vec<Vec<f64>>,
    pub n_support: Vec<usize>,
    pub dual_coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl SvcParams {
    pub fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), ArtifactError> {
        if !self.kernel.params_valid() {
            return Err(invalid("kernel parameters must be finite with a degree below 2^31"));
        }
        if self.n_support.len() != n_classes {
            return Err(invalid(format!(
                "n_support has {} entries for {n_classes} classes",
                self.n_support.len()
            )));
        }
        let total: usize = self.n_support.iter().sum();
        if total != self.support_vectors.len() {
            return Err(invalid(format!(
                "n_support sums to {total} but there are {} support vectors",
                self.support_vectors.len()
            )));
        }
        if let Some(i) = self
            .support_vectors
            .iter()
            .position(|sv| sv.len() != n_features)
        {
            return Err(invalid(format!(
                "support vector {i} has {} features, expected {n_features}",
                self.support_vectors[i].len()
            )));
        }
        if self.dual_coef.len() != n_classes - 1 {
            return Err(invalid(format!(
                "dual_coef has {} rows, expected {}",
                self.dual_coef.len(),
                n_classes - 1
            )));
        }
        if self.dual_coef.iter().any(|row| row.len() != total) {
            return Err(invalid(format!("every dual_coef row must have {total} entries")));
        }
        let pairs = n_classes * (n_classes - 1) / 2;
        if self.intercept.len() != pairs {
            return Err(invalid(format!(
                "intercept has {} entries, expected {pairs}",
                self.intercept.len()
            )));
        }
        let finite = self.support_vectors.iter().flatten().all(|v| v.is_finite())
            && self.dual_coef.iter().flatten().all(|v| v.is_finite())
            && self.intercept.iter().all(|v| v.is_finite());
        if !finite {
            return Err(invalid("SVC parameters must be finite"));
        }
        Ok(())
    }

    /// Pairwise voting. Ties go to the lowest class position.
    pub fn predict_position(&self, x: &[f64]) -> Result<usize, InferenceError> {
        let k = self.n_support.len();
        let kvalue: Vec<f64> = self
            .support_vectors
            .iter()
            .map(|sv| self.kernel.apply(sv, x))
            .collect();

        let mut start = Vec::with_capacity(k);
        let mut offset = 0;
        for &n in &self.n_support {
            start.push(offset);
            offset += n;
        }

        let mut votes = vec![0u32; k];
        let mut p = 0;
        for i in 0..k {
            for j in (i + 1)..k {
                let (si, sj) = (start[i], start[j]);
                let (ci, cj) = (self.n_support[i], self.n_support[j]);
                let coef1 = &self.dual_coef[j - 1];
                let coef2 = &self.dual_coef[i];

                let mut sum = self.intercept[p];
                for t in si..si + ci {
                    sum += coef1[t] * kvalue[t];
                }
                for t in sj..sj + cj {
                    sum += coef2[t] * kvalue[t];
                }
                if !sum.is_finite() {
                    return Err(InferenceError::NonFinite(format!(
                        "class pair ({i}, {j})"
                    )));
                }

                if sum > 0.0 {
                    votes[i] += 1;
                } else {
                    votes[j] += 1;
                }
                p += 1;
            }
        }

        Ok(first_max(&votes))
    }

    pub fn support_vector_count(&self) -> usize {
        self.support_vectors.len()
    }
}

/// One-vs-rest linear model. Binary models carry a single row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl LinearParams {
    pub fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), ArtifactError> {
        let rows = if n_classes == 2 { 1 } else { n_classes };
        if self.coef.len() != rows || self.intercept.len() != rows {
            return Err(invalid(format!(
                "linear model needs {rows} coef rows and intercepts, got {} and {}",
                self.coef.len(),
                self.intercept.len()
            )));
        }
        if self.coef.iter().any(|row| row.len() != n_features) {
            return Err(invalid(format!(
                "every coef row must have {n_features} entries"
            )));
        }
        let finite = self.coef.iter().flatten().all(|v| v.is_finite())
            && self.intercept.iter().all(|v| v.is_finite());
        if !finite {
            return Err(invalid("linear parameters must be finite"));
        }
        Ok(())
    }

    pub fn predict_position(&self, x: &[f64]) -> Result<usize, InferenceError> {
        let scores: Vec<f64> = self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(w, b)| dot(w, x) + b)
            .collect();
        if let Some(i) = scores.iter().position(|s| !s.is_finite()) {
            return Err(InferenceError::NonFinite(format!("score for row {i}")));
        }

        if scores.len() == 1 {
            return Ok(usize::from(scores[0] > 0.0));
        }
        let mut best = 0;
        for (i, s) in scores.iter().enumerate() {
            if *s > scores[best] {
                best = i;
            }
        }
        Ok(best)
    }
}

fn first_max(votes: &[u32]) -> usize {
    let mut best = 0;
    for (i, v) in votes.iter().enumerate() {
        if *v > votes[best] {
            best = i;
        }
    }
    best
}

fn invalid(msg: impl Into<String>) -> ArtifactError {
    ArtifactError::Invalid(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three classes in 1-D, one support vector each at -1, 0, 1.
    fn three_class_linear_svc() -> SvcParams {
        SvcParams {
            kernel: Kernel::Linear,
            support_vectors: vec![vec![-1.0], vec![0.0], vec![1.0]],
            n_support: vec![1, 1, 1],
            dual_coef: vec![vec![1.0, -1.0, -1.0], vec![1.0, 1.0, -1.0]],
            intercept: vec![0.0, 0.0, 0.0],
        }
    }

    #[test]
    fn test_kernels() {
        let a = [1.0, 2.0];
        let b = [3.0, 4.0];
        assert_eq!(Kernel::Linear.apply(&a, &b), 11.0);
        let rbf = Kernel::Rbf { gamma: 0.5 }.apply(&a, &b);
        assert!((rbf - (-4.0f64).exp()).abs() < 1e-12);
        let poly = Kernel::Poly {
            gamma: 1.0,
            coef0: 1.0,
            degree: 2,
        }
        .apply(&a, &b);
        assert_eq!(poly, 144.0);
        let sig = Kernel::Sigmoid {
            gamma: 0.0,
            coef0: 0.0,
        }
        .apply(&a, &b);
        assert_eq!(sig, 0.0);
    }

    #[test]
    fn test_ovo_votes() {
        let svc = three_class_linear_svc();
        svc.validate(1, 3).unwrap();
        // decisions: (0,1) = -x, (0,2) = -2x, (1,2) = -x
        assert_eq!(svc.predict_position(&[-2.0]).unwrap(), 0);
        assert_eq!(svc.predict_position(&[2.0]).unwrap(), 2);
    }

    /// Class 0 owns two support vectors, so class 1 and 2 start past their
    /// class index in `dual_coef` columns.
    #[test]
    fn test_ovo_votes_uneven_support() {
        let svc = SvcParams {
            kernel: Kernel::Linear,
            support_vectors: vec![vec![-1.0], vec![-2.0], vec![1.0], vec![2.0]],
            n_support: vec![2, 1, 1],
            dual_coef: vec![vec![1.0, 1.0, -4.0, -1.0], vec![0.5, 0.5, 2.0, -2.0]],
            intercept: vec![0.0, 0.0, 1.0],
        };
        svc.validate(1, 3).unwrap();
        // decisions: (0,1) = -7x, (0,2) = -3.5x, (1,2) = 1 - 2x
        assert_eq!(svc.predict_position(&[-1.0]).unwrap(), 0);
        assert_eq!(svc.predict_position(&[0.25]).unwrap(), 1);
        assert_eq!(svc.predict_position(&[1.0]).unwrap(), 2);
    }

    #[test]
    fn test_vote_tie_goes_to_lowest() {
        assert_eq!(first_max(&[1, 1, 1]), 0);
        assert_eq!(first_max(&[0, 2, 2]), 1);
    }

    #[test]
    fn test_svc_validation_rejects_bad_shapes() {
        let mut svc = three_class_linear_svc();
        svc.intercept.pop();
        assert!(matches!(svc.validate(1, 3), Err(ArtifactError::Invalid(_))));

        let mut svc = three_class_linear_svc();
        svc.n_support = vec![2, 1, 1];
        assert!(svc.validate(1, 3).is_err());

        let svc = three_class_linear_svc();
        assert!(svc.validate(2, 3).is_err());

        let mut svc = three_class_linear_svc();
        svc.dual_coef[0][0] = f64::NAN;
        assert!(svc.validate(1, 3).is_err());
    }

    #[test]
    fn test_poly_degree_must_fit_i32() {
        let mut svc = three_class_linear_svc();
        svc.kernel = Kernel::Poly {
            gamma: 1.0,
            coef0: 0.0,
            degree: u32::MAX,
        };
        assert!(matches!(svc.validate(1, 3), Err(ArtifactError::Invalid(_))));

        svc.kernel = Kernel::Poly {
            gamma: 1.0,
            coef0: 0.0,
            degree: 3,
        };
        svc.validate(1, 3).unwrap();
    }

    #[test]
    fn test_non_finite_decision_is_an_error() {
        let svc = three_class_linear_svc();
        let err = svc.predict_position(&[f64::INFINITY]).unwrap_err();
        assert!(matches!(err, InferenceError::NonFinite(_)));
    }

    #[test]
    fn test_linear_multiclass_argmax() {
        let lin = LinearParams {
            coef: vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, -1.0]],
            intercept: vec![0.0, 0.0, 0.5],
        };
        lin.validate(2, 3).unwrap();
        assert_eq!(lin.predict_position(&[2.0, 1.0]).unwrap(), 0);
        assert_eq!(lin.predict_position(&[0.0, 3.0]).unwrap(), 1);
        assert_eq!(lin.predict_position(&[0.0, 0.0]).unwrap(), 2);
    }

    #[test]
    fn test_linear_binary_sign() {
        let lin = LinearParams {
            coef: vec![vec![1.0]],
            intercept: vec![-0.5],
        };
        lin.validate(1, 2).unwrap();
        assert_eq!(lin.predict_position(&[1.0]).unwrap(), 1);
        assert_eq!(lin.predict_position(&[0.5]).unwrap(), 0);
        assert!(lin.validate(1, 3).is_err());
    }
}
