use serde::Serialize;

use crate::error::ParamsError;

/** tunable controls of the local branching search.
times are expressed in seconds.
*/
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LocalBranchingParams {
    /// global time limit
    pub total_time: f32,
    /// time given to each intensification (one solver call)
    pub intensification_time: f32,
    /// time given to each diversification phase
    pub diversification_time: f32,
    /// fraction of the incumbent freed (and probability to free an outsider) when building a neighborhood
    pub alpha: f64,
    /// fraction of the incumbent destroyed by the diversification
    pub beta: f64,
    /// radius of the local branching neighborhood (Hamming distance)
    pub k: usize,
    /// number of solver calls a vertex may stay unselected before being excluded for good
    pub age_limit: usize,
    /// upper bound on the time given to the re-optimization of a far improvement
    pub reoptimization_time_cap: f32,
    /// random seed (drawn at random if absent)
    pub seed: Option<u64>,
}

impl Default for LocalBranchingParams {
    fn default() -> Self {
        Self {
            total_time: 1800.,
            intensification_time: 500.,
            diversification_time: 100.,
            alpha: 0.3,
            beta: 0.4,
            k: 20,
            age_limit: 10,
            reoptimization_time_cap: 1800.,
            seed: None,
        }
    }
}

impl LocalBranchingParams {
    /// checks that the parameters are consistent
    pub fn validate(&self) -> Result<(), ParamsError> {
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta)].iter() {
            if !(0. ..=1.).contains(value) {
                return Err(ParamsError::Fraction { name: *name, value: *value });
            }
        }
        for (name, value) in [
            ("total time", self.total_time),
            ("intensification time", self.intensification_time),
            ("diversification time", self.diversification_time),
            ("re-optimization time cap", self.reoptimization_time_cap),
        ].iter() {
            if !value.is_finite() || *value < 0. {
                return Err(ParamsError::Time { name: *name, value: *value });
            }
        }
        if self.age_limit == 0 {
            return Err(ParamsError::AgeLimit);
        }
        Ok(())
    }

    /// lines describing the parameters (displayed at the beginning of a run)
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("time limit: {} seconds", self.total_time),
            format!("parameters: alpha={}, beta={}, k={}, age limit={}", self.alpha, self.beta, self.k, self.age_limit),
            format!("intensification time: {}, diversification time: {}", self.intensification_time, self.diversification_time),
        ]
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let p = LocalBranchingParams::default();
        assert!((p.alpha - 0.3).abs() < 1e-12);
        assert!((p.beta - 0.4).abs() < 1e-12);
        assert_eq!(p.k, 20);
        assert_eq!(p.age_limit, 10);
        assert_eq!(p.total_time, 1800.);
        assert_eq!(p.intensification_time, 500.);
        assert_eq!(p.diversification_time, 100.);
        assert_eq!(p.reoptimization_time_cap, p.total_time);
        assert_eq!(p.validate(), Ok(()));
    }

    #[test]
    fn test_invalid_params() {
        let p = LocalBranchingParams { alpha: 1.5, ..Default::default() };
        assert_eq!(p.validate(), Err(ParamsError::Fraction { name: "alpha", value: 1.5 }));
        let p = LocalBranchingParams { diversification_time: -1., ..Default::default() };
        assert!(matches!(p.validate(), Err(ParamsError::Time { .. })));
        let p = LocalBranchingParams { total_time: f32::NAN, ..Default::default() };
        assert!(matches!(p.validate(), Err(ParamsError::Time { .. })));
        let p = LocalBranchingParams { age_limit: 0, ..Default::default() };
        assert_eq!(p.validate(), Err(ParamsError::AgeLimit));
    }
}
