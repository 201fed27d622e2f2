use serde::Deserialize;

/// Factor applied to the penalty on each retry.
const PENALTY_GROWTH: f64 = 1e4;

/// Rule used to pick the entering and leaving variables at each pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PivotRule {
    /// Most negative reduced cost enters; ties go to the lowest index.
    /// Fast in practice but may cycle on degenerate tableaus.
    Dantzig,
    /// Lowest-index improving column enters and ratio ties leave by lowest
    /// basic column. Guaranteed to terminate.
    Bland,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SolverOptions {
    pub tolerance: f64,
    /// Largest artificial value still accepted as zero at the optimum.
    pub feasibility_tolerance: f64,
    pub max_iterations: usize,
    pub pivot_rule: PivotRule,
    /// Fixed penalty. When `None` the penalty is scaled to the model.
    pub big_m: Option<f64>,
    pub big_m_floor: f64,
    pub big_m_scale: f64,
    /// Upper bound on any penalty, adaptive or escalated.
    pub big_m_ceiling: f64,
    /// How many times the penalty may be raised after a ray that only
    /// exists because the penalty was too small.
    pub big_m_retries: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-9,
            feasibility_tolerance: 1e-7,
            max_iterations: 100,
            pivot_rule: PivotRule::Bland,
            big_m: None,
            big_m_floor: 1e6,
            big_m_scale: 1e4,
            big_m_ceiling: 1e150,
            big_m_retries: 3,
        }
    }
}

impl SolverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_feasibility_tolerance(mut self, tolerance: f64) -> Self {
        self.feasibility_tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_pivot_rule(mut self, rule: PivotRule) -> Self {
        self.pivot_rule = rule;
        self
    }

    pub fn with_big_m(mut self, big_m: f64) -> Self {
        self.big_m = Some(big_m);
        self
    }

    pub fn with_big_m_retries(mut self, retries: usize) -> Self {
        self.big_m_retries = retries;
        self
    }

    /// The starting penalty for a model whose largest entry has magnitude
    /// `largest` and whose smallest nonzero constraint coefficient has
    /// magnitude `smallest`.
    pub(crate) fn penalty_for(&self, largest: f64, smallest: f64) -> f64 {
        match self.big_m {
            Some(m) => m.min(self.big_m_ceiling),
            None => self
                .big_m_floor
                .max(self.big_m_scale * largest / smallest)
                .min(self.big_m_ceiling),
        }
    }

    /// The penalty to retry with after `big_m` proved too small, or `None`
    /// once the ceiling has been reached.
    pub(crate) fn escalate(&self, big_m: f64) -> Option<f64> {
        (big_m < self.big_m_ceiling).then(|| (big_m * PENALTY_GROWTH).min(self.big_m_ceiling))
    }
}
