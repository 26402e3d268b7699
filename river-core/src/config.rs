use crate::geometry::Basin;

/// What to do when exactly one pending point lies inside the confinement
/// region, so no pair can be formed from real points alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LonePointPolicy {
    /// Rejection-sample a partner point inside the region and pair with it.
    #[default]
    Synthesize,
    /// Drop the lone point as an unpaired remainder and retry.
    Discard,
}

#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub basin: Basin,
    pub lone_point: LonePointPolicy,
    /// Upper bound on rejection-sampling draws for a synthesized partner.
    pub synthesis_attempts: u32,
    /// Main loop cap. `None` derives a bound from the input size.
    pub max_iterations: Option<usize>,
    /// When `false`, a region that cannot be built is treated as empty
    /// and triggers a backtrack instead of failing the run.
    pub strict_geometry: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            basin: Basin::new(100.0, 100.0),
            lone_point: LonePointPolicy::Synthesize,
            synthesis_attempts: 1000,
            max_iterations: None,
            strict_geometry: true,
        }
    }
}

impl Config {
    /// Iteration cap for a run over `input_len` points.
    pub fn iteration_limit(&self, input_len: usize) -> usize {
        self.max_iterations.unwrap_or(4 * input_len + 8)
    }
}
