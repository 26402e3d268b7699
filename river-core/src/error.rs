use thiserror::Error;

/// Failures raised while growing a river network.
///
/// Only [`GrowthError::AreaDegenerate`] depends on the random geometry of a
/// run; every other variant means the input was malformed or an internal
/// invariant broke, and the run should be abandoned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GrowthError {
    #[error("insufficient candidates: expected at least 2, found {found}")]
    InsufficientCandidates { found: usize },

    #[error("confinement region could not be built: {reason}")]
    GeometryInvariantViolation { reason: String },

    #[error("backtracking moved past the root of the network")]
    TreeExhausted,

    #[error("no point inside the confinement region after {attempts} sampling attempts")]
    AreaDegenerate { attempts: u32 },

    #[error("growth did not finish within {limit} iterations")]
    IterationLimit { limit: usize },
}

impl GrowthError {
    /// Whether a caller can reasonably retry, e.g. with a fresh point set.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GrowthError::AreaDegenerate { .. })
    }
}

pub type GrowthResult<T> = Result<T, GrowthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_area_degenerate_is_recoverable() {
        assert!(GrowthError::AreaDegenerate { attempts: 1000 }.is_recoverable());
        assert!(!GrowthError::TreeExhausted.is_recoverable());
        assert!(!GrowthError::InsufficientCandidates { found: 1 }.is_recoverable());
        assert!(!GrowthError::IterationLimit { limit: 10 }.is_recoverable());
        assert!(
            !GrowthError::GeometryInvariantViolation {
                reason: "no hit".into()
            }
            .is_recoverable()
        );
    }

    #[test]
    fn messages_mention_the_numbers() {
        let msg = GrowthError::AreaDegenerate { attempts: 7 }.to_string();
        assert!(msg.contains('7'));
        let msg = GrowthError::InsufficientCandidates { found: 1 }.to_string();
        assert!(msg.contains("found 1"));
    }
}
