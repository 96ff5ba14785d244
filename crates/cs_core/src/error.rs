use std::fmt;
use std::io;

/// Errors raised while evolving a model.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The initial state does not match the dimension of the model.
    DimensionMismatch { found: usize, expected: usize },
    /// A discrete model was asked for zero time points.
    EmptyHorizon,
    /// A continuous or stochastic model got no output times.
    EmptyTimeAxis,
    /// The output time at this index is smaller than its predecessor.
    UnorderedTimeAxis(usize),
    /// Invalid solver settings.
    InvalidOptions(String),
    /// The integrator used up its step budget.
    StepLimitExceeded { time: f64, steps: usize },
    /// The ODE solver gave up, or produced a non-finite state.
    SolverFailure { time: f64, reason: String },
    /// A reaction network line could not be parsed.
    InvalidReaction { line: usize, reason: String },
    /// A species name that is not part of the reaction network.
    UnknownSpecies(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::DimensionMismatch { found, expected } => {
                write!(f, "Initial state has {} values, model expects {}", found, expected)
            }
            ModelError::EmptyHorizon => {
                write!(f, "Cannot evolve a model over zero time points")
            }
            ModelError::EmptyTimeAxis => {
                write!(f, "Time axis is empty")
            }
            ModelError::UnorderedTimeAxis(i) => {
                write!(f, "Time axis decreases at position {}", i)
            }
            ModelError::InvalidOptions(msg) => {
                write!(f, "Invalid solver options: {}", msg)
            }
            ModelError::StepLimitExceeded { time, steps } => {
                write!(f, "Step limit of {} exceeded at t = {}", steps, time)
            }
            ModelError::SolverFailure { time, reason } => {
                write!(f, "Integration failed at t = {}: {}", time, reason)
            }
            ModelError::InvalidReaction { line, reason } => {
                write!(f, "Invalid reaction on line {}: {}", line, reason)
            }
            ModelError::UnknownSpecies(name) => {
                write!(f, "Unknown species '{}'", name)
            }
        }
    }
}

impl std::error::Error for ModelError {}

/// Errors raised while storing, loading or drawing trajectories.
#[derive(Debug)]
pub enum TrajectoryError {
    Io(io::Error),
    Json(serde_json::Error),
    Plot(String),
    /// A state row does not have one value per label.
    RowLength { row: usize, found: usize, expected: usize },
    TimepointCountMismatch { found: usize, expected: usize },
    TimeMismatch { file_time: f64, expected_time: f64 },
    LabelMismatch { found: Vec<String>, expected: Vec<String> },
}

impl fmt::Display for TrajectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Json(e) => write!(f, "JSON parse error: {}", e),
            Self::Plot(e) => write!(f, "Plotting error: {}", e),
            Self::RowLength { row, found, expected } =>
                write!(f, "Row {row} has {found} values, expected {expected}"),
            Self::TimepointCountMismatch { found, expected } =>
                write!(f, "Trajectory has {found} timepoints, expected {expected}"),
            Self::TimeMismatch { file_time, expected_time } =>
                write!(f, "Time mismatch: {file_time} vs {expected_time}"),
            Self::LabelMismatch { found, expected } =>
                write!(f, "Labels {:?} do not match {:?}", found, expected),
        }
    }
}

impl std::error::Error for TrajectoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TrajectoryError {
    fn from(e: io::Error) -> Self { Self::Io(e) }
}

impl From<serde_json::Error> for TrajectoryError {
    fn from(e: serde_json::Error) -> Self { Self::Json(e) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_display() {
        let e = ModelError::DimensionMismatch { found: 2, expected: 3 };
        assert_eq!(e.to_string(), "Initial state has 2 values, model expects 3");
        let e = ModelError::InvalidReaction { line: 4, reason: "missing '->'".into() };
        assert_eq!(e.to_string(), "Invalid reaction on line 4: missing '->'");
    }

    #[test]
    fn test_trajectory_error_source() {
        use std::error::Error;
        let e = TrajectoryError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(e.source().is_some());
        let e = TrajectoryError::TimepointCountMismatch { found: 3, expected: 4 };
        assert!(e.source().is_none());
        assert_eq!(e.to_string(), "Trajectory has 3 timepoints, expected 4");
    }
}
