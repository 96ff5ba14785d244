use std::fmt;

/// A sampled evolution of a model.
///
/// The trajectory stores one time value and one state row per sample. Each
/// row holds one value per label, in label order. Discrete models use the
/// step index as time.
///
/// # Example
/// ```rust
/// use cs_core::Trajectory;
///
/// let mut traj = Trajectory::new("decay", &["x"]);
/// traj.push(0.0, &[1.0]);
/// traj.push(1.0, &[0.5]);
///
/// assert_eq!(traj.len(), 2);
/// assert_eq!(traj.series("x"), Some(vec![1.0, 0.5]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    name: String,
    labels: Vec<String>,
    times: Vec<f64>,
    states: Vec<Vec<f64>>,
}

impl Trajectory {
    pub fn new<S: AsRef<str>>(name: &str, labels: &[S]) -> Self {
        Self::with_capacity(name, labels, 0)
    }

    pub fn with_capacity<S: AsRef<str>>(name: &str, labels: &[S], capacity: usize) -> Self {
        Self {
            name: name.to_string(),
            labels: labels.iter().map(|l| l.as_ref().to_string()).collect(),
            times: Vec::with_capacity(capacity),
            states: Vec::with_capacity(capacity),
        }
    }

    /// Append a sample. The state must hold one value per label.
    pub fn push(&mut self, time: f64, state: &[f64]) {
        debug_assert_eq!(state.len(), self.labels.len(), "state/label length mismatch");
        self.times.push(time);
        self.states.push(state.to_vec());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of state variables.
    pub fn dimension(&self) -> usize {
        self.labels.len()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &[Vec<f64>] {
        &self.states
    }

    /// The state row of sample `idx`.
    pub fn state(&self, idx: usize) -> &[f64] {
        &self.states[idx]
    }

    /// The last sample, if any.
    pub fn last(&self) -> Option<(f64, &[f64])> {
        self.times.last().zip(self.states.last()).map(|(t, s)| (*t, &s[..]))
    }

    /// All values of the variable at position `var` over time.
    pub fn column(&self, var: usize) -> Vec<f64> {
        self.states.iter().map(|s| s[var]).collect()
    }

    /// All values of the variable called `label` over time.
    pub fn series(&self, label: &str) -> Option<Vec<f64>> {
        self.labels.iter()
            .position(|l| l == label)
            .map(|var| self.column(var))
    }

    /// Iterate over `(time, state)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &[f64])> + '_ {
        self.times.iter().zip(self.states.iter()).map(|(t, s)| (*t, &s[..]))
    }
}

impl fmt::Display for Trajectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>13}", "time")?;
        for label in &self.labels {
            write!(f, " {:>14}", label)?;
        }
        writeln!(f)?;
        for (t, state) in self.iter() {
            write!(f, "{:13.6}", t)?;
            for x in state {
                write!(f, " {:14.6e}", x)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trajectory {
        let mut traj = Trajectory::new("sample", &["A", "C"]);
        traj.push(0.0, &[50.0, 5.0]);
        traj.push(1.0, &[26.0, 27.0]);
        traj.push(2.0, &[22.0, 2.0]);
        traj
    }

    #[test]
    fn test_trajectory_accessors() {
        let traj = sample();
        assert_eq!(traj.name(), "sample");
        assert_eq!(traj.dimension(), 2);
        assert_eq!(traj.len(), 3);
        assert!(!traj.is_empty());
        assert_eq!(traj.times(), &[0.0, 1.0, 2.0]);
        assert_eq!(traj.state(1), &[26.0, 27.0]);
        assert_eq!(traj.column(0), vec![50.0, 26.0, 22.0]);
        assert_eq!(traj.series("C"), Some(vec![5.0, 27.0, 2.0]));
        assert_eq!(traj.series("X"), None);
        assert_eq!(traj.last(), Some((2.0, &[22.0, 2.0][..])));
    }

    #[test]
    fn test_trajectory_empty() {
        let traj = Trajectory::new("empty", &["N"]);
        assert!(traj.is_empty());
        assert_eq!(traj.last(), None);
        assert_eq!(traj.column(0), Vec::<f64>::new());
    }

    #[test]
    fn test_trajectory_display() {
        let traj = sample();
        let text = format!("{}", traj);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("time"));
        assert!(lines[0].trim_end().ends_with('C'));
        assert!(lines[1].starts_with("     0.000000"));
    }
}
