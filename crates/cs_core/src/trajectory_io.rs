use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};

use crate::Ensemble;
use crate::Trajectory;
use crate::TrajectoryError;

#[derive(Debug, Serialize, Deserialize)]
pub struct SerializableTrajectory {
    name: String,
    labels: Vec<String>,
    points: Vec<SerializablePoint>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SerializablePoint {
    time: f64,
    state: Vec<f64>,
}

impl Trajectory {
    pub fn to_serializable(&self) -> SerializableTrajectory {
        SerializableTrajectory {
            name: self.name().to_string(),
            labels: self.labels().to_vec(),
            points: self.iter()
                .map(|(time, state)| SerializablePoint { time, state: state.to_vec() })
                .collect(),
        }
    }

    /// Write the trajectory as pretty-printed JSON.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TrajectoryError> {
        let json = serde_json::to_string_pretty(&self.to_serializable())?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Rebuild a trajectory from its serialized form, checking row lengths.
    pub fn from_serializable(serial: SerializableTrajectory) -> Result<Self, TrajectoryError> {
        let expected = serial.labels.len();
        let mut trajectory = Trajectory::with_capacity(&serial.name, &serial.labels, serial.points.len());
        for (row, point) in serial.points.into_iter().enumerate() {
            if point.state.len() != expected {
                return Err(TrajectoryError::RowLength {
                    row,
                    found: point.state.len(),
                    expected,
                });
            }
            trajectory.push(point.time, &point.state);
        }
        Ok(trajectory)
    }

    /// Load a trajectory from a JSON file written by [`Trajectory::to_file`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TrajectoryError> {
        let data = fs::read_to_string(path)?;
        let serial: SerializableTrajectory = serde_json::from_str(&data)?;
        Self::from_serializable(serial)
    }
}

impl Ensemble {
    /// Write the accumulated ensemble (sums and counter) as JSON.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TrajectoryError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load an ensemble from a JSON file and check it against the expected
    /// output times and labels, so that new trajectories can be added.
    pub fn from_file<P: AsRef<Path>, S: AsRef<str>>(
        path: P,
        labels: &[S],
        times: &[f64],
    ) -> Result<Self, TrajectoryError> {
        let data = fs::read_to_string(path)?;
        let ensemble: Ensemble = serde_json::from_str(&data)?;

        let mut expected = Ensemble::new(ensemble.name(), labels, times);
        expected.merge(ensemble)?;
        Ok(expected)
    }
}
