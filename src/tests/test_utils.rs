//! Stand-in solvers for the tests. The real analytic solvers are generated per robot and
//! are not part of this crate, so the sampling logic is tested against these.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::kinematic_traits::{ArmSolver, Configuration, Solutions, TORSO, UPPER_ROLL};

/// Toy arm with an exactly invertible geometry:
/// tool position is `(pan + upper_roll, shoulder_lift, torso + elbow_flex)` and the tool
/// rotates about Z by the wrist roll. Forearm roll and wrist flex do not move the tool, so
/// every reachable pose has three solutions differing in the wrist flex: 0, -1 and +0.5
/// (the last one violates PR2 wrist limits).
pub(crate) struct PlanarSolver {
    /// Poses further than this from the Z axis are infeasible
    pub reach: f64,
}

impl Default for PlanarSolver {
    fn default() -> Self {
        PlanarSolver { reach: 1.0 }
    }
}

pub(crate) const WRIST_FLEX_ALTERNATIVES: [f64; 3] = [0.0, -1.0, 0.5];

impl ArmSolver for PlanarSolver {
    fn forward(&self, q: &Configuration) -> (Vector3<f64>, Matrix3<f64>) {
        let position = Vector3::new(q[1] + q[UPPER_ROLL], q[2], q[TORSO] + q[4]);
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), q[7]).into_inner();
        (position, rotation)
    }

    fn inverse(&self, rotation: &Matrix3<f64>, translation: &Vector3<f64>,
               free: &[f64; 2]) -> Option<Solutions> {
        // Only rotations about Z can be reached
        if (rotation[(2, 2)] - 1.0).abs() > 1E-9 {
            return None;
        }
        if translation.xy().norm() > self.reach {
            return None;
        }
        let [torso, upper] = *free;
        let yaw = f64::atan2(rotation[(1, 0)], rotation[(0, 0)]);
        Some(WRIST_FLEX_ALTERNATIVES.iter()
            .map(|flex| [torso, translation.x - upper, translation.y, upper,
                translation.z - torso, 0.0, *flex, yaw])
            .collect())
    }
}

/// Wraps a solver and records the free values of every inverse call.
pub(crate) struct CountingSolver<S: ArmSolver> {
    pub inner: S,
    calls: AtomicUsize,
    free_values: Mutex<Vec<[f64; 2]>>,
}

impl<S: ArmSolver> CountingSolver<S> {
    pub fn new(inner: S) -> Self {
        CountingSolver { inner, calls: AtomicUsize::new(0), free_values: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn free_values(&self) -> Vec<[f64; 2]> {
        self.free_values.lock().expect("Poisoned").clone()
    }
}

impl<S: ArmSolver> ArmSolver for CountingSolver<S> {
    fn forward(&self, q: &Configuration) -> (Vector3<f64>, Matrix3<f64>) {
        self.inner.forward(q)
    }

    fn inverse(&self, rotation: &Matrix3<f64>, translation: &Vector3<f64>,
               free: &[f64; 2]) -> Option<Solutions> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.free_values.lock().expect("Poisoned").push(*free);
        self.inner.inverse(rotation, translation, free)
    }
}

/// Solver that only finds solutions if the torso is raised above the given height.
pub(crate) struct HighTorsoSolver {
    pub min_torso: f64,
    pub inner: PlanarSolver,
}

impl ArmSolver for HighTorsoSolver {
    fn forward(&self, q: &Configuration) -> (Vector3<f64>, Matrix3<f64>) {
        self.inner.forward(q)
    }

    fn inverse(&self, rotation: &Matrix3<f64>, translation: &Vector3<f64>,
               free: &[f64; 2]) -> Option<Solutions> {
        if free[0] < self.min_torso {
            return None;
        }
        self.inner.inverse(rotation, translation, free)
    }
}

/// Path to the file under `src/tests/data`
pub(crate) fn data_file(name: &str) -> String {
    format!("{}/src/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
}

pub(crate) fn read_data_file(name: &str) -> Result<String> {
    let path = data_file(name);
    std::fs::read_to_string(&path).with_context(|| format!("Failed to read test data file: {}", path))
}
