//! Synthetic VQE-style simulation.
//!
//! Nothing here evaluates a quantum circuit. The demo only needs plausible
//! *observable outputs*: a decaying energy trajectory with noise, a qubit
//! estimate derived from the sequence length, a classical baseline that is
//! worse by construction, and a spiral backbone with jitter. The bias of the
//! classical baseline is demonstration-only behavior and must not be relied
//! on if a real energy model is ever substituted.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Backbone rise per residue in angstroms.
const RESIDUE_SPACING: f64 = 3.8;

/// Standard deviation of the backbone coordinate jitter.
const BACKBONE_JITTER_SIGMA: f64 = 0.5;

/// Standard deviation of the per-iteration energy noise.
const ENERGY_NOISE_SIGMA: f64 = 0.1;

/// Maximum allowed uphill step between consecutive energy samples.
const MAX_UPHILL_STEP: f64 = 0.05;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Quantum circuit template selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ansatz {
    EfficientSu2,
    RealAmplitudes,
    TwoLocal,
}

impl Default for Ansatz {
    fn default() -> Self {
        Self::EfficientSu2
    }
}

/// Classical optimizer selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Optimizer {
    Cobyla,
    Slsqp,
    LBfgsB,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::Cobyla
    }
}

/// Parameters for a simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VqeConfig {
    #[serde(default)]
    pub ansatz: Ansatz,
    #[serde(default)]
    pub optimizer: Optimizer,
    #[serde(default = "default_iterations")]
    pub max_iterations: usize,
}

fn default_iterations() -> usize {
    100
}

impl Default for VqeConfig {
    fn default() -> Self {
        Self {
            ansatz: Ansatz::default(),
            optimizer: Optimizer::default(),
            max_iterations: default_iterations(),
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Output record of a synthetic VQE run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VqeResults {
    pub final_energy: f64,
    pub energy_history: Vec<f64>,
    pub num_qubits: usize,
    pub iterations: usize,
    pub ansatz: Ansatz,
    pub optimizer: Optimizer,
}

impl VqeResults {
    /// One-line form stored in the session context for the chat path.
    pub fn summary(&self) -> String {
        format!(
            "final_energy: {:.4}, num_qubits: {}, iterations: {}, optimizer: {:?}, ansatz: {:?}",
            self.final_energy, self.num_qubits, self.iterations, self.optimizer, self.ansatz
        )
    }
}

/// Output record of the classical comparison run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassicalResults {
    pub final_energy: f64,
    pub method: String,
    pub note: String,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Qubit estimate for a sequence of `len` residues: three qubits per
/// backbone turn, so 3 * (len - 1).
pub fn qubit_count(len: usize) -> usize {
    len.saturating_sub(1) * 3
}

/// Run the synthetic optimization.
///
/// The trajectory is a closed-form decaying exponential with Gaussian noise,
/// clamped so no sample sits more than [`MAX_UPHILL_STEP`] above its
/// predecessor.
pub fn run_vqe(sequence: &str, config: &VqeConfig) -> VqeResults {
    let noise = Normal::new(0.0, ENERGY_NOISE_SIGMA).unwrap();
    let mut rng = rand::thread_rng();

    let iterations = config.max_iterations.max(1);
    let mut energy_history = Vec::with_capacity(iterations);
    for i in 0..iterations {
        let mut energy = -5.0 + 3.0 * (-(i as f64) / 20.0).exp() + noise.sample(&mut rng);
        if let Some(&prev) = energy_history.last() {
            energy = energy.min(prev + MAX_UPHILL_STEP);
        }
        energy_history.push(energy);
    }

    let final_energy = *energy_history.last().unwrap_or(&0.0);

    VqeResults {
        final_energy,
        energy_history,
        num_qubits: qubit_count(sequence.len()),
        iterations,
        ansatz: config.ansatz,
        optimizer: config.optimizer,
    }
}

/// Classical comparison run.
///
/// Always worse than the quantum result by a random 0.8 to 1.5 Hartree
/// penalty; the demo narrative is that classical search gets trapped in
/// local minima.
pub fn run_classical(vqe_energy: f64) -> ClassicalResults {
    let penalty = rand::thread_rng().gen_range(0.8..1.5);
    ClassicalResults {
        final_energy: vqe_energy + penalty,
        method: "Classical Random Search".to_string(),
        note: "Classical algorithms get trapped in local energy minima".to_string(),
    }
}

/// Procedurally generated backbone: a spiral with Gaussian jitter, one
/// coordinate triple per residue. Unrelated to any computed energy.
pub fn backbone_coordinates(sequence: &str) -> Vec<[f64; 3]> {
    let jitter = Normal::new(0.0, BACKBONE_JITTER_SIGMA).unwrap();
    let mut rng = rand::thread_rng();

    (0..sequence.len())
        .map(|i| {
            let t = i as f64;
            [
                t * RESIDUE_SPACING + jitter.sample(&mut rng),
                (t * 0.5).sin() * 5.0 + jitter.sample(&mut rng),
                (t * 0.5).cos() * 5.0 + jitter.sample(&mut rng),
            ]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qubit_count_is_three_per_turn() {
        assert_eq!(qubit_count(10), 27);
        assert_eq!(qubit_count(1), 0);
        assert_eq!(qubit_count(0), 0);
    }

    #[test]
    fn trajectory_has_requested_length_and_converges_downward() {
        let results = run_vqe("ACDEFGHIKL", &VqeConfig::default());
        assert_eq!(results.energy_history.len(), 100);
        assert_eq!(results.num_qubits, 27);
        // The decay term shrinks from 3.0 to near zero; even with noise the
        // tail must sit well below the head.
        assert!(results.final_energy < results.energy_history[0]);
    }

    #[test]
    fn uphill_steps_are_clamped() {
        let results = run_vqe("ACDEFGHIKL", &VqeConfig::default());
        for pair in results.energy_history.windows(2) {
            assert!(pair[1] <= pair[0] + MAX_UPHILL_STEP + 1e-9);
        }
    }

    #[test]
    fn classical_baseline_is_always_worse() {
        for _ in 0..32 {
            let classical = run_classical(-4.2);
            assert!(classical.final_energy > -4.2 + 0.8 - 1e-9);
            assert!(classical.final_energy < -4.2 + 1.5 + 1e-9);
        }
    }

    #[test]
    fn backbone_has_one_triple_per_residue() {
        let coords = backbone_coordinates("ACDEF");
        assert_eq!(coords.len(), 5);
        // Spiral advances along x; jitter is small relative to spacing.
        assert!(coords[4][0] > coords[0][0]);
    }

    #[test]
    fn summary_embeds_final_energy_field() {
        let results = run_vqe("ACD", &VqeConfig::default());
        assert!(results.summary().contains("final_energy"));
    }

    #[test]
    fn zero_iterations_still_produces_a_sample() {
        let config = VqeConfig {
            max_iterations: 0,
            ..Default::default()
        };
        let results = run_vqe("ACD", &config);
        assert_eq!(results.energy_history.len(), 1);
    }
}
