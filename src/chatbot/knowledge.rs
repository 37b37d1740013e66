//! Static knowledge base for the pattern router.
//!
//! Each rule pairs a set of regex matchers with a response kind: either a
//! literal block returned verbatim, or a sentinel that routes to a
//! context-aware formatter. Rule order is significant — the router checks
//! rules in the order built here and the first match wins.

use regex::Regex;

/// How a matched rule resolves to a response.
#[derive(Debug, Clone, Copy)]
pub enum ResponseKind {
    /// Return the text verbatim.
    Literal(&'static str),
    /// Format the last simulation results from the session context.
    VqeResults,
    /// Format the loaded sequence from the session context.
    ProteinSequence,
}

/// An ordered matcher-to-template association.
#[derive(Debug)]
pub struct PatternRule {
    pub name: &'static str,
    pub patterns: Vec<Regex>,
    pub response: ResponseKind,
}

impl PatternRule {
    fn new(name: &'static str, patterns: &[&str], response: ResponseKind) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("bad pattern in rule '{}': {}", name, e)))
            .collect();
        Self {
            name,
            patterns,
            response,
        }
    }
}

/// Build the ordered rule list. Insertion order is the dispatch priority.
pub fn knowledge_base() -> Vec<PatternRule> {
    vec![
        PatternRule::new(
            "vqe_what",
            &[
                r"\bwhat.*vqe\b",
                r"\bvqe.*is\b",
                r"\bexplain.*vqe\b",
                r"\bdefine.*vqe\b",
                r"\btell.*about.*vqe\b",
            ],
            ResponseKind::Literal(VQE_WHAT),
        ),
        PatternRule::new(
            "vqe_how",
            &[
                r"\bhow.*vqe.*work\b",
                r"\bvqe.*process\b",
                r"\bvqe.*algorithm\b",
                r"\bvqe.*steps\b",
            ],
            ResponseKind::Literal(VQE_HOW),
        ),
        PatternRule::new(
            "vqe_results_check",
            &[
                r"\bresults?\b",
                r"\benergy\b",
                r"\boutput\b",
                r"\bfinal.*energy\b",
                r"\bshow.*results?\b",
            ],
            ResponseKind::VqeResults,
        ),
        PatternRule::new(
            "protein_folding",
            &[
                r"\bprotein.*fold\b",
                r"\bfolding.*process\b",
                r"\bhow.*protein.*fold\b",
                r"\bfolding.*mechanism\b",
            ],
            ResponseKind::Literal(PROTEIN_FOLDING),
        ),
        PatternRule::new(
            "protein_sequence_check",
            &[
                r"\bsequence\b",
                r"\bamino.*acid\b",
                r"\bcurrent.*protein\b",
                r"\bloaded.*protein\b",
                r"\bmy.*protein\b",
            ],
            ResponseKind::ProteinSequence,
        ),
        PatternRule::new(
            "protein_structure",
            &[
                r"\b3d.*structure\b",
                r"\bstructure.*protein\b",
                r"\bbackbone\b",
                r"\bconformation\b",
                r"\btertiary\b",
            ],
            ResponseKind::Literal(PROTEIN_STRUCTURE),
        ),
        PatternRule::new(
            "quantum_advantage",
            &[
                r"\bquantum.*advantage\b",
                r"\bwhy.*quantum\b",
                r"\bquantum.*better\b",
                r"\bquantum.*vs.*classical\b",
            ],
            ResponseKind::Literal(QUANTUM_ADVANTAGE),
        ),
        PatternRule::new(
            "qubits",
            &[
                r"\bqubit\b",
                r"\bquantum.*bit\b",
                r"\bhow.*many.*qubit\b",
                r"\bqubit.*need\b",
            ],
            ResponseKind::Literal(QUBITS),
        ),
        PatternRule::new(
            "ansatz",
            &[
                r"\bansatz\b",
                r"\bcircuit.*template\b",
                r"\befficient.*su2\b",
                r"\breal.*amplitude\b",
                r"\btwo.*local\b",
            ],
            ResponseKind::Literal(ANSATZ),
        ),
        PatternRule::new(
            "optimizer",
            &[
                r"\boptimizer\b",
                r"\bcobyla\b",
                r"\bslsqp\b",
                r"\bl-bfgs-b\b",
                r"\bwhich.*optimizer\b",
            ],
            ResponseKind::Literal(OPTIMIZER),
        ),
        PatternRule::new(
            "diseases",
            &[
                r"\bdisease\b",
                r"\balzheimer\b",
                r"\bparkinson\b",
                r"\bhuntington\b",
                r"\bmisfolding.*disease\b",
            ],
            ResponseKind::Literal(DISEASES),
        ),
        PatternRule::new(
            "how_to_use",
            &[
                r"\bhow.*use\b",
                r"\bget.*started\b",
                r"\btutorial\b",
                r"\bhelp.*dashboard\b",
                r"\bguide\b",
            ],
            ResponseKind::Literal(USAGE_GUIDE),
        ),
        PatternRule::new(
            "greeting",
            &[
                r"\bhello\b",
                r"\bhi\b",
                r"\bhey\b",
                r"\bgreetings\b",
                r"\bgood.*morning\b",
                r"\bgood.*evening\b",
            ],
            ResponseKind::Literal(GREETING),
        ),
        PatternRule::new(
            "thanks",
            &[r"\bthank\b", r"\bthanks\b", r"\bappreciate\b", r"\bthank you\b"],
            ResponseKind::Literal(THANKS),
        ),
        PatternRule::new(
            "goodbye",
            &[r"\bbye\b", r"\bgoodbye\b", r"\bsee you\b", r"\bsee ya\b"],
            ResponseKind::Literal(GOODBYE),
        ),
    ]
}

// ---------------------------------------------------------------------------
// Literal response blocks
// ---------------------------------------------------------------------------

pub const VQE_WHAT: &str = "\
**VQE (Variational Quantum Eigensolver)**

VQE is a hybrid quantum-classical algorithm designed to find the ground state energy of molecular systems.

**How it works:**
1. Prepare a quantum state using a parameterized circuit (ansatz)
2. Measure the energy expectation value on a quantum computer
3. A classical optimizer updates the circuit parameters
4. Repeat until convergence to the ground state

**Why it matters:**
- Works on noisy intermediate-scale quantum (NISQ) devices
- Finds lowest energy conformations
- Essential for protein folding and drug discovery
- Combines quantum state preparation with classical optimization";

pub const VQE_HOW: &str = "\
**VQE Algorithm Step by Step**

**Step 1: Initialize** — start with random parameters for the quantum circuit.

**Step 2: Prepare the quantum state** — build the ansatz circuit with the current parameters, creating a superposition of protein conformations.

**Step 3: Measure the energy** — compute the expectation value of the Hamiltonian (the energy operator).

**Step 4: Classical optimization** — the optimizer (COBYLA/SLSQP/L-BFGS-B) updates the parameters to lower the energy.

**Step 5: Iterate** — repeat until the energy stops decreasing.

**Key components:**
- **Ansatz**: quantum circuit template
- **Hamiltonian**: protein energy landscape
- **Optimizer**: classical minimization algorithm";

pub const PROTEIN_FOLDING: &str = "\
**Protein Folding Process**

Proteins fold from linear chains into complex 3D structures through several forces:

1. **Hydrophobic effect** — non-polar residues cluster inside, away from water; the primary driving force.
2. **Hydrogen bonding** — forms alpha-helices and beta-sheets, stabilizing secondary structure.
3. **Van der Waals forces** — weak but numerous; fine-tune the final conformation.
4. **Electrostatic interactions** — charged residues attract or repel, forming salt bridges.
5. **Disulfide bonds** — covalent S-S locks between cysteines.

**Energy landscape:** proteins fold to minimize free energy; the native state is the global minimum and misfolding means getting trapped in a local minimum.

**Levinthal's paradox:** classical computers struggle with the astronomical number of conformations (3^N); quantum search offers a way through.";

pub const PROTEIN_STRUCTURE: &str = "\
**Protein Structure Hierarchy**

- **Primary (1)**: the linear amino-acid sequence, e.g. ACDEFGHIKL.
- **Secondary (2)**: local folding patterns — alpha-helices, beta-sheets, random coils.
- **Tertiary (3)**: the overall 3D shape of one polypeptide; what VQE helps predict.
- **Quaternary (4)**: multiple polypeptides assembled, e.g. hemoglobin's four subunits.

**Key insight:** structure determines function — even small misfolding can cause disease.";

pub const QUANTUM_ADVANTAGE: &str = "\
**Quantum Advantage for Protein Folding**

1. **Natural representation** — proteins are quantum systems; quantum computers simulate quantum behavior directly.
2. **Exponential state space** — N qubits represent 2^N states simultaneously, explored in superposition.
3. **Quantum tunneling** — can escape local energy minima on the way to the global minimum.
4. **Entanglement** — captures long-range correlations between residues.

**Current reality:** NISQ devices have limited, noisy qubits, but VQE is practical on today's hardware.";

pub const QUBITS: &str = "\
**Qubits in Protein Folding**

A qubit is the basic unit of quantum information: it can be |0>, |1>, or any superposition, and can be entangled with other qubits.

**Encoding a conformation:** each backbone turn takes 3 qubits, so a protein of N residues needs about (N-1) x 3 qubits. A 10-residue peptide needs 27.

**Scaling challenge:** real proteins run 100-1000+ residues, which would need 300-3000+ qubits. For now the dashboard focuses on small peptides and domains.";

pub const ANSATZ: &str = "\
**Ansatz Types (Quantum Circuit Templates)**

1. **EfficientSU2** — general purpose, high expressiveness (RY/RZ rotations plus CX entangling gates). Best for accurate production runs.
2. **RealAmplitudes** — fewer parameters, faster optimization (RY plus CX only). Best for initial testing.
3. **TwoLocal** — customizable gate choice; flexible but requires domain knowledge.

**Choosing:** start with RealAmplitudes for speed, move to EfficientSU2 for accuracy, and keep layer count at 2-3 to begin with.";

pub const OPTIMIZER: &str = "\
**Classical Optimizers for VQE**

1. **COBYLA** — derivative-free, slowest, most robust to noise. Best on real quantum hardware.
2. **SLSQP** — gradient-based, medium speed and robustness. A balanced choice.
3. **L-BFGS-B** — quasi-Newton, fastest convergence, needs a smooth landscape. Best on simulators.

**Iterations:** 50-100 for quick testing, 200-300 for production, 500+ for high precision.";

pub const DISEASES: &str = "\
**Protein Misfolding Diseases**

1. **Alzheimer's disease** — amyloid-beta and tau accumulate as plaques and tangles, causing neurodegeneration. Treatments include cholinesterase inhibitors and antibody therapies.
2. **Parkinson's disease** — alpha-synuclein forms Lewy bodies in dopamine neurons. Treatments include levodopa and dopamine agonists.
3. **Huntington's disease** — huntingtin with expanded CAG repeats forms toxic aggregates. Managed with tetrabenazine and supportive care.

**Why misfolding causes disease:** loss of normal function, toxic aggregation, cellular stress, and progressive neurodegeneration. Predicting correct folding accelerates drug discovery.";

pub const USAGE_GUIDE: &str = "\
**Dashboard User Guide**

**Home** — choose an input method (manual entry, sample dataset, PDB id, UniProt id), validate the sequence, and proceed to configuration.

**Configuration** — select an ansatz (EfficientSU2, RealAmplitudes, TwoLocal), an optimizer (COBYLA, SLSQP, L-BFGS-B), and an iteration count (50-500).

**Run VQE** — start the optimization and watch the energy convergence.

**Results** — view the final energy, the convergence plot, the 3D structure, and the quantum vs classical comparison.

**AI assistant** — available everywhere; just ask.";

pub const GREETING: &str = "\
Hello! Welcome to the Quantum Protein Folding Dashboard.

I can help you with:
- **VQE algorithm** — how it works, parameters, results
- **Protein folding** — mechanisms, forces, structure
- **Quantum computing** — qubits, circuits, advantage
- **Configuration** — ansatz, optimizers, settings
- **Diseases** — misfolding diseases and treatments
- **Dashboard usage** — step-by-step guidance

Quick starts: \"What is VQE?\", \"How do proteins fold?\", \"Show me my results\", \"Which optimizer should I use?\"";

pub const THANKS: &str = "You're very welcome! Feel free to ask anything else about quantum protein folding, VQE, or the dashboard.";

pub const GOODBYE: &str = "Goodbye! Thanks for using the Quantum Protein Folding Dashboard. Come back anytime.";

// ---------------------------------------------------------------------------
// No-match fallback topics, checked in priority order
// ---------------------------------------------------------------------------

pub const ENERGY_KEYWORDS: [&str; 4] = ["energy", "hartree", "convergence", "ground state"];
pub const EXPORT_KEYWORDS: [&str; 4] = ["download", "export", "save", "pdb file"];
pub const PERFORMANCE_KEYWORDS: [&str; 6] = ["fast", "slow", "speed", "time", "performance", "runtime"];

pub const ENERGY_TOPIC: &str = "\
**About Energy in Protein Folding**

The Hartree is the atomic unit of energy: 1 Hartree is roughly 27.2 eV or 627 kcal/mol.

- **Lower energy** means a more stable structure.
- **Ground state** is the lowest possible energy.
- **Convergence** means the energy has stopped changing significantly.

VQE's goal is to find the ground state energy, predicting the most stable (and biologically relevant) structure. The landscape has many local minima, but we want the global one.";

pub const EXPORT_TOPIC: &str = "\
**Exporting Results**

Currently available: screenshots of visualizations, copy/paste of text results, and the browser print function.

Coming soon: PDB file export, a full PDF report, CSV data export, and FASTA sequence export. For now, copy energy values from the results view and print the page as PDF.";

pub const PERFORMANCE_TOPIC: &str = "\
**VQE Performance and Runtime**

Typical execution time: 1-2 minutes for small peptides (5-10 residues), 3-5 minutes for medium (10-20), and 5-10+ for larger inputs.

What affects speed: sequence length (more residues, more qubits), iteration count, ansatz choice (EfficientSU2 is slower than RealAmplitudes), and optimizer (L-BFGS-B fastest, COBYLA slowest).

Tips: start with 50-100 iterations, use RealAmplitudes for quick explorations, and increase to 200-500 for production runs.";

pub const GENERIC_MENU: &str = "\
I can help with many topics. Popular questions:

**VQE and quantum:** \"What is VQE?\", \"How does VQE work?\", \"Why use quantum computing?\", \"How many qubits are needed?\"

**Protein folding:** \"How do proteins fold?\", \"What is protein structure?\", \"Show me my protein\"

**Configuration:** \"Which ansatz should I use?\", \"Which optimizer is best?\", \"How many iterations?\"

**Dashboard:** \"How do I use this?\", \"Show me my results\"

Try a more specific question and I'll give you a detailed answer.";
