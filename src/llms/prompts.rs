//! Prompt construction for the remote providers.

use crate::context::SessionContext;

/// Fixed instructional preamble with the session context embedded.
///
/// Both providers send this ahead of the user query so that answers sound
/// session-aware.
pub fn system_prompt(ctx: &SessionContext) -> String {
    let (protein, results, analysis) = ctx.prompt_fields();
    format!(
        "You are a specialized AI assistant for a Quantum Protein Folding Dashboard.\n\
         Current context:\n\
         - Protein Sequence: {protein}\n\
         - VQE Results: {results}\n\
         - Last Analysis: {analysis}\n\n\
         Focus on quantum computing concepts (VQE, quantum circuits, qubits), protein \
         folding mechanisms, and current simulation results. Keep responses clear and technical."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_context_values() {
        let ctx = SessionContext {
            current_protein: Some("ACDEF".to_string()),
            vqe_results: Some("final_energy: -4.5".to_string()),
            ..Default::default()
        };
        let prompt = system_prompt(&ctx);
        assert!(prompt.contains("Protein Sequence: ACDEF"));
        assert!(prompt.contains("VQE Results: final_energy: -4.5"));
        assert!(prompt.contains("Last Analysis: None"));
    }

    #[test]
    fn empty_context_renders_none_placeholders() {
        let prompt = system_prompt(&SessionContext::default());
        assert!(prompt.contains("Protein Sequence: None"));
    }
}
