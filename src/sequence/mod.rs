//! Amino-acid sequence validation and external lookups.
//!
//! Sequences are validated against the 20 standard one-letter codes before
//! any computation. Lookups fetch raw FASTA over HTTP from the RCSB PDB and
//! UniProt; a non-200 response or a transport error is reported as
//! not-found, with no retry.

use std::time::Duration;

use thiserror::Error;

/// The 20 standard amino-acid one-letter codes.
pub const AMINO_ACIDS: [char; 20] = [
    'A', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'V',
    'W', 'Y',
];

/// Lookup request timeout.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Validation failures, surfaced to the user before any computation runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Sequence is empty")]
    Empty,

    #[error("Invalid residue '{residue}' at position {position}. Use only the 20 standard amino acids.")]
    InvalidResidue { residue: char, position: usize },
}

/// Validate and normalize a sequence to upper-case.
pub fn validate_sequence(raw: &str) -> Result<String, SequenceError> {
    let sequence = raw.trim().to_uppercase();
    if sequence.is_empty() {
        return Err(SequenceError::Empty);
    }
    for (position, residue) in sequence.chars().enumerate() {
        if !AMINO_ACIDS.contains(&residue) {
            return Err(SequenceError::InvalidResidue { residue, position });
        }
    }
    Ok(sequence)
}

/// Join the body of a FASTA record, skipping `>` header lines.
pub fn parse_fasta(text: &str) -> String {
    text.lines()
        .filter(|line| !line.starts_with('>'))
        .map(str::trim)
        .collect()
}

/// Fetch a sequence from the RCSB PDB by structure id.
///
/// Returns `Ok(None)` when the entry does not exist (non-200 response).
pub async fn fetch_from_pdb(pdb_id: &str) -> Result<Option<String>, reqwest::Error> {
    let url = format!("https://www.rcsb.org/fasta/entry/{}", pdb_id);
    fetch_fasta(&url).await
}

/// Fetch a sequence from UniProt by accession.
pub async fn fetch_from_uniprot(uniprot_id: &str) -> Result<Option<String>, reqwest::Error> {
    let url = format!("https://www.uniprot.org/uniprot/{}.fasta", uniprot_id);
    fetch_fasta(&url).await
}

async fn fetch_fasta(url: &str) -> Result<Option<String>, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        log::warn!("Sequence lookup returned {} for {}", response.status(), url);
        return Ok(None);
    }

    let body = response.text().await?;
    let sequence = parse_fasta(&body);
    if sequence.is_empty() {
        return Ok(None);
    }
    Ok(Some(sequence))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
