//! Nearest-neighbour duplex thermodynamics for ungapped A/C/G/T oligos.
//!
//! Parameters are the unified set of SantaLucia (1998) / Allawi & SantaLucia
//! (1997): enthalpy in kcal/mol, entropy in cal/(K·mol).

use oligo_core::operations::complement_base;

use crate::PrimerError;

/// Universal gas constant, cal/(K·mol).
pub const R: f64 = 1.987;

pub const ENTHALPY_SYMMETRY_CORRECTION: f64 = 0.0;
pub const ENTROPY_SYMMETRY_CORRECTION: f64 = -1.4;

const KELVIN: f64 = 273.15;
const SALT_ENTROPY_COEFFICIENT: f64 = 0.368;

// Terminal initiation, indexed A C G T.
const MONOMER_ENTHALPY: [f64; 4] = [2.3, 0.1, 0.1, 2.3];
const MONOMER_ENTROPY: [f64; 4] = [4.1, -2.8, -2.8, 4.1];

// Row is the 5' base, column the 3' base.
const DIMER_ENTHALPY: [[f64; 4]; 4] = [
    [-7.9, -8.4, -7.8, -7.2],
    [-8.5, -8.0, -10.6, -7.8],
    [-8.2, -9.8, -8.0, -8.4],
    [-7.2, -8.2, -8.5, -7.9],
];
const DIMER_ENTROPY: [[f64; 4]; 4] = [
    [-22.2, -22.4, -21.0, -20.4],
    [-22.7, -19.9, -27.2, -21.0],
    [-22.2, -24.4, -19.9, -22.4],
    [-21.3, -22.2, -22.7, -22.2],
];

fn base_index(base: u8) -> Result<usize, PrimerError> {
    match base.to_ascii_uppercase() {
        b'A' => Ok(0),
        b'C' => Ok(1),
        b'G' => Ok(2),
        b'T' => Ok(3),
        other => Err(PrimerError::InvalidArgument(format!(
            "'{}' is not an unambiguous DNA base",
            other as char
        ))),
    }
}

/// True when the sequence equals its own reverse complement.
pub fn is_palindrome(seq: &[u8]) -> bool {
    let n = seq.len();
    (0..n).all(|i| seq[i].to_ascii_uppercase() == complement_base(seq[n - 1 - i]))
}

fn nearest_neighbour_sum(
    seq: &[u8],
    monomer: &[f64; 4],
    dimer: &[[f64; 4]; 4],
    symmetry_correction: f64,
) -> Result<f64, PrimerError> {
    let Some((&last, _)) = seq.split_last() else {
        return Ok(0.0);
    };

    let mut previous = base_index(seq[0])?;
    let mut total = monomer[previous];
    for &base in &seq[1..] {
        let current = base_index(base)?;
        total += dimer[previous][current];
        previous = current;
    }
    total += monomer[base_index(last)?];

    if is_palindrome(seq) {
        total += symmetry_correction;
    }
    Ok(total)
}

/// Duplex formation enthalpy (kcal/mol); 0 for an empty sequence.
pub fn enthalpy(seq: &[u8]) -> Result<f64, PrimerError> {
    nearest_neighbour_sum(
        seq,
        &MONOMER_ENTHALPY,
        &DIMER_ENTHALPY,
        ENTHALPY_SYMMETRY_CORRECTION,
    )
}

/// Duplex formation entropy (cal/(K·mol)); 0 for an empty sequence.
pub fn entropy(seq: &[u8]) -> Result<f64, PrimerError> {
    nearest_neighbour_sum(
        seq,
        &MONOMER_ENTROPY,
        &DIMER_ENTROPY,
        ENTROPY_SYMMETRY_CORRECTION,
    )
}

/// Entropy corrected for a monovalent cation (Na+) concentration in molar.
pub fn sodium_corrected_entropy(
    entropy: f64,
    length: usize,
    sodium_concentration: f64,
) -> Result<f64, PrimerError> {
    if length == 0 {
        return Err(PrimerError::InvalidArgument(
            "salt correction needs a non-empty sequence".to_string(),
        ));
    }
    if sodium_concentration <= 0.0 {
        return Err(PrimerError::InvalidArgument(format!(
            "sodium concentration must be positive, got {}",
            sodium_concentration
        )));
    }
    Ok(entropy + SALT_ENTROPY_COEFFICIENT * (length - 1) as f64 * sodium_concentration.ln())
}

/// Melting temperature in °C. Non-self-complementary duplexes use half of the
/// strand concentration.
pub fn melting_temperature_from_enthalpy(
    enthalpy: f64,
    corrected_entropy: f64,
    dna_concentration: f64,
    is_palindrome: bool,
) -> Result<f64, PrimerError> {
    if dna_concentration <= 0.0 {
        return Err(PrimerError::InvalidArgument(format!(
            "primer DNA concentration must be positive, got {}",
            dna_concentration
        )));
    }
    let effective = if is_palindrome {
        dna_concentration
    } else {
        dna_concentration / 2.0
    };
    Ok(1000.0 * enthalpy / (corrected_entropy + R * effective.ln()) - KELVIN)
}

/// Melting temperature in °C of an ungapped A/C/G/T sequence; 0 when empty.
pub fn melting_temperature(
    seq: &[u8],
    sodium_concentration: f64,
    dna_concentration: f64,
) -> Result<f64, PrimerError> {
    if seq.is_empty() {
        return Ok(0.0);
    }
    let h = enthalpy(seq)?;
    let s = sodium_corrected_entropy(entropy(seq)?, seq.len(), sodium_concentration)?;
    melting_temperature_from_enthalpy(h, s, dna_concentration, is_palindrome(seq))
}

/// Largest number of Watson-Crick pairs the oligo forms with a copy of itself
/// aligned antiparallel at any offset, without gaps.
pub fn homo_dimer_score(seq: &[u8]) -> usize {
    let n = seq.len();
    let mut best = 0;
    // Strand 1 read 5'->3' against strand 2 read 3'->5'; `shift` slides strand 2.
    for shift in 0..(2 * n).saturating_sub(1) {
        let mut pairs = 0;
        for i in 0..n {
            let Some(j) = (shift + i + 1).checked_sub(n) else {
                continue;
            };
            if j >= n {
                break;
            }
            let a = seq[i].to_ascii_uppercase();
            let b = seq[n - 1 - j].to_ascii_uppercase();
            if matches!(a, b'A' | b'C' | b'G' | b'T') && complement_base(b) == a {
                pairs += 1;
            }
        }
        best = best.max(pairs);
    }
    best
}
