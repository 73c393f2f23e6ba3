use oligo_core::{ClosedRange, DnaPattern, RestrictionEnzyme};
use serde::{Deserialize, Serialize};

use crate::PrimerError;

/// Constraints for a primer-pair search.
///
/// Unset fields fall back to the defaults when deserialized, so a JSON
/// document only needs to name what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParameters {
    /// Acceptable PCR product length, primers included.
    pub amplicon_length_range: ClosedRange<usize>,
    pub primer_length_range: ClosedRange<usize>,
    /// Site prepended to the 5' end of forward primers.
    pub forward_restriction_enzyme: Option<RestrictionEnzyme>,
    pub reverse_restriction_enzyme: Option<RestrictionEnzyme>,
    /// Pattern the 3' end of forward primers must match.
    pub forward_terminal_pattern: Option<DnaPattern>,
    pub reverse_terminal_pattern: Option<DnaPattern>,
    /// °C
    pub individual_primer_tm_range: ClosedRange<f64>,
    /// Molar
    pub sodium_concentration: f64,
    /// Molar
    pub primer_dna_concentration: f64,
    /// °C
    pub maximum_primer_pair_delta_tm: f64,
    /// Outcome of the last [`SearchParameters::is_valid`] call that failed.
    #[serde(skip)]
    pub error_message: Option<String>,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            amplicon_length_range: ClosedRange::new(100, 1000),
            primer_length_range: ClosedRange::new(20, 25),
            forward_restriction_enzyme: None,
            reverse_restriction_enzyme: None,
            forward_terminal_pattern: None,
            reverse_terminal_pattern: None,
            individual_primer_tm_range: ClosedRange::new(55.0, 65.0),
            sodium_concentration: 0.2,
            primer_dna_concentration: 1e-6,
            maximum_primer_pair_delta_tm: 5.0,
            error_message: None,
        }
    }
}

impl PartialEq for SearchParameters {
    fn eq(&self, other: &Self) -> bool {
        self.amplicon_length_range == other.amplicon_length_range
            && self.primer_length_range == other.primer_length_range
            && self.forward_restriction_enzyme == other.forward_restriction_enzyme
            && self.reverse_restriction_enzyme == other.reverse_restriction_enzyme
            && self.forward_terminal_pattern == other.forward_terminal_pattern
            && self.reverse_terminal_pattern == other.reverse_terminal_pattern
            && self.individual_primer_tm_range == other.individual_primer_tm_range
            && self.sodium_concentration == other.sodium_concentration
            && self.primer_dna_concentration == other.primer_dna_concentration
            && self.maximum_primer_pair_delta_tm == other.maximum_primer_pair_delta_tm
    }
}

impl SearchParameters {
    /// Load parameters from a JSON document and validate them.
    pub fn from_json(json: &str) -> Result<Self, PrimerError> {
        let params: SearchParameters = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Check every constraint, reporting the first violation.
    pub fn validate(&self) -> Result<(), PrimerError> {
        let fail = |message: String| Err(PrimerError::InvalidParameters(message));

        let amplicon = &self.amplicon_length_range;
        if !amplicon.is_normal() || amplicon.begin < 1 {
            return fail(format!(
                "Amplicon size range {} must be ordered and start at 1 or above",
                amplicon
            ));
        }

        let primer = &self.primer_length_range;
        if !primer.is_normal() || primer.begin < 1 {
            return fail(format!(
                "Primer length range {} must be ordered and start at 1 or above",
                primer
            ));
        }

        if 2 * primer.begin > amplicon.end {
            return fail(format!(
                "Amplicon size is too small: the maximum amplicon size ({}) must be at least twice the minimum primer length ({})",
                amplicon.end, primer.begin
            ));
        }

        if !self.individual_primer_tm_range.is_normal() {
            return fail(format!(
                "Primer melting temperature range {} must be ordered",
                self.individual_primer_tm_range
            ));
        }

        if self.sodium_concentration < 0.0 {
            return fail("Sodium concentration must not be negative".to_string());
        }

        if self.primer_dna_concentration < 0.0 {
            return fail("Primer DNA concentration must not be negative".to_string());
        }

        if self.maximum_primer_pair_delta_tm < 0.0 {
            return fail("Maximum primer pair delta Tm must not be negative".to_string());
        }

        Ok(())
    }

    /// Validate and remember the outcome. The stored message describes the
    /// state at the time of the call; re-run after changing any field.
    pub fn is_valid(&mut self) -> bool {
        match self.validate() {
            Ok(()) => {
                self.error_message = None;
                true
            }
            Err(PrimerError::InvalidParameters(message)) => {
                self.error_message = Some(message);
                false
            }
            Err(other) => {
                self.error_message = Some(other.to_string());
                false
            }
        }
    }

    /// Message from the last `is_valid` call that failed.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn forward_enzyme_site(&self) -> &str {
        self.forward_restriction_enzyme
            .as_ref()
            .map_or("", |e| e.recognition_site())
    }

    pub fn reverse_enzyme_site(&self) -> &str {
        self.reverse_restriction_enzyme
            .as_ref()
            .map_or("", |e| e.recognition_site())
    }
}
