use std::sync::Arc;

use oligo_core::operations::{gc_content, is_acgt, reverse_complement};
use oligo_core::{ClosedRange, CoreError, RestrictionEnzyme, Sequence, Strand};
use serde::Serialize;

use crate::params::SearchParameters;
use crate::thermo::homo_dimer_score;
use crate::PrimerError;

/// Where a primer's core sequence binds on a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrimerSite {
    /// 1-based location on the target's forward strand.
    pub location: ClosedRange<usize>,
    pub strand: Strand,
}

/// A designed oligo: an ungapped A/C/G/T binding core, optionally preceded
/// by a restriction site at its 5' end.
#[derive(Debug, Clone, Serialize)]
pub struct Primer {
    name: String,
    core_sequence: String,
    restriction_enzyme: Option<RestrictionEnzyme>,
    tm: f64,
    homo_dimer_score: usize,
    #[serde(skip)]
    search_parameters: Arc<SearchParameters>,
}

impl Primer {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn core_sequence(&self) -> &str {
        &self.core_sequence
    }

    pub fn restriction_enzyme(&self) -> Option<&RestrictionEnzyme> {
        self.restriction_enzyme.as_ref()
    }

    /// Melting temperature of the core sequence, °C.
    pub fn tm(&self) -> f64 {
        self.tm
    }

    pub fn homo_dimer_score(&self) -> usize {
        self.homo_dimer_score
    }

    pub fn search_parameters(&self) -> &SearchParameters {
        &self.search_parameters
    }

    /// Full oligo, 5' to 3': restriction site followed by the core.
    pub fn sequence(&self) -> String {
        match &self.restriction_enzyme {
            Some(enzyme) => format!("{}{}", enzyme.recognition_site(), self.core_sequence),
            None => self.core_sequence.clone(),
        }
    }

    pub fn length(&self) -> usize {
        self.core_sequence.len()
    }

    pub fn gc_content(&self) -> f64 {
        gc_content(&self.core_sequence)
    }

    /// First binding site of the core on `target`: a forward-strand match
    /// if there is one, otherwise a match of its reverse complement.
    pub fn locate(&self, target: &Sequence) -> Option<PrimerSite> {
        let site = |begin: usize, strand| PrimerSite {
            location: ClosedRange::new(begin, begin + self.core_sequence.len() - 1),
            strand,
        };
        if let Some(begin) = target.index_of(&self.core_sequence, 1) {
            return Some(site(begin, Strand::Forward));
        }
        target
            .index_of(&reverse_complement(&self.core_sequence), 1)
            .map(|begin| site(begin, Strand::Reverse))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PrimerPair {
    pub forward: Primer,
    pub reverse: Primer,
}

impl PrimerPair {
    pub fn delta_tm(&self) -> f64 {
        (self.forward.tm - self.reverse.tm).abs()
    }

    /// Region from the forward primer's 5' end to the reverse primer's
    /// binding end, when both bind `target` facing each other.
    pub fn amplicon_location(&self, target: &Sequence) -> Option<ClosedRange<usize>> {
        let forward = self.forward.locate(target)?;
        let reverse = self.reverse.locate(target)?;
        if forward.strand != Strand::Forward || reverse.strand != Strand::Reverse {
            return None;
        }
        let amplicon = ClosedRange::new(forward.location.begin, reverse.location.end);
        amplicon.is_normal().then_some(amplicon)
    }

    pub fn amplicon_length(&self, target: &Sequence) -> Option<usize> {
        self.amplicon_location(target).map(|r| r.length())
    }
}

/// Builds primers and pairs that share one set of search parameters.
#[derive(Debug, Clone)]
pub struct PrimerFactory {
    params: Arc<SearchParameters>,
}

impl PrimerFactory {
    pub fn new(params: Arc<SearchParameters>) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Arc<SearchParameters> {
        &self.params
    }

    pub fn make_primer(
        &self,
        name: impl Into<String>,
        core_sequence: &str,
        restriction_enzyme: Option<RestrictionEnzyme>,
        tm: f64,
    ) -> Result<Primer, PrimerError> {
        let name = name.into();
        let core_sequence = core_sequence.to_ascii_uppercase();
        if core_sequence.is_empty() || !core_sequence.bytes().all(is_acgt) {
            return Err(CoreError::InvalidSequence(format!(
                "primer {} core '{}' must be ungapped A/C/G/T",
                name, core_sequence
            ))
            .into());
        }

        let mut primer = Primer {
            name,
            core_sequence,
            restriction_enzyme,
            tm,
            homo_dimer_score: 0,
            search_parameters: Arc::clone(&self.params),
        };
        primer.homo_dimer_score = homo_dimer_score(primer.sequence().as_bytes());
        Ok(primer)
    }

    /// Primer carrying the forward restriction enzyme of the parameters.
    pub fn make_forward(
        &self,
        name: impl Into<String>,
        core_sequence: &str,
        tm: f64,
    ) -> Result<Primer, PrimerError> {
        let enzyme = self.params.forward_restriction_enzyme.clone();
        self.make_primer(name, core_sequence, enzyme, tm)
    }

    /// Primer carrying the reverse restriction enzyme of the parameters.
    pub fn make_reverse(
        &self,
        name: impl Into<String>,
        core_sequence: &str,
        tm: f64,
    ) -> Result<Primer, PrimerError> {
        let enzyme = self.params.reverse_restriction_enzyme.clone();
        self.make_primer(name, core_sequence, enzyme, tm)
    }

    pub fn make_pair(&self, forward: Primer, reverse: Primer) -> PrimerPair {
        PrimerPair { forward, reverse }
    }
}
