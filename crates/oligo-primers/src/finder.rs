use std::sync::Arc;

use log::{debug, info};
use oligo_core::operations::{is_acgt, reverse_complement};
use oligo_core::search::count_matches;
use oligo_core::{ClosedRange, DnaPattern, Grammar, Sequence};
use serde::Serialize;

use crate::params::SearchParameters;
use crate::primer::{PrimerFactory, PrimerPair};
use crate::progress::{CancellationToken, NoProgress, Progress, ProgressSink};
use crate::thermo;
use crate::PrimerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    /// Every candidate combination was examined.
    Completed,
    /// The search stopped early; `pairs` holds what was assembled before.
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub pairs: Vec<PrimerPair>,
    pub status: SearchStatus,
}

impl SearchOutcome {
    pub fn is_cancelled(&self) -> bool {
        self.status == SearchStatus::Cancelled
    }
}

/// Candidate primer before it is turned into a [`crate::Primer`].
/// `location` is 1-based on the strand the candidate was found on.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LitePrimer {
    tm: f64,
    location: ClosedRange<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Cancelled,
}

/// Exhaustive primer-pair search over a region of a DNA sequence.
///
/// A finder owns a [`CancellationToken`]; clone it with
/// [`PrimerPairFinder::cancellation_token`] to stop a search running on
/// another thread. Once cancelled the finder stays cancelled until
/// [`PrimerPairFinder::reset`].
#[derive(Debug, Default, Clone)]
pub struct PrimerPairFinder {
    cancellation: CancellationToken,
}

impl PrimerPairFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self { cancellation }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn reset(&self) {
        self.cancellation.reset();
    }

    pub fn find_primer_pairs(
        &self,
        sequence: &Sequence,
        search_range: ClosedRange<usize>,
        params: &SearchParameters,
    ) -> Result<SearchOutcome, PrimerError> {
        self.find_primer_pairs_with_progress(sequence, search_range, params, &NoProgress)
    }

    /// Search `search_range` (1-based, inclusive) of `sequence` for every primer
    /// pair satisfying `params`, in discovery order: forward candidates outer,
    /// reverse candidates inner, each ordered by run, length, then start.
    pub fn find_primer_pairs_with_progress(
        &self,
        sequence: &Sequence,
        search_range: ClosedRange<usize>,
        params: &SearchParameters,
        progress: &dyn ProgressSink,
    ) -> Result<SearchOutcome, PrimerError> {
        check_preconditions(sequence, search_range, params)?;

        let mut search = Search::new(sequence, search_range, params, progress, &self.cancellation);
        let status = match search.run()? {
            Flow::Continue => SearchStatus::Completed,
            Flow::Cancelled => SearchStatus::Cancelled,
        };

        match status {
            SearchStatus::Completed => info!(
                "primer search on '{}' {} finished with {} pairs",
                sequence.name,
                search_range,
                search.pairs.len()
            ),
            SearchStatus::Cancelled => info!(
                "primer search on '{}' {} cancelled after {} pairs",
                sequence.name,
                search_range,
                search.pairs.len()
            ),
        }

        Ok(SearchOutcome {
            pairs: search.pairs,
            status,
        })
    }
}

fn check_preconditions(
    sequence: &Sequence,
    search_range: ClosedRange<usize>,
    params: &SearchParameters,
) -> Result<(), PrimerError> {
    let invalid = |message: String| Err(PrimerError::InvalidArgument(message));

    if sequence.is_empty() {
        return invalid(format!("sequence '{}' is empty", sequence.name));
    }
    if sequence.grammar() != Grammar::Dna {
        return invalid(format!(
            "sequence '{}' has {} grammar, DNA required",
            sequence.name,
            sequence.grammar()
        ));
    }
    if sequence.has_gaps() {
        return invalid(format!("sequence '{}' contains gaps", sequence.name));
    }
    if !search_range.is_normal() || search_range.begin < 1 || search_range.end > sequence.len() {
        return invalid(format!(
            "search range {} is not within 1..{}",
            search_range,
            sequence.len()
        ));
    }

    params.validate()?;

    if params.amplicon_length_range.end > search_range.length() {
        return invalid(format!(
            "maximum amplicon size {} exceeds the search range length {}",
            params.amplicon_length_range.end,
            search_range.length()
        ));
    }
    if params.sodium_concentration <= 0.0 || params.primer_dna_concentration <= 0.0 {
        return invalid("sodium and primer DNA concentrations must be positive".to_string());
    }
    Ok(())
}

/// Maximal stretches of unambiguous bases inside `range`, 1-based.
fn acgt_runs(sequence: &Sequence, range: ClosedRange<usize>) -> Vec<ClosedRange<usize>> {
    let mut runs = Vec::new();
    let mut start = None;
    for position in range.begin..=range.end {
        let base = sequence.as_bytes()[position - 1];
        match (is_acgt(base), start) {
            (true, None) => start = Some(position),
            (false, Some(begin)) => {
                runs.push(ClosedRange::new(begin, position - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(begin) = start {
        runs.push(ClosedRange::new(begin, range.end));
    }
    runs
}

struct StrandView<'s> {
    residues: &'s Sequence,
    enzyme_site: &'s str,
    terminal_pattern: Option<&'s DnaPattern>,
}

struct Search<'a> {
    sequence: &'a Sequence,
    reverse: Sequence,
    search_range: ClosedRange<usize>,
    params: &'a SearchParameters,
    progress: &'a dyn ProgressSink,
    cancellation: &'a CancellationToken,
    forward_candidates: Vec<LitePrimer>,
    reverse_candidates: Vec<LitePrimer>,
    pairs: Vec<PrimerPair>,
}

impl<'a> Search<'a> {
    fn new(
        sequence: &'a Sequence,
        search_range: ClosedRange<usize>,
        params: &'a SearchParameters,
        progress: &'a dyn ProgressSink,
        cancellation: &'a CancellationToken,
    ) -> Self {
        Self {
            sequence,
            reverse: sequence.reverse_complement(),
            search_range,
            params,
            progress,
            cancellation,
            forward_candidates: Vec::new(),
            reverse_candidates: Vec::new(),
            pairs: Vec::new(),
        }
    }

    fn cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    fn run(&mut self) -> Result<Flow, PrimerError> {
        if self.cancelled() {
            return Ok(Flow::Cancelled);
        }
        if self.discover_candidates()? == Flow::Cancelled {
            return Ok(Flow::Cancelled);
        }
        self.pair_candidates()
    }

    /// Last run-relative start a primer may take: the region must still hold
    /// the shortest amplicon after it.
    fn absolute_max_primer_start(&self) -> usize {
        self.search_range.length() + 1 - self.params.amplicon_length_range.begin
    }

    fn starts_to_examine(&self, run: &ClosedRange<usize>, primer_length: usize) -> usize {
        self.absolute_max_primer_start()
            .min(run.length().saturating_sub(primer_length))
    }

    fn discover_candidates(&mut self) -> Result<Flow, PrimerError> {
        let primer_lengths = self.params.primer_length_range;
        let runs: Vec<_> = acgt_runs(self.sequence, self.search_range)
            .into_iter()
            .filter(|run| run.length() >= primer_lengths.begin)
            .collect();
        debug!(
            "{} runs of at least {} unambiguous bases in {}",
            runs.len(),
            primer_lengths.begin,
            self.search_range
        );

        // Both strands examine the same number of starts per run.
        let per_strand: usize = runs
            .iter()
            .map(|run| {
                (primer_lengths.begin..=primer_lengths.end)
                    .map(|length| self.starts_to_examine(run, length))
                    .sum::<usize>()
            })
            .sum();
        let end = 4 * per_strand as u64;
        let mut current = 0u64;

        let sequence_length = self.sequence.len();
        for run in &runs {
            let mirrored = ClosedRange::new(
                sequence_length - run.end + 1,
                sequence_length - run.begin + 1,
            );
            for (strand_run, is_forward) in [(*run, true), (mirrored, false)] {
                let view = if is_forward {
                    StrandView {
                        residues: self.sequence,
                        enzyme_site: self.params.forward_enzyme_site(),
                        terminal_pattern: self.params.forward_terminal_pattern.as_ref(),
                    }
                } else {
                    StrandView {
                        residues: &self.reverse,
                        enzyme_site: self.params.reverse_enzyme_site(),
                        terminal_pattern: self.params.reverse_terminal_pattern.as_ref(),
                    }
                };

                for length in primer_lengths.begin..=primer_lengths.end {
                    let starts = self.starts_to_examine(run, length);
                    let mut found = Vec::new();
                    for offset in 1..=starts {
                        if self.cancelled() {
                            return Ok(Flow::Cancelled);
                        }
                        let begin = strand_run.begin + offset - 1;
                        let location = ClosedRange::new(begin, begin + length - 1);
                        if let Some(tm) = self.evaluate_candidate(&view, location)? {
                            found.push(LitePrimer { tm, location });
                        }
                    }
                    if is_forward {
                        self.forward_candidates.extend(found);
                    } else {
                        self.reverse_candidates.extend(found);
                    }

                    current += starts as u64;
                    self.progress.report(Progress { current, end });
                }
            }
        }

        debug!(
            "{} forward and {} reverse candidate primers",
            self.forward_candidates.len(),
            self.reverse_candidates.len()
        );
        Ok(Flow::Continue)
    }

    /// Melting temperature of the candidate at `location` on the strand, or
    /// `None` when it fails a per-primer filter.
    fn evaluate_candidate(
        &self,
        view: &StrandView<'_>,
        location: ClosedRange<usize>,
    ) -> Result<Option<f64>, PrimerError> {
        let core_str = &view.residues.as_str()[location.begin - 1..location.end];
        let core = core_str.as_bytes();

        if let Some(pattern) = view.terminal_pattern {
            let matched = if view.enzyme_site.is_empty() {
                pattern.matches_suffix(core_str)
            } else {
                pattern.matches_suffix(&format!("{}{}", view.enzyme_site, core_str))
            };
            if !matched {
                return Ok(None);
            }
        }

        let tm = thermo::melting_temperature(
            core,
            self.params.sodium_concentration,
            self.params.primer_dna_concentration,
        )?;
        if !self.params.individual_primer_tm_range.contains(tm) {
            return Ok(None);
        }

        // A primer must bind exactly one site on either strand.
        let occurrences = count_matches(self.sequence.as_bytes(), core, Some(2))
            + count_matches(self.reverse.as_bytes(), core, Some(2));
        if occurrences != 1 {
            return Ok(None);
        }

        Ok(Some(tm))
    }

    fn pair_candidates(&mut self) -> Result<Flow, PrimerError> {
        let forward_count = self.forward_candidates.len() as u64;
        let reverse_count = self.reverse_candidates.len() as u64;
        let combinations = forward_count * reverse_count;
        if combinations == 0 {
            debug!("no forward/reverse candidate combinations to pair");
            self.progress.report(Progress { current: 1, end: 1 });
            return Ok(Flow::Continue);
        }
        let end = 2 * combinations;
        let mut current = combinations;
        self.progress.report(Progress { current, end });

        let factory = PrimerFactory::new(Arc::new(self.params.clone()));
        let amplicon_lengths = self.params.amplicon_length_range;
        let max_delta_tm = self.params.maximum_primer_pair_delta_tm;
        let sequence_length = self.sequence.len();

        for forward in &self.forward_candidates {
            for reverse in &self.reverse_candidates {
                if self.cancellation.is_cancelled() {
                    return Ok(Flow::Cancelled);
                }

                if (forward.tm - reverse.tm).abs() > max_delta_tm {
                    continue;
                }

                let sense = ClosedRange::new(
                    sequence_length - reverse.location.end + 1,
                    sequence_length - reverse.location.begin + 1,
                );

                let Some(amplicon_length) = (sense.end + 1).checked_sub(forward.location.begin)
                else {
                    continue;
                };
                if !amplicon_lengths.contains(amplicon_length) {
                    continue;
                }

                if forward.location.end >= sense.begin {
                    continue;
                }

                let ordinal = self.pairs.len() + 1;
                let forward_core = self.sequence.subsequence(forward.location)?;
                let reverse_core = reverse_complement(self.sequence.subsequence(sense)?.as_str());
                let forward_primer =
                    factory.make_forward(format!("F{}", ordinal), forward_core.as_str(), forward.tm)?;
                let reverse_primer =
                    factory.make_reverse(format!("R{}", ordinal), &reverse_core, reverse.tm)?;
                self.pairs.push(factory.make_pair(forward_primer, reverse_primer));
            }

            current += reverse_count;
            self.progress.report(Progress { current, end });
        }

        Ok(Flow::Continue)
    }
}
