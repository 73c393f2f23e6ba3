use std::cell::{Cell, RefCell};
use std::sync::mpsc::channel;
use std::thread;

use oligo_core::{ClosedRange, DnaPattern, RestrictionEnzyme, Sequence, Strand};
use oligo_primers::{PrimerPair, PrimerPairFinder, Progress, SearchParameters, SearchStatus};
use pretty_assertions::assert_eq;

const TARGET_400: &str = include_str!("fixtures/target_400.txt");
const SINGLE_PAIR_PARAMS: &str = include_str!("fixtures/single_pair_params.json");

// Each island is one base longer than the 20 bp core expected from it: a run
// of plain bases only offers starts 1..=run length - primer length, so the
// window flush with the end of a run is never a candidate.
const FORWARD_SITE: &str = "GTGCTACGTACAATATATGAT";
const REVERSE_SITE: &str = "CTGAAGGATATAGCGATTAAA";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Two 21 bp islands of plain bases in an N background.
fn single_pair_target() -> Sequence {
    let residues = format!(
        "{}{}{}{}{}",
        "N".repeat(10),
        FORWARD_SITE,
        "N".repeat(279),
        REVERSE_SITE,
        "N".repeat(29)
    );
    Sequence::dna("construct", residues).unwrap()
}

fn target_400() -> Sequence {
    Sequence::dna("target", TARGET_400.trim()).unwrap()
}

fn pcr_params() -> SearchParameters {
    SearchParameters {
        amplicon_length_range: ClosedRange::new(250, 350),
        primer_length_range: ClosedRange::new(18, 22),
        ..Default::default()
    }
}

fn summary(pairs: &[PrimerPair]) -> Vec<(String, String, f64, f64)> {
    pairs
        .iter()
        .map(|p| {
            (
                p.forward.core_sequence().to_string(),
                p.reverse.core_sequence().to_string(),
                p.forward.tm(),
                p.reverse.tm(),
            )
        })
        .collect()
}

#[test]
fn test_single_embedded_pair() {
    init_logging();
    let target = single_pair_target();
    assert_eq!(target.len(), 360);
    let params = SearchParameters::from_json(SINGLE_PAIR_PARAMS).unwrap();

    let outcome = PrimerPairFinder::new()
        .find_primer_pairs(&target, ClosedRange::new(1, 360), &params)
        .unwrap();

    assert_eq!(outcome.status, SearchStatus::Completed);
    assert_eq!(outcome.pairs.len(), 1);
    let pair = &outcome.pairs[0];
    assert_eq!(pair.forward.name(), "F1");
    assert_eq!(pair.reverse.name(), "R1");
    assert_eq!(pair.forward.core_sequence(), "GTGCTACGTACAATATATGA");
    assert_eq!(pair.reverse.core_sequence(), "TTTAATCGCTATATCCTTCA");
    assert!((pair.forward.tm() - 56.0650).abs() < 1e-3);
    assert!((pair.reverse.tm() - 55.2181).abs() < 1e-3);

    let forward_site = pair.forward.locate(&target).unwrap();
    assert_eq!(forward_site.location, ClosedRange::new(11, 30));
    assert_eq!(forward_site.strand, Strand::Forward);
    let reverse_site = pair.reverse.locate(&target).unwrap();
    assert_eq!(reverse_site.location, ClosedRange::new(312, 331));
    assert_eq!(reverse_site.strand, Strand::Reverse);
    assert_eq!(pair.amplicon_length(&target), Some(321));
}

#[test]
fn test_primer_binding_twice_is_never_used() {
    init_logging();
    let forward_core = "GTGCTACGTACAATATATGA";
    let mut residues = single_pair_target().as_str().to_string();
    // Second binding site for the forward primer, on the other strand.
    residues.replace_range(149..169, &oligo_core::operations::reverse_complement(forward_core));
    let target = Sequence::dna("duplicated", residues).unwrap();
    assert_eq!(target.len(), 360);

    let outcome = PrimerPairFinder::new()
        .find_primer_pairs(&target, ClosedRange::new(1, 360), &pcr_params())
        .unwrap();

    assert_eq!(outcome.status, SearchStatus::Completed);
    assert!(outcome.pairs.is_empty());
    for pair in &outcome.pairs {
        assert_ne!(pair.forward.core_sequence(), forward_core);
    }
}

#[test]
fn test_deserialized_lowercase_target_keeps_uniqueness_filter() {
    let mut residues = single_pair_target().as_str().to_string();
    residues.replace_range(
        149..169,
        &oligo_core::operations::reverse_complement("GTGCTACGTACAATATATGA"),
    );
    let json = serde_json::json!({
        "name": "duplicated",
        "sequence": residues.to_ascii_lowercase(),
    });
    let target: Sequence = serde_json::from_value(json).unwrap();
    assert_eq!(target.as_str(), residues);

    let outcome = PrimerPairFinder::new()
        .find_primer_pairs(&target, ClosedRange::new(1, 360), &pcr_params())
        .unwrap();
    assert_eq!(outcome.status, SearchStatus::Completed);
    assert!(outcome.pairs.is_empty());
}

#[test]
fn test_pairs_respect_constraints() {
    init_logging();
    let target = target_400();
    let params = pcr_params();

    let outcome = PrimerPairFinder::new()
        .find_primer_pairs(&target, ClosedRange::new(1, 400), &params)
        .unwrap();

    assert_eq!(outcome.pairs.len(), 21707);
    let first = &outcome.pairs[0];
    assert_eq!(first.forward.core_sequence(), "CTGCTGTCGGACTCCTAG");
    assert_eq!(first.reverse.core_sequence(), "ATTCTATGTCAAGGCTGC");

    for pair in &outcome.pairs {
        assert!(pair.delta_tm() <= params.maximum_primer_pair_delta_tm);
        assert!(params.individual_primer_tm_range.contains(pair.forward.tm()));
        assert!(params.individual_primer_tm_range.contains(pair.reverse.tm()));
        assert!(params.primer_length_range.contains(pair.forward.length()));
        assert!(params.primer_length_range.contains(pair.reverse.length()));

        let forward = pair.forward.locate(&target).unwrap();
        let reverse = pair.reverse.locate(&target).unwrap();
        assert_eq!(forward.strand, Strand::Forward);
        assert_eq!(reverse.strand, Strand::Reverse);
        assert!(forward.location.end < reverse.location.begin);

        let amplicon = reverse.location.end - forward.location.begin + 1;
        assert!(params.amplicon_length_range.contains(amplicon), "{}", amplicon);
        assert_eq!(pair.amplicon_length(&target), Some(amplicon));
    }
}

#[test]
fn test_search_is_deterministic() {
    let target = target_400();
    let params = SearchParameters {
        amplicon_length_range: ClosedRange::new(300, 350),
        ..pcr_params()
    };
    let finder = PrimerPairFinder::new();
    let first = finder
        .find_primer_pairs(&target, ClosedRange::new(1, 400), &params)
        .unwrap();
    let second = finder
        .find_primer_pairs(&target, ClosedRange::new(1, 400), &params)
        .unwrap();
    assert_eq!(first.pairs.len(), 6479);
    assert_eq!(summary(&first.pairs), summary(&second.pairs));
}

#[test]
fn test_terminal_patterns_and_enzymes() {
    let target = target_400();
    let params = SearchParameters {
        forward_terminal_pattern: Some(DnaPattern::new("WW").unwrap()),
        ..pcr_params()
    };
    let outcome = PrimerPairFinder::new()
        .find_primer_pairs(&target, ClosedRange::new(1, 400), &params)
        .unwrap();
    assert_eq!(outcome.pairs.len(), 4474);
    for pair in &outcome.pairs {
        let core = pair.forward.core_sequence();
        assert!(core.ends_with('A') || core.ends_with('T'), "{}", core);
    }

    let params = SearchParameters {
        reverse_terminal_pattern: Some(DnaPattern::new("SS").unwrap()),
        reverse_restriction_enzyme: Some(RestrictionEnzyme::new("BamHI", "G^GATCC").unwrap()),
        ..pcr_params()
    };
    let outcome = PrimerPairFinder::new()
        .find_primer_pairs(&target, ClosedRange::new(1, 400), &params)
        .unwrap();
    assert_eq!(outcome.pairs.len(), 5659);
    let pair = &outcome.pairs[0];
    assert!(pair.forward.restriction_enzyme().is_none());
    assert_eq!(pair.reverse.restriction_enzyme().unwrap().name(), "BamHI");
    assert!(pair.reverse.sequence().starts_with("GGATCC"));
    assert!(pair.reverse.sequence().ends_with(pair.reverse.core_sequence()));
}

#[test]
fn test_cancel_before_search_returns_nothing() {
    let target = target_400();
    assert_eq!(target.len(), 400);
    let finder = PrimerPairFinder::new();
    finder.cancel();

    let outcome = finder
        .find_primer_pairs(&target, ClosedRange::new(1, 400), &SearchParameters::default())
        .unwrap();
    assert!(outcome.pairs.is_empty());
    assert_eq!(outcome.status, SearchStatus::Cancelled);
}

#[test]
fn test_cancel_during_pairing_keeps_partial_result() {
    let target = target_400();
    let finder = PrimerPairFinder::new();
    let token = finder.cancellation_token();
    // Stop as soon as the first forward candidate has been paired.
    let sink = move |progress: Progress| {
        if progress.current > progress.end / 2 {
            token.cancel();
        }
    };

    let outcome = finder
        .find_primer_pairs_with_progress(&target, ClosedRange::new(1, 400), &pcr_params(), &sink)
        .unwrap();

    assert!(outcome.is_cancelled());
    assert_eq!(outcome.pairs.len(), 204);
    assert!(outcome
        .pairs
        .iter()
        .all(|p| p.forward.core_sequence() == "CTGCTGTCGGACTCCTAG"));
}

#[test]
fn test_cancel_during_candidate_discovery() {
    let target = target_400();
    let finder = PrimerPairFinder::new();
    let token = finder.cancellation_token();
    let ticks = Cell::new(0);
    let sink = |_: Progress| {
        ticks.set(ticks.get() + 1);
        token.cancel();
    };

    let outcome = finder
        .find_primer_pairs_with_progress(&target, ClosedRange::new(1, 400), &pcr_params(), &sink)
        .unwrap();

    assert_eq!(outcome.status, SearchStatus::Cancelled);
    assert!(outcome.pairs.is_empty());
    assert_eq!(ticks.get(), 1);
}

#[test]
fn test_progress_completes_when_nothing_pairs() {
    let target = target_400();
    let params = SearchParameters {
        individual_primer_tm_range: ClosedRange::new(90.0, 95.0),
        ..pcr_params()
    };
    let ticks = RefCell::new(Vec::new());
    let sink = |progress: Progress| ticks.borrow_mut().push(progress);

    let outcome = PrimerPairFinder::new()
        .find_primer_pairs_with_progress(&target, ClosedRange::new(1, 400), &params, &sink)
        .unwrap();

    assert_eq!(outcome.status, SearchStatus::Completed);
    assert!(outcome.pairs.is_empty());
    let ticks = ticks.into_inner();
    for window in ticks.windows(2) {
        assert!(window[1].fraction() >= window[0].fraction(), "{:?}", window);
    }
    assert_eq!(ticks.last(), Some(&Progress { current: 1, end: 1 }));
}

#[test]
fn test_progress_from_worker_thread() {
    let target = target_400();
    let params = pcr_params();
    let finder = PrimerPairFinder::new();
    let (tx, rx) = channel();

    let worker = thread::spawn(move || {
        finder.find_primer_pairs_with_progress(&target, ClosedRange::new(1, 400), &params, &tx)
    });
    let outcome = worker.join().unwrap().unwrap();
    let ticks: Vec<Progress> = rx.iter().collect();

    assert_eq!(outcome.status, SearchStatus::Completed);
    assert!(!ticks.is_empty());

    let mut ends: Vec<u64> = ticks.iter().map(|t| t.end).collect();
    ends.dedup();
    assert_eq!(ends.len(), 2, "end changes exactly once");

    for window in ticks.windows(2) {
        assert!(window[1].fraction() >= window[0].fraction());
    }

    let last = ticks.last().unwrap();
    assert_eq!(last.current, last.end);
    // Phase two covers every forward/reverse combination.
    assert_eq!(last.end, 2 * 255 * 302);
}

#[test]
fn test_finder_can_move_between_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PrimerPairFinder>();
    assert_send_sync::<oligo_primers::CancellationToken>();
}
