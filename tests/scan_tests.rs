use assert_approx_eq::assert_approx_eq;
use motif_features::error::MotifError;
use motif_features::library::PwmLibrary;
use motif_features::scan::{score_sequence, select_top_k, MotifScanEngine, PairOutcome};
use motif_features::types::{MotifEntry, MotifScore, Pwm, Sequence};

/// PWM scoring 1 for each base matching `consensus`, 0 otherwise
fn consensus_pwm(consensus: &str) -> Pwm {
    let rows: Vec<[f64; 4]> = consensus
        .chars()
        .map(|base| {
            let mut row = [0.0; 4];
            row["ACGT".find(base).unwrap()] = 1.0;
            row
        })
        .collect();
    Pwm::new(&rows).unwrap()
}

fn library(entries: &[(&str, &str)]) -> PwmLibrary {
    PwmLibrary::from_entries(
        entries
            .iter()
            .map(|(id, consensus)| MotifEntry::new(*id, consensus_pwm(consensus))),
    )
    .unwrap()
}

#[test]
fn test_single_window_score() {
    let pwm = Pwm::new(&[[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0]]).unwrap();
    match score_sequence(&Sequence::new("s", "AC"), &pwm) {
        PairOutcome::Scored(score) => assert_approx_eq!(score, 2.0),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_sliding_window_keeps_maximum() {
    let pwm = Pwm::new(&[[0.5, -1.0, 0.0, 0.0], [-0.5, 2.0, 0.0, 0.25]]).unwrap();
    // windows: AT = 0.75, TA = -0.5, AC = 2.5, CA = -1.5
    match score_sequence(&Sequence::new("s", "ATACA"), &pwm) {
        PairOutcome::Scored(score) => assert_approx_eq!(score, 2.5),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_pair_outcomes() {
    let pwm = consensus_pwm("ACGT");

    assert!(matches!(
        score_sequence(&Sequence::new("s", "ACG"), &pwm),
        PairOutcome::Skipped(MotifError::SequenceTooShort {
            sequence_length: 3,
            motif_length: 4
        })
    ));
    assert!(matches!(
        score_sequence(&Sequence::new("s", "ACGTNA"), &pwm),
        PairOutcome::Failed(MotifError::InvalidNucleotide {
            position: 4,
            base: 'N'
        })
    ));
    assert!(matches!(
        score_sequence(&Sequence::new("s", "acgt"), &pwm),
        PairOutcome::Failed(MotifError::InvalidNucleotide { position: 0, .. })
    ));
}

#[test]
fn test_engine_rejects_zero_top_k() {
    assert!(matches!(
        MotifScanEngine::new(0),
        Err(MotifError::InvalidParameter { .. })
    ));
}

#[test]
fn test_scan_end_to_end() {
    let sequences = vec![
        Sequence::new("s1", "ACGTACGT"),
        Sequence::new("s2", "TTTTACGT"),
    ];
    let report = MotifScanEngine::new(5)
        .unwrap()
        .scan(&sequences, &library(&[("m1", "ACGT")]))
        .unwrap();

    assert_approx_eq!(report.scores.get("s1", "m1").unwrap(), 4.0);
    assert_approx_eq!(report.scores.get("s2", "m1").unwrap(), 4.0);
    assert_eq!(report.top_k_for("s1")[0].motif_id, "m1");
    assert_eq!(report.top_k_for("s2")[0].motif_id, "m1");
    assert!(report.diagnostics.is_empty());
    assert!(report.skipped_motifs.is_empty());
}

#[test]
fn test_invalid_nucleotide_is_contained() {
    let sequences = vec![
        Sequence::new("good", "ACGTAC"),
        Sequence::new("bad", "ACNTAC"),
        Sequence::new("tiny", "A"),
    ];
    let lib = library(&[("m2", "AC"), ("m7", "ACGTACG")]);
    let report = MotifScanEngine::new(3).unwrap().scan(&sequences, &lib).unwrap();

    assert_approx_eq!(report.scores.get("good", "m2").unwrap(), 2.0);
    assert!(report.scores.get("bad", "m2").is_none());
    assert!(report.scores.get("good", "m7").is_none());

    // only the (bad, m2) pair fails; every other unscored pair is too short
    assert_eq!(report.diagnostics.len(), 1);
    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.motif_id.as_deref(), Some("m2"));
    assert_eq!(diagnostic.sequence_id.as_deref(), Some("bad"));
    assert!(matches!(
        diagnostic.error,
        MotifError::InvalidNucleotide {
            position: 2,
            base: 'N'
        }
    ));
    assert_eq!(report.short_pairs, 4);
    assert!(report.top_k_for("bad").is_empty());
    assert!(report.top_k_for("tiny").is_empty());
}

#[test]
fn test_unavailable_motif_is_skipped() {
    let mut lib = library(&[("m1", "AC")]);
    lib.mark_unavailable("gone").unwrap();
    lib.insert("m3", consensus_pwm("GT")).unwrap();

    let sequences = vec![Sequence::new("s", "ACGT")];
    let report = MotifScanEngine::new(5).unwrap().scan(&sequences, &lib).unwrap();

    assert_eq!(report.skipped_motifs, vec!["gone".to_string()]);
    assert_eq!(report.diagnostics.len(), 1);
    assert!(report.diagnostics[0].sequence_id.is_none());
    assert!(matches!(
        report.diagnostics[0].error,
        MotifError::MotifUnavailable(ref id) if id == "gone"
    ));
    assert_eq!(report.scores.for_sequence("s").len(), 2);
}

#[test]
fn test_top_k_length_and_order() {
    let lib = library(&[
        ("a", "A"),
        ("ac", "AC"),
        ("acg", "ACG"),
        ("acgt", "ACGT"),
        ("g", "G"),
    ]);
    let sequences = vec![
        Sequence::new("long", "ACGTT"),
        Sequence::new("short", "ACG"),
    ];
    let report = MotifScanEngine::new(3).unwrap().scan(&sequences, &lib).unwrap();

    for seq in &sequences {
        let scored = report.scores.for_sequence(&seq.id).len();
        let top = report.top_k_for(&seq.id);
        assert_eq!(top.len(), scored.min(3));
        assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
    }

    let ids: Vec<&str> = report
        .top_k_for("long")
        .iter()
        .map(|m| m.motif_id.as_str())
        .collect();
    assert_eq!(ids, vec!["acgt", "acg", "ac"]);

    // "a" and "g" tie at 1.0 for the last slot; "a" was evaluated first
    let ids: Vec<&str> = report
        .top_k_for("short")
        .iter()
        .map(|m| m.motif_id.as_str())
        .collect();
    assert_eq!(ids, vec!["acg", "ac", "a"]);
}

#[test]
fn test_select_top_k_ties_keep_input_order() {
    let scores: Vec<MotifScore> = [("zeta", 1.0), ("alpha", 3.0), ("beta", 1.0), ("gamma", 3.0)]
        .into_iter()
        .map(|(id, score)| MotifScore {
            motif_id: id.to_string(),
            score,
        })
        .collect();

    let selected = select_top_k(&scores, 3);
    let top: Vec<&str> = selected.iter().map(|m| m.motif_id.as_str()).collect();
    assert_eq!(top, vec!["alpha", "gamma", "zeta"]);
    assert_eq!(select_top_k(&scores, 10).len(), 4);
}

#[test]
fn test_scan_is_deterministic() {
    let lib = library(&[("m1", "ACG"), ("m2", "CGT"), ("m3", "TTT"), ("m4", "GTA")]);
    let sequences = vec![
        Sequence::new("s1", "ACGTACGTTT"),
        Sequence::new("s2", "TTTGTAACG"),
        Sequence::new("s3", "GG"),
    ];
    let engine = MotifScanEngine::new(2).unwrap();
    let first = engine.scan(&sequences, &lib).unwrap();
    let second = engine.scan(&sequences, &lib).unwrap();

    assert_eq!(first.scores, second.scores);
    assert_eq!(first.selections, second.selections);
}

#[test]
fn test_scan_rejects_duplicate_sequence_ids() {
    let sequences = vec![Sequence::new("s", "ACGT"), Sequence::new("s", "TTTT")];
    let result = MotifScanEngine::new(5)
        .unwrap()
        .scan(&sequences, &library(&[("m1", "ACGT")]));
    assert!(matches!(result, Err(MotifError::DuplicateSequence(id)) if id == "s"));
}

#[test]
fn test_encode_reports_first_invalid_base() {
    assert_eq!(Sequence::new("s", "ACGT").encode().unwrap(), vec![0, 1, 2, 3]);
    assert!(matches!(
        Sequence::new("s", "ACXGN").encode(),
        Err(MotifError::InvalidNucleotide {
            position: 2,
            base: 'X'
        })
    ));
}
