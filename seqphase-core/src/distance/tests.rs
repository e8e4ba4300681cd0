use super::*;
use proptest::prelude::*;

fn enc(s: &[u8]) -> Vec<u8> {
    encode_sites(s, SeqAlphabet::Nucleotide).unwrap()
}

fn jc(a: &[u8], b: &[u8]) -> f64 {
    jc69_distance(&enc(a), &enc(b), None, None, None).unwrap()
}

fn expected_jc(p: f64) -> f64 {
    -0.75 * (1.0 - 4.0 * p / 3.0).ln()
}

fn alignment(rows: &[&[u8]]) -> Alignment {
    let mut al = Alignment::new(SeqAlphabet::Nucleotide);
    for (i, row) in rows.iter().enumerate() {
        al.add_sequence(format!("s{i}"), row.to_vec(), None).unwrap();
    }
    al
}

// ─── pairwise formula ───────────────────────────────────────

#[test]
fn identical_is_zero() {
    assert_eq!(jc(b"ACGTACGT", b"ACGTACGT"), 0.0);
}

#[test]
fn jc69_small() {
    // p = 0.1
    let d = jc(b"AAAAAAAAAA", b"TAAAAAAAAA");
    assert!((d - expected_jc(0.1)).abs() < 1e-10);
}

#[test]
fn saturated_is_clamped_to_zero() {
    // p = 1
    assert_eq!(jc(b"AAAAA", b"TTTTT"), 0.0);
    // p = 0.75, b = 0
    assert_eq!(jc(b"AAAA", b"TTTA"), 0.0);
}

#[test]
fn gaps_and_ambiguity_are_skipped() {
    assert_eq!(jc(b"ACGT", b"A-GT"), 0.0);
    assert_eq!(jc(b"ACGTN", b"ACGTA"), 0.0);
    // 1 difference over the 4 comparable sites
    let d = jc(b"ACGTA", b"A-GTT");
    assert!((d - expected_jc(0.25)).abs() < 1e-10);
}

#[test]
fn weighted_sites() {
    let weights = [1.0, 1.0, 1.0, 3.0];
    let d = jc69_distance(&enc(b"AAAA"), &enc(b"AAAT"), None, Some(&weights), None).unwrap();
    assert!((d - expected_jc(0.5)).abs() < 1e-10);
}

#[test]
fn selected_sites_only() {
    let selected = [true, true, false, false];
    let d = jc69_distance(&enc(b"AAAA"), &enc(b"AATT"), Some(&selected), None, None).unwrap();
    assert_eq!(d, 0.0);
}

#[test]
fn gamma_correction() {
    let alpha = 1.0;
    let d = jc69_distance(
        &enc(b"AAAAAAAAAA"),
        &enc(b"TAAAAAAAAA"),
        None,
        None,
        Some(alpha),
    )
    .unwrap();
    let b: f64 = 1.0 - 4.0 * 0.1 / 3.0;
    let expected = 0.75 * alpha * (b.powf(-1.0 / alpha) - 1.0);
    assert!((d - expected).abs() < 1e-10);
    assert!(d > expected_jc(0.1));
}

#[test]
fn no_valid_sites_fails() {
    let err = jc69_distance(&enc(b"NNN"), &enc(b"ACG"), None, None, None).unwrap_err();
    assert!(matches!(err, BioError::NoValidSites));
}

#[test]
fn length_mismatch_fails() {
    assert!(jc69_distance(&enc(b"ACG"), &enc(b"ACGT"), None, None, None).is_err());
    assert!(jc69_distance(&enc(b"ACG"), &enc(b"ACG"), None, Some(&[1.0]), None).is_err());
}

#[test]
fn invalid_gamma_fails() {
    let err = jc69_distance(&enc(b"ACG"), &enc(b"ACG"), None, None, Some(0.0)).unwrap_err();
    assert!(matches!(err, BioError::InvalidParameter { .. }));
}

// ─── alignment model ────────────────────────────────────────

#[test]
fn model_removes_gapped_columns() {
    let al = alignment(&[b"ACGTA", b"AC-TT", b"ACGTT"]);
    let mut model = Jc69::new(true);
    model.init(&al, None).unwrap();
    assert_eq!(model.num_sites(), 4);
    assert_eq!(model.selected_sites(), &[true, true, false, true, true]);
    let d = model.distance(0, 2).unwrap();
    assert!((d - expected_jc(0.25)).abs() < 1e-10);
}

#[test]
fn model_keeps_gapped_columns() {
    let al = alignment(&[b"ACGTA", b"AC-TT", b"ACGTT"]);
    let mut model = Jc69::new(false);
    model.init(&al, None).unwrap();
    assert_eq!(model.num_sites(), 5);
    let d = model.distance(0, 2).unwrap();
    assert!((d - expected_jc(0.2)).abs() < 1e-10);
    // the gap is still skipped pairwise
    let d = model.distance(0, 1).unwrap();
    assert!((d - expected_jc(0.25)).abs() < 1e-10);
}

#[test]
fn model_zero_weight_columns_are_dropped() {
    let al = alignment(&[b"AAAA", b"AAAT"]);
    let mut model = Jc69::new(false);
    model.init(&al, Some(&[1.0, 1.0, 1.0, 0.0])).unwrap();
    assert_eq!(model.num_sites(), 3);
    assert_eq!(model.distance(0, 1).unwrap(), 0.0);
}

#[test]
fn model_gamma() {
    let al = alignment(&[b"AAAAAAAAAA", b"TAAAAAAAAA"]);
    let mut plain = Jc69::new(false);
    plain.init(&al, None).unwrap();
    let mut gamma = Jc69::new(false).with_gamma(0.5);
    gamma.init(&al, None).unwrap();
    assert!(gamma.distance(0, 1).unwrap() > plain.distance(0, 1).unwrap());
}

#[test]
fn model_rejects_bad_input() {
    let mut model = Jc69::new(true);
    assert!(model.sequence(0).is_err());

    let mut al = Alignment::new(SeqAlphabet::AminoAcid);
    al.add_sequence("p", b"MKLV".to_vec(), None).unwrap();
    assert!(matches!(
        model.init(&al, None),
        Err(BioError::NotNucleotide { .. })
    ));
}

// ─── properties ─────────────────────────────────────────────

proptest! {
    #[test]
    fn self_distance_is_zero(seq in "[ACGT]{1,200}") {
        let codes = enc(seq.as_bytes());
        prop_assert_eq!(jc69_distance(&codes, &codes, None, None, None).unwrap(), 0.0);
        prop_assert_eq!(jc69_distance(&codes, &codes, None, None, Some(0.7)).unwrap(), 0.0);
    }

    #[test]
    fn distance_is_never_negative(a in "[ACGT]{20}", b in "[ACGT]{20}") {
        let d = jc69_distance(&enc(a.as_bytes()), &enc(b.as_bytes()), None, None, None).unwrap();
        prop_assert!(d >= 0.0);
        prop_assert!(d.is_finite());
    }
}
