use super::*;
use crate::alphabets::{detect_alphabet, SeqAlphabet};
use crate::error::BioError;
use crate::seq::Alignment;
use proptest::prelude::*;

fn format_error(data: &[u8]) -> (usize, String) {
    match parse_bytes(data) {
        Err(BioError::PhylipFormat { msg, line }) => (line, msg),
        Err(other) => panic!("expected phylip format error, got {other:?}"),
        Ok(al) => panic!("expected phylip format error, parsed {} sequences", al.len()),
    }
}

fn rows(al: &Alignment) -> Vec<(&str, &[u8])> {
    al.iter().map(|s| (s.name(), s.as_bytes())).collect()
}

// ─── parsing ────────────────────────────────────────────────

#[test]
fn parse_single_block() {
    let al = parse_bytes(b"  2   12\nseq1  ATGCCCGGGT AA\nseq2  ATGCCAGGGT AA\n").unwrap();
    assert_eq!(al.alphabet(), SeqAlphabet::Nucleotide);
    assert_eq!(al.length(), 12);
    assert_eq!(
        rows(&al),
        vec![
            ("seq1", &b"ATGCCCGGGTAA"[..]),
            ("seq2", &b"ATGCCAGGGTAA"[..])
        ]
    );
}

#[test]
fn parse_interleaved_blocks() {
    let data = b"2 14\n\
a  ACGTACGTAC\n\
b  TTTTTTTTTT\n\
\n\
ACGT\n\
  TTTT\n";
    let al = parse_bytes(data).unwrap();
    assert_eq!(
        rows(&al),
        vec![("a", &b"ACGTACGTACACGT"[..]), ("b", &b"TTTTTTTTTTTTTT"[..])]
    );
}

#[test]
fn parse_blocks_without_blank_line_and_crlf() {
    let data = b"2 8\r\na ACGT\r\nb TTTT\r\nACGT\r\nTTTT";
    let al = parse_bytes(data).unwrap();
    assert_eq!(
        rows(&al),
        vec![("a", &b"ACGTACGT"[..]), ("b", &b"TTTTTTTT"[..])]
    );
}

#[test]
fn numeric_names_and_trailing_blank_lines() {
    let al = parse_bytes(b"1 4\n42 AC GT\n\n   \n\n").unwrap();
    assert_eq!(rows(&al), vec![("42", &b"ACGT"[..])]);
}

#[test]
fn amino_acid_alignment() {
    let al = parse_bytes(b"2 4\np1 MKLV\np2 MK-V\n").unwrap();
    assert_eq!(al.alphabet(), SeqAlphabet::AminoAcid);
}

#[test]
fn empty_header_yields_empty_alignment() {
    let al = parse_bytes(b"  0   0\n").unwrap();
    assert!(al.is_empty());
    let al = parse_bytes(b"3 0").unwrap();
    assert!(al.is_empty());
    assert_eq!(al.alphabet(), SeqAlphabet::Unknown);
}

// ─── rejections ─────────────────────────────────────────────

#[test]
fn rejects_missing_sequences() {
    let (line, msg) = format_error(b"3 4\na ACGT\nb ACGT\n");
    assert!(msg.contains("expected 3 sequences, found 2"), "{msg}");
    assert_eq!(line, 4);
}

#[test]
fn rejects_length_mismatch() {
    let (_, msg) = format_error(b"2 5\na ACGTA\nb ACGT\n");
    assert!(msg.contains("'b'"), "{msg}");
    assert!(msg.contains("4 symbols, expected 5"), "{msg}");

    let (_, msg) = format_error(b"2 5\na ACGT\nb ACGTA\n");
    assert!(msg.contains("'a'"), "{msg}");
}

#[test]
fn rejects_data_after_complete_sequences() {
    let (line, msg) = format_error(b"2 4\na ACGT\nb ACGT\n\nACGT\nACGT\n");
    assert!(msg.contains("unexpected data"), "{msg}");
    assert_eq!(line, 5);
}

#[test]
fn rejects_truncated_block() {
    let (_, msg) = format_error(b"2 8\na ACGT\nb ACGT\n\nACGT\n");
    assert!(msg.contains("block ends after 1 of 2"), "{msg}");

    let (line, msg) = format_error(b"2 8\na ACGT\nb ACGT\n\nACGT\n\nACGT\n");
    assert!(msg.contains("empty line"), "{msg}");
    assert_eq!(line, 6);
}

#[test]
fn rejects_bad_headers() {
    let (line, msg) = format_error(b"2\na ACGT\n");
    assert_eq!(line, 1);
    assert!(msg.contains("whitespace"), "{msg}");

    let (_, msg) = format_error(b"x 4\n");
    assert!(msg.contains("number of sequences"), "{msg}");

    let (_, msg) = format_error(b"2 4 5\n");
    assert!(msg.contains("end of header"), "{msg}");

    let (_, msg) = format_error(b"2 4x\n");
    assert!(msg.contains("alignment length"), "{msg}");

    let (_, msg) = format_error(b"99999999999999999999999 4\n");
    assert!(msg.contains("too large"), "{msg}");
}

#[test]
fn huge_header_counts_are_format_errors() {
    let (line, msg) = format_error(b"999999999999999999 4\n");
    assert!(msg.contains("expected 999999999999999999 sequences, found 0"), "{msg}");
    assert_eq!(line, 2);

    let (_, msg) = format_error(b"1 999999999999999999\na ACGT\n");
    assert!(msg.contains("4 symbols, expected 999999999999999999"), "{msg}");
}

#[test]
fn rejects_control_bytes_and_numbers_in_data() {
    let (line, msg) = format_error(b"1 4\na AC\x01T\n");
    assert_eq!(line, 2);
    assert!(msg.contains("0x01"), "{msg}");

    let (_, msg) = format_error(b"1 4\na AC 12\n");
    assert!(msg.contains("number '12'"), "{msg}");
}

#[test]
fn io_errors_propagate() {
    let err = read_phylip_from_path("/nonexistent/alignment.phy").unwrap_err();
    assert!(matches!(err, BioError::Io(_)));
}

// ─── writing ────────────────────────────────────────────────

#[test]
fn writer_layout() {
    let mut al = Alignment::new(SeqAlphabet::Nucleotide);
    al.add_sequence("a", vec![b'A'; 65], None).unwrap();
    al.add_sequence("bb", vec![b'C'; 65], None).unwrap();
    let text = write_phylip(&al).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "  2   65");
    assert_eq!(
        lines[1],
        format!("a  {}", vec!["AAAAAAAAAA"; 6].join(" "))
    );
    assert!(lines[2].starts_with("bb  CCCCCCCCCC "));
    assert_eq!(lines[3], "");
    assert_eq!(lines[4], "AAAAA");
    assert_eq!(lines[5], "CCCCC");
    assert_eq!(lines.len(), 6);
}

#[test]
fn writer_to_stream_matches_string() {
    let al = parse_bytes(b"1 3\nx ACG\n").unwrap();
    let mut buf = Vec::new();
    write_phylip_to(&al, &mut buf).unwrap();
    assert_eq!(buf, b"  1   3\nx  ACG\n");
}

#[test]
fn empty_alignment_writes_header_only() {
    assert_eq!(write_phylip(&Alignment::default()).unwrap(), "  0   0\n");
}

#[test]
fn writer_rejects_names_that_would_not_parse_back() {
    for name in ["my seq", "tab\tname", ""] {
        let mut al = Alignment::new(SeqAlphabet::Nucleotide);
        al.add_sequence(name, b"ACGT".to_vec(), None).unwrap();
        assert!(matches!(
            write_phylip(&al),
            Err(BioError::InvalidParameter { .. })
        ));
        let mut buf = Vec::new();
        assert!(write_phylip_to(&al, &mut buf).is_err());
        assert!(buf.is_empty());
    }
}

// ─── properties ─────────────────────────────────────────────

fn alignment_strategy() -> impl Strategy<Value = Alignment> {
    (1usize..6, 1usize..200).prop_flat_map(|(n, len)| {
        prop::collection::vec(
            (
                "[A-Za-z][A-Za-z0-9_]{0,9}",
                prop::collection::vec(prop::sample::select(b"ACGTN-".to_vec()), len),
            ),
            n,
        )
        .prop_map(|rows| {
            let mut al = Alignment::new(detect_alphabet(&rows[0].1));
            for (name, seq) in rows {
                al.add_sequence(name, seq, None).unwrap();
            }
            al
        })
    })
}

proptest! {
    #[test]
    fn write_then_parse_roundtrips(al in alignment_strategy()) {
        let text = write_phylip(&al).unwrap();
        let parsed = parse_bytes(text.as_bytes()).unwrap();
        prop_assert_eq!(parsed, al);
    }
}
