/// Complement a single DNA base, including IUPAC ambiguity codes.
/// Gap characters and unknown symbols are returned unchanged.
pub fn complement_base(base: u8) -> u8 {
    match base.to_ascii_uppercase() {
        b'A' => b'T',
        b'T' => b'A',
        b'G' => b'C',
        b'C' => b'G',
        b'R' => b'Y',
        b'Y' => b'R',
        b'S' => b'S',
        b'W' => b'W',
        b'K' => b'M',
        b'M' => b'K',
        b'B' => b'V',
        b'V' => b'B',
        b'D' => b'H',
        b'H' => b'D',
        b'N' => b'N',
        other => other,
    }
}

/// Reverse complement of a DNA sequence
pub fn reverse_complement(seq: &str) -> String {
    seq.bytes().rev().map(|b| complement_base(b) as char).collect()
}

/// True for the four unambiguous bases.
pub fn is_acgt(base: u8) -> bool {
    matches!(base.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T')
}

pub fn is_gap(base: u8) -> bool {
    matches!(base, b'-' | b'.')
}

/// True for any symbol of the DNA alphabet: bases, IUPAC codes and gaps.
pub fn is_dna_symbol(base: u8) -> bool {
    is_gap(base)
        || matches!(
            base.to_ascii_uppercase(),
            b'A' | b'C'
                | b'G'
                | b'T'
                | b'R'
                | b'Y'
                | b'S'
                | b'W'
                | b'K'
                | b'M'
                | b'B'
                | b'V'
                | b'D'
                | b'H'
                | b'N'
        )
}

/// Calculate GC content as a fraction (0.0 to 1.0)
pub fn gc_content(seq: &str) -> f64 {
    if seq.is_empty() {
        return 0.0;
    }
    let gc_count = seq
        .bytes()
        .filter(|b| matches!(b.to_ascii_uppercase(), b'G' | b'C'))
        .count();
    gc_count as f64 / seq.len() as f64
}
