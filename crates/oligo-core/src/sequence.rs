use serde::{Deserialize, Serialize};

use crate::operations::{is_dna_symbol, is_gap, reverse_complement};
use crate::range::ClosedRange;
use crate::search;
use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grammar {
    /// Nucleotides, IUPAC ambiguity codes and gaps.
    Dna,
    Protein,
    Unknown,
}

impl Grammar {
    /// Infer the narrowest alphabet that accepts every residue.
    pub fn infer(residues: &[u8]) -> Self {
        if residues.iter().all(|&b| is_dna_symbol(b)) {
            Grammar::Dna
        } else if residues
            .iter()
            .all(|&b| is_gap(b) || b == b'*' || (b.is_ascii_alphabetic() && !b"BJOUXZ".contains(&b)))
        {
            Grammar::Protein
        } else {
            Grammar::Unknown
        }
    }
}

impl std::fmt::Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grammar::Dna => write!(f, "dna"),
            Grammar::Protein => write!(f, "protein"),
            Grammar::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strand {
    Forward,
    Reverse,
}

/// Named, upper-cased residue buffer addressed with 1-based coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SequenceRecord", into = "SequenceRecord")]
pub struct Sequence {
    pub name: String,
    pub description: String,
    sequence: String,
    grammar: Grammar,
}

/// Serialized form of a [`Sequence`]; the grammar is re-inferred on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub sequence: String,
}

impl From<SequenceRecord> for Sequence {
    fn from(record: SequenceRecord) -> Self {
        let mut sequence = Sequence::new(record.name, record.sequence);
        sequence.description = record.description;
        sequence
    }
}

impl From<Sequence> for SequenceRecord {
    fn from(sequence: Sequence) -> Self {
        SequenceRecord {
            name: sequence.name,
            description: sequence.description,
            sequence: sequence.sequence,
        }
    }
}

impl Sequence {
    pub fn new(name: impl Into<String>, sequence: impl Into<String>) -> Self {
        let sequence = sequence.into().to_ascii_uppercase();
        let grammar = Grammar::infer(sequence.as_bytes());
        Self {
            name: name.into(),
            description: String::new(),
            sequence,
            grammar,
        }
    }

    /// Build a sequence that must use the DNA alphabet.
    pub fn dna(name: impl Into<String>, sequence: impl Into<String>) -> Result<Self, CoreError> {
        let seq = Self::new(name, sequence);
        if seq.grammar != Grammar::Dna {
            return Err(CoreError::InvalidSequence(format!(
                "'{}' is not a DNA sequence",
                seq.name
            )));
        }
        Ok(seq)
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    pub fn as_str(&self) -> &str {
        &self.sequence
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.sequence.as_bytes()
    }

    pub fn has_gaps(&self) -> bool {
        self.sequence.bytes().any(is_gap)
    }

    /// Residue at a 1-based position.
    pub fn at(&self, position: usize) -> Option<u8> {
        position
            .checked_sub(1)
            .and_then(|i| self.sequence.as_bytes().get(i).copied())
    }

    /// Residues covered by a 1-based inclusive range.
    pub fn mid(&self, range: ClosedRange<usize>) -> Option<&str> {
        if !range.is_normal() || range.begin == 0 {
            return None;
        }
        self.sequence.get(range.begin - 1..range.end)
    }

    /// Copy of the residues covered by a 1-based inclusive range.
    pub fn subsequence(&self, range: ClosedRange<usize>) -> Result<Sequence, CoreError> {
        let residues = self.mid(range).ok_or_else(|| {
            CoreError::OutOfRange(format!("{} outside 1..{} of '{}'", range, self.len(), self.name))
        })?;
        Ok(Sequence::new(self.name.clone(), residues))
    }

    pub fn reverse_complement(&self) -> Sequence {
        Sequence {
            name: self.name.clone(),
            description: self.description.clone(),
            sequence: reverse_complement(&self.sequence),
            grammar: self.grammar,
        }
    }

    /// Number of (overlapping) occurrences of `needle`.
    pub fn count(&self, needle: &str) -> usize {
        search::count_matches(self.as_bytes(), needle.as_bytes(), None)
    }

    /// 1-based position of the first occurrence starting at or after `from`.
    pub fn index_of(&self, needle: &str, from: usize) -> Option<usize> {
        search::find_first(self.as_bytes(), needle.as_bytes(), from.saturating_sub(1)).map(|i| i + 1)
    }

    /// 1-based position of the last occurrence.
    pub fn last_index_of(&self, needle: &str) -> Option<usize> {
        search::find_last(self.as_bytes(), needle.as_bytes()).map(|i| i + 1)
    }

    pub fn find_locations_of(&self, needle: &str) -> Vec<ClosedRange<usize>> {
        search::find_all(self.as_bytes(), needle.as_bytes())
            .into_iter()
            .map(|i| ClosedRange::new(i + 1, i + needle.len()))
            .collect()
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sequence)
    }
}
