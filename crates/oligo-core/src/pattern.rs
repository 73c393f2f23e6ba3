use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::range::ClosedRange;
use crate::sequence::Sequence;
use crate::CoreError;

/// Degenerate DNA pattern written with IUPAC ambiguity codes, e.g. `SS` or `WNNG`.
///
/// Each pattern symbol stands for the set of concrete bases it encodes; a
/// subject base matches when it is one of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DnaPattern {
    pattern: String,
    suffix: Regex,
    anywhere: Regex,
}

fn base_class(symbol: u8) -> Option<&'static str> {
    let class = match symbol.to_ascii_uppercase() {
        b'A' => "A",
        b'C' => "C",
        b'G' => "G",
        b'T' => "T",
        b'R' => "[AG]",
        b'Y' => "[CT]",
        b'S' => "[CG]",
        b'W' => "[AT]",
        b'K' => "[GT]",
        b'M' => "[AC]",
        b'B' => "[CGT]",
        b'D' => "[AGT]",
        b'H' => "[ACT]",
        b'V' => "[ACG]",
        b'N' => "[ACGT]",
        _ => return None,
    };
    Some(class)
}

impl DnaPattern {
    pub fn new(pattern: &str) -> Result<Self, CoreError> {
        let pattern = pattern.trim().to_ascii_uppercase();
        if pattern.is_empty() {
            return Err(CoreError::InvalidPattern("empty pattern".to_string()));
        }

        let mut body = String::with_capacity(pattern.len() * 4);
        for symbol in pattern.bytes() {
            let class = base_class(symbol).ok_or_else(|| {
                CoreError::InvalidPattern(format!(
                    "'{}' is not an IUPAC nucleotide code in pattern {}",
                    symbol as char, pattern
                ))
            })?;
            body.push_str(class);
        }

        Ok(Self {
            suffix: Regex::new(&format!("(?i)(?:{})$", body))?,
            anywhere: Regex::new(&format!("(?i){}", body))?,
            pattern,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// True when the 3' end of `text` matches the pattern.
    pub fn matches_suffix(&self, text: &str) -> bool {
        self.suffix.is_match(text)
    }

    /// Non-overlapping matches on the forward strand, as 1-based locations.
    pub fn find_in(&self, sequence: &Sequence) -> Vec<ClosedRange<usize>> {
        self.anywhere
            .find_iter(sequence.as_str())
            .map(|m| ClosedRange::new(m.start() + 1, m.end()))
            .collect()
    }
}

impl PartialEq for DnaPattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl TryFrom<String> for DnaPattern {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DnaPattern::new(&value)
    }
}

impl From<DnaPattern> for String {
    fn from(value: DnaPattern) -> Self {
        value.pattern
    }
}

impl std::fmt::Display for DnaPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pattern)
    }
}
