use serde::{Deserialize, Serialize};

use crate::operations::{is_dna_symbol, is_gap};
use crate::CoreError;

/// Restriction enzyme whose recognition site can be prepended to a primer.
///
/// Sites are written with IUPAC codes and an optional `^` marking the cut on
/// the top strand, e.g. `G^AATTC` for EcoRI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EnzymeDefinition", into = "EnzymeDefinition")]
pub struct RestrictionEnzyme {
    name: String,
    recognition_site: String,
    cut_position: Option<usize>,
}

/// Textual form used for configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnzymeDefinition {
    pub name: String,
    pub site: String,
}

impl RestrictionEnzyme {
    pub fn new(name: impl Into<String>, site: &str) -> Result<Self, CoreError> {
        let name = name.into();
        let site = site.trim().to_ascii_uppercase();

        let carets = site.matches('^').count();
        if carets > 1 {
            return Err(CoreError::InvalidEnzyme(format!(
                "{}: more than one cut mark in {}",
                name, site
            )));
        }
        let cut_position = site.find('^');
        let recognition_site: String = site.chars().filter(|&c| c != '^').collect();

        if recognition_site.is_empty() {
            return Err(CoreError::InvalidEnzyme(format!("{}: empty recognition site", name)));
        }
        if let Some(bad) = recognition_site
            .bytes()
            .find(|&b| !is_dna_symbol(b) || is_gap(b))
        {
            return Err(CoreError::InvalidEnzyme(format!(
                "{}: '{}' is not a nucleotide code",
                name, bad as char
            )));
        }

        Ok(Self {
            name,
            recognition_site,
            cut_position,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn recognition_site(&self) -> &str {
        &self.recognition_site
    }

    /// Offset of the top-strand cut from the start of the site, when known.
    pub fn cut_position(&self) -> Option<usize> {
        self.cut_position
    }
}

impl TryFrom<EnzymeDefinition> for RestrictionEnzyme {
    type Error = CoreError;

    fn try_from(value: EnzymeDefinition) -> Result<Self, Self::Error> {
        RestrictionEnzyme::new(value.name, &value.site)
    }
}

impl From<RestrictionEnzyme> for EnzymeDefinition {
    fn from(value: RestrictionEnzyme) -> Self {
        let mut site = value.recognition_site;
        if let Some(cut) = value.cut_position {
            site.insert(cut, '^');
        }
        EnzymeDefinition {
            name: value.name,
            site,
        }
    }
}

impl std::fmt::Display for RestrictionEnzyme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.recognition_site)
    }
}
