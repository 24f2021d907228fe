use std::sync::OnceLock;

use lcr_core::Component;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::RegistryError;

/// A raw registry record, as returned by a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub id: String,
    pub name: String,
    /// Registry entry type, e.g. "PART" or "PLASMID".
    pub entry_type: String,
    /// Free-form "Type" parameter: "ORF", "DOMINO", ...
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub sequence: String,
    /// Ids of the parts an assembly is built from, in assembly order.
    /// Absent for plain parts.
    #[serde(default)]
    pub linked_parts: Option<Vec<String>>,
}

impl RegistryEntry {
    pub fn linked_parts(&self) -> Result<&[String], RegistryError> {
        self.linked_parts
            .as_deref()
            .ok_or_else(|| RegistryError::MissingMetadata {
                id: self.id.clone(),
                field: "linkedParts",
            })
    }

    pub fn to_component(&self) -> Result<Component, RegistryError> {
        Ok(Component {
            id: self.id.clone(),
            name: self.name.clone(),
            entry_type: self.entry_type.clone(),
            subtype: self.subtype.clone(),
            description: clean_description(&self.short_description)?,
            sequence: self.sequence.clone(),
        })
    }
}

/// Strip bracketed annotations, trim, and turn " - " separators into underscores.
///
/// `"pSB1C3 [backbone] - v2"` becomes `"pSB1C3_v2"`.
pub fn clean_description(raw: &str) -> Result<String, regex::Error> {
    let re = bracketed()?;
    Ok(re.replace_all(raw, " ").trim().replace(" - ", "_"))
}

fn bracketed() -> Result<&'static Regex, regex::Error> {
    static BRACKETED: OnceLock<Regex> = OnceLock::new();
    if let Some(re) = BRACKETED.get() {
        return Ok(re);
    }
    let re = Regex::new(r"\s*\[[^\]]*\]\s*")?;
    Ok(BRACKETED.get_or_init(|| re))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_description() {
        assert_eq!(clean_description("pSB1C3 [backbone] - v2").unwrap(), "pSB1C3_v2");
        assert_eq!(clean_description("GFP - mut3").unwrap(), "GFP_mut3");
        assert_eq!(clean_description("plain").unwrap(), "plain");
        assert_eq!(clean_description("a[x]b[y]c").unwrap(), "a b c");
        assert_eq!(clean_description("Bridging oligo [A to B]").unwrap(), "Bridging oligo");
    }

    #[test]
    fn test_description_pattern_compiled_once() {
        let first = bracketed().unwrap();
        let second = bracketed().unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(clean_description("x [y] - z").unwrap(), "x_z");
    }

    #[test]
    fn test_linked_parts_missing() {
        let entry = RegistryEntry {
            id: "SBC1".to_string(),
            name: "part".to_string(),
            entry_type: "PART".to_string(),
            subtype: None,
            short_description: String::new(),
            sequence: String::new(),
            linked_parts: None,
        };
        assert!(matches!(
            entry.linked_parts(),
            Err(RegistryError::MissingMetadata { field: "linkedParts", .. })
        ));
    }

    #[test]
    fn test_to_component() {
        let entry = RegistryEntry {
            id: "SBC2".to_string(),
            name: "gfp".to_string(),
            entry_type: "PART".to_string(),
            subtype: Some("ORF".to_string()),
            short_description: "GFP [codon optimised] - E. coli".to_string(),
            sequence: "ATGAGTAAAGGA".to_string(),
            linked_parts: None,
        };
        let c = entry.to_component().unwrap();
        assert_eq!(c.id, "SBC2");
        assert_eq!(c.subtype.as_deref(), Some("ORF"));
        assert_eq!(c.description, "GFP_E. coli");
    }
}
