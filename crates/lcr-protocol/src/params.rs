use serde::{Deserialize, Serialize};

use crate::{AMPLIGASE, LGR_MASTERMIX, PNK, PNK_MASTERMIX};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProtocolVariant {
    /// Plain ligase cycling reaction.
    Lcr,
    /// Parts are phosphorylated in a separate pool before the LCR.
    PhosphoLcr,
}

impl ProtocolVariant {
    pub fn params(&self) -> ProtocolParams {
        match self {
            ProtocolVariant::Lcr => ProtocolParams::lcr(),
            ProtocolVariant::PhosphoLcr => ProtocolParams::phospho_lcr(),
        }
    }
}

impl std::fmt::Display for ProtocolVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolVariant::Lcr => write!(f, "lcr"),
            ProtocolVariant::PhosphoLcr => write!(f, "phospho-lcr"),
        }
    }
}

impl std::str::FromStr for ProtocolVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lcr" => Ok(ProtocolVariant::Lcr),
            "phospho-lcr" | "phospho_lcr" | "phospho" => Ok(ProtocolVariant::PhosphoLcr),
            other => Err(format!("unknown protocol '{other}'")),
        }
    }
}

/// Phosphorylation step: parts, water and PNK reagents into one pool per
/// assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct PhosphoParams {
    pub water_total: f64,
    /// Volume of each backbone part; also what water is reduced by per part.
    pub part_volume: f64,
    pub orf_volume: f64,
    pub reagents: Vec<(&'static str, f64)>,
}

/// Final LCR reaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionParams {
    pub water_total: f64,
    pub part_volume: f64,
    pub orf_volume: f64,
    /// Parts go straight into the reaction (false when they were already
    /// added to the phospho pool).
    pub dispense_parts: bool,
    pub phospho_pool_volume: Option<f64>,
    pub domino_pool_volume: f64,
    pub reagents: Vec<(&'static str, f64)>,
}

/// Every volume constant of a protocol variant, in microlitres.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolParams {
    /// Reagents in the mastermix trough after water.
    pub trough_reagents: Vec<&'static str>,
    /// Enzymes placed on the component plate after the parts.
    pub enzymes: Vec<&'static str>,
    pub domino_volume: f64,
    pub domino_pool_total: f64,
    pub phospho: Option<PhosphoParams>,
    pub reaction: ReactionParams,
}

impl ProtocolParams {
    pub fn lcr() -> Self {
        Self {
            trough_reagents: vec![LGR_MASTERMIX],
            enzymes: vec![AMPLIGASE],
            domino_volume: 1.75,
            domino_pool_total: lcr_core::DEFAULT_POOL_VOLUME,
            phospho: None,
            reaction: ReactionParams {
                water_total: 15.5,
                part_volume: 1.0,
                orf_volume: 1.0,
                dispense_parts: true,
                phospho_pool_volume: None,
                domino_pool_volume: 1.0,
                reagents: vec![(LGR_MASTERMIX, 7.0), (AMPLIGASE, 1.5)],
            },
        }
    }

    pub fn phospho_lcr() -> Self {
        Self {
            trough_reagents: vec![LGR_MASTERMIX, PNK_MASTERMIX],
            enzymes: vec![AMPLIGASE, PNK],
            domino_volume: 1.75,
            domino_pool_total: lcr_core::DEFAULT_POOL_VOLUME,
            phospho: Some(PhosphoParams {
                water_total: 16.0,
                part_volume: 1.2,
                orf_volume: 1.0,
                reagents: vec![(PNK_MASTERMIX, 3.0), (PNK, 1.0)],
            }),
            reaction: ReactionParams {
                water_total: 4.0,
                part_volume: 0.0,
                orf_volume: 0.0,
                dispense_parts: false,
                phospho_pool_volume: Some(13.3),
                domino_pool_volume: 1.0,
                reagents: vec![(LGR_MASTERMIX, 5.2), (AMPLIGASE, 1.5)],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parse_and_display() {
        assert_eq!("lcr".parse::<ProtocolVariant>().unwrap(), ProtocolVariant::Lcr);
        assert_eq!(
            "phospho-lcr".parse::<ProtocolVariant>().unwrap(),
            ProtocolVariant::PhosphoLcr
        );
        assert!("gibson".parse::<ProtocolVariant>().is_err());
        assert_eq!(ProtocolVariant::PhosphoLcr.to_string(), "phospho-lcr");
    }

    #[test]
    fn test_phospho_has_extra_stage_params() {
        assert!(ProtocolVariant::Lcr.params().phospho.is_none());
        let params = ProtocolVariant::PhosphoLcr.params();
        assert!(params.phospho.is_some());
        assert!(!params.reaction.dispense_parts);
        assert_eq!(params.reaction.phospho_pool_volume, Some(13.3));
    }
}
