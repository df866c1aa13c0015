//! ASPRS point classification codes and class masks

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ASPRS LAS classification, with a catch-all for codes without a
/// dedicated variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LasClass {
    NeverClassified,
    Unclassified,
    Ground,
    LowVegetation,
    MediumVegetation,
    HighVegetation,
    Building,
    LowNoise,
    KeyPoint,
    Water,
    Overlap,
    HighNoise,
    Other(u8),
}

impl LasClass {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => LasClass::NeverClassified,
            1 => LasClass::Unclassified,
            2 => LasClass::Ground,
            3 => LasClass::LowVegetation,
            4 => LasClass::MediumVegetation,
            5 => LasClass::HighVegetation,
            6 => LasClass::Building,
            7 => LasClass::LowNoise,
            8 => LasClass::KeyPoint,
            9 => LasClass::Water,
            12 => LasClass::Overlap,
            18 => LasClass::HighNoise,
            other => LasClass::Other(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            LasClass::NeverClassified => 0,
            LasClass::Unclassified => 1,
            LasClass::Ground => 2,
            LasClass::LowVegetation => 3,
            LasClass::MediumVegetation => 4,
            LasClass::HighVegetation => 5,
            LasClass::Building => 6,
            LasClass::LowNoise => 7,
            LasClass::KeyPoint => 8,
            LasClass::Water => 9,
            LasClass::Overlap => 12,
            LasClass::HighNoise => 18,
            LasClass::Other(code) => code,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LasClass::NeverClassified => "never classified",
            LasClass::Unclassified => "unclassified",
            LasClass::Ground => "ground",
            LasClass::LowVegetation => "low vegetation",
            LasClass::MediumVegetation => "medium vegetation",
            LasClass::HighVegetation => "high vegetation",
            LasClass::Building => "building",
            LasClass::LowNoise => "low noise",
            LasClass::KeyPoint => "model key-point",
            LasClass::Water => "water",
            LasClass::Overlap => "overlap",
            LasClass::HighNoise => "high noise",
            LasClass::Other(_) => "other",
        }
    }

    /// RGB color (0..1) of the class in the point viewer palette.
    /// Classes outside the palette are black.
    pub fn display_color(self) -> [f64; 3] {
        match self {
            LasClass::NeverClassified => [0.5, 0.5, 0.5],
            LasClass::Ground => [0.0, 1.0, 0.0],
            LasClass::LowVegetation => [0.0, 0.5, 0.0],
            LasClass::MediumVegetation => [0.5, 0.25, 0.0],
            LasClass::HighVegetation => [0.0, 0.0, 1.0],
            LasClass::Building => [1.0, 0.0, 0.0],
            LasClass::Water => [0.0, 1.0, 1.0],
            _ => [0.0, 0.0, 0.0],
        }
    }
}

impl fmt::Display for LasClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// Mask over classification codes, applied to a point set before any
/// aggregation runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClassFilter {
    /// Keep every point
    #[default]
    All,
    /// Keep points whose code is listed; unclassified points are dropped
    Only(Vec<u8>),
    /// Drop points whose code is listed; unclassified points are kept
    Exclude(Vec<u8>),
}

impl ClassFilter {
    /// Ground returns only (terrain model)
    pub fn ground() -> Self {
        ClassFilter::Only(vec![2])
    }

    /// Ground, vegetation and buildings (surface model)
    pub fn surface() -> Self {
        ClassFilter::Only(vec![2, 3, 4, 5, 6])
    }

    /// Everything except low noise and overlap points
    pub fn denoised() -> Self {
        ClassFilter::Exclude(vec![7, 12])
    }

    pub fn matches(&self, classification: Option<u8>) -> bool {
        match (self, classification) {
            (ClassFilter::All, _) => true,
            (ClassFilter::Only(codes), Some(c)) => codes.contains(&c),
            (ClassFilter::Only(_), None) => false,
            (ClassFilter::Exclude(codes), Some(c)) => !codes.contains(&c),
            (ClassFilter::Exclude(_), None) => true,
        }
    }
}

impl FromStr for ClassFilter {
    type Err = Error;

    /// Accepts `all`, `ground`, `surface`, `denoised`, a comma list of
    /// codes (`2,6`) or an excluded list (`!7,12`).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "all" => return Ok(ClassFilter::All),
            "ground" => return Ok(ClassFilter::ground()),
            "surface" => return Ok(ClassFilter::surface()),
            "denoised" => return Ok(ClassFilter::denoised()),
            _ => {}
        }

        let (exclude, list) = match s.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let codes = list
            .split(',')
            .map(|code| {
                code.trim().parse::<u8>().map_err(|_| {
                    Error::invalid_parameter(
                        "classes",
                        s,
                        "expected all, ground, surface, denoised or a list of class codes",
                    )
                })
            })
            .collect::<Result<Vec<u8>>>()?;

        Ok(if exclude {
            ClassFilter::Exclude(codes)
        } else {
            ClassFilter::Only(codes)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip_including_other() {
        for code in 0..=u8::MAX {
            assert_eq!(LasClass::from_code(code).code(), code);
        }
        assert_eq!(LasClass::from_code(42), LasClass::Other(42));
    }

    #[test]
    fn test_display_color_defaults_to_black() {
        assert_eq!(LasClass::Ground.display_color(), [0.0, 1.0, 0.0]);
        assert_eq!(LasClass::Other(64).display_color(), [0.0, 0.0, 0.0]);
        assert_eq!(LasClass::Overlap.display_color(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_filter_matches() {
        let ground = ClassFilter::ground();
        assert!(ground.matches(Some(2)));
        assert!(!ground.matches(Some(3)));
        assert!(!ground.matches(None));

        let denoised = ClassFilter::denoised();
        assert!(!denoised.matches(Some(7)));
        assert!(denoised.matches(Some(6)));
        assert!(denoised.matches(None));
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("surface".parse::<ClassFilter>().unwrap(), ClassFilter::surface());
        assert_eq!("All".parse::<ClassFilter>().unwrap(), ClassFilter::All);
        assert_eq!(
            "2, 6".parse::<ClassFilter>().unwrap(),
            ClassFilter::Only(vec![2, 6])
        );
        assert_eq!(
            "!7,12".parse::<ClassFilter>().unwrap(),
            ClassFilter::Exclude(vec![7, 12])
        );
        assert!(matches!(
            "trees".parse::<ClassFilter>(),
            Err(Error::InvalidParameter { name: "classes", .. })
        ));
    }
}
