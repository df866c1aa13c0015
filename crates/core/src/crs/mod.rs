//! Coordinate Reference System descriptor
//!
//! Rasters carry a CRS so that a sink can write it next to the transform.
//! Nothing in alsgrid reprojects coordinates.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PUWG92_EPSG: u32 = 2180;

/// PROJ definition of the Polish national grid (PUWG 1992)
const PUWG92_PROJ: &str = "+proj=tmerc +lat_0=0 +lon_0=19 +k=0.9993 +x_0=500000 +y_0=-5300000 +ellps=GRS80 +units=m +no_defs";

/// How the coordinate system of a product is identified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CRS {
    /// Registry code only
    Epsg(u32),
    /// PROJ definition, optionally with the code it was taken from
    Proj { epsg: Option<u32>, definition: String },
    /// Well-known text, kept verbatim
    Wkt(String),
}

impl CRS {
    pub fn from_epsg(code: u32) -> Self {
        CRS::Epsg(code)
    }

    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        CRS::Wkt(wkt.into())
    }

    pub fn from_proj(proj: impl Into<String>) -> Self {
        CRS::Proj {
            epsg: None,
            definition: proj.into(),
        }
    }

    /// PUWG 1992 / CS92 (EPSG:2180), the grid national ALS deliveries use.
    pub fn puwg92() -> Self {
        CRS::Proj {
            epsg: Some(PUWG92_EPSG),
            definition: PUWG92_PROJ.to_string(),
        }
    }

    pub fn epsg(&self) -> Option<u32> {
        match self {
            CRS::Epsg(code) => Some(*code),
            CRS::Proj { epsg, .. } => *epsg,
            CRS::Wkt(_) => None,
        }
    }

    pub fn proj(&self) -> Option<&str> {
        match self {
            CRS::Proj { definition, .. } => Some(definition),
            _ => None,
        }
    }

    pub fn wkt(&self) -> Option<&str> {
        match self {
            CRS::Wkt(wkt) => Some(wkt),
            _ => None,
        }
    }

    /// Whether two descriptors name the same system.
    ///
    /// EPSG codes decide when both sides have one; otherwise the PROJ or
    /// WKT text must match exactly.
    pub fn is_equivalent(&self, other: &CRS) -> bool {
        match (self.epsg(), other.epsg()) {
            (Some(a), Some(b)) => a == b,
            _ => match (self, other) {
                (CRS::Proj { definition: a, .. }, CRS::Proj { definition: b, .. }) => a == b,
                (CRS::Wkt(a), CRS::Wkt(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CRS::Epsg(code) | CRS::Proj { epsg: Some(code), .. } => write!(f, "EPSG:{}", code),
            CRS::Proj { definition, .. } => f.write_str(definition),
            CRS::Wkt(wkt) => {
                let head: String = wkt.chars().take(50).collect();
                write!(f, "WKT:{}", head)
            }
        }
    }
}

/// Parses `EPSG:<code>` (or a bare code), a `+proj=` definition, or WKT.
///
/// EPSG 2180 resolves to [`CRS::puwg92`] so the PROJ definition travels
/// with the raster.
impl FromStr for CRS {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::invalid_parameter("crs", s, "empty definition"));
        }
        if s.starts_with("+proj") {
            return Ok(CRS::from_proj(s));
        }
        let code = s
            .strip_prefix("EPSG:")
            .or_else(|| s.strip_prefix("epsg:"))
            .unwrap_or(s);
        if code.chars().all(|c| c.is_ascii_digit()) {
            let code: u32 = code
                .parse()
                .map_err(|_| Error::invalid_parameter("crs", s, "EPSG code out of range"))?;
            return Ok(if code == PUWG92_EPSG {
                CRS::puwg92()
            } else {
                CRS::from_epsg(code)
            });
        }
        if s.contains('[') {
            return Ok(CRS::from_wkt(s));
        }
        Err(Error::invalid_parameter(
            "crs",
            s,
            "expected EPSG:<code>, a +proj definition or WKT",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_puwg92() {
        let crs = CRS::puwg92();
        assert_eq!(crs.epsg(), Some(2180));
        assert_eq!(crs.to_string(), "EPSG:2180");
        assert!(crs.proj().unwrap().contains("+lon_0=19"));
        assert_eq!(crs.wkt(), None);
    }

    #[test]
    fn test_equivalence() {
        assert!(CRS::puwg92().is_equivalent(&CRS::from_epsg(2180)));
        assert!(!CRS::from_epsg(2180).is_equivalent(&CRS::from_epsg(2177)));
        assert!(!CRS::from_epsg(2180).is_equivalent(&CRS::from_wkt("LOCAL_CS[]")));
        // no code on one side, so the definitions decide
        assert!(CRS::from_proj(PUWG92_PROJ).is_equivalent(&CRS::puwg92()));
        assert!(!CRS::from_proj("+proj=utm").is_equivalent(&CRS::from_wkt("+proj=utm")));
    }

    #[test]
    fn test_wkt_display_is_truncated() {
        let crs = CRS::from_wkt("x".repeat(200));
        assert_eq!(crs.to_string().len(), "WKT:".len() + 50);
    }

    #[test]
    fn test_parse() {
        assert_eq!("EPSG:2180".parse::<CRS>().unwrap(), CRS::puwg92());
        assert_eq!("2177".parse::<CRS>().unwrap(), CRS::from_epsg(2177));
        assert_eq!(
            "+proj=utm +zone=34".parse::<CRS>().unwrap().proj(),
            Some("+proj=utm +zone=34")
        );
        let wkt = "PROJCS[\"ETRF2000-PL / CS92\"]";
        assert_eq!(wkt.parse::<CRS>().unwrap().wkt(), Some(wkt));
        assert!("EPSG:99999999999".parse::<CRS>().is_err());
        assert!("".parse::<CRS>().is_err());
        assert!("wgs84".parse::<CRS>().is_err());
    }
}
