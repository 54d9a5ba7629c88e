use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::CobindError;
use crate::models::GenomicPoint;

///
/// Region struct, a closed interval `[start, end]` on one chromosome.
/// Both ends are 1-based and inclusive.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Region {
    pub chr: String,
    pub start: u32,
    pub end: u32,
}

impl Region {
    ///
    /// Number of bases covered by the region
    ///
    pub fn width(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Midpoint of the region: `(start + end) / 2`, rounded down.
    pub fn mid_point(&self) -> GenomicPoint {
        let mid = (self.start as u64 + self.end as u64) / 2;
        GenomicPoint::new(self.chr.clone(), mid as u32)
    }

    pub fn contains(&self, point: &GenomicPoint) -> bool {
        point.chr == self.chr && point.offset >= self.start && point.offset <= self.end
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chr, self.start, self.end)
    }
}

impl FromStr for Region {
    type Err = CobindError;

    ///
    /// Parse a region string of the form `chr:start-end`.
    ///
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (chr, span) = s
            .rsplit_once(':')
            .ok_or_else(|| CobindError::Parse(format!("region `{}`: expected chr:start-end", s)))?;
        let (start, end) = span
            .split_once('-')
            .ok_or_else(|| CobindError::Parse(format!("region `{}`: expected chr:start-end", s)))?;

        let start = start
            .parse::<u32>()
            .map_err(|e| CobindError::Parse(format!("region `{}` start: {}", s, e)))?;
        let end = end
            .parse::<u32>()
            .map_err(|e| CobindError::Parse(format!("region `{}` end: {}", s, e)))?;

        if chr.is_empty() || end < start {
            return Err(CobindError::Parse(format!("region `{}`: invalid bounds", s)));
        }

        Ok(Region {
            chr: chr.to_string(),
            start,
            end,
        })
    }
}
