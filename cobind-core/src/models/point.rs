use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::CobindError;
use crate::models::Region;

///
/// A single 1-based position on a chromosome.
///
/// Points order by chromosome name first (lexicographic), then by offset,
/// which is the order the derived `Ord` gives us from the field order.
///
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Clone)]
pub struct GenomicPoint {
    pub chr: String,
    pub offset: u32,
}

impl GenomicPoint {
    pub fn new(chr: impl Into<String>, offset: u32) -> Self {
        GenomicPoint {
            chr: chr.into(),
            offset,
        }
    }

    ///
    /// Expand the point into a region of `half_width` on either side.
    /// The start is clamped at 1.
    ///
    pub fn expand(&self, half_width: u32) -> Region {
        Region {
            chr: self.chr.clone(),
            start: self.offset.saturating_sub(half_width).max(1),
            end: self.offset.saturating_add(half_width),
        }
    }

    /// Signed distance from `anchor` to this point (`self - anchor`).
    pub fn offset_from(&self, anchor: &GenomicPoint) -> i64 {
        self.offset as i64 - anchor.offset as i64
    }
}

impl Display for GenomicPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chr, self.offset)
    }
}

impl FromStr for GenomicPoint {
    type Err = CobindError;

    ///
    /// Parse `chr:offset`. A trailing `:strand` field is accepted and dropped.
    ///
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split(':');
        let chr = parts
            .next()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| CobindError::Parse(format!("point `{}`: missing chromosome", s)))?;
        let offset = parts
            .next()
            .ok_or_else(|| CobindError::Parse(format!("point `{}`: missing offset", s)))?
            .parse::<u32>()
            .map_err(|e| CobindError::Parse(format!("point `{}`: {}", s, e)))?;

        match parts.next() {
            None | Some("+") | Some("-") | Some(".") => {}
            Some(other) => {
                return Err(CobindError::Parse(format!(
                    "point `{}`: unexpected field `{}`",
                    s, other
                )));
            }
        }

        Ok(GenomicPoint::new(chr, offset))
    }
}
