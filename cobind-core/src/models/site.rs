use std::cmp::Ordering;

use crate::models::GenomicPoint;

///
/// One binding-site observation for a single factor.
///
/// `factor_id` indexes into the [crate::models::FactorRoster] the site was loaded with.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub factor_id: usize,
    pub coordinate: GenomicPoint,
    pub signal: f64,
    pub has_motif: bool,
}

impl Site {
    ///
    /// Total order used for sorting sites: coordinate first, then factor id,
    /// then signal. Ties on coordinate therefore never depend on input order.
    ///
    pub fn cmp_position(&self, other: &Site) -> Ordering {
        self.coordinate
            .cmp(&other.coordinate)
            .then_with(|| self.factor_id.cmp(&other.factor_id))
            .then_with(|| self.signal.total_cmp(&other.signal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn site(factor_id: usize, chr: &str, offset: u32, signal: f64) -> Site {
        Site {
            factor_id,
            coordinate: GenomicPoint::new(chr, offset),
            signal,
            has_motif: false,
        }
    }

    #[rstest]
    fn test_sort_is_input_order_independent() {
        let a = vec![
            site(2, "chr1", 50, 1.0),
            site(0, "chr1", 50, 3.0),
            site(1, "chr1", 10, 2.0),
        ];
        let mut b = a.clone();
        b.reverse();

        let mut a = a;
        a.sort_by(Site::cmp_position);
        b.sort_by(Site::cmp_position);

        assert_eq!(a, b);
        let ids: Vec<usize> = a.iter().map(|s| s.factor_id).collect();
        assert_eq!(ids, vec![1, 0, 2]);
    }
}
