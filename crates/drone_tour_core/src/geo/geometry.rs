use crate::site::Site;

/// Squared length of a candidate edge, as seen by a spanning-tree sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgeCost {
    Finite(f64),
    /// The edge may not be used under the active weight rule.
    Forbidden,
    /// No edge to this node has been examined yet.
    Unknown,
}

impl EdgeCost {
    pub fn finite(self) -> Option<f64> {
        match self {
            Self::Finite(cost) => Some(cost),
            Self::Forbidden | Self::Unknown => None,
        }
    }

    /// Whether `self` should replace `current` as the best known cost.
    /// Finite costs only replace strictly larger finite costs.
    pub(crate) fn improves_on(self, current: Self) -> bool {
        match (self, current) {
            (Self::Finite(candidate), Self::Finite(best)) => candidate < best,
            (Self::Finite(_), _) => true,
            (Self::Forbidden, Self::Unknown) => true,
            _ => false,
        }
    }
}

pub(crate) struct TourGeometry;

impl TourGeometry {
    /// Closed cycle length over `sites` in `tour` order.
    pub(crate) fn tour_length(sites: &[Site], tour: &[usize]) -> f64 {
        let n = tour.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|i| sites[tour[i]].dist(&sites[tour[(i + 1) % n]]))
            .sum()
    }

    pub(crate) fn rotate_cycle(tour: &[usize], start: usize) -> Vec<usize> {
        let Some(pos) = tour.iter().position(|&idx| idx == start) else {
            return tour.to_vec();
        };
        let mut out = Vec::with_capacity(tour.len());
        out.extend_from_slice(&tour[pos..]);
        out.extend_from_slice(&tour[..pos]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{EdgeCost, TourGeometry};
    use crate::site::Site;

    #[test]
    fn tour_length_closes_cycle() {
        let sites = vec![
            Site::new(0, 0),
            Site::new(0, 1),
            Site::new(1, 1),
            Site::new(1, 0),
        ];
        let length = TourGeometry::tour_length(&sites, &[0, 1, 2, 3]);
        assert!((length - 4.0).abs() < 1e-12);
    }

    #[test]
    fn tour_length_counts_both_legs_of_a_two_site_cycle() {
        let sites = vec![Site::new(0, 0), Site::new(3, 4)];
        assert!((TourGeometry::tour_length(&sites, &[0, 1]) - 10.0).abs() < 1e-12);
        assert_eq!(TourGeometry::tour_length(&sites, &[0]), 0.0);
    }

    #[test]
    fn rotate_cycle_starts_at_requested_site() {
        assert_eq!(TourGeometry::rotate_cycle(&[3, 1, 0, 2], 0), vec![0, 2, 3, 1]);
        assert_eq!(TourGeometry::rotate_cycle(&[3, 1], 9), vec![3, 1]);
    }

    #[test]
    fn finite_costs_improve_on_everything_larger() {
        assert!(EdgeCost::Finite(4.0).improves_on(EdgeCost::Unknown));
        assert!(EdgeCost::Finite(4.0).improves_on(EdgeCost::Forbidden));
        assert!(EdgeCost::Finite(4.0).improves_on(EdgeCost::Finite(9.0)));
        assert!(!EdgeCost::Finite(4.0).improves_on(EdgeCost::Finite(4.0)));
    }

    #[test]
    fn forbidden_only_replaces_unknown() {
        assert!(EdgeCost::Forbidden.improves_on(EdgeCost::Unknown));
        assert!(!EdgeCost::Forbidden.improves_on(EdgeCost::Forbidden));
        assert!(!EdgeCost::Forbidden.improves_on(EdgeCost::Finite(1.0)));
        assert!(!EdgeCost::Unknown.improves_on(EdgeCost::Unknown));
    }

    #[test]
    fn finite_extracts_only_real_costs() {
        assert_eq!(EdgeCost::Finite(2.5).finite(), Some(2.5));
        assert_eq!(EdgeCost::Forbidden.finite(), None);
        assert_eq!(EdgeCost::Unknown.finite(), None);
    }
}
