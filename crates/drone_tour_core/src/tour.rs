use crate::{geometry::TourGeometry, site::Site};

/// Closed tour over site indices, starting at the origin (site 0).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tour {
    pub order: Vec<usize>,
    pub cost: f64,
}

impl Tour {
    /// Builds a tour from any rotation of a cycle; the result starts at site 0.
    pub fn from_cycle(sites: &[Site], cycle: &[usize]) -> Self {
        let order = TourGeometry::rotate_cycle(cycle, 0);
        let cost = TourGeometry::tour_length(sites, &order);
        Self { order, cost }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn metrics(&self, sites: &[Site]) -> TourMetrics {
        let n = self.len();
        if n < 2 {
            return TourMetrics::default();
        }

        let legs: Vec<f64> = (0..n)
            .map(|i| sites[self.order[i]].dist(&sites[self.order[(i + 1) % n]]))
            .collect();
        let total: f64 = legs.iter().sum();
        let longest = legs.iter().copied().fold(0.0_f64, f64::max);
        let average = total / n as f64;

        TourMetrics {
            total,
            longest,
            average,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TourMetrics {
    pub total: f64,
    pub longest: f64,
    pub average: f64,
}

#[cfg(test)]
mod tests {
    use super::Tour;
    use crate::site::Site;

    fn square() -> Vec<Site> {
        vec![
            Site::new(0, 0),
            Site::new(2, 0),
            Site::new(2, 2),
            Site::new(0, 2),
        ]
    }

    #[test]
    fn from_cycle_rotates_to_origin_and_measures_cycle() {
        let tour = Tour::from_cycle(&square(), &[2, 3, 0, 1]);
        assert_eq!(tour.order, vec![0, 1, 2, 3]);
        assert!((tour.cost - 8.0).abs() < 1e-12);
    }

    #[test]
    fn metrics_report_longest_and_average_leg() {
        let tour = Tour::from_cycle(&square(), &[0, 2, 1, 3]);
        let metrics = tour.metrics(&square());
        let diagonal = 8.0_f64.sqrt();

        assert!((metrics.total - tour.cost).abs() < 1e-12);
        assert!((metrics.longest - diagonal).abs() < 1e-12);
        assert!((metrics.average - (4.0 + 2.0 * diagonal) / 4.0).abs() < 1e-12);
    }

    #[test]
    fn metrics_of_trivial_tour_are_zero() {
        let tour = Tour::from_cycle(&square(), &[0]);
        assert_eq!(tour.metrics(&square()), Default::default());
        assert_eq!(tour.cost, 0.0);
    }
}
