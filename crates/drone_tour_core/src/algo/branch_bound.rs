//! Exact tour search. Permutations of the non-origin sites are generated in
//! place; a branch is dropped as soon as its lower bound (fixed prefix cost,
//! spanning tree over the remaining sites, and the cheapest links from the
//! origin and from the prefix end into them) reaches the incumbent cost.

use crate::{
    algo::{
        insertion::cheapest_insertion,
        spanning::{PrimSweep, unconstrained_weight},
    },
    site::Site,
    tour::Tour,
};

/// Fixed start and end of every tour. Never stored in the search path.
const ORIGIN: usize = 0;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SearchStats {
    /// Prefixes that passed the bound and were branched on.
    pub expanded: u64,
    /// Prefixes cut by the bound.
    pub pruned: u64,
    /// Complete tours costed at the leaves.
    pub completed: u64,
    /// Times the incumbent was replaced.
    pub improvements: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    pub tour: Tour,
    pub stats: SearchStats,
}

pub(crate) struct SearchContext<'a> {
    sites: &'a [Site],
    /// `path[..path_length]` is fixed, the rest is still to be placed.
    path: Vec<usize>,
    path_cost: f64,
    incumbent: Tour,
    visited: Vec<bool>,
    unvisited: Vec<usize>,
    stats: SearchStats,
}

impl<'a> SearchContext<'a> {
    pub(crate) fn new(sites: &'a [Site], incumbent: Tour) -> Self {
        Self {
            sites,
            path: (1..sites.len()).collect(),
            path_cost: 0.0,
            incumbent,
            visited: vec![false; sites.len()],
            unvisited: Vec::with_capacity(sites.len()),
            stats: SearchStats::default(),
        }
    }

    fn dist(&self, a: usize, b: usize) -> f64 {
        self.sites[a].dist(&self.sites[b])
    }

    fn last_fixed(&self, path_length: usize) -> usize {
        path_length
            .checked_sub(1)
            .map_or(ORIGIN, |last| self.path[last])
    }

    pub(crate) fn search(&mut self, path_length: usize) {
        if path_length == self.path.len() {
            self.stats.completed += 1;
            let total = self.path_cost + self.dist(self.last_fixed(path_length), ORIGIN);
            // Strict: the first tour found at a given cost is kept.
            if total < self.incumbent.cost {
                self.incumbent.cost = total;
                self.incumbent.order.clear();
                self.incumbent.order.push(ORIGIN);
                self.incumbent.order.extend_from_slice(&self.path);
                self.stats.improvements += 1;
                log::debug!(
                    "search: improved cost={total:.4} completed={}",
                    self.stats.completed
                );
            }
            return;
        }

        if !self.promising(path_length) {
            self.stats.pruned += 1;
            return;
        }
        self.stats.expanded += 1;

        let previous = self.last_fixed(path_length);
        for candidate in path_length..self.path.len() {
            self.path.swap(path_length, candidate);
            let saved_cost = self.path_cost;
            self.path_cost += self.dist(previous, self.path[path_length]);

            self.search(path_length + 1);

            self.path_cost = saved_cost;
            self.path.swap(path_length, candidate);
        }
    }

    fn promising(&mut self, path_length: usize) -> bool {
        self.lower_bound(path_length) < self.incumbent.cost
    }

    /// Never exceeds the cost of the best completion of `path[..path_length]`.
    /// With nothing left to place it is exactly that completion.
    pub(crate) fn lower_bound(&mut self, path_length: usize) -> f64 {
        if self.path_cost >= self.incumbent.cost {
            return f64::INFINITY;
        }
        let last = self.last_fixed(path_length);

        self.visited[ORIGIN] = true;
        for &site in &self.path[..path_length] {
            self.visited[site] = true;
        }
        self.unvisited.clear();
        self.unvisited
            .extend((0..self.sites.len()).filter(|&site| !self.visited[site]));
        for &site in &self.path[..path_length] {
            self.visited[site] = false;
        }
        self.visited[ORIGIN] = false;

        if self.unvisited.is_empty() {
            return self.path_cost + self.dist(last, ORIGIN);
        }

        let tree_cost = match PrimSweep::run(self.sites, &self.unvisited, unconstrained_weight) {
            Ok(sweep) => sweep.total_cost(),
            Err(err) => {
                // Dropping the tree term keeps the bound admissible.
                log::trace!("search: bound without tree err={err}");
                0.0
            }
        };

        let mut to_origin = f64::INFINITY;
        let mut from_last = f64::INFINITY;
        for &site in &self.unvisited {
            to_origin = to_origin.min(self.dist(ORIGIN, site));
            from_last = from_last.min(self.dist(last, site));
        }

        self.path_cost + tree_cost + to_origin + from_last
    }

    fn into_outcome(self) -> SearchOutcome {
        SearchOutcome {
            tour: self.incumbent,
            stats: self.stats,
        }
    }
}

/// Runs the exact search starting from `incumbent`, which must be a complete
/// tour over `sites` that starts at site 0. The returned tour is never worse.
pub fn bounded_search(sites: &[Site], incumbent: Tour) -> SearchOutcome {
    if sites.len() < 2 {
        return SearchOutcome {
            tour: incumbent,
            stats: SearchStats::default(),
        };
    }

    let initial_cost = incumbent.cost;
    let mut ctx = SearchContext::new(sites, incumbent);
    ctx.search(0);
    let outcome = ctx.into_outcome();

    let stats = outcome.stats;
    log::info!(
        "search: n={} initial={initial_cost:.2} optimal={:.2} expanded={} pruned={} completed={} improvements={}",
        sites.len(),
        outcome.tour.cost,
        stats.expanded,
        stats.pruned,
        stats.completed,
        stats.improvements
    );
    outcome
}

/// Shortest closed tour over `sites`, seeded with the cheapest-insertion tour.
#[drone_tour_derive::timer("search")]
pub fn optimal_tour(sites: &[Site]) -> Tour {
    bounded_search(sites, cheapest_insertion(sites)).tour
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::{ORIGIN, SearchContext, bounded_search, optimal_tour};
    use crate::{
        algo::insertion::cheapest_insertion, geometry::TourGeometry, site::Site, tour::Tour,
    };

    const EPS: f64 = 1e-9;

    fn sites(coords: &[(i32, i32)]) -> Vec<Site> {
        coords.iter().map(|&(x, y)| Site::new(x, y)).collect()
    }

    fn random_sites(rng: &mut StdRng, n: usize) -> Vec<Site> {
        (0..n)
            .map(|_| Site::new(rng.random_range(-30..=30), rng.random_range(-30..=30)))
            .collect()
    }

    /// Cheapest way to visit all of `rest` in some order, from `last` back to the origin.
    fn brute_force_completion(all: &[Site], last: usize, rest: &mut Vec<usize>) -> f64 {
        if rest.is_empty() {
            return all[last].dist(&all[ORIGIN]);
        }
        let mut best = f64::INFINITY;
        for i in 0..rest.len() {
            let next = rest.swap_remove(i);
            let cost = all[last].dist(&all[next]) + brute_force_completion(all, next, rest);
            best = best.min(cost);
            rest.push(next);
            let end = rest.len() - 1;
            rest.swap(i, end);
        }
        best
    }

    fn brute_force_optimum(all: &[Site]) -> f64 {
        let mut rest: Vec<usize> = (1..all.len()).collect();
        brute_force_completion(all, ORIGIN, &mut rest)
    }

    fn unbounded_incumbent() -> Tour {
        Tour {
            order: Vec::new(),
            cost: f64::INFINITY,
        }
    }

    #[test]
    fn unit_square_optimum_is_its_perimeter() {
        let tour = optimal_tour(&sites(&[(0, 0), (1, 0), (1, 1), (0, 1)]));
        assert!((tour.cost - 4.0).abs() < EPS);
        assert_eq!(tour.order[0], 0);
        assert_eq!(format!("{:.2}", tour.cost), "4.00");
    }

    #[test]
    fn tied_optimum_keeps_the_seed_tour() {
        let all = sites(&[(0, 0), (1, 0), (1, 1), (0, 1)]);
        let seed = cheapest_insertion(&all);
        let outcome = bounded_search(&all, seed.clone());

        assert_eq!(outcome.tour, seed);
        assert_eq!(outcome.stats.improvements, 0);
    }

    #[test]
    fn crossing_seed_is_untangled() {
        let all = sites(&[(0, 0), (4, 0), (0, 3), (4, 3)]);
        let crossing = Tour::from_cycle(&all, &[0, 1, 2, 3]);
        let outcome = bounded_search(&all, crossing);

        assert!((outcome.tour.cost - 14.0).abs() < EPS);
        assert!(outcome.stats.improvements >= 1);
        let mut seen = outcome.tour.order.clone();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn matches_brute_force_on_small_random_inputs() {
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..30 {
            let n = rng.random_range(2..=8);
            let all = random_sites(&mut rng, n);
            let greedy = cheapest_insertion(&all);
            let tour = optimal_tour(&all);

            assert!((tour.cost - brute_force_optimum(&all)).abs() < 1e-6);
            assert!(tour.cost <= greedy.cost + EPS);
            assert!((tour.cost - TourGeometry::tour_length(&all, &tour.order)).abs() < 1e-6);

            let mut seen = tour.order.clone();
            seen.sort_unstable();
            assert_eq!(seen, (0..n).collect::<Vec<_>>());
            assert_eq!(tour.order[0], 0);
        }
    }

    #[test]
    fn lower_bound_never_exceeds_best_completion() {
        let mut rng = StdRng::seed_from_u64(31);
        for _ in 0..60 {
            let n = rng.random_range(2..=7);
            let all = random_sites(&mut rng, n);
            let mut ctx = SearchContext::new(&all, unbounded_incumbent());

            // Shuffle a random prefix into place and cost it.
            let path_length = rng.random_range(0..n);
            for pos in 0..path_length {
                let pick = rng.random_range(pos..ctx.path.len());
                ctx.path.swap(pos, pick);
            }
            let mut prev = ORIGIN;
            for &site in &ctx.path[..path_length] {
                ctx.path_cost += all[prev].dist(&all[site]);
                prev = site;
            }

            let bound = ctx.lower_bound(path_length);
            let mut rest = ctx.path[path_length..].to_vec();
            let best = ctx.path_cost + brute_force_completion(&all, prev, &mut rest);
            assert!(bound <= best + 1e-9, "bound={bound} best={best}");

            if path_length == ctx.path.len() {
                assert!((bound - best).abs() < 1e-9);
            }
            assert!(ctx.visited.iter().all(|v| !v));
        }
    }

    #[test]
    fn bound_is_infinite_once_prefix_reaches_incumbent() {
        let all = sites(&[(0, 0), (5, 0), (5, 5), (0, 5)]);
        let mut ctx = SearchContext::new(
            &all,
            Tour {
                order: vec![0, 1, 2, 3],
                cost: 20.0,
            },
        );
        ctx.path_cost = 20.0;
        assert_eq!(ctx.lower_bound(1), f64::INFINITY);
    }

    #[test]
    fn search_restores_path_and_cost() {
        let mut rng = StdRng::seed_from_u64(5);
        let all = random_sites(&mut rng, 7);
        let mut ctx = SearchContext::new(&all, cheapest_insertion(&all));
        ctx.search(0);

        assert_eq!(ctx.path, (1..7).collect::<Vec<_>>());
        assert_eq!(ctx.path_cost, 0.0);
        assert!(ctx.stats.completed >= 1 || ctx.stats.pruned >= 1);
    }

    #[test]
    fn pruning_skips_most_leaves() {
        let mut rng = StdRng::seed_from_u64(11);
        let all = random_sites(&mut rng, 9);
        let outcome = bounded_search(&all, cheapest_insertion(&all));

        // 8! complete orders exist without pruning.
        assert!(outcome.stats.completed < 40_320);
        assert!(outcome.stats.pruned > 0);
    }

    #[test]
    fn degenerate_inputs_return_the_seed() {
        let empty = optimal_tour(&[]);
        assert!(empty.is_empty());

        let single = optimal_tour(&sites(&[(4, -2)]));
        assert_eq!(single.order, vec![0]);
        assert_eq!(single.cost, 0.0);

        let pair = optimal_tour(&sites(&[(0, 0), (0, 5)]));
        assert_eq!(pair.order, vec![0, 1]);
        assert!((pair.cost - 10.0).abs() < EPS);
    }
}
