use crate::{
    Result, SolveMode,
    algo::{
        branch_bound::optimal_tour,
        insertion::cheapest_insertion,
        spanning::{SpanningTree, minimum_spanning_network},
    },
    site::Site,
    tour::Tour,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Solution {
    Network(SpanningTree),
    Tour(Tour),
}

impl Solution {
    pub fn cost(&self) -> f64 {
        match self {
            Self::Network(tree) => tree.cost,
            Self::Tour(tour) => tour.cost,
        }
    }
}

#[drone_tour_derive::timer("solver")]
pub fn solve(sites: &[Site], mode: SolveMode) -> Result<Solution> {
    log::info!("solver: start mode={mode} n={}", sites.len());

    let solution = match mode {
        SolveMode::Mst => Solution::Network(minimum_spanning_network(sites)?),
        SolveMode::FastTsp => Solution::Tour(cheapest_insertion(sites)),
        SolveMode::OptTsp => Solution::Tour(optimal_tour(sites)),
    };

    if let Solution::Tour(tour) = &solution {
        let metrics = tour.metrics(sites);
        log::info!(
            "metrics: n={} total={:.2} longest={:.2} avg={:.2}",
            tour.len(),
            metrics.total,
            metrics.longest,
            metrics.average
        );
    }
    Ok(solution)
}
