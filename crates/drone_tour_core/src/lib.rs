//! Delivery tours over sites split between two campuses.
//! Provides a border-aware minimum spanning network, a cheapest-insertion
//! tour and an exact branch-and-bound tour seeded by the insertion tour.

mod algo;
mod error;
mod geo;
mod io;
pub mod logging;
mod site;
mod solver;
mod tour;

pub(crate) use geo::geometry;
pub(crate) use io::options;

pub use algo::branch_bound::{SearchOutcome, SearchStats, bounded_search, optimal_tour};
pub use algo::insertion::cheapest_insertion;
pub use algo::spanning::{
    SpanningTree, minimum_spanning_network, region_constrained_weight, spanning_tree,
    unconstrained_weight,
};
pub use error::{Error, Result};
pub use geo::geometry::EdgeCost;
pub use io::input::SolverInput;
pub use io::options::{LogFormat, LogLevel, SolveMode, SolverOptions};
pub use io::output::{render, write_report};
pub use site::{Region, Site};
pub use solver::{Solution, solve};
pub use tour::{Tour, TourMetrics};
