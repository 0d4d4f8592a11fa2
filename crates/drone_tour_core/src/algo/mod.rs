pub mod branch_bound;
pub mod insertion;
pub mod spanning;
