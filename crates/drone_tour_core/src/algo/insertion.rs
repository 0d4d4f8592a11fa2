use crate::{site::Site, tour::Tour};

/// Cheapest-insertion tour. Sites are inserted in index order, each right
/// after the cycle edge whose detour grows the least; the first such edge
/// wins ties. Deterministic for a given input order.
#[drone_tour_derive::timer("insertion")]
pub fn cheapest_insertion(sites: &[Site]) -> Tour {
    let n = sites.len();
    if n < 2 {
        return Tour::from_cycle(sites, &(0..n).collect::<Vec<_>>());
    }

    let mut cycle: Vec<usize> = Vec::with_capacity(n);
    cycle.extend([0, 1]);

    for k in 2..n {
        let insert_at = cheapest_edge(sites, &cycle, k) + 1;
        cycle.insert(insert_at, k);
    }

    let tour = Tour::from_cycle(sites, &cycle);
    log::debug!("insertion: n={n} cost={:.2}", tour.cost);
    tour
}

/// Position `p` of the edge `cycle[p] -> cycle[p + 1]` (wrapping) that is
/// cheapest to break for `site`.
fn cheapest_edge(sites: &[Site], cycle: &[usize], site: usize) -> usize {
    let len = cycle.len();
    let mut best = 0;
    let mut min_increase = f64::INFINITY;

    for p in 0..len {
        let increase = insertion_increase(sites, cycle[p], site, cycle[(p + 1) % len]);
        if increase < min_increase {
            min_increase = increase;
            best = p;
        }
    }
    best
}

fn insertion_increase(sites: &[Site], i: usize, k: usize, j: usize) -> f64 {
    sites[i].dist(&sites[k]) + sites[k].dist(&sites[j]) - sites[i].dist(&sites[j])
}
