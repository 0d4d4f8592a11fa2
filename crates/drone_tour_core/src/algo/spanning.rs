use crate::{Error, Result, geometry::EdgeCost, site::Site};

/// Cross-campus edges are only allowed when one end is a border site.
pub fn region_constrained_weight(a: &Site, b: &Site) -> EdgeCost {
    if a.region() != b.region() && !a.is_border() && !b.is_border() {
        return EdgeCost::Forbidden;
    }
    EdgeCost::Finite(a.squared_dist(b))
}

pub fn unconstrained_weight(a: &Site, b: &Site) -> EdgeCost {
    EdgeCost::Finite(a.squared_dist(b))
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpanningTree {
    /// Sum of Euclidean edge lengths.
    pub cost: f64,
    /// Site index pairs, smaller index first, one per non-seed node.
    pub edges: Vec<(usize, usize)>,
}

#[derive(Clone, Copy, Debug)]
struct SpanningNode {
    site: usize,
    visited: bool,
    distance: EdgeCost,
    /// Position in the subset, not a site index.
    predecessor: Option<usize>,
}

/// One Prim run over a subset of sites. Positions inside the sweep follow
/// the order of the subset slice, which fixes the tie-breaking.
pub(crate) struct PrimSweep {
    nodes: Vec<SpanningNode>,
}

impl PrimSweep {
    pub(crate) fn run<W>(sites: &[Site], subset: &[usize], weight: W) -> Result<Self>
    where
        W: Fn(&Site, &Site) -> EdgeCost,
    {
        let mut nodes: Vec<SpanningNode> = subset
            .iter()
            .map(|&site| SpanningNode {
                site,
                visited: false,
                distance: EdgeCost::Unknown,
                predecessor: None,
            })
            .collect();
        let total = nodes.len();
        if total == 0 {
            return Ok(Self { nodes });
        }
        nodes[0].distance = EdgeCost::Finite(0.0);

        for selected in 0..total - 1 {
            let Some(current) = closest_unvisited(&nodes) else {
                return Err(Error::DisconnectedGraph {
                    connected: selected,
                    total,
                });
            };
            nodes[current].visited = true;
            let from = sites[nodes[current].site];

            for node in nodes.iter_mut().filter(|node| !node.visited) {
                let candidate = weight(&from, &sites[node.site]);
                if candidate.improves_on(node.distance) {
                    node.distance = candidate;
                    if candidate.finite().is_some() {
                        node.predecessor = Some(current);
                    }
                }
            }
        }

        // The last node is never selected; it only has to be reachable.
        if nodes.iter().any(|node| node.distance.finite().is_none()) {
            return Err(Error::DisconnectedGraph {
                connected: total - 1,
                total,
            });
        }

        Ok(Self { nodes })
    }

    pub(crate) fn total_cost(&self) -> f64 {
        self.nodes
            .iter()
            .skip(1)
            .filter_map(|node| node.distance.finite())
            .map(f64::sqrt)
            .sum()
    }

    pub(crate) fn into_tree(self) -> SpanningTree {
        let cost = self.total_cost();
        let edges = self
            .nodes
            .iter()
            .skip(1)
            .filter_map(|node| {
                let parent = self.nodes[node.predecessor?].site;
                Some((parent.min(node.site), parent.max(node.site)))
            })
            .collect();
        SpanningTree { cost, edges }
    }
}

fn closest_unvisited(nodes: &[SpanningNode]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (pos, node) in nodes.iter().enumerate() {
        if node.visited {
            continue;
        }
        let Some(distance) = node.distance.finite() else {
            continue;
        };
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((pos, distance));
        }
    }
    best.map(|(pos, _)| pos)
}

/// Minimum spanning tree over `subset` under `weight`.
pub fn spanning_tree<W>(sites: &[Site], subset: &[usize], weight: W) -> Result<SpanningTree>
where
    W: Fn(&Site, &Site) -> EdgeCost,
{
    Ok(PrimSweep::run(sites, subset, weight)?.into_tree())
}

/// Campus-aware network over every site. Fails with
/// [`Error::DisconnectedGraph`] when the border rule splits the sites.
#[drone_tour_derive::timer("mst")]
pub fn minimum_spanning_network(sites: &[Site]) -> Result<SpanningTree> {
    let subset: Vec<usize> = (0..sites.len()).collect();
    let tree = spanning_tree(sites, &subset, region_constrained_weight).inspect_err(|err| {
        log::warn!("mst: failed n={} err={err}", sites.len());
    })?;

    log::info!(
        "mst: n={} edges={} cost={:.2}",
        sites.len(),
        tree.edges.len(),
        tree.cost
    );
    Ok(tree)
}
