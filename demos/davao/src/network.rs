//! Synthetic Davao City road network.
//!
//! Eleven nodes loosely placed on the city's main corridors, with barangay
//! populations attached to their nearest node.  Paquibato has no road
//! connection so that one demo route fails with `no-path`.

use anyhow::Result;

use rp_core::{GeoPoint, NodeId, SnapMetric};
use rp_network::{EdgeAttrs, RoadNetwork, RoadNetworkBuilder};

/// `(name, lat, lon)` of every road node, in insertion order.
const NODES: [(&str, f32, f32); 11] = [
    ("Toril",      7.018, 125.497),
    ("Mintal",     7.087, 125.501),
    ("Ulas",       7.050, 125.565),
    ("Matina",     7.058, 125.587),
    ("Bankerohan", 7.071, 125.607),
    ("San Pedro",  7.065, 125.612),
    ("Agdao",      7.086, 125.624),
    ("Buhangin",   7.108, 125.614),
    ("Lanang",     7.103, 125.638),
    ("Sasa",       7.118, 125.655),
    ("Paquibato",  7.320, 125.620),
];

/// Two-way road segments by node index.
const ROADS: [(usize, usize); 14] = [
    (0, 2),  // Toril – Ulas (coastal)
    (0, 1),  // Toril – Mintal
    (1, 2),  // Mintal – Ulas
    (2, 3),  // Ulas – Matina
    (3, 4),  // Matina – Bankerohan
    (3, 5),  // Matina – San Pedro (MacArthur Hwy)
    (4, 5),
    (4, 7),  // Bankerohan – Buhangin (diversion road)
    (5, 6),  // San Pedro – Agdao
    (6, 8),  // Agdao – Lanang
    (6, 7),
    (7, 8),
    (8, 9),  // Lanang – Sasa
    (7, 9),
];

/// Barangay population centroids `(lat, lon, population)`.
const BARANGAYS: [(f32, f32, f32); 9] = [
    (7.020, 125.500, 62_000.0),
    (7.090, 125.505, 31_000.0),
    (7.055, 125.585, 48_000.0),
    (7.066, 125.610, 21_000.0),
    (7.072, 125.606, 18_500.0),
    (7.085, 125.622, 40_000.0),
    (7.110, 125.612, 95_000.0),
    (7.117, 125.653, 34_000.0),
    (7.318, 125.618, 4_000.0),
];

/// Build the network and derive edge densities from barangay populations.
pub fn build_network() -> Result<RoadNetwork> {
    let mut b = RoadNetworkBuilder::with_capacity(NODES.len(), ROADS.len() * 2);

    let ids: Vec<NodeId> = NODES
        .iter()
        .map(|&(_, lat, lon)| b.add_node(GeoPoint::new(lat, lon)))
        .collect();

    for &(a, c) in &ROADS {
        let length_m = b.node_pos(ids[a]).distance_m(b.node_pos(ids[c])) as f32;
        b.add_road(ids[a], ids[c], EdgeAttrs::from_length(length_m));
    }

    let mut net = b.build()?;
    for &(lat, lon, population) in &BARANGAYS {
        net.attach_population(GeoPoint::new(lat, lon), population, SnapMetric::Haversine);
    }
    net.derive_edge_density();
    Ok(net)
}

/// Display name of a node.
pub fn node_name(node: NodeId) -> &'static str {
    NODES.get(node.index()).map_or("?", |&(name, _, _)| name)
}
