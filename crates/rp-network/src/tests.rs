//! Unit tests for rp-network.
//!
//! All tests use hand-crafted networks.

#[cfg(test)]
mod helpers {
    use rp_core::{GeoPoint, NodeId};

    use crate::{EdgeAttrs, EdgeWeight, RoadNetwork, RoadNetworkBuilder};

    /// Prices an edge by its length, 1 when unknown.
    pub struct ByLength;

    impl EdgeWeight for ByLength {
        fn cost(&self, attrs: &EdgeAttrs) -> f64 {
            attrs.length_m.unwrap_or(1.0) as f64
        }
    }

    /// Build a small grid network for testing.
    ///
    /// Nodes (lat, lon):
    ///   0:(0,0)  1:(0,1)  2:(0,2)
    ///   3:(1,0)           4:(1,2)
    ///
    /// Undirected roads: 0-1, 1-2, 2-4 (100 m each), 0-3 (500 m), 3-4 (100 m)
    ///
    /// Shortest path 0→4: 0→1→2→4 (300) beats 0→3→4 (600).
    pub fn grid_network() -> (RoadNetwork, [NodeId; 5]) {
        let mut b = RoadNetworkBuilder::new();

        let n0 = b.add_node(GeoPoint::new(0.0, 0.0));
        let n1 = b.add_node(GeoPoint::new(0.0, 1.0));
        let n2 = b.add_node(GeoPoint::new(0.0, 2.0));
        let n3 = b.add_node(GeoPoint::new(1.0, 0.0));
        let n4 = b.add_node(GeoPoint::new(1.0, 2.0));

        b.add_road(n0, n1, EdgeAttrs::from_length(100.0));
        b.add_road(n1, n2, EdgeAttrs::from_length(100.0));
        b.add_road(n2, n4, EdgeAttrs::from_length(100.0));
        b.add_road(n0, n3, EdgeAttrs::from_length(500.0)); // long road
        b.add_road(n3, n4, EdgeAttrs::from_length(100.0));

        (b.build().unwrap(), [n0, n1, n2, n3, n4])
    }
}

// ── Builder & network structure ────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use rp_core::{EdgeKey, GeoPoint, NodeId};

    use crate::{EdgeAttrs, EdgeRef, NetworkError, RoadNetwork, RoadNetworkBuilder};

    #[test]
    fn empty_build() {
        let net = RoadNetworkBuilder::new().build().unwrap();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
        assert!(RoadNetwork::empty().is_empty());
    }

    #[test]
    fn road_adds_both_directions_with_one_key() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(7.0, 125.0));
        let c = b.add_node(GeoPoint::new(7.1, 125.0));
        let key = b.add_road(a, c, EdgeAttrs::from_length(1_000.0));
        let net = b.build().unwrap();
        assert_eq!(net.edge_count(), 2);
        assert!(net.contains_edge(&EdgeRef::new(a, c, key)));
        assert!(net.contains_edge(&EdgeRef::new(c, a, key)));
    }

    #[test]
    fn parallel_edges_get_distinct_keys() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        let k0 = b.add_directed_edge(a, c, EdgeAttrs::from_length(10.0));
        let k1 = b.add_directed_edge(a, c, EdgeAttrs::from_length(20.0));
        assert_eq!(k0, EdgeKey(0));
        assert_eq!(k1, EdgeKey(1));

        let net = b.build().unwrap();
        assert_eq!(net.edges_between(a, c).count(), 2);
        assert_eq!(
            net.attrs_of(&EdgeRef::new(a, c, k1)).unwrap().length_m,
            Some(20.0)
        );
    }

    #[test]
    fn explicit_key_bumps_automatic_keys() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_keyed_edge(EdgeRef::new(a, c, EdgeKey(2)), EdgeAttrs::default());
        assert_eq!(b.add_directed_edge(a, c, EdgeAttrs::default()), EdgeKey(3));
    }

    #[test]
    fn duplicate_triple_rejected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        let edge = EdgeRef::new(a, c, EdgeKey(0));
        b.add_keyed_edge(edge, EdgeAttrs::default());
        b.add_keyed_edge(edge, EdgeAttrs::default());
        assert_eq!(b.build().err(), Some(NetworkError::DuplicateEdge(edge)));
    }

    #[test]
    fn unknown_node_rejected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        b.add_directed_edge(a, NodeId(9), EdgeAttrs::default());
        assert_eq!(b.build().err(), Some(NetworkError::NodeNotFound(NodeId(9))));
    }

    #[test]
    fn csr_out_edges() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::grid_network();
        assert_eq!(net.out_degree(n0), 2); // n0→n1, n0→n3
        assert_eq!(net.out_degree(n1), 2);
        assert_eq!(net.out_degree(n2), 2);
        assert_eq!(net.out_degree(n3), 2);
        assert_eq!(net.out_degree(n4), 2);
        for e in net.out_edges(n0) {
            assert_eq!(net.edge_from[e.index()], n0);
        }
        let neighbors: Vec<_> = net.neighbors(n0).collect();
        assert_eq!(neighbors, vec![n1, n3]);
    }

    #[test]
    fn attribute_updates() {
        let (mut net, [n0, n1, ..]) = super::helpers::grid_network();
        let edge = EdgeRef::new(n0, n1, EdgeKey(0));
        net.set_edge_density(&edge, Some(250.0)).unwrap();
        net.set_edge_length(&edge, None).unwrap();
        let attrs = net.attrs_of(&edge).unwrap();
        assert_eq!(attrs.density, Some(250.0));
        assert_eq!(attrs.length_m, None);

        let missing = EdgeRef::new(n0, n1, EdgeKey(5));
        assert_eq!(
            net.set_edge_density(&missing, Some(1.0)),
            Err(NetworkError::EdgeNotFound(missing))
        );
    }
}

// ── Removal & restoration ─────────────────────────────────────────────────────

#[cfg(test)]
mod removal {
    use rp_core::EdgeKey;

    use crate::{EdgeAttrs, EdgeRef, NetworkError};

    #[test]
    fn remove_then_restore_is_identical() {
        let (mut net, [n0, n1, ..]) = super::helpers::grid_network();
        let edge = EdgeRef::new(n0, n1, EdgeKey(0));
        net.set_edge_density(&edge, Some(42.0)).unwrap();
        let before = net.edge_snapshot();

        let removed = net.remove_edge(&edge).unwrap();
        assert_eq!(removed.edge(), edge);
        assert_eq!(removed.attrs(), &EdgeAttrs::from_length(100.0).with_density(42.0));
        assert!(!net.contains_edge(&edge));
        assert_eq!(net.attrs_of(&edge), None);
        assert_eq!(net.out_degree(n0), 1);
        assert_eq!(net.live_edge_count(), before.len() - 1);

        net.restore_edge(removed).unwrap();
        assert_eq!(net.edge_snapshot(), before);
    }

    #[test]
    fn double_remove_fails() {
        let (mut net, [n0, n1, ..]) = super::helpers::grid_network();
        let edge = EdgeRef::new(n0, n1, EdgeKey(0));
        let removed = net.remove_edge(&edge).unwrap();
        assert_eq!(net.remove_edge(&edge).err(), Some(NetworkError::EdgeNotFound(edge)));
        net.restore_edge(removed).unwrap();
    }

    #[test]
    fn double_restore_fails() {
        let (mut net, [n0, n1, ..]) = super::helpers::grid_network();
        let edge = EdgeRef::new(n0, n1, EdgeKey(0));
        let removed = net.remove_edge(&edge).unwrap();
        net.restore_edge(removed.clone()).unwrap();
        assert_eq!(
            net.restore_edge(removed),
            Err(NetworkError::EdgeAlreadyPresent(edge))
        );
    }

    #[test]
    fn guard_restores_on_drop() {
        let (mut net, [n0, n1, n2, ..]) = super::helpers::grid_network();
        let before = net.edge_snapshot();
        {
            let mut guard = net.scoped_removal();
            guard.remove(&EdgeRef::new(n0, n1, EdgeKey(0))).unwrap();
            guard.remove(&EdgeRef::new(n1, n2, EdgeKey(0))).unwrap();
            assert_eq!(guard.removed_count(), 2);
            assert_eq!(guard.out_degree(n1), 1); // deref to the network
            let held: Vec<_> = guard.removed().collect();
            assert_eq!(held[0], EdgeRef::new(n0, n1, EdgeKey(0)));
        }
        assert_eq!(net.edge_snapshot(), before);
    }

    #[test]
    fn guard_restores_on_early_error_return() {
        fn remove_two(
            net: &mut crate::RoadNetwork,
            a: EdgeRef,
            b: EdgeRef,
        ) -> Result<(), NetworkError> {
            let mut guard = net.scoped_removal();
            guard.remove(&a)?;
            guard.remove(&b)?; // fails: absent
            Ok(())
        }

        let (mut net, [n0, n1, _, _, n4]) = super::helpers::grid_network();
        let before = net.edge_snapshot();
        let bogus = EdgeRef::new(n0, n4, EdgeKey(0));
        let err = remove_two(&mut net, EdgeRef::new(n0, n1, EdgeKey(0)), bogus);
        assert_eq!(err, Err(NetworkError::EdgeNotFound(bogus)));
        assert_eq!(net.edge_snapshot(), before);
    }
}

// ── Spatial snap & population ─────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use rp_core::{EdgeKey, GeoPoint, SnapMetric};

    use crate::{EdgeRef, RoadNetworkBuilder};

    #[test]
    fn snap_exact_position() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        for metric in [SnapMetric::Planar, SnapMetric::Haversine] {
            assert_eq!(net.snap_to_node(GeoPoint::new(0.0, 0.0), metric), Some(n0));
        }
    }

    #[test]
    fn snap_nearest() {
        let (net, [n0, n1, ..]) = super::helpers::grid_network();
        for metric in [SnapMetric::Planar, SnapMetric::Haversine] {
            assert_eq!(net.snap_to_node(GeoPoint::new(0.0, 0.4), metric), Some(n0));
            assert_eq!(net.snap_to_node(GeoPoint::new(0.0, 0.6), metric), Some(n1));
        }
    }

    #[test]
    fn empty_network_returns_none() {
        let net = RoadNetworkBuilder::new().build().unwrap();
        assert!(net.snap_to_node(GeoPoint::new(0.0, 0.0), SnapMetric::Planar).is_none());
        assert!(net.snap_to_node(GeoPoint::new(0.0, 0.0), SnapMetric::Haversine).is_none());
    }

    #[test]
    fn non_finite_position_snaps_nowhere() {
        let (mut net, _) = super::helpers::grid_network();
        for metric in [SnapMetric::Planar, SnapMetric::Haversine] {
            for pos in [
                GeoPoint::new(f32::NAN, 0.0),
                GeoPoint::new(0.0, f32::NAN),
                GeoPoint::new(f32::INFINITY, 1.0),
            ] {
                assert_eq!(net.snap_to_node(pos, metric), None, "{pos} via {metric:?}");
            }
            assert_eq!(net.attach_population(GeoPoint::new(f32::NAN, 0.0), 10.0, metric), None);
        }
        assert!(net.node_population.iter().all(Option::is_none));
    }

    #[test]
    fn population_accumulates_on_nearest_node() {
        let (mut net, [n0, ..]) = super::helpers::grid_network();
        let hit = net.attach_population(GeoPoint::new(0.1, 0.1), 300.0, SnapMetric::Planar);
        assert_eq!(hit, Some(n0));
        net.attach_population(GeoPoint::new(-0.1, 0.0), 200.0, SnapMetric::Planar);
        assert_eq!(net.node_population[n0.index()], Some(500.0));
    }

    #[test]
    fn density_is_mean_of_populated_endpoints() {
        let (mut net, [n0, n1, n2, _, n4]) = super::helpers::grid_network();
        net.node_population[n0.index()] = Some(100.0);
        net.node_population[n1.index()] = Some(300.0);
        net.derive_edge_density();

        let both = EdgeRef::new(n0, n1, EdgeKey(0));
        let one  = EdgeRef::new(n1, n2, EdgeKey(0));
        let none = EdgeRef::new(n2, n4, EdgeKey(0));
        assert_eq!(net.attrs_of(&both).unwrap().density, Some(200.0));
        assert_eq!(net.attrs_of(&one).unwrap().density, Some(300.0));
        assert_eq!(net.attrs_of(&none).unwrap().density, None);
    }
}

// ── Dijkstra routing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use rp_core::{EdgeKey, GeoPoint, NodeId};

    use super::helpers::ByLength;
    use crate::{DijkstraRouter, EdgeAttrs, EdgeRef, NetworkError, RoadNetworkBuilder, Router};

    #[test]
    fn trivial_same_node() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let r = DijkstraRouter.route(&net, n0, n0, &ByLength).unwrap();
        assert!(r.is_trivial());
        assert_eq!(r.total_cost, 0.0);
        assert_eq!(r.nodes(&net), vec![n0]);
        assert_eq!(r.destination(&net), n0);
    }

    #[test]
    fn shortest_path_correct() {
        let (net, [n0, n1, n2, _, n4]) = super::helpers::grid_network();
        let route = DijkstraRouter.route(&net, n0, n4, &ByLength).unwrap();
        assert_eq!(route.total_cost, 300.0);
        assert_eq!(route.nodes(&net), vec![n0, n1, n2, n4]);
        assert_eq!(route.destination(&net), n4);
    }

    #[test]
    fn cheapest_parallel_edge_wins() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, EdgeAttrs::from_length(50.0));
        let cheap = b.add_directed_edge(a, c, EdgeAttrs::from_length(5.0));
        let net = b.build().unwrap();

        let route = DijkstraRouter.route(&net, a, c, &ByLength).unwrap();
        assert_eq!(route.edge_refs(&net), vec![EdgeRef::new(a, c, cheap)]);
        assert_eq!(route.total_cost, 5.0);
    }

    #[test]
    fn equal_cost_tie_goes_to_first_inserted() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, EdgeAttrs::from_length(5.0));
        b.add_directed_edge(a, c, EdgeAttrs::from_length(5.0));
        let net = b.build().unwrap();

        let route = DijkstraRouter.route(&net, a, c, &ByLength).unwrap();
        assert_eq!(route.edge_refs(&net), vec![EdgeRef::new(a, c, EdgeKey(0))]);
    }

    #[test]
    fn removed_edge_is_avoided() {
        let (mut net, [n0, n1, _, n3, n4]) = super::helpers::grid_network();
        let mut guard = net.scoped_removal();
        guard.remove(&EdgeRef::new(n0, n1, EdgeKey(0))).unwrap();
        let route = DijkstraRouter.route(&guard, n0, n4, &ByLength).unwrap();
        assert_eq!(route.nodes(&guard), vec![n0, n3, n4]);
        assert_eq!(route.total_cost, 600.0);
    }

    #[test]
    fn no_route_disconnected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(1.0, 0.0));
        let net = b.build().unwrap();
        let result = DijkstraRouter.route(&net, a, c, &ByLength);
        assert!(matches!(result, Err(NetworkError::NoRoute { .. })));
    }

    #[test]
    fn unknown_node_is_reported() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let result = DijkstraRouter.route(&net, n0, NodeId(77), &ByLength);
        assert_eq!(result.err(), Some(NetworkError::NodeNotFound(NodeId(77))));
    }

    #[test]
    fn directed_one_way_blocks_return() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, EdgeAttrs::from_length(100.0));
        let net = b.build().unwrap();

        assert!(DijkstraRouter.route(&net, a, c, &ByLength).is_ok());
        assert!(DijkstraRouter.route(&net, c, a, &ByLength).is_err());
    }
}
