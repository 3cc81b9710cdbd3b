//! davao — capacitated jeepney route planning on a synthetic Davao City
//! network.
//!
//! Plans seven routes (explicit anchors, legacy geometries, one round trip,
//! one unreachable, one without geometry) with at most two routes per
//! directed road segment, then prints a summary and the JSON report.

mod network;

use std::time::Instant;

use anyhow::Result;
use tracing::info;

use rp_core::PlannerConfig;
use rp_network::EdgeRef;
use rp_planner::{PlanObserver, PlanReport, PlanningSession, RouteRequest};

use network::{build_network, node_name};

// ── Inputs ────────────────────────────────────────────────────────────────────

const CONFIG_JSON: &str = r#"{
    "max_per_edge": 2,
    "min_density": 1.0,
    "snap_metric": "haversine",
    "conflict_policy": "incremental"
}"#;

const ROUTES_JSON: &str = r#"[
    { "id": "R01", "name": "Toril – Bankerohan",
      "anchors": { "explicit": { "start": { "lat": 7.018, "lon": 125.497 },
                                 "end":   { "lat": 7.071, "lon": 125.607 } } } },
    { "id": "R02", "name": "Toril – San Pedro",
      "anchors": { "explicit": { "start": { "lat": 7.019, "lon": 125.498 },
                                 "end":   { "lat": 7.065, "lon": 125.612 } } } },
    { "id": "R03", "name": "Mintal – Matina – Agdao",
      "anchors": { "geometry": [ { "lat": 7.086, "lon": 125.502 },
                                 { "lat": 7.058, "lon": 125.588 },
                                 { "lat": 7.086, "lon": 125.625 } ] } },
    { "id": "R04", "name": "Toril – Sasa",
      "anchors": { "explicit": { "start": { "lat": 7.018, "lon": 125.497 },
                                 "end":   { "lat": 7.118, "lon": 125.655 } } } },
    { "id": "R05", "name": "Buhangin – Sasa loop", "round_trip": true,
      "anchors": { "explicit": { "start": { "lat": 7.108, "lon": 125.614 },
                                 "end":   { "lat": 7.118, "lon": 125.655 } } } },
    { "id": "R06", "name": "Paquibato feeder",
      "anchors": { "explicit": { "start": { "lat": 7.108, "lon": 125.614 },
                                 "end":   { "lat": 7.320, "lon": 125.620 } } } },
    { "id": "R07", "name": "Unsurveyed line",
      "anchors": { "geometry": [] } }
]"#;

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct ConflictCounter {
    conflicts: usize,
}

impl PlanObserver for ConflictCounter {
    fn on_route_start(&mut self, index: usize, request: &RouteRequest) {
        info!(index, route = %request.id, "planning {}", request.name);
    }

    fn on_conflict(&mut self, _request: &RouteRequest, _edge: EdgeRef) {
        self.conflicts += 1;
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== davao — capacitated route planning ===");

    // 1. Network with barangay-derived densities.
    let network = build_network()?;
    println!(
        "Road network: {} nodes, {} directed edges",
        network.node_count(),
        network.edge_count()
    );

    // 2. Configuration and requests.
    let config: PlannerConfig = serde_json::from_str(CONFIG_JSON)?;
    let requests: Vec<RouteRequest> = serde_json::from_str(ROUTES_JSON)?;
    println!(
        "Routes: {}  |  max per edge: {}  |  policy: {}",
        requests.len(),
        config.max_per_edge,
        config.conflict_policy
    );
    println!();

    // 3. Plan.
    let mut session = PlanningSession::new(config, network)?;
    let mut counter = ConflictCounter::default();
    let t0 = Instant::now();
    let report = session.plan_all(&requests, &mut counter);
    let elapsed = t0.elapsed();

    // 4. Summary.
    print_summary(&report);
    println!();
    println!(
        "Planned {} / {} routes in {:.3} ms  ({} conflicts, peak edge load {})",
        report.planned.len(),
        requests.len(),
        elapsed.as_secs_f64() * 1_000.0,
        counter.conflicts,
        session.capacity().peak()
    );
    println!();

    // 5. Machine-readable report.
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_summary(report: &PlanReport) {
    println!("{:<5} {:<26} {:<9} {}", "Route", "Name", "Reroutes", "Path");
    println!("{}", "-".repeat(72));
    for route in &report.planned {
        let path: Vec<&str> = route.nodes.iter().map(|&n| node_name(n)).collect();
        println!(
            "{:<5} {:<26} {:<9} {}",
            route.id,
            route.name,
            route.reroutes,
            path.join(" → ")
        );
    }
    for failure in &report.failed {
        println!("{:<5} {:<26} {:<9} dropped: {}", failure.id, failure.name, "-", failure.reason);
    }
}
