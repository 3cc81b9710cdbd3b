//! Route requests as supplied by the route source.

use rp_core::GeoPoint;

use crate::endpoints::select_endpoints;

/// Where a route starts and ends.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RouteAnchors {
    /// Explicit start and end coordinates.
    Explicit { start: GeoPoint, end: GeoPoint },
    /// The route's existing geometry; endpoints are its farthest pair.
    Geometry(Vec<GeoPoint>),
}

impl RouteAnchors {
    /// Start and end coordinates, or `None` for an empty geometry.
    pub fn endpoints(&self) -> Option<(GeoPoint, GeoPoint)> {
        match self {
            RouteAnchors::Explicit { start, end } => Some((*start, *end)),
            RouteAnchors::Geometry(points) => select_endpoints(points),
        }
    }
}

/// One route to plan.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteRequest {
    pub id:   String,
    pub name: String,
    pub anchors: RouteAnchors,
    /// Plan start→end→start instead of start→end.
    #[cfg_attr(feature = "serde", serde(default))]
    pub round_trip: bool,
}

impl RouteRequest {
    pub fn between(
        id: impl Into<String>,
        name: impl Into<String>,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            anchors: RouteAnchors::Explicit { start, end },
            round_trip: false,
        }
    }

    pub fn from_geometry(
        id: impl Into<String>,
        name: impl Into<String>,
        geometry: Vec<GeoPoint>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            anchors: RouteAnchors::Geometry(geometry),
            round_trip: false,
        }
    }

    /// Mark this request as an out-and-back circuit.
    pub fn as_round_trip(mut self) -> Self {
        self.round_trip = true;
        self
    }
}
