//! Directed graph view (component C, spec §2) over vertices with
//! lat/lon/elevation and edges with a scalar SoC cost.
//!
//! Grounded on the teacher's `Graph<NId, N, E>` (`src/graph.rs`, since
//! trimmed) for the "stable-order adjacency over an `IndexMap`" shape, and
//! on `original_source/ev_routing/map/map_api.py::_cost` for the edge-cost
//! formula.

use geo::{point, GeodesicDistance};
use indexmap::IndexMap;

use crate::error::{CoreError, CoreResult};
use crate::f64nn::f64s;

pub type VertexId = usize;
pub type EdgeId = usize;

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct Vertex {
	pub id: VertexId,
	pub lat: f64,
	pub lon: f64,
	pub elev: f64,
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct Edge {
	pub id: EdgeId,
	pub u: VertexId,
	pub v: VertexId,
	pub cost: f64s,
}

/// Immutable directed graph: vertices keyed by insertion order, with
/// per-vertex outgoing/incoming edge-id lists for traversal.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	vertices: IndexMap<VertexId, Vertex>,
	edges: Vec<Edge>,
	outgoing: IndexMap<VertexId, Vec<EdgeId>>,
	incoming: IndexMap<VertexId, Vec<EdgeId>>,
}

impl Graph {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_vertex(&mut self, v: Vertex) {
		self.outgoing.entry(v.id).or_insert_with(Vec::new);
		self.incoming.entry(v.id).or_insert_with(Vec::new);
		self.vertices.insert(v.id, v);
	}

	pub fn add_edge(&mut self, u: VertexId, v: VertexId, cost: f64s) -> CoreResult<EdgeId> {
		if !self.vertices.contains_key(&u) {
			return Err(CoreError::UnknownVertex(u.to_string()));
		}
		if !self.vertices.contains_key(&v) {
			return Err(CoreError::UnknownVertex(v.to_string()));
		}
		let id = self.edges.len();
		self.edges.push(Edge { id, u, v, cost });
		self.outgoing.get_mut(&u).unwrap().push(id);
		self.incoming.get_mut(&v).unwrap().push(id);
		Ok(id)
	}

	pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
		self.vertices.get(&id)
	}

	pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
		self.edges.get(id)
	}

	/// Vertex ids in insertion order (the teacher's `IndexMap`-backed
	/// storage keeps this stable, which the all-pairs matrix indexing in
	/// `fw_profile` relies on).
	pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
		self.vertices.keys().copied()
	}

	pub fn vertex_count(&self) -> usize {
		self.vertices.len()
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn outgoing(&self, v: VertexId) -> &[EdgeId] {
		self.outgoing.get(&v).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn incoming(&self, v: VertexId) -> &[EdgeId] {
		self.incoming.get(&v).map(Vec::as_slice).unwrap_or(&[])
	}

	/// `connected(i, j)` (spec §4.2): true iff there is an edge i -> j.
	pub fn connected(&self, u: VertexId, v: VertexId) -> bool {
		self.outgoing(u).iter().any(|&e| self.edges[e].v == v)
	}

	/// The i -> j edge, if one exists.
	pub fn edge_between(&self, u: VertexId, v: VertexId) -> Option<&Edge> {
		self.outgoing(u).iter().map(|&e| &self.edges[e]).find(|e| e.v == v)
	}
}

/// Asymmetric uphill/downhill SoC cost of travelling directly from `from`
/// to `to` (spec §4.2, `edge_cost`): great-circle distance scaled by
/// `kappa`, plus `lambda` times the elevation gain when climbing or minus
/// `mu` times the elevation drop when descending.
///
/// Grounded on `original_source/ev_routing/map/map_api.py::_cost`, with the
/// haversine-by-hand distance replaced by the `geo` crate's
/// `GeodesicDistance`.
pub fn edge_cost(from: &Vertex, to: &Vertex, kappa: f64, lambda: f64, mu: f64) -> f64s {
	let p1 = point!(x: from.lon, y: from.lat);
	let p2 = point!(x: to.lon, y: to.lat);
	let distance = p1.geodesic_distance(&p2);
	let delta_elev = to.elev - from.elev;
	let elevation_term = if delta_elev >= 0.0 { lambda * delta_elev } else { mu * delta_elev };
	f64s::try_from(kappa * distance + elevation_term).expect("edge cost computed as NaN")
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::convert::TryFrom;

	fn v(id: VertexId, lat: f64, lon: f64, elev: f64) -> Vertex {
		Vertex { id, lat, lon, elev }
	}

	#[test]
	fn connected_reflects_added_edges() {
		let mut g = Graph::new();
		g.add_vertex(v(0, 0.0, 0.0, 0.0));
		g.add_vertex(v(1, 0.0, 0.0, 0.0));
		g.add_edge(0, 1, f64s::try_from(1.0).unwrap()).unwrap();
		assert!(g.connected(0, 1));
		assert!(!g.connected(1, 0));
	}

	#[test]
	fn add_edge_rejects_unknown_vertex() {
		let mut g = Graph::new();
		g.add_vertex(v(0, 0.0, 0.0, 0.0));
		let err = g.add_edge(0, 99, f64s::try_from(1.0).unwrap()).unwrap_err();
		matches!(err, CoreError::UnknownVertex(_));
	}

	#[test]
	fn edge_cost_is_cheaper_downhill_than_uphill() {
		let base = v(0, 52.0, 13.0, 100.0);
		let up = v(1, 52.0, 13.01, 200.0);
		let down = v(2, 52.0, 13.01, 0.0);
		let cost_up = edge_cost(&base, &up, 0.02, 1.0, 0.25);
		let cost_down = edge_cost(&base, &down, 0.02, 1.0, 0.25);
		assert!(cost_down.f() < cost_up.f());
	}
}
