//! Built-in 10-vertex, 18-edge testing fixture (spec §8 scenario 5).
//!
//! Restored from `original_source/ev_routing/map/map_api.py::testing_vertices`
//! / `::testing_edges`: the distilled spec described the fixture's shape but
//! dropped its literal data, so it's supplemented here in full (spec's
//! Non-goals never named this fixture). Vertex coordinates are generated from
//! the same `area`/`dlat`/`dlon` grid and per-vertex `(row, col)` multipliers
//! `testing_vertices` uses; edge adjacency and costs are transcribed directly
//! from `testing_edges`. Elevation is left at `0.0` for every vertex, matching
//! `_new_vertex`'s default, which `testing_vertices` never overwrites.

use std::convert::TryFrom;

use crate::data::{AreaRecord, EdgeRecord, VertexRecord};
use crate::f64nn::f64s;

/// `(lat0, lon0, lat1, lon1)`, the hard-coded testing area from
/// `MapAPI.__init__`'s `if testing: area = [...]` branch.
const AREA: (f64, f64, f64, f64) = (52.51, 13.373, 52.52, 13.401);

/// `(row, col)` grid multipliers per vertex, 0-9: vertex `id` sits at
/// `(lat0 + row * dlat, lon0 + col * dlon)` where `dlat = (lat1 - lat0) / 5`
/// and `dlon = (lon1 - lon0) / 6`.
const VERTEX_GRID: [(i64, i64); 10] = [(2, 2), (3, 1), (4, 3), (3, 2), (0, 1), (1, 5), (1, 2), (3, 5), (2, 4), (0, 0)];

/// `(u, v)` adjacency for the 18 directed edges, paired positionally with
/// `EDGE_COSTS`.
const EDGE_ADJACENCY: [(usize, usize); 18] =
	[(2, 3), (1, 3), (0, 3), (3, 1), (3, 0), (1, 0), (8, 0), (0, 8), (7, 8), (8, 7), (8, 5), (5, 8), (0, 6), (6, 0), (4, 6), (6, 4), (9, 4), (4, 9)];

const EDGE_COSTS: [f64; 18] = [1.0, 2.0, 2.0, 2.0, 2.0, 5.0, 3.0, 3.0, 5.0, 5.0, 5.0, 5.0, 1.0, 1.0, 2.0, 2.0, 1.0, 1.0];

/// Two charging-station vertex ids used by the CS extension's `testing`
/// mode (spec §4.6, §8 scenario 7 / `cs_floyd_warshall_test.py::test_csfw`).
pub const TESTING_STATION_IDS: [usize; 2] = [4, 8];

pub fn testing_area() -> AreaRecord {
	let (lat0, lon0, lat1, lon1) = AREA;
	let dlat = (lat1 - lat0) / 5.0;
	let dlon = (lon1 - lon0) / 6.0;

	let vertices = VERTEX_GRID
		.iter()
		.enumerate()
		.map(|(id, &(row, col))| VertexRecord { id, lat: lat0 + row as f64 * dlat, lon: lon0 + col as f64 * dlon, elev: 0.0 })
		.collect();
	let edges = EDGE_ADJACENCY
		.iter()
		.zip(EDGE_COSTS.iter())
		.map(|(&(u, v), &cost)| EdgeRecord { u, v, cost: Some(cost) })
		.collect();
	AreaRecord { vertices, edges }
}

pub fn edge_cost(edge_index: usize) -> f64s {
	f64s::try_from(EDGE_COSTS[edge_index]).unwrap()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fixture_has_ten_vertices_and_eighteen_edges() {
		let area = testing_area();
		assert_eq!(area.vertices.len(), 10);
		assert_eq!(area.edges.len(), 18);
	}
}
