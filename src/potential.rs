//! A*-style consistent potentials for the profile Dijkstra (component D,
//! spec §4.4).
//!
//! Grounded on `original_source/ev_routing/dijkstra_profile.py::_alpha` and
//! `::_potential`.

use crate::f64nn::f64s;
use crate::graph::{Graph, VertexId};

/// Chooses the elevation-cost exponent alpha in {1, 2} so that
/// `pi(v) = alpha * elev(v)` never overestimates the true remaining cost to
/// the target (spec §4.4).
///
/// The original computes `alpha_max`/`alpha_min` with Python's truncating
/// `int()`; this keeps the spec's floor/ceil wording instead, which only
/// differs from the original on negative per-edge uphill/downhill ratios
/// landing exactly on an integer boundary (documented in DESIGN.md).
pub fn alpha(graph: &Graph) -> u32 {
	let mut ratio_up_max: f64 = f64::NEG_INFINITY;
	let mut ratio_down_min: f64 = f64::INFINITY;

	for edge in graph.edges() {
		let u = graph.vertex(edge.u).expect("edge references unknown vertex");
		let v = graph.vertex(edge.v).expect("edge references unknown vertex");
		let delta_elev = v.elev - u.elev;
		if delta_elev == 0.0 {
			continue;
		}
		let ratio = edge.cost.f() / delta_elev;
		if delta_elev > 0.0 {
			ratio_up_max = ratio_up_max.max(ratio);
		} else {
			ratio_down_min = ratio_down_min.min(ratio);
		}
	}

	if !ratio_up_max.is_finite() && !ratio_down_min.is_finite() {
		return 1;
	}

	let alpha_max = if ratio_up_max.is_finite() { ratio_up_max.floor() as i64 } else { i64::MAX };
	let alpha_min = if ratio_down_min.is_finite() { ratio_down_min.ceil() as i64 } else { i64::MIN };

	if alpha_min <= 1 && 1 <= alpha_max {
		1
	} else {
		2
	}
}

/// `pi(v) = alpha * elev(v)`, the consistent lower-bound potential used to
/// steer the profile Dijkstra toward the target (spec §4.4).
pub fn potential(graph: &Graph, alpha: u32) -> Vec<(VertexId, f64s)> {
	graph
		.vertex_ids()
		.map(|id| {
			let v = graph.vertex(id).expect("vertex id came from vertex_ids");
			let pi = alpha as f64 * v.elev;
			(id, f64s::try_from(pi).expect("potential computed as NaN"))
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::Vertex;
	use std::convert::TryFrom;

	fn v(id: usize, elev: f64) -> Vertex {
		Vertex { id, lat: 0.0, lon: 0.0, elev }
	}

	#[test]
	fn alpha_is_one_for_gentle_grades() {
		let mut g = Graph::new();
		g.add_vertex(v(0, 0.0));
		g.add_vertex(v(1, 10.0));
		g.add_edge(0, 1, f64s::try_from(10.0).unwrap()).unwrap();
		assert_eq!(alpha(&g), 1);
	}

	#[test]
	fn alpha_falls_back_to_two_for_steep_grades() {
		let mut g = Graph::new();
		g.add_vertex(v(0, 0.0));
		g.add_vertex(v(1, 10.0));
		g.add_edge(0, 1, f64s::try_from(30.0).unwrap()).unwrap();
		assert_eq!(alpha(&g), 2);
	}
}
