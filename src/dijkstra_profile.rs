//! Profile-generalized Dijkstra (component E, spec §4.3-§4.5).
//!
//! Grounded on `original_source/ev_routing/dijkstra_profile.py::run` for the
//! main loop, and on `original_source/ev_routing/main.py::target_prune` for
//! the pruning test (the profile search never called it in the original --
//! it's commented out there -- so wiring it in is new work, not a port).
//! The decrease-key loop itself follows the teacher's
//! `src/brr.rs::pathfind`, which drives a `PriorityQueue` with negated keys
//! to get min-heap behaviour out of its max-heap `pop()`.

use std::collections::HashMap;

use priority_queue::PriorityQueue;

use crate::bp::{self, BreakPoint};
use crate::f64nn::f64s;
use crate::graph::{Graph, VertexId};
use crate::potential;
use crate::profile::BpList;

/// Maps every possible initial charge at `source` to the optimal charge
/// reachable at `target`, subject to capacity `m`.
pub fn dijkstra_profile(graph: &Graph, source: VertexId, target: VertexId, m: f64s) -> BpList {
	let alpha = potential::alpha(graph);
	let potentials: HashMap<VertexId, f64s> = potential::potential(graph, alpha).into_iter().collect();

	let mut f: HashMap<VertexId, BpList> = graph.vertex_ids().map(|id| (id, BpList::unreachable(m))).collect();
	f.insert(source, BpList::identity(m));

	let mut pq: PriorityQueue<VertexId, f64s> = PriorityQueue::new();
	pq.push(source, -(f64s::ZERO + potentials[&source]));

	while let Some((u, _neg_key)) = pq.pop() {
		for &eid in graph.outgoing(u) {
			let edge = graph.edge(eid).expect("outgoing list references a real edge");
			let v = edge.v;

			// Only prune once the target profile has at least one reachable
			// charge -- pruning against the all-unreachable initial profile
			// would reject every edge before anything is ever discovered.
			if f[&target].reachable() && target_prune(&f[&v], &f[&target], m) {
				continue;
			}

			let f_e = BpList::from_canonical(bp::edge_profile(edge.cost, m));
			let linked = BpList::sort(f[&u].link(&f_e));

			let f_v_before = f[&v].clone();
			let merged = BpList::merge(&f[&v], &linked, m);

			let new_points: Vec<&BreakPoint> = merged.as_slice().iter().filter(|bp| !f_v_before.as_slice().contains(bp)).collect();

			f.insert(v, merged);

			if let Some(min_key) = new_points.iter().map(|bp| bp.x - bp.y).reduce(f64s::min) {
				pq.push(v, -(potentials[&v] + min_key));
			}
		}
	}

	f.remove(&target).expect("target is always present in the profile map")
}

/// `target_prune(f_v, f_t, M)` (spec §4.5): true when no initial charge at
/// `v` can possibly improve on what's already known reachable at the
/// target, so the edge into `v` need not be relaxed further.
///
/// Grounded verbatim on `original_source/ev_routing/main.py::target_prune`.
pub fn target_prune(f_v: &BpList, f_t: &BpList, m: f64s) -> bool {
	let mut c_t = vec![0.0_f64];
	for bp in f_t.as_slice() {
		let consumption = bp.x.f() - bp.y.f();
		if consumption <= m.f() {
			c_t.push(consumption);
		}
	}
	let c_t_max = c_t.into_iter().fold(f64::NEG_INFINITY, f64::max);

	let mut c_v = vec![m.f()];
	for bp in f_v.as_slice() {
		let consumption = bp.x.f() - bp.y.f();
		if consumption >= 0.0 {
			c_v.push(consumption);
		}
	}
	let c_v_min = c_v.into_iter().fold(f64::INFINITY, f64::min);

	let b_t_min = find_minimum_bv(f_t);
	let b_v_min = find_minimum_bv(f_v);

	b_v_min >= b_t_min && c_v_min >= c_t_max
}

/// Smallest initial charge at which `l` is reachable at all, or 0 if `l` is
/// unreachable everywhere.
fn find_minimum_bv(l: &BpList) -> f64 {
	for bp in l.as_slice() {
		if bp.y.f() >= 0.0 {
			return bp.x.f();
		}
	}
	0.0
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bp::Slope;
	use crate::graph::{Graph, Vertex};
	use std::convert::TryFrom;

	fn bp(x: f64, y: f64, s: Slope) -> BreakPoint {
		BreakPoint::new(x, y, s)
	}

	/// Scenario 6 (spec §8): literal target_prune truthiness check.
	#[test]
	fn target_prune_matches_worked_example() {
		let m = f64s::try_from(5.0).unwrap();

		let f_t = BpList(vec![
			bp(0.0, f64::NEG_INFINITY, Slope::Flat),
			bp(2.0, 0.0, Slope::Unit),
			bp(3.0, 1.0, Slope::Flat),
			bp(4.0, 1.0, Slope::Unit),
			bp(5.0, 2.0, Slope::Flat),
		]);

		let f_v = BpList(vec![bp(0.0, f64::NEG_INFINITY, Slope::Flat), bp(3.0, 0.0, Slope::Unit), bp(4.0, 1.0, Slope::Flat), bp(5.0, 1.0, Slope::Flat)]);

		assert!(target_prune(&f_v, &f_t, m));
	}

	#[test]
	fn dijkstra_profile_reaches_directly_connected_target() {
		let m = f64s::try_from(10.0).unwrap();
		let mut g = Graph::new();
		g.add_vertex(Vertex { id: 0, lat: 0.0, lon: 0.0, elev: 0.0 });
		g.add_vertex(Vertex { id: 1, lat: 0.0, lon: 0.0, elev: 0.0 });
		g.add_edge(0, 1, f64s::try_from(3.0).unwrap()).unwrap();

		let result = dijkstra_profile(&g, 0, 1, m);
		assert!(result.reachable());
		assert_eq!(result.evaluate_f(f64s::try_from(3.0).unwrap()), f64s::try_from(0.0).unwrap());
		assert_eq!(result.evaluate_f(f64s::try_from(10.0).unwrap()), f64s::try_from(7.0).unwrap());
	}

	#[test]
	fn dijkstra_profile_unreachable_target_stays_unreachable() {
		let m = f64s::try_from(10.0).unwrap();
		let mut g = Graph::new();
		g.add_vertex(Vertex { id: 0, lat: 0.0, lon: 0.0, elev: 0.0 });
		g.add_vertex(Vertex { id: 1, lat: 0.0, lon: 0.0, elev: 0.0 });

		let result = dijkstra_profile(&g, 0, 1, m);
		assert!(!result.reachable());
	}
}
