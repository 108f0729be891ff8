//! Profile-generalized Floyd-Warshall (component F, spec §4.3).
//!
//! Grounded on `original_source/ev_routing/floyd_warshall_profile.py`.

use crate::bp;
use crate::f64nn::f64s;
use crate::graph::{Graph, VertexId};
use crate::profile::BpList;

/// An n x n matrix of profiles indexed by position in the node list passed
/// to `fw_profile`, not by raw vertex id.
#[derive(Clone, Debug, serde::Serialize)]
pub struct ProfileMatrix {
	pub nodes: Vec<VertexId>,
	entries: Vec<BpList>,
}

impl ProfileMatrix {
	fn index(&self, i: usize, j: usize) -> usize {
		i * self.nodes.len() + j
	}

	pub fn get(&self, i: usize, j: usize) -> &BpList {
		&self.entries[self.index(i, j)]
	}

	pub(crate) fn set(&mut self, i: usize, j: usize, l: BpList) {
		let idx = self.index(i, j);
		self.entries[idx] = l;
	}

	pub fn node_index(&self, vertex: VertexId) -> Option<usize> {
		self.nodes.iter().position(|&v| v == vertex)
	}
}

/// Builds the initial matrix (spec §4.3): identity on the diagonal, the
/// edge profile where two nodes are directly connected, and the
/// unreachable sentinel otherwise.
fn initialise(graph: &Graph, nodes: &[VertexId], m: f64s) -> ProfileMatrix {
	let n = nodes.len();
	let mut entries = Vec::with_capacity(n * n);
	for &i in nodes {
		for &j in nodes {
			let l = if i == j {
				BpList::identity(m)
			} else if let Some(edge) = graph.edge_between(i, j) {
				BpList::from_canonical(bp::edge_profile(edge.cost, m))
			} else {
				BpList::unreachable(m)
			};
			entries.push(l);
		}
	}
	ProfileMatrix { nodes: nodes.to_vec(), entries }
}

/// All-pairs profile search restricted to `nodes` (a subset of the graph's
/// vertices, or all of them when `nodes` is `None`).
pub fn fw_profile(graph: &Graph, nodes: Option<&[VertexId]>, m: f64s) -> ProfileMatrix {
	let owned: Vec<VertexId>;
	let nodes = match nodes {
		Some(n) => n,
		None => {
			owned = graph.vertex_ids().collect();
			&owned
		}
	};
	let mut matrix = initialise(graph, nodes, m);
	let n = nodes.len();

	for k in 0..n {
		for i in 0..n {
			let l_ik = matrix.get(i, k).clone();
			for j in 0..n {
				let l_kj = matrix.get(k, j).clone();
				let l_new = BpList::sort(l_ik.link(&l_kj));

				let l_ij = matrix.get(i, j);
				let improves = l_new.as_slice().iter().any(|bp| bp.y.f() > l_ij.evaluate_f(bp.x).f());
				if improves {
					let merged = BpList::merge(l_ij, &l_new, m);
					matrix.set(i, j, merged);
				}
			}
		}
	}

	matrix
}

/// `fw_profile` with a snapshot of the whole matrix after each of the `n`
/// passes, plus the initial matrix before any pass runs (spec §6:
/// `fw_profile_with_history -> [Profile Matrix]` of length `n+1`;
/// `history[0]` is the initial matrix, `history[k+1]` is the matrix after
/// the pass for `k`).
///
/// Each pass reads `l_ik`/`l_kj`/`l_ij` from the previous snapshot and
/// writes into a fresh copy, rather than mutating one matrix in place --
/// mutating in place would let rows processed after `i == k` observe the
/// partial writes from earlier in the same pass, which the original avoids
/// with `deepcopy` (`floyd_warshall_profile.py::run_with_history`).
pub fn fw_profile_with_history(graph: &Graph, nodes: Option<&[VertexId]>, m: f64s) -> (ProfileMatrix, Vec<ProfileMatrix>) {
	let owned: Vec<VertexId>;
	let nodes = match nodes {
		Some(n) => n,
		None => {
			owned = graph.vertex_ids().collect();
			&owned
		}
	};
	let n = nodes.len();
	let mut history = Vec::with_capacity(n + 1);
	history.push(initialise(graph, nodes, m));

	for k in 0..n {
		let previous = history.last().expect("history always has at least the initial matrix");
		let mut next = previous.clone();

		for i in 0..n {
			let l_ik = previous.get(i, k).clone();
			for j in 0..n {
				let l_kj = previous.get(k, j).clone();
				let l_new = BpList::sort(l_ik.link(&l_kj));

				let l_ij = previous.get(i, j);
				let improves = l_new.as_slice().iter().any(|bp| bp.y.f() > l_ij.evaluate_f(bp.x).f());
				if improves {
					let merged = BpList::merge(l_ij, &l_new, m);
					next.set(i, j, merged);
				}
			}
		}

		history.push(next);
	}

	let matrix = history.last().expect("history always has at least the initial matrix").clone();
	(matrix, history)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::Vertex;
	use std::convert::TryFrom;

	fn line_graph(m: f64s) -> Graph {
		let mut g = Graph::new();
		for id in 0..3 {
			g.add_vertex(Vertex { id, lat: 0.0, lon: 0.0, elev: 0.0 });
		}
		g.add_edge(0, 1, f64s::try_from(3.0).unwrap()).unwrap();
		g.add_edge(1, 2, f64s::try_from(4.0).unwrap()).unwrap();
		let _ = m;
		g
	}

	#[test]
	fn fw_profile_finds_two_hop_path() {
		let m = f64s::try_from(20.0).unwrap();
		let g = line_graph(m);
		let matrix = fw_profile(&g, None, m);
		let i = matrix.node_index(0).unwrap();
		let j = matrix.node_index(2).unwrap();
		let l = matrix.get(i, j);
		assert!(l.reachable());
		assert_eq!(l.evaluate_f(f64s::try_from(7.0).unwrap()), f64s::try_from(0.0).unwrap());
	}

	#[test]
	fn fw_profile_with_history_has_n_plus_one_snapshots() {
		let m = f64s::try_from(20.0).unwrap();
		let g = line_graph(m);
		let (final_matrix, history) = fw_profile_with_history(&g, None, m);
		assert_eq!(history.len(), g.vertex_count() + 1);

		let i = final_matrix.node_index(0).unwrap();
		let j = final_matrix.node_index(2).unwrap();

		// history[0] is the initial matrix: the 0->2 pair isn't linked yet.
		assert!(!history[0].get(i, j).reachable());

		let last = history.last().unwrap();
		assert_eq!(final_matrix.get(i, j).as_slice(), last.get(i, j).as_slice());
	}
}
