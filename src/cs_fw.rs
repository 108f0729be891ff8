//! Charging-station Floyd-Warshall extension (component G, spec §4.6).
//!
//! Grounded on `original_source/ev_routing/cs_floyd_warshall.py`. That
//! module's `final()` indexes its scalar station-cost matrix by the
//! stations' position in the *station* list (`min_costs[si_id][sj_id]`)
//! even though the matrix itself is sized for the whole node list -- a
//! mismatch that only goes unnoticed because the sample fixture's node and
//! station counts happen to overlap. This port indexes by actual node
//! position throughout (`min_costs[si][sj]`), which is what the surrounding
//! all-pairs scalar Floyd-Warshall actually computes (documented in
//! DESIGN.md).

use std::collections::HashMap;
use std::convert::TryFrom;

use indexmap::IndexSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::Config;
use crate::f64nn::f64s;
use crate::fw_profile::{fw_profile, ProfileMatrix};
use crate::graph::{Graph, VertexId};
use crate::profile::BpList;

/// Scalar all-pairs shortest-path matrix plus predecessor links, used to
/// stitch together station-to-station routes for the lifting step.
pub struct StationGraph {
	/// Positions (indices into the node list) sampled as charging stations.
	pub positions: Vec<usize>,
	n: usize,
	min_costs: Vec<f64>,
	helper: Vec<Option<usize>>,
}

impl StationGraph {
	/// The reconstructed shortest path between two station positions, as a
	/// list of `(from, to, cost)` hops.
	pub fn path(&self, i: usize, j: usize) -> Vec<(usize, usize, f64)> {
		get_path(i, j, &self.min_costs, &self.helper, self.n)
	}
}

/// Deterministically samples `config.n_stations` node positions as charging
/// stations (spec §4.6). `config.station_ids` (used by `testing` mode)
/// bypasses sampling entirely.
pub fn sample_stations(nodes: &[VertexId], config: &Config) -> Vec<usize> {
	if let Some(ids) = &config.station_ids {
		return ids.iter().filter_map(|&vid| nodes.iter().position(|&v| v == vid)).collect();
	}

	let n_stations = config.n_stations.unwrap_or_else(|| ((nodes.len() as f64) * 0.1) as usize);
	if n_stations == 0 || nodes.is_empty() {
		return Vec::new();
	}

	let mut rng = StdRng::seed_from_u64(config.seed);
	let mut picked: IndexSet<usize> = IndexSet::new();
	for _ in 0..n_stations {
		picked.insert(rng.gen_range(0..nodes.len()));
	}
	picked.into_iter().collect()
}

/// Scalar all-pairs shortest paths over the whole node list, capped at
/// battery capacity `m` (edges costing more than `m` are unusable in a
/// single hop). Grounded on `cs_floyd_warshall.py::_stations_graph`.
pub fn stations_graph(graph: &Graph, nodes: &[VertexId], stations: Vec<usize>, m: f64s) -> StationGraph {
	let n = nodes.len();
	let mut min_costs = vec![f64::INFINITY; n * n];
	for i in 0..n {
		min_costs[i * n + i] = 0.0;
	}
	for (i, &u) in nodes.iter().enumerate() {
		for (j, &v) in nodes.iter().enumerate() {
			if i == j {
				continue;
			}
			if let Some(edge) = graph.edge_between(u, v) {
				if edge.cost.f() <= m.f() {
					min_costs[i * n + j] = edge.cost.f();
				}
			}
		}
	}

	let mut helper: Vec<Option<usize>> = vec![None; n * n];
	for k in 0..n {
		for i in 0..n {
			for j in 0..n {
				let via = min_costs[i * n + k] + min_costs[k * n + j];
				if via < min_costs[i * n + j] {
					min_costs[i * n + j] = via;
					helper[i * n + j] = Some(k);
				}
			}
		}
	}

	StationGraph { positions: stations, n, min_costs, helper }
}

/// The result bundle named by the public `cs_fw` operation (spec §6): the
/// base all-pairs profile matrix, the sampled station graph, and the
/// reconstructed station-to-station paths, all before the final lifting
/// step (`cs_fw_final`) is applied.
pub struct CsFwResult {
	pub matrix_base: ProfileMatrix,
	pub stations: StationGraph,
	pub stations_paths: HashMap<(usize, usize), Vec<(usize, usize, f64)>>,
}

/// Runs the base Floyd-Warshall profile search, samples charging stations,
/// and builds the scalar station graph with reconstructed paths (spec
/// §4.6, §6). Call `cs_fw_final` on the result to lift station profiles
/// into full node-to-node profiles.
pub fn cs_fw(graph: &Graph, m: f64s, config: &Config) -> CsFwResult {
	let nodes: Vec<VertexId> = graph.vertex_ids().collect();
	let matrix_base = fw_profile(graph, Some(&nodes), m);

	let station_positions = sample_stations(&nodes, config);
	let stations = stations_graph(graph, &nodes, station_positions, m);

	let mut stations_paths = HashMap::new();
	for &si in &stations.positions {
		for &sj in &stations.positions {
			stations_paths.insert((si, sj), stations.path(si, sj));
		}
	}

	CsFwResult { matrix_base, stations, stations_paths }
}

fn get_path(i: usize, j: usize, min_costs: &[f64], helper: &[Option<usize>], n: usize) -> Vec<(usize, usize, f64)> {
	if let Some(k) = helper[i * n + j] {
		let mut path = get_path(i, k, min_costs, helper, n);
		path.extend(get_path(k, j, min_costs, helper, n));
		path
	} else {
		let cost = min_costs[i * n + j];
		if cost.is_finite() && cost > 0.0 {
			vec![(i, j, cost)]
		} else {
			Vec::new()
		}
	}
}

/// Lifts station-to-station profiles into full node-to-node profiles (spec
/// §4.6): for every `(i, j)`, tries routing through a station pair
/// `(si, sj)` and keeps whichever is better via `disconnected_merge`.
///
/// Grounded on `cs_floyd_warshall.py::final`. Returns a fresh matrix; `base`
/// is left untouched.
pub fn cs_fw_final(base: &ProfileMatrix, stations: &StationGraph, m: f64s) -> ProfileMatrix {
	let n = base.nodes.len();
	let mut result = base.clone();

	for i in 0..n {
		for j in 0..n {
			if i == j {
				continue;
			}

			let mut final_soc = base.get(i, j).clone();

			let i_reaches_s: Vec<bool> = stations.positions.iter().map(|&s| base.get(i, s).reachable()).collect();
			let s_reaches_j: Vec<bool> = stations.positions.iter().map(|&s| base.get(s, j).reachable()).collect();

			for (si_idx, &si) in stations.positions.iter().enumerate() {
				if !i_reaches_s[si_idx] {
					continue;
				}

				let mut c_new = base.get(si, j).min_reachable_charge().map(|c| c.f()).unwrap_or(f64::INFINITY);

				for (sj_idx, &sj) in stations.positions.iter().enumerate() {
					if !s_reaches_j[sj_idx] {
						continue;
					}
					let sj_j_cost = match base.get(sj, j).min_reachable_charge() {
						Some(c) => c.f(),
						None => continue,
					};
					let si_sj_cost = stations.min_costs[si * n + sj];
					let candidate = si_sj_cost + sj_j_cost;
					if candidate < c_new {
						c_new = candidate;
					}
				}

				if c_new.is_finite() {
					let c_seg = f64s::try_from(c_new).expect("station segment cost computed as NaN");
					final_soc = BpList::disconnected_merge(base.get(i, si), c_seg, &final_soc, f64s::ZERO, m);
				}
			}

			result.set(i, j, final_soc);
		}
	}

	result
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fixture;

	#[test]
	fn cs_fw_final_runs_on_the_builtin_fixture() {
		let m = f64s::try_from(5.0).unwrap();
		let area = fixture::testing_area();
		let config = Config { m: m.f(), n_stations: Some(2), station_ids: Some(fixture::TESTING_STATION_IDS.to_vec()), testing: true, ..Config::default() };
		let graph = crate::data::build_graph(&area, &config).unwrap();
		let nodes: Vec<VertexId> = graph.vertex_ids().collect();

		let base = fw_profile(&graph, Some(&nodes), m);
		let stations = sample_stations(&nodes, &config);
		assert_eq!(stations.len(), 2);
		let station_graph = stations_graph(&graph, &nodes, stations, m);

		let lifted = cs_fw_final(&base, &station_graph, m);
		assert_eq!(lifted.nodes, base.nodes);
	}

	#[test]
	fn cs_fw_wrapper_samples_the_configured_stations() {
		let m = f64s::try_from(5.0).unwrap();
		let area = fixture::testing_area();
		let config = Config { m: m.f(), n_stations: Some(2), station_ids: Some(fixture::TESTING_STATION_IDS.to_vec()), testing: true, ..Config::default() };
		let graph = crate::data::build_graph(&area, &config).unwrap();

		let result = cs_fw(&graph, m, &config);
		assert_eq!(result.stations.positions.len(), 2);
		let lifted = cs_fw_final(&result.matrix_base, &result.stations, m);
		assert_eq!(lifted.nodes.len(), 10);
	}
}
