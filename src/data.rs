//! Ingestion structs and run configuration (spec §10.3 ambient stack).
//!
//! Grounded on the teacher's `src/data.rs` plain-serde-struct shape
//! (since trimmed): the raw wire format is a straightforward JSON/YAML
//! mirror of the domain, converted into `graph::Graph` by `build_graph`.

use std::convert::TryFrom;

use crate::error::{CoreError, CoreResult};
use crate::f64nn::f64s;
use crate::graph::{self, Graph, VertexId};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct VertexRecord {
	pub id: VertexId,
	pub lat: f64,
	pub lon: f64,
	pub elev: f64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct EdgeRecord {
	pub u: VertexId,
	pub v: VertexId,
	/// Explicit cost override; when absent the cost is derived from the
	/// vertices via `graph::edge_cost`.
	#[serde(default)]
	pub cost: Option<f64>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct AreaRecord {
	pub vertices: Vec<VertexRecord>,
	pub edges: Vec<EdgeRecord>,
}

/// Run configuration: battery capacity, charging-station sampling, and the
/// edge-cost coefficients (spec §4.2, §4.6).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Config {
	/// Battery capacity `M`.
	pub m: f64,
	/// Number of charging stations to sample for the CS extension.
	#[serde(default)]
	pub n_stations: Option<usize>,
	/// Fixed station ids, bypassing sampling (spec §4.6's `testing` mode).
	#[serde(default)]
	pub station_ids: Option<Vec<VertexId>>,
	#[serde(default = "default_seed")]
	pub seed: u64,
	#[serde(default)]
	pub testing: bool,
	#[serde(default = "default_kappa")]
	pub kappa: f64,
	#[serde(default = "default_lambda")]
	pub lambda: f64,
	#[serde(default = "default_mu")]
	pub mu: f64,
}

fn default_seed() -> u64 {
	234
}
fn default_kappa() -> f64 {
	0.02
}
fn default_lambda() -> f64 {
	1.0
}
fn default_mu() -> f64 {
	0.25
}

impl Default for Config {
	fn default() -> Self {
		Self {
			m: 300.0,
			n_stations: None,
			station_ids: None,
			seed: default_seed(),
			testing: false,
			kappa: default_kappa(),
			lambda: default_lambda(),
			mu: default_mu(),
		}
	}
}

/// Builds a `Graph` from an ingested area, deriving edge costs from
/// vertex geometry when a record omits an explicit cost.
pub fn build_graph(area: &AreaRecord, config: &Config) -> CoreResult<Graph> {
	if area.vertices.is_empty() {
		return Err(CoreError::EmptyGraph);
	}
	let mut g = Graph::new();
	for vr in &area.vertices {
		g.add_vertex(graph::Vertex { id: vr.id, lat: vr.lat, lon: vr.lon, elev: vr.elev });
	}
	for er in &area.edges {
		let cost = match er.cost {
			Some(c) => f64s::try_from(c).map_err(|_| CoreError::Ingestion(format!("edge {}->{} cost is NaN", er.u, er.v)))?,
			None => {
				let from = g.vertex(er.u).ok_or_else(|| CoreError::UnknownVertex(er.u.to_string()))?;
				let to = g.vertex(er.v).ok_or_else(|| CoreError::UnknownVertex(er.v.to_string()))?;
				graph::edge_cost(from, to, config.kappa, config.lambda, config.mu)
			}
		};
		g.add_edge(er.u, er.v, cost)?;
	}
	Ok(g)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn build_graph_rejects_empty_area() {
		let area = AreaRecord { vertices: vec![], edges: vec![] };
		let err = build_graph(&area, &Config::default()).unwrap_err();
		matches!(err, CoreError::EmptyGraph);
	}

	#[test]
	fn build_graph_uses_explicit_cost_when_present() {
		let area = AreaRecord {
			vertices: vec![VertexRecord { id: 0, lat: 0.0, lon: 0.0, elev: 0.0 }, VertexRecord { id: 1, lat: 0.0, lon: 0.0, elev: 0.0 }],
			edges: vec![EdgeRecord { u: 0, v: 1, cost: Some(5.0) }],
		};
		let g = build_graph(&area, &Config::default()).unwrap();
		assert_eq!(g.edge_between(0, 1).unwrap().cost.f(), 5.0);
	}
}
