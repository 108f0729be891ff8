//! Energy-feasible EV routing core: State-of-Charge (SoC) profiles, a
//! profile-generalized Dijkstra and Floyd-Warshall, and a charging-station
//! lifting extension on top of Floyd-Warshall.
//!
//! Grounded on `original_source/ev_routing` (nilo0/ev_routing); module
//! layout and ambient stack (error handling, logging, config, test
//! tooling) follow the teacher repo's conventions.

pub mod bp;
pub mod cs_fw;
pub mod data;
pub mod dijkstra_profile;
pub mod error;
pub mod f64nn;
pub mod fixture;
pub mod fw_profile;
pub mod graph;
pub mod potential;
pub mod profile;

pub use bp::{edge_profile, BreakPoint, Slope};
pub use cs_fw::{cs_fw, cs_fw_final, sample_stations, stations_graph, CsFwResult, StationGraph};
pub use data::{build_graph, AreaRecord, Config, EdgeRecord, VertexRecord};
pub use dijkstra_profile::{dijkstra_profile, target_prune};
pub use error::{CoreError, CoreResult};
pub use f64nn::f64s;
pub use fw_profile::{fw_profile, fw_profile_with_history, ProfileMatrix};
pub use graph::{edge_cost, Graph, Vertex, VertexId};
pub use profile::BpList;
