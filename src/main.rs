use std::convert::TryFrom;
use std::fs::File;
use std::io::BufReader;

use clap::{App, Arg, SubCommand};
use log::info;

use ev_soc_router::{build_graph, cs_fw, cs_fw_final, dijkstra_profile, fw_profile, f64s, AreaRecord, Config};

fn load_area(path: &str) -> AreaRecord {
	let file = File::open(path).unwrap_or_else(|e| panic!("failed to open area file {}: {}", path, e));
	serde_json::from_reader(BufReader::new(file)).unwrap_or_else(|e| panic!("failed to parse area file {}: {}", path, e))
}

fn load_config(path: Option<&str>) -> Config {
	match path {
		None => Config::default(),
		Some(path) => {
			let file = File::open(path).unwrap_or_else(|e| panic!("failed to open config file {}: {}", path, e));
			serde_yaml::from_reader(BufReader::new(file)).unwrap_or_else(|e| panic!("failed to parse config file {}: {}", path, e))
		}
	}
}

fn main() {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let matches = App::new("ev-soc-router")
		.about("Energy-feasible EV routing over State-of-Charge profiles")
		.subcommand(
			SubCommand::with_name("fixture").about("print the built-in 10-vertex testing fixture as JSON"),
		)
		.subcommand(
			SubCommand::with_name("dijkstra")
				.about("profile-generalized Dijkstra between two vertices")
				.arg(Arg::with_name("area").long("area").takes_value(true).required(true))
				.arg(Arg::with_name("config").long("config").takes_value(true))
				.arg(Arg::with_name("source").long("source").takes_value(true).required(true))
				.arg(Arg::with_name("target").long("target").takes_value(true).required(true)),
		)
		.subcommand(
			SubCommand::with_name("fw")
				.about("all-pairs profile-generalized Floyd-Warshall")
				.arg(Arg::with_name("area").long("area").takes_value(true).required(true))
				.arg(Arg::with_name("config").long("config").takes_value(true)),
		)
		.subcommand(
			SubCommand::with_name("cs-fw")
				.about("Floyd-Warshall lifted through sampled charging stations")
				.arg(Arg::with_name("area").long("area").takes_value(true).required(true))
				.arg(Arg::with_name("config").long("config").takes_value(true)),
		)
		.get_matches();

	match matches.subcommand() {
		("fixture", Some(_)) => {
			let area = ev_soc_router::fixture::testing_area();
			println!("{}", serde_json::to_string_pretty(&area).expect("area record serializes"));
		}
		("dijkstra", Some(sub)) => {
			let area = load_area(sub.value_of("area").unwrap());
			let config = load_config(sub.value_of("config"));
			let m = f64s::try_from(config.m).expect("capacity must not be NaN");
			let graph = build_graph(&area, &config).expect("failed to build graph");
			let source: usize = sub.value_of("source").unwrap().parse().expect("source must be an integer vertex id");
			let target: usize = sub.value_of("target").unwrap().parse().expect("target must be an integer vertex id");

			info!("running dijkstra profile search {} -> {}", source, target);
			let profile = dijkstra_profile(&graph, source, target, m);
			println!("{}", serde_json::to_string_pretty(&profile).expect("profile serializes"));
		}
		("fw", Some(sub)) => {
			let area = load_area(sub.value_of("area").unwrap());
			let config = load_config(sub.value_of("config"));
			let m = f64s::try_from(config.m).expect("capacity must not be NaN");
			let graph = build_graph(&area, &config).expect("failed to build graph");

			info!("running all-pairs profile Floyd-Warshall over {} vertices", graph.vertex_count());
			let matrix = fw_profile(&graph, None, m);
			println!("{}", serde_json::to_string_pretty(&matrix).expect("matrix serializes"));
		}
		("cs-fw", Some(sub)) => {
			let area = load_area(sub.value_of("area").unwrap());
			let config = load_config(sub.value_of("config"));
			let m = f64s::try_from(config.m).expect("capacity must not be NaN");
			let graph = build_graph(&area, &config).expect("failed to build graph");

			info!("running base Floyd-Warshall before charging-station lifting");
			let result = cs_fw(&graph, m, &config);
			info!("sampled {} charging stations", result.stations.positions.len());

			let lifted = cs_fw_final(&result.matrix_base, &result.stations, m);
			println!("{}", serde_json::to_string_pretty(&lifted).expect("matrix serializes"));
		}
		_ => {
			eprintln!("{}", matches.usage());
			std::process::exit(1);
		}
	}
}
