use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use u_flowpath::cp::SolverConfig;
use u_flowpath::instances::Example;
use u_flowpath::network::Graph;
use u_flowpath::route::{render, RouteRunner};
use u_flowpath::text;

///
/// Cheapest set of paths from a start node to several destinations
///
/// * Solve a bundled example with `-e NAME` or a problem file
///
/// * Edges shared by several destinations are paid once
///
#[derive(Parser, Debug)]
#[command(name = "flowpath", version)]
struct Opts {
    /// Problem file in `key = value;` format
    file: Option<PathBuf>,
    /// Bundled example to solve (see --list)
    #[arg(short, long, value_parser = parse_example, conflicts_with = "file")]
    example: Option<Example>,
    /// Time limit in milliseconds, 0 for none
    #[arg(short = 't', long, default_value_t = 60_000)]
    time_limit_ms: i64,
    /// Search node limit, 0 for none
    #[arg(short = 'n', long, default_value_t = 0)]
    node_limit: u64,
    /// Stop at the first route found
    #[arg(long)]
    first: bool,
    /// Print the graph with the route in DOT
    #[arg(long)]
    dot: bool,
    /// List the bundled examples and exit
    #[arg(long)]
    list: bool,
}

fn parse_example(name: &str) -> Result<Example, String> {
    Example::from_name(name).ok_or_else(|| {
        let names: Vec<&str> = Example::all().iter().map(|e| e.name()).collect();
        format!("unknown example `{name}`, expected one of: {}", names.join(", "))
    })
}

fn load(opts: &Opts) -> Result<Graph, String> {
    match (&opts.file, opts.example) {
        (Some(path), _) => {
            let input = std::fs::read_to_string(path)
                .map_err(|e| format!("{}: {e}", path.display()))?;
            text::parse_graph(&input).map_err(|e| format!("{}: {e}", path.display()))
        }
        (None, Some(example)) => Ok(example.graph()),
        (None, None) => Ok(Example::Single.graph()),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let opts: Opts = Opts::parse();

    if opts.list {
        for example in Example::all() {
            println!("{:<20} optimal cost {}", example.name(), example.optimal_cost());
        }
        return ExitCode::SUCCESS;
    }

    let graph = match load(&opts) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = SolverConfig::default()
        .with_time_limit_ms(opts.time_limit_ms)
        .with_node_limit(opts.node_limit)
        .with_stop_after_first(opts.first);

    match RouteRunner::run(&graph, &config) {
        Ok(route) => {
            if opts.dot {
                print!("{}", render::to_dot(&graph, Some(&route)));
            } else {
                println!("cost: {}", route.cost);
                println!("flow cost: {}", route.flow_cost);
                println!("path: {route}");
                println!(
                    "optimal: {} ({} nodes, {} ms)",
                    route.proven_optimal, route.stats.nodes, route.solve_time_ms
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
