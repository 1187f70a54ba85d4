use cliquecover::graph::{DenseStorage, Graph};
use cliquecover::{io, kopt};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut seed = 0u64;
    let mut path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(&args[0]));
                seed = v.parse().unwrap_or_else(|_| usage_and_exit(&args[0]));
                i += 2;
            }
            arg if !arg.starts_with('-') && path.is_none() => {
                path = Some(arg);
                i += 1;
            }
            _ => usage_and_exit(&args[0]),
        }
    }
    let Some(path) = path else {
        usage_and_exit(&args[0]);
    };

    let mut graph: Graph<DenseStorage> = Graph::default();
    if let Err(e) = io::parse_file(path, &mut graph, io::parse_clq) {
        eprintln!("Parsing failure: {e}");
        std::process::exit(2);
    }

    println!(
        "Graph of {} vertices, {} edges, density {:.3}",
        graph.vertex_count(),
        graph.edge_count(),
        graph.density()
    );

    let result = kopt::multi_start(&graph, seed);
    let labels: Vec<String> = result.members.iter().map(|&v| (v + 1).to_string()).collect();
    println!("Best clique found has size {}:", result.size());
    println!("{}", labels.join(" "));
}

fn usage_and_exit(program: &str) -> ! {
    eprintln!("Usage: {program} [--seed SEED] FILE.clq");
    std::process::exit(1)
}
