use cliquecover::graph::{DenseStorage, Graph};
use cliquecover::{io, ostergard};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        usage_and_exit(&args[0]);
    }

    let mut graph: Graph<DenseStorage> = Graph::default();
    if let Err(e) = io::parse_file(&args[1], &mut graph, io::parse_clq) {
        eprintln!("Parsing failure: {e}");
        std::process::exit(2);
    }

    println!(
        "Graph of {} vertices, {} edges, density {:.3}",
        graph.vertex_count(),
        graph.edge_count(),
        graph.density()
    );

    let result = ostergard::max_clique(&mut graph);
    let labels: Vec<String> = result.members.iter().map(|&v| (v + 1).to_string()).collect();
    println!("Maximum clique of size {}:", result.size());
    println!("{}", labels.join(" "));
}

fn usage_and_exit(program: &str) -> ! {
    eprintln!("Usage: {program} FILE.clq");
    std::process::exit(1)
}
