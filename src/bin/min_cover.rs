use cliquecover::cover::{self, BranchHeuristic, CoverConfig, EdgeOrder, RatioRule};
use cliquecover::graph::WeightedGraph;
use cliquecover::io;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut config = CoverConfig::default();
    let mut pricing: Option<EdgeOrder> = None;
    let mut path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--heuristic" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(&args[0]));
                config.heuristic = match v.as_str() {
                    "degree" => BranchHeuristic::GreatestDegree,
                    "random" => BranchHeuristic::Random,
                    "weight" => BranchHeuristic::SmallestWeight,
                    "ratio" => BranchHeuristic::DegreeWeightRatio,
                    _ => usage_and_exit(&args[0]),
                };
                i += 2;
            }
            "--exact-ratio" => {
                config.ratio_rule = RatioRule::Exact;
                i += 1;
            }
            "--seed" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(&args[0]));
                config.seed = v.parse().unwrap_or_else(|_| usage_and_exit(&args[0]));
                i += 2;
            }
            "--pricing" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(&args[0]));
                pricing = Some(match v.as_str() {
                    "first" => EdgeOrder::FirstVertex,
                    "max-degree" => EdgeOrder::MaxDegree,
                    "min-degree" => EdgeOrder::MinDegree,
                    "total-degree" => EdgeOrder::TotalDegree,
                    "max-weight" => EdgeOrder::MaxWeight,
                    "min-weight" => EdgeOrder::MinWeight,
                    _ => usage_and_exit(&args[0]),
                });
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

    let mut graph = WeightedGraph::default();
    let parsed = if path.ends_with(".mtx") {
        io::parse_file(path, &mut graph, io::parse_mtx)
    } else {
        io::parse_file(path, &mut graph, io::parse_clq_weighted)
    };
    if let Err(e) = parsed {
        eprintln!("Parsing failure: {e}");
        std::process::exit(2);
    }

    // Matrix Market inputs carry no vertex weights; assign them cyclically.
    if path.ends_with(".mtx") {
        for v in 0..graph.vertex_count() {
            graph.set_weight(v, ((v as u64) + 1) % 200);
        }
    }

    println!(
        "Graph of {} vertices, {} edges, density {:.3}",
        graph.vertex_count(),
        graph.edge_count(),
        graph.density()
    );

    let solution = match pricing {
        Some(order) => cover::pricing_method(&graph, order),
        None => cover::bmwvc(&mut graph, &config),
    };
    let labels: Vec<String> = solution.members.iter().map(|&v| (v + 1).to_string()).collect();
    println!(
        "Cover of {} vertices with total weight {}:",
        solution.members.len(),
        solution.weight
    );
    println!("{}", labels.join(" "));
}

fn usage_and_exit(program: &str) -> ! {
    eprintln!(
        "Usage: {program} [options] FILE\n\nOptions:\n  --heuristic RULE   Branch rule: degree (default), random, weight, ratio\n  --exact-ratio      Compare degree/weight ratios exactly instead of truncated\n  --seed SEED        Seed for the random branch rule (default: 0)\n  --pricing ORDER    Run the pricing 2-approximation instead of branch and bound;\n                     ORDER: first, max-degree, min-degree, total-degree,\n                     max-weight, min-weight\n"
    );
    std::process::exit(1)
}
