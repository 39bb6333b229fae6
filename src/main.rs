use graphmis::prelude::*;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut cfg = CompareConfig::default();
    let mut input: Option<PathBuf> = None;
    let mut export: Option<PathBuf> = None;
    let mut overwrite = false;
    let mut timeout: Option<Duration> = None;

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--depth" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                cfg.maghout.parallel_depth = Some(v.parse().unwrap_or_else(|_| usage_and_exit(2)));
                i += 2;
            }
            "--iters" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                let max_iterations = v.parse().unwrap_or_else(|_| usage_and_exit(2));
                cfg.local_search = Some(LocalSearchConfig { max_iterations });
                i += 2;
            }
            "--no-local" => {
                cfg.local_search = None;
                i += 1;
            }
            "--seed" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                cfg.greedy.seed = Some(v.parse().unwrap_or_else(|_| usage_and_exit(2)));
                i += 2;
            }
            "--runs" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                cfg.runs = v.parse().unwrap_or_else(|_| usage_and_exit(2));
                i += 2;
            }
            "--timeout" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                let secs: f64 = v.parse().unwrap_or_else(|_| usage_and_exit(2));
                timeout = Some(Duration::try_from_secs_f64(secs).unwrap_or_else(|_| usage_and_exit(2)));
                i += 2;
            }
            "--export" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                export = Some(PathBuf::from(v));
                i += 2;
            }
            "--overwrite" => {
                overwrite = true;
                i += 1;
            }
            "--help" | "-h" => usage_and_exit(0),
            path if !path.starts_with('-') && input.is_none() => {
                input = Some(PathBuf::from(path));
                i += 1;
            }
            _ => usage_and_exit(2),
        }
    }

    let Some(input) = input else { usage_and_exit(2) };
    let graph: Graph<String> = match load_from_dot(&input) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", input.display());
            std::process::exit(1);
        }
    };
    println!(
        "Loaded {} graph with {} vertices and {} edge entries.",
        if graph.is_directed() { "directed" } else { "undirected" },
        graph.size(),
        graph.all_edges().len()
    );

    let cancel = timeout.map_or_else(CancelToken::new, CancelToken::with_timeout);
    let records = match run_comparison(&graph, &cfg, &cancel) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Comparison aborted: {e}");
            std::process::exit(1);
        }
    };

    println!("{:>4}  {:<13} {:>5} {:>7} {:>12}", "run", "method", "size", "f1", "time (us)");
    for r in &records {
        println!(
            "{:>4}  {:<13} {:>5} {:>7.4} {:>12.1}",
            r.run_id,
            r.method.to_string(),
            r.cardinality,
            r.f1,
            r.elapsed_ns as f64 / 1_000.0
        );
    }
    println!();
    for s in summarize(&records) {
        println!(
            "{:<13} mean size {:>6.2}  mean f1 {:.4}  mean time {:.1} us over {} runs",
            s.method.to_string(),
            s.mean_cardinality,
            s.mean_f1,
            s.mean_elapsed_ns / 1_000.0,
            s.runs
        );
    }

    if let Some(path) = export {
        let exact = records
            .iter()
            .find(|r| r.method == Method::Exact)
            .map(|r| r.solution.as_slice());
        match graph.export_to_file(&path, overwrite, exact) {
            Ok(()) => println!("Exported exact solution to {}", path.display()),
            Err(e) => {
                eprintln!("Export failed: {e}");
                std::process::exit(1);
            }
        }
    }
}

fn usage_and_exit(code: i32) -> ! {
    eprintln!(
        "Usage:\n  graphmis [OPTIONS] GRAPH.dot\n\nOptions:\n  --depth D        Prefix bits fixed per exact-search task (default: min(n, 16))\n  --iters N        Local search sweep budget (default: 100)\n  --no-local       Skip the local search refinement\n  --seed SEED      Deterministic base seed for greedy tie-breaks\n  --runs R         Number of comparison runs (default: 1)\n  --timeout SECS   Cancel the session after SECS seconds\n  --export PATH    Write the graph with the exact solution highlighted\n  --overwrite      Allow --export to replace an existing file\n\nSet RUST_LOG=graphmis=debug for solver logs.\n"
    );
    std::process::exit(code)
}
