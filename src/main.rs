use cliquecover::covering::{Algorithm, CoveringConfig};
use cliquecover::filter::{NoCheck, NoFilter};
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut algorithm = Algorithm::Ttt;
    let mut cfg = CoveringConfig::default();
    let mut min = None;
    let mut max = None;
    let mut suggest_min = None;
    let mut suggest_max = None;
    let mut dot: Option<PathBuf> = None;
    let mut validate = false;
    let mut input: Option<PathBuf> = None;

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--algorithm" | "-a" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                algorithm = v.parse().unwrap_or_else(|e| {
                    eprintln!("{e}");
                    usage_and_exit(2)
                });
                i += 2;
            }
            "--min" => {
                min = Some(count_arg(&args, i));
                i += 2;
            }
            "--max" => {
                max = Some(count_arg(&args, i));
                i += 2;
            }
            "--suggest-min" => {
                suggest_min = Some(count_arg(&args, i));
                i += 2;
            }
            "--suggest-max" => {
                suggest_max = Some(count_arg(&args, i));
                i += 2;
            }
            "--seed" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                cfg.seed = v.parse().unwrap_or_else(|_| usage_and_exit(2));
                i += 2;
            }
            "--dot" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                dot = Some(PathBuf::from(v));
                i += 2;
            }
            "--validate" => {
                validate = true;
                i += 1;
            }
            "--help" | "-h" => usage_and_exit(0),
            s if s.starts_with('-') || input.is_some() => usage_and_exit(2),
            s => {
                input = Some(PathBuf::from(s));
                i += 1;
            }
        }
    }
    let input = input.unwrap_or_else(|| usage_and_exit(2));

    let mut cc = match cliquecover::parse::load_problem(&input, algorithm, cfg) {
        Ok(cc) => cc,
        Err(e) => {
            eprintln!("{}: {e}", input.display());
            std::process::exit(2);
        }
    };
    if let Some(n) = suggest_min {
        cc.suggest_min_resources(n);
    }
    if let Some(n) = min {
        cc.min_resources(n);
    }
    if let Some(n) = suggest_max {
        cc.suggest_max_resources(n);
    }
    if let Some(n) = max {
        cc.max_resources(n);
    }

    if let Some(path) = &dot {
        if let Err(e) = cc.write_dot(path) {
            eprintln!("could not write {}: {e}", path.display());
        }
    }

    if let Err(e) = cc.exec(&NoFilter, &mut NoCheck) {
        eprintln!("Covering FAILED: {e}");
        std::process::exit(1);
    }

    for clique in cc.cliques() {
        let names: Vec<&str> = clique.iter().map(|&v| cc.graph().label(v)).collect();
        println!("{}", names.join(" "));
    }

    if validate {
        let groups = Some(cc.subpartitions());
        match cliquecover::validate::validate_cover(cc.graph(), cc.cliques(), groups) {
            Ok(()) => eprintln!(
                "Validation OK: {} cliques cover {} vertices.",
                cc.num_vertices(),
                cc.graph().vertex_count()
            ),
            Err(e) => {
                eprintln!("Validation FAILED: {e}");
                std::process::exit(1);
            }
        }
    }
}

fn count_arg(args: &[String], i: usize) -> usize {
    let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
    v.parse().unwrap_or_else(|_| usage_and_exit(2))
}

fn usage_and_exit(code: i32) -> ! {
    eprintln!(
        "Usage:\n  cliquecover [--algorithm NAME] [--min N] [--max N] [--suggest-min N] [--suggest-max N]\n              [--seed SEED] [--dot PATH] [--validate] FILE\n\nInput (one record per line, '#' comments):\n  v NAME        vertex\n  e A B W       compatibility edge of weight W (1..=31)\n  s ID NAME     NAME belongs to exclusivity group ID\n\nOptions:\n  --algorithm/-a NAME   coloring, weighted-coloring, ttt (default), ttt-weighted, ttt-fast,\n                        ttt-fast-weighted, ts, ts-weighted, rts, bipartite\n  --min/--max N         Hard bounds on the number of cliques\n  --suggest-min/--suggest-max N\n                        Soft bounds on the number of cliques\n  --seed SEED           Seed of the randomized greedy runs (default: 0)\n  --dot PATH            Write the compatibility graph in Graphviz format\n  --validate            Check the cover and report the result on stderr\n"
    );
    std::process::exit(code)
}
