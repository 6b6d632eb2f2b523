use std::fs::File;
use std::io::BufWriter;
use std::num::NonZero;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{ensure, Context, Result};
use chromate::dimacs::write_dimacs;
use chromate::{Assignment, ColoringProblem, Graph, Pigeonhole, SatBackend, Satisfiability, Sudoku, VarisatBackend};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use varisat::CnfFormula;

#[derive(Parser, Debug)]
#[command(name = "chromate")]
#[command(about = "Graph coloring, pigeonhole and Sudoku via Boolean SAT")]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Also write the instance in DIMACS CNF to this path
    #[arg(long, global = true, value_name = "PATH")]
    dimacs: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv every clause)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Is the graph k-colorable? Without --edge, asks about a triangle.
    Coloring {
        /// Number of colors
        #[arg(short, default_value = "2")]
        k: NonZero<usize>,

        /// Number of nodes; defaults to one more than the largest edge endpoint
        #[arg(long)]
        nodes: Option<usize>,

        /// An edge between two nodes, written U-V (repeatable)
        #[arg(long = "edge", value_name = "U-V", value_parser = parse_edge)]
        edges: Vec<(usize, usize)>,

        /// List every coloring instead of stopping at the first
        #[arg(long)]
        all: bool,
    },
    /// Can P pigeons fit in H holes?
    Pigeonhole {
        pigeons: NonZero<usize>,
        holes: NonZero<usize>,
    },
    /// Solve a 9x9 Sudoku given as 81 cells (1-9, '.' or '0' for blanks)
    Sudoku {
        puzzle: Sudoku,
    },
}

fn parse_edge(s: &str) -> std::result::Result<(usize, usize), String> {
    let (a, b) = s.split_once('-').ok_or_else(|| format!("expected U-V, got {s:?}"))?;
    let parse = |node: &str| node.trim().parse::<usize>().map_err(|err| format!("bad node {node:?}: {err}"));
    Ok((parse(a)?, parse(b)?))
}

fn build_graph(nodes: Option<usize>, edges: &[(usize, usize)]) -> Result<Graph> {
    if edges.is_empty() && nodes.is_none() {
        return Ok(Graph::from_edges(3, [(0, 1), (0, 2), (1, 2)]));
    }

    let node_count = match nodes {
        Some(count) => count,
        None => edges.iter().try_fold(0, |count: usize, (a, b)| {
            let top = *a.max(b);
            top.checked_add(1)
                .map(|needed| count.max(needed))
                .with_context(|| format!("node {top} is too large"))
        })?,
    };
    for (a, b) in edges {
        ensure!(a != b, "edge {a}-{b} is a self-loop");
        ensure!(*a < node_count && *b < node_count, "edge {a}-{b} references a node outside 0..{node_count}");
    }

    Ok(Graph::from_edges(node_count, edges.iter().copied()))
}

fn export(path: &Path, encode: impl FnOnce(&mut CnfFormula)) -> Result<()> {
    let mut formula = CnfFormula::new();
    encode(&mut formula);

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_dimacs(&formula, BufWriter::new(file)).with_context(|| format!("writing {}", path.display()))?;
    log::info!("wrote {} variables and {} clauses to {}", formula.var_count(), formula.len(), path.display());
    Ok(())
}

fn coloring(args: &Args, k: NonZero<usize>, nodes: Option<usize>, edges: &[(usize, usize)], all: bool) -> Result<()> {
    let graph = build_graph(nodes, edges)?;
    let problem = ColoringProblem::new(&graph, k);
    if let Some(path) = &args.dimacs {
        export(path, |formula| problem.encode(formula))?;
    }

    if all {
        let colorings = problem.all_colorings(&mut VarisatBackend::new())?;
        for coloring in &colorings {
            println!("{coloring}");
        }
        println!("{} distinct {k}-colorings", colorings.len());
    } else if problem.is_colorable(&mut VarisatBackend::new())? {
        println!("The graph is {k}-colorable.");
    } else {
        println!("No {k}-coloring is found!");
    }

    Ok(())
}

fn pigeonhole(args: &Args, pigeons: NonZero<usize>, holes: NonZero<usize>) -> Result<()> {
    println!("Trying to place {pigeons} pigeons in {holes} holes");
    let problem = Pigeonhole::new(pigeons, holes);
    if let Some(path) = &args.dimacs {
        export(path, |formula| problem.encode(formula))?;
    }

    let mut backend = VarisatBackend::new();
    problem.encode(&mut backend);

    let start = Instant::now();
    let outcome = backend.solve()?;
    let elapsed = start.elapsed();
    match outcome {
        Satisfiability::Satisfiable => {
            let placement = problem.decode(&Assignment::snapshot(&backend)?)?;
            println!("There is a solution!");
            print!("{placement}");
        }
        Satisfiability::Unsatisfiable => println!("UNSAT!"),
    }
    println!("Time to solve: {:12.2} s", elapsed.as_secs_f64());

    Ok(())
}

fn sudoku(args: &Args, puzzle: &Sudoku) -> Result<()> {
    if let Some(path) = &args.dimacs {
        export(path, |formula| puzzle.encode(formula))?;
    }

    let mut backend = VarisatBackend::new();
    puzzle.encode(&mut backend);

    let start = Instant::now();
    let outcome = backend.solve()?;
    let elapsed = start.elapsed();
    match outcome {
        Satisfiability::Satisfiable => print!("{}", puzzle.decode(&Assignment::snapshot(&backend)?)?),
        Satisfiability::Unsatisfiable => println!("No solution."),
    }
    println!("Time to solve: {:12.2} s", elapsed.as_secs_f64());

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .parse_default_env()
        .init();

    match &args.command {
        Commands::Coloring { k, nodes, edges, all } => coloring(&args, *k, *nodes, edges, *all),
        Commands::Pigeonhole { pigeons, holes } => pigeonhole(&args, *pigeons, *holes),
        Commands::Sudoku { puzzle } => sudoku(&args, puzzle),
    }
}
