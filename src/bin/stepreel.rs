use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "stepreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the narration of every recorded frame.
    Trace(RunArgs),
    /// Print the full frame sequence as JSON.
    Frames(RunArgs),
    /// Print the structural fingerprint of the frame sequence.
    Fingerprint(RunArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Algorithm to run.
    #[arg(long, value_enum)]
    algo: AlgoChoice,

    /// Input problem JSON (graph algorithms).
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Comma-separated integers (merge-sort).
    #[arg(long)]
    array: Option<String>,

    /// Source/start vertex; defaults to the problem file's `source`, then the first
    /// vertex.
    #[arg(long)]
    source: Option<String>,

    /// Frame ordering (merge-sort only).
    #[arg(long, value_enum, default_value_t = OrderingChoice::Dfs)]
    ordering: OrderingChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlgoChoice {
    Dijkstra,
    BellmanFord,
    Prim,
    Kosaraju,
    Kahn,
    MergeSort,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderingChoice {
    Dfs,
    Phase,
}

/// A graph problem file: the graph fields plus an optional default source vertex.
#[derive(Debug, serde::Deserialize)]
struct ProblemFile {
    #[serde(flatten)]
    graph: stepreel::Graph,
    source: Option<String>,
}

struct RunOutput {
    lines: Vec<String>,
    json: serde_json::Value,
    fingerprint: stepreel::FrameFingerprint,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Trace(args) => {
            let out = run_algo(&args)?;
            for line in out.lines {
                println!("{line}");
            }
        }
        Command::Frames(args) => {
            let out = run_algo(&args)?;
            println!("{}", serde_json::to_string_pretty(&out.json)?);
        }
        Command::Fingerprint(args) => {
            let out = run_algo(&args)?;
            println!("{}", out.fingerprint);
        }
    }
    Ok(())
}

fn read_problem_json(path: &Path) -> anyhow::Result<ProblemFile> {
    let f = File::open(path).with_context(|| format!("open problem '{}'", path.display()))?;
    let r = BufReader::new(f);
    let problem: ProblemFile =
        serde_json::from_reader(r).with_context(|| "parse problem JSON")?;
    Ok(problem)
}

fn load_graph(args: &RunArgs) -> anyhow::Result<(stepreel::Graph, String)> {
    let path = args
        .in_path
        .as_deref()
        .context("--in is required for graph algorithms")?;
    let problem = read_problem_json(path)?;
    problem.graph.validate()?;
    let source = args
        .source
        .clone()
        .or(problem.source)
        .or_else(|| problem.graph.vertices.first().cloned())
        .context("problem has no vertices")?;
    Ok((problem.graph, source))
}

fn run_algo(args: &RunArgs) -> anyhow::Result<RunOutput> {
    match args.algo {
        AlgoChoice::Dijkstra => {
            let (graph, source) = load_graph(args)?;
            summarize(&stepreel::dijkstra::run(&graph, &source)?)
        }
        AlgoChoice::BellmanFord => {
            let (graph, source) = load_graph(args)?;
            summarize(&stepreel::bellman_ford::run(&graph, &source)?)
        }
        AlgoChoice::Prim => {
            let (graph, start) = load_graph(args)?;
            summarize(&stepreel::prim::run(&graph, &start)?)
        }
        AlgoChoice::Kosaraju => {
            let (graph, _) = load_graph(args)?;
            summarize(&stepreel::kosaraju::run(&graph)?)
        }
        AlgoChoice::Kahn => {
            let (graph, _) = load_graph(args)?;
            summarize(&stepreel::kahn::run(&graph)?)
        }
        AlgoChoice::MergeSort => {
            let text = args
                .array
                .as_deref()
                .context("--array is required for merge-sort")?;
            let values = stepreel::parse_int_list(text)?;
            let ordering = match args.ordering {
                OrderingChoice::Dfs => stepreel::FrameOrdering::Dfs,
                OrderingChoice::Phase => stepreel::FrameOrdering::Phase,
            };
            summarize(&stepreel::merge_sort::run(&values, ordering)?)
        }
    }
}

fn summarize<S: Serialize>(seq: &stepreel::FrameSequence<S>) -> anyhow::Result<RunOutput> {
    Ok(RunOutput {
        lines: seq
            .iter()
            .map(|f| format!("step {:>3}: {}", f.step, f.description))
            .collect(),
        json: serde_json::to_value(seq).with_context(|| "serialize frames")?,
        fingerprint: stepreel::fingerprint_frames(seq)?,
    })
}
