use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use homopath::api::{
    dijkstra, reconstruct, stitch_through_cycle, Cell, EuclideanCost, FirstFound, Formulation,
    MicroLpOracle, Planner, SolveCfg, UniformCost, Variant, VertexId,
};
use serde::Serialize;
use std::path::Path;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Homology-constrained shortest paths on punctured grids")]
#[command(version = homopath::VERSION)]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(clap::Args, Clone, Debug)]
struct GridArgs {
    #[arg(long)]
    rows: usize,
    #[arg(long)]
    cols: usize,
    /// Hole cell as `row,col`; repeatable
    #[arg(long = "hole", value_parser = parse_cell)]
    holes: Vec<Cell>,
    /// Singular-value threshold for the harmonic kernel
    #[arg(long, default_value_t = SolveCfg::default().kernel_tol)]
    kernel_tol: f64,
}

#[derive(Subcommand)]
enum Action {
    /// Solve for the cheapest path homologous to a reference path
    Solve {
        #[command(flatten)]
        grid: GridArgs,
        /// Reference path as comma-separated vertex ids (default: fewest hops)
        #[arg(long)]
        path: Option<String>,
        #[arg(long, value_enum, default_value_t = FormulationArg::Flow)]
        formulation: FormulationArg,
        #[arg(long, value_enum, default_value_t = CostArg::Euclidean)]
        cost: CostArg,
        /// Skip the conflict-set search on infeasible models
        #[arg(long)]
        no_iis: bool,
        /// Write the JSON report (plus provenance sidecar) here instead of stdout
        #[arg(long)]
        out: Option<String>,
    },
    /// Print complex sizes and the homology rank
    Basis {
        #[command(flatten)]
        grid: GridArgs,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormulationArg {
    Flow,
    Mtz,
    Ohcp,
}

impl From<FormulationArg> for Variant {
    fn from(f: FormulationArg) -> Self {
        match f {
            FormulationArg::Flow => Variant::Flow,
            FormulationArg::Mtz => Variant::Mtz,
            FormulationArg::Ohcp => Variant::Ohcp,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CostArg {
    Euclidean,
    Uniform,
}

#[derive(Serialize)]
struct BasisReport {
    rows: usize,
    cols: usize,
    holes: Vec<(usize, usize)>,
    vertices: usize,
    edges: usize,
    triangles: usize,
    rank: usize,
}

#[derive(Serialize)]
struct SolveReport {
    formulation: &'static str,
    objective: f64,
    reference: Vec<usize>,
    target: Vec<f64>,
    projection: Vec<f64>,
    /// Used edges as `[from, to]`, oriented by flow sign.
    edges: Vec<[usize; 2]>,
    path: Option<Vec<usize>>,
    cycles: Vec<Vec<usize>>,
    /// Route from source to sink through the first residual cycle, if any.
    stitched: Option<Vec<usize>>,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Solve {
            grid,
            path,
            formulation,
            cost,
            no_iis,
            out,
        } => solve(grid, path, formulation, cost, no_iis, out),
        Action::Basis { grid } => basis(grid),
        Action::Report => report(),
    }
}

fn planner(grid: &GridArgs) -> Result<Planner> {
    let cfg = SolveCfg::default().with_kernel_tol(grid.kernel_tol);
    Planner::new(grid.rows, grid.cols, grid.holes.iter().copied(), cfg)
        .with_context(|| format!("building {}x{} grid", grid.rows, grid.cols))
}

fn basis(grid: GridArgs) -> Result<()> {
    let p = planner(&grid)?;
    let c = p.complex();
    let report = BasisReport {
        rows: grid.rows,
        cols: grid.cols,
        holes: c.holes().iter().map(|h| (h.row, h.col)).collect(),
        vertices: c.vertices().len(),
        edges: c.edges().len(),
        triangles: c.triangles().len(),
        rank: p.basis().rank(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Fewest-hop source→sink path, used when no reference is given.
fn default_reference(p: &Planner) -> Result<Vec<VertexId>> {
    let c = p.complex();
    let (Some(source), Some(sink)) = (c.source(), c.sink()) else {
        bail!("grid has no vertices");
    };
    let tree = dijkstra(c.vertices(), c.edges(), source);
    let hops = reconstruct(&tree.parent, source, sink)
        .ok_or_else(|| anyhow!("sink {sink} is unreachable from {source}"))?;
    Ok(std::iter::once(source).chain(hops.iter().map(|e| e.to)).collect())
}

fn solve(
    grid: GridArgs,
    path: Option<String>,
    formulation: FormulationArg,
    cost: CostArg,
    no_iis: bool,
    out: Option<String>,
) -> Result<()> {
    let p = planner(&grid)?;
    let reference = match path {
        Some(path) => parse_path(&path)?,
        None => default_reference(&p)?,
    };
    let variant = Variant::from(formulation);
    let oracle = MicroLpOracle {
        compute_iis: !no_iis,
        ..MicroLpOracle::default()
    };
    tracing::info!(
        rows = grid.rows,
        cols = grid.cols,
        holes = grid.holes.len(),
        formulation = ?variant,
        cost = ?cost,
        "solve"
    );
    let solution = match cost {
        CostArg::Euclidean => p.solve(&reference, &EuclideanCost, &variant, &oracle),
        CostArg::Uniform => p.solve(&reference, &UniformCost, &variant, &oracle),
    }?;

    let c = p.complex();
    let ids = |vs: Vec<VertexId>| vs.into_iter().map(|v| v.0).collect::<Vec<_>>();
    let decomposition = solution.decompose(c.edges(), p.cfg().decompose_tol, &FirstFound);
    let stitched = match (c.source(), c.sink(), decomposition.cycles.first()) {
        (Some(s), Some(t), Some(cycle)) => stitch_through_cycle(c, s, t, cycle).map(|st| {
            let edges = st.edges();
            let mut walk = vec![s.0];
            walk.extend(edges.iter().map(|e| e.to.0));
            walk
        }),
        _ => None,
    };
    let report = SolveReport {
        formulation: solution.formulation,
        objective: solution.objective,
        reference: ids(reference.clone()),
        target: p.classify(&reference)?.0.iter().copied().collect(),
        projection: solution.projection(p.basis()).0.iter().copied().collect(),
        edges: solution
            .directed_edges(c.edges())
            .iter()
            .map(|e| [e.from.0, e.to.0])
            .collect(),
        path: decomposition.path.map(|ch| ids(ch.vertices())),
        cycles: decomposition
            .cycles
            .into_iter()
            .map(|ch| ids(ch.vertices()))
            .collect(),
        stitched,
    };

    let doc = serde_json::to_vec_pretty(&report)?;
    match out {
        Some(out) => {
            let out_path = Path::new(&out);
            if let Some(parent) = out_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(out_path, doc).with_context(|| format!("writing {out}"))?;
            let params = serde_json::json!({
                "rows": grid.rows,
                "cols": grid.cols,
                "holes": grid.holes.iter().map(|h| [h.row, h.col]).collect::<Vec<_>>(),
                "kernel_tol": grid.kernel_tol,
                "formulation": variant.name(),
                "cost": format!("{cost:?}").to_lowercase(),
            });
            let sidecar = provenance::write_sidecar(out_path, provenance::Payload::new(params))?;
            tracing::info!(out, sidecar = %sidecar.display(), "report written");
        }
        None => println!("{}", String::from_utf8_lossy(&doc)),
    }
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "version": homopath::VERSION,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn parse_cell(s: &str) -> Result<Cell> {
    let (r, c) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("expected `row,col`, got `{s}`"))?;
    Ok(Cell::new(r.trim().parse()?, c.trim().parse()?))
}

fn parse_path(s: &str) -> Result<Vec<VertexId>> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<usize>()
                .map(VertexId)
                .with_context(|| format!("bad vertex id `{t}`"))
        })
        .collect()
}
