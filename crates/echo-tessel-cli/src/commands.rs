// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subcommand implementations. Output goes to the supplied writer.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use comfy_table::Table;
use echo_tessel::{ExecutorConfig, PartitionPlan, Region, SpatialExecutor, Strategy};
use echo_tessel_demos::around::{sum_around, sum_around_parallel};
use echo_tessel_demos::gray::{to_gray, to_gray_parallel};
use echo_tessel_demos::occupancy::{count_windows, count_windows_parallel};
use echo_tessel_demos::spectrum::{sum_spectrum, sum_spectrum_parallel};
use echo_tessel_demos::{random_bool_grid, random_f64_grid, Grid};
use serde::Serialize;
use tracing::info;

use crate::cli::{AroundArgs, CountWindowsArgs, GrayArgs, PlanArgs, SpectrumArgs};

/// JSON shape of `tessel plan --json`.
#[derive(Debug, Serialize)]
struct PlanDump<'a> {
    strategy: Strategy,
    width: usize,
    height: usize,
    parallel: usize,
    covered_cells: usize,
    regions: &'a [Region],
}

pub fn run_plan(
    out: &mut impl Write,
    args: &PlanArgs,
    parallel: usize,
    executor: ExecutorConfig,
) -> Result<()> {
    let strategy = args.strategy.with_param(args.size);
    let plan = PartitionPlan::new(args.width, args.height, strategy, parallel)?;

    if args.json {
        let dump = PlanDump {
            strategy,
            width: plan.width(),
            height: plan.height(),
            parallel: plan.parallel(),
            covered_cells: plan.covered_cells(),
            regions: plan.regions(),
        };
        serde_json::to_writer_pretty(&mut *out, &dump)?;
        writeln!(out)?;
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "region", "width", "height", "area"]);
    for (i, r) in plan.iter().enumerate() {
        table.add_row(vec![
            i.to_string(),
            r.to_string(),
            r.width().to_string(),
            r.height().to_string(),
            r.area().to_string(),
        ]);
    }
    writeln!(out, "{table}")?;
    writeln!(
        out,
        "{} regions, {} of {} cells covered",
        plan.len(),
        plan.covered_cells(),
        plan.width().saturating_mul(plan.height())
    )?;

    if args.run {
        let visited = AtomicUsize::new(0);
        let (report, elapsed) = timed(|| {
            SpatialExecutor::new(executor).run(&plan, &|r: Region| {
                visited.fetch_add(r.area(), Ordering::Relaxed);
            })
        });
        writeln!(
            out,
            "ran {} regions on {} workers, peak {} in flight, {} cells visited in {elapsed:?}",
            report.regions,
            report.workers,
            report.peak_in_flight,
            visited.into_inner()
        )?;
    }
    Ok(())
}

pub fn run_gray(out: &mut impl Write, args: &GrayArgs, parallel: usize) -> Result<()> {
    let img = image::open(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?
        .to_rgb8();

    let (gray, elapsed) = timed(|| to_gray_parallel(&img, parallel));
    let gray = gray?;
    info!(?elapsed, width = img.width(), height = img.height(), "grayscale done");

    if args.check && gray != to_gray(&img) {
        bail!("parallel grayscale differs from the sequential result");
    }

    gray.save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    writeln!(
        out,
        "wrote {} ({}x{}) in {elapsed:?}",
        args.output.display(),
        gray.width(),
        gray.height()
    )?;
    Ok(())
}

pub fn run_count_windows(
    out: &mut impl Write,
    args: &CountWindowsArgs,
    parallel: usize,
) -> Result<()> {
    let grid = random_bool_grid(args.grid.width, args.grid.height, args.density, args.grid.seed);
    let (par, par_time) = timed(|| count_windows_parallel(&grid, args.window, parallel));
    let (seq, seq_time) = timed(|| count_windows(&grid, args.window));
    let (par, seq) = (par?, seq?);
    report(out, &par.to_string(), &seq.to_string(), par == seq, par_time, seq_time)
}

pub fn run_spectrum(out: &mut impl Write, args: &SpectrumArgs, parallel: usize) -> Result<()> {
    let grid = random_f64_grid(args.grid.width, args.grid.height, args.grid.seed);
    let (par, par_time) = timed(|| sum_spectrum_parallel(&grid, args.size, parallel));
    let (seq, seq_time) = timed(|| sum_spectrum(&grid, args.size));
    let (par, seq) = (par?, seq?);
    report(out, &checksum(&par), &checksum(&seq), par == seq, par_time, seq_time)
}

pub fn run_around(out: &mut impl Write, args: &AroundArgs, parallel: usize) -> Result<()> {
    let grid = random_f64_grid(args.grid.width, args.grid.height, args.grid.seed);
    let (par, par_time) = timed(|| sum_around_parallel(&grid, args.radius, parallel));
    let (seq, seq_time) = timed(|| sum_around(&grid, args.radius));
    let par = par?;
    report(out, &checksum(&par), &checksum(&seq), par == seq, par_time, seq_time)
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

fn checksum(grid: &Grid<f64>) -> String {
    format!("{:.6}", grid.as_slice().iter().sum::<f64>())
}

fn report(
    out: &mut impl Write,
    parallel: &str,
    sequential: &str,
    matched: bool,
    par_time: Duration,
    seq_time: Duration,
) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["run", "result", "time"]);
    table.add_row(vec![
        "parallel".to_string(),
        parallel.to_string(),
        format!("{par_time:?}"),
    ]);
    table.add_row(vec![
        "sequential".to_string(),
        sequential.to_string(),
        format!("{seq_time:?}"),
    ]);
    writeln!(out, "{table}")?;
    writeln!(out, "match: {matched}")?;
    if !matched {
        bail!("parallel result differs from the sequential twin");
    }
    Ok(())
}
