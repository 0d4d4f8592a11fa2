use std::{
    fmt::Write as _,
    fs::File,
    io::{self, BufWriter, Write},
};

use crate::{Result, SolverOptions, solver::Solution};

/// Cost on the first line, then the edges (one `a b` per line) or the tour
/// (space separated, starting at site 0).
pub fn render(solution: &Solution, precision: usize) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{:.precision$}", solution.cost());

    match solution {
        Solution::Network(tree) => {
            for (a, b) in &tree.edges {
                let _ = writeln!(out, "{a} {b}");
            }
        }
        Solution::Tour(tour) => {
            let order: Vec<String> = tour.order.iter().map(usize::to_string).collect();
            let _ = writeln!(out, "{}", order.join(" "));
        }
    }
    out
}

pub fn write_report(solution: &Solution, options: &SolverOptions) -> Result<()> {
    let report = render(solution, options.precision);
    match options.output_path() {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            writer.write_all(report.as_bytes())?;
            writer.flush()?;
            log::debug!("output: wrote report path={}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(report.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
