use crate::config::OutputFormat;
use core::fmt::Write;
use fanline::RunReport;

/// Renders the final aggregates of a run for stdout.
pub fn render(format: OutputFormat, report: &RunReport) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

fn render_text(report: &RunReport) -> Result<String, core::fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "Count:    emitted {}, collected {}",
        report.emitted.count, report.collected.count
    )?;
    writeln!(
        out,
        "Sum:      emitted {}, collected {}",
        report.emitted.sum, report.collected.sum
    )?;
    writeln!(out, "Per-worker: {:?}", report.tallies)?;
    write!(
        out,
        "Elapsed:  {:.3}s ({:.0} values/s across {} workers)",
        report.elapsed.as_secs_f64(),
        report.throughput(),
        report.workers
    )?;
    Ok(out)
}
