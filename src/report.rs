//! Plain-text rendering of a [`BatchResult`].
//!
//! One section per source, in input order: a descriptive-statistics table,
//! summaries of the two chart datasets, and the capability-indices table.
//! Failed sources get a one-line notice instead.

use std::fmt;

use crate::record::{AnalysisRecord, BatchResult, ErrorRecord, SeriesRecord};

/// Renders `result` as a human-readable report.
///
/// # Examples
///
/// ```
/// use spc_capability::{analyze_batch, report, SampleSeries, SpecLimits};
///
/// let series = SampleSeries::new("line1.csv", vec![10.0, 12.0, 11.0, 13.0, 9.0]);
/// let result = analyze_batch(SpecLimits::new(11.0, 8.0, 14.0), [series]).unwrap();
///
/// let text = report::render_text(&result);
/// assert!(text.contains("Descriptive statistics - line1.csv"));
/// assert!(text.contains("Cpk"));
/// ```
pub fn render_text(result: &BatchResult) -> String {
    TextReport(result).to_string()
}

/// [`fmt::Display`] adapter producing the text of [`render_text`].
#[derive(Debug, Clone, Copy)]
pub struct TextReport<'a>(pub &'a BatchResult);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let spec = &result.spec;
        writeln!(
            f,
            "Process capability report (target = {}, LSL = {}, USL = {})",
            spec.target, spec.lsl, spec.usl
        )?;

        for record in result {
            writeln!(f)?;
            match record {
                SeriesRecord::Analyzed(record) => write_analysis(f, record)?,
                SeriesRecord::Failed(record) => write_error(f, record)?,
            }
        }

        if result.cancelled {
            writeln!(f, "\nRun cancelled after {} source(s).", result.len())?;
        }
        Ok(())
    }
}

fn write_analysis(f: &mut fmt::Formatter<'_>, record: &AnalysisRecord) -> fmt::Result {
    let s = &record.statistics;
    writeln!(f, "Descriptive statistics - {}", record.source_id)?;
    write_table(
        f,
        &[
            ("Sample mean", num(s.mean)),
            ("Sample standard deviation", num(s.sample_std_dev)),
            ("Median", num(s.median)),
            ("Range", num(s.range)),
            (
                "Quartiles",
                format!("Q1={}, Q2={}, Q3={}", num(s.q1), num(s.q2), num(s.q3)),
            ),
        ],
    )?;

    let h = &record.histogram;
    writeln!(
        f,
        "\nHistogram: {} bins of width {} from {} to {}",
        h.n_bins(),
        num(h.bin_width),
        num(h.edges.first().copied().unwrap_or_default()),
        num(h.edges.last().copied().unwrap_or_default()),
    )?;
    writeln!(f, "  counts: {:?}", h.counts)?;

    let c = &record.control_chart;
    writeln!(
        f,
        "Control chart: {} points ({:?}), USL = {}, LSL = {}",
        c.points.len(),
        c.source,
        c.usl,
        c.lsl
    )?;

    let r = &record.capability;
    let l = &record.control_limits;
    writeln!(f, "\nProcess capability")?;
    write_table(
        f,
        &[
            ("Sample mean", num(r.mean_for_capability)),
            ("Number of samples", r.sample_count.to_string()),
            ("Short-term standard deviation", num(r.std_dev_short_term)),
            ("Long-term standard deviation", num(r.std_dev_long_term)),
            ("Cp", num(r.cp)),
            ("Cpl", num(r.cpl)),
            ("Cpu", num(r.cpu)),
            ("Cpk", num(r.cpk)),
            ("Pp", num(r.pp)),
            ("Ppl", num(r.ppl)),
            ("Ppu", num(r.ppu)),
            ("Ppk", num(r.ppk)),
            ("UCL", num(l.ucl)),
            ("LCL", num(l.lcl)),
        ],
    )
}

fn write_error(f: &mut fmt::Formatter<'_>, record: &ErrorRecord) -> fmt::Result {
    writeln!(
        f,
        "{} - not analyzed ({}): {}",
        record.source_id, record.kind, record.message
    )
}

fn write_table(f: &mut fmt::Formatter<'_>, rows: &[(&str, String)]) -> fmt::Result {
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in rows {
        writeln!(f, "  {label:<width$}  {value}")?;
    }
    Ok(())
}

fn num(value: f64) -> String {
    format!("{value:.4}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::analyze_batch;
    use crate::series::{SampleSeries, Table};
    use crate::spec::SpecLimits;

    #[test]
    fn sections_follow_input_order() {
        let sources = vec![
            Table::new("b.csv").with_column("samples", vec![10.0, 12.0, 11.0, 13.0, 9.0]),
            Table::new("a.csv").with_column("other", vec![1.0]),
        ];
        let result = analyze_batch(SpecLimits::new(11.0, 8.0, 14.0), &sources).unwrap();
        let text = render_text(&result);

        let b = text.find("Descriptive statistics - b.csv").expect("b section");
        let a = text.find("a.csv - not analyzed (MissingField)").expect("a notice");
        assert!(b < a);
        assert!(text.contains("Cpk"));
        assert!(text.contains("0.6325"));
        assert!(text.contains("Q1=10.0000, Q2=11.0000, Q3=12.0000"));
    }

    #[test]
    fn header_shows_limits() {
        let spec = SpecLimits::new(1.5, 0.0, 3.0);
        let result = analyze_batch(spec, Vec::<SampleSeries>::new()).unwrap();
        let text = render_text(&result);
        assert_eq!(text, "Process capability report (target = 1.5, LSL = 0, USL = 3)\n");
    }

    #[test]
    fn display_adapter_matches_render_text() {
        let sources = [SampleSeries::new("a", vec![9.0, 11.0, 10.0, 10.5])];
        let mut result = analyze_batch(SpecLimits::new(10.0, 8.0, 12.0), &sources).unwrap();
        result.cancelled = true;

        let text = render_text(&result);
        assert_eq!(text, TextReport(&result).to_string());
        assert!(text.ends_with("\nRun cancelled after 1 source(s).\n"), "{text}");
    }
}
