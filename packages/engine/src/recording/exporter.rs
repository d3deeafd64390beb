// packages/engine/src/recording/exporter.rs
//! Export run reports
//!
//! Supports:
//! - Text (the classic one-line timing summary plus population details)
//! - JSON (for benchmark collection and plotting)

use crate::recording::report::RunReport;
use crate::utils::config::ReportFormat;
use crate::utils::errors::{EngineError, Result};
use std::fmt::Write as _;
use tracing::debug;

/// Exporter for run reports
pub struct Exporter {
    format: ReportFormat,
}

impl Exporter {
    /// Create a new exporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }
    
    /// Export a report to string
    pub fn export(&self, report: &RunReport) -> Result<String> {
        debug!(run_id = %report.run_id, format = ?self.format, "exporting run report");
        
        match self.format {
            ReportFormat::Text => self.export_text(report),
            ReportFormat::Json => self.export_json(report),
        }
    }
    
    /// Export to human-readable text
    fn export_text(&self, report: &RunReport) -> Result<String> {
        let totals = &report.totals;
        let mut out = String::new();
        
        let lines = (|| -> std::fmt::Result {
            writeln!(
                out,
                "Simulation took {:?} using {} threads",
                report.elapsed, report.workers
            )?;
            writeln!(out, "  run:        {}", report.run_id)?;
            writeln!(out, "  started:    {}", report.started_at.to_rfc3339())?;
            writeln!(
                out,
                "  chronons:   {} on a {}x{} grid{}",
                totals.chronons,
                report.grid_size,
                report.grid_size,
                if report.stopped { " (stopped)" } else { "" }
            )?;
            writeln!(
                out,
                "  throughput: {:.1} chronons/s, avg step {:?}",
                report.chronons_per_sec(),
                totals.avg_step_time()
            )?;
            writeln!(
                out,
                "  prey:       {} -> {}",
                report.initial.prey, report.final_population.prey
            )?;
            writeln!(
                out,
                "  predators:  {} -> {}",
                report.initial.predators, report.final_population.predators
            )?;
            write!(
                out,
                "  births {}, starvations {}, prey eaten {}, blocked moves {}",
                totals.tally.births,
                totals.tally.starvations,
                totals.tally.prey_eaten,
                totals.tally.blocked
            )
        })();
        
        lines.map_err(|e| EngineError::ExportFailed(format!("text formatting error: {}", e)))?;
        Ok(out)
    }
    
    /// Export to JSON format
    fn export_json(&self, report: &RunReport) -> Result<String> {
        serde_json::to_string_pretty(report).map_err(|e| {
            EngineError::ExportFailed(format!("JSON serialization error: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::stats::{RunTotals, StepTally};
    use crate::world::snapshot::Population;
    use chrono::Utc;
    use std::time::Duration;
    use ulid::Ulid;
    
    fn create_test_report() -> RunReport {
        RunReport {
            run_id: Ulid::new(),
            started_at: Utc::now(),
            workers: 4,
            grid_size: 50,
            elapsed: Duration::from_millis(250),
            initial: Population { prey: 200, predators: 100 },
            final_population: Population { prey: 180, predators: 40 },
            totals: RunTotals {
                chronons: 1000,
                tally: StepTally {
                    births: 12,
                    starvations: 60,
                    ..Default::default()
                },
                step_time: Duration::from_millis(240),
            },
            stopped: false,
        }
    }
    
    #[test]
    fn test_text_export() {
        let exporter = Exporter::new(ReportFormat::Text);
        let text = exporter.export(&create_test_report()).unwrap();
        
        assert!(text.starts_with("Simulation took 250ms using 4 threads"));
        assert!(text.contains("1000 on a 50x50 grid"));
        assert!(text.contains("200 -> 180"));
        assert!(!text.contains("(stopped)"));
    }
    
    #[test]
    fn test_json_export() {
        let exporter = Exporter::new(ReportFormat::Json);
        let report = create_test_report();
        let json = exporter.export(&report).unwrap();
        
        let parsed: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.run_id, report.run_id);
        assert_eq!(parsed.totals.chronons, 1000);
        assert_eq!(parsed.final_population.predators, 40);
    }
    
    #[test]
    fn test_throughput() {
        let report = create_test_report();
        assert!((report.chronons_per_sec() - 4000.0).abs() < 1e-6);
    }
}
