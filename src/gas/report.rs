//! Gas report aggregation, rendering and output.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::Deserialize;
use thiserror::Error;

use crate::config::{GasReporterConfig, SelectedNetwork, ToolConfig};

/// One measured call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GasSample {
    pub contract: String,
    pub method: String,
    pub gas_used: u64,
}

/// Aggregated usage of one contract method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasRow {
    pub contract: String,
    pub method: String,
    pub calls: u64,
    pub min: u64,
    pub max: u64,
    pub avg: u64,
}

#[derive(Debug, Error)]
pub enum GasReportError {
    #[error("failed to read gas samples from {}: {source}", path.display())]
    ReadSamples {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid gas samples: {0}")]
    ParseSamples(#[from] serde_json::Error),

    #[error("failed to write gas report to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-method gas statistics, sorted by contract then method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GasReport {
    rows: Vec<GasRow>,
}

impl GasReport {
    pub fn from_samples(samples: impl IntoIterator<Item = GasSample>) -> Self {
        // (calls, min, max, total)
        let mut stats: BTreeMap<(String, String), (u64, u64, u64, u128)> = BTreeMap::new();
        for sample in samples {
            let entry = stats
                .entry((sample.contract, sample.method))
                .or_insert((0, u64::MAX, 0, 0));
            entry.0 += 1;
            entry.1 = entry.1.min(sample.gas_used);
            entry.2 = entry.2.max(sample.gas_used);
            entry.3 += u128::from(sample.gas_used);
        }

        let rows = stats
            .into_iter()
            .map(|((contract, method), (calls, min, max, total))| GasRow {
                contract,
                method,
                calls,
                min,
                max,
                avg: (total / u128::from(calls)) as u64,
            })
            .collect();
        Self { rows }
    }

    /// Read samples from a JSON array file.
    pub fn load_samples(path: &Path) -> Result<Vec<GasSample>, GasReportError> {
        let content = fs::read_to_string(path).map_err(|source| GasReportError::ReadSamples {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn rows(&self) -> &[GasRow] {
        &self.rows
    }

    /// Render the report as a plain-text table.
    pub fn render(
        &self,
        settings: &GasReporterConfig,
        network: &SelectedNetwork<'_>,
        compiler_version: &str,
    ) -> String {
        let color = settings.color_output();
        if color {
            // The report goes to a file, so colour follows the setting, not the terminal.
            colored::control::set_override(true);
        }
        let bold = |text: &str| {
            if color {
                text.bold().to_string()
            } else {
                text.to_string()
            }
        };

        let headers = ["Contract", "Method", "Calls", "Min", "Max", "Avg"];
        let cells: Vec<[String; 6]> = self
            .rows
            .iter()
            .map(|row| {
                [
                    row.contract.clone(),
                    row.method.clone(),
                    row.calls.to_string(),
                    row.min.to_string(),
                    row.max.to_string(),
                    row.avg.to_string(),
                ]
            })
            .collect();

        let mut widths = headers.map(str::len);
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        let total_width = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);

        let mut out = String::new();
        let _ = writeln!(out, "{}", bold("Gas report"));
        let _ = writeln!(out, "Network:  {} (chain {})", network.name, network.chain_id());
        let _ = writeln!(out, "Compiler: solc {}", compiler_version);
        let _ = writeln!(out, "Currency: {} (gas units, not priced)", settings.currency);
        let _ = writeln!(out, "{}", "-".repeat(total_width));

        let header_line = pad_cells(&headers.map(String::from), &widths).join(" | ");
        let _ = writeln!(out, "{}", bold(header_line.trim_end()));
        for row in &cells {
            let mut padded = pad_cells(row, &widths);
            if color {
                let contract = padded[0].cyan().to_string();
                padded[0] = contract;
            }
            let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
        }
        if cells.is_empty() {
            let _ = writeln!(out, "(no gas samples)");
        }
        out
    }

    /// Write the report to `gas_reporter.output_file` under `root`.
    ///
    /// Returns `None` when reporting is disabled.
    pub fn write(
        &self,
        config: &ToolConfig,
        network: &SelectedNetwork<'_>,
        root: &Path,
    ) -> Result<Option<PathBuf>, GasReportError> {
        let settings = &config.gas_reporter;
        if !settings.enabled {
            tracing::debug!("Gas reporter disabled, skipping report");
            return Ok(None);
        }

        let path = root.join(&settings.output_file);
        let write_err = |source| GasReportError::Write {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let text = self.render(settings, network, &config.compiler.version);
        fs::write(&path, text).map_err(write_err)?;

        tracing::info!(
            path = %path.display(),
            methods = self.rows.len(),
            "Gas report written"
        );
        Ok(Some(path))
    }
}

/// Text columns left-aligned, numbers right-aligned.
fn pad_cells(cells: &[String; 6], widths: &[usize; 6]) -> Vec<String> {
    cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            if i < 2 {
                format!("{:<width$}", cell, width = width)
            } else {
                format!("{:>width$}", cell, width = width)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(contract: &str, method: &str, gas_used: u64) -> GasSample {
        GasSample {
            contract: contract.to_string(),
            method: method.to_string(),
            gas_used,
        }
    }

    fn samples() -> Vec<GasSample> {
        vec![
            sample("SimpleStorage", "store", 43_724),
            sample("SimpleStorage", "store", 26_624),
            sample("FundMe", "fund", 87_000),
            sample("SimpleStorage", "store", 26_627),
        ]
    }

    #[test]
    fn test_aggregation() {
        let report = GasReport::from_samples(samples());
        assert_eq!(
            report.rows(),
            &[
                GasRow {
                    contract: "FundMe".into(),
                    method: "fund".into(),
                    calls: 1,
                    min: 87_000,
                    max: 87_000,
                    avg: 87_000,
                },
                GasRow {
                    contract: "SimpleStorage".into(),
                    method: "store".into(),
                    calls: 3,
                    min: 26_624,
                    max: 43_724,
                    avg: 32_325,
                },
            ]
        );
    }

    #[test]
    fn test_render_without_colors() {
        let config = ToolConfig::default();
        let network = config.select_network(None).unwrap();
        let text = GasReport::from_samples(samples()).render(&config.gas_reporter, &network, "0.8.7");

        assert!(!text.contains('\x1b'));
        assert!(text.contains("Network:  hardhat (chain 31337)"));
        assert!(text.contains("Compiler: solc 0.8.7"));
        assert!(text.contains("Currency: USD"));
        assert!(text.contains("SimpleStorage | store  |     3 | 26624 | 43724 | 32325"));
    }

    #[test]
    fn test_render_with_colors() {
        let mut config = ToolConfig::default();
        config.gas_reporter.no_colors = false;
        let network = config.select_network(None).unwrap();
        let text = GasReport::default().render(&config.gas_reporter, &network, "0.8.7");

        assert!(text.starts_with("\x1b[1mGas report\x1b[0m"));
        assert!(text.contains("(no gas samples)"));

        let text = GasReport::from_samples(samples()).render(&config.gas_reporter, &network, "0.8.7");
        assert!(text.contains("\x1b[36mFundMe"));
        assert!(text.contains("\x1b[1mContract"));
    }

    #[test]
    fn test_parse_samples() {
        let parsed: Vec<GasSample> =
            serde_json::from_str(r#"[{"contract":"FundMe","method":"withdraw","gas_used":35000}]"#)
                .unwrap();
        assert_eq!(parsed, vec![sample("FundMe", "withdraw", 35_000)]);
    }
}
