//! Result export — value histories and bootstrap summaries to CSV.

use std::path::Path;

use anyhow::{Context, Result};

use quantlab_core::engine::ValuePoint;

use crate::bootstrap::{BootstrapReport, StatisticDistribution};

/// Write a value history as `date,value` rows.
pub fn write_value_history_csv(path: &Path, values: &[ValuePoint]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create value history CSV {}", path.display()))?;
    writer.write_record(["date", "value"])?;
    for point in values {
        writer.write_record([point.date.to_string(), format!("{:.4}", point.value)])?;
    }
    writer.flush().context("failed to flush value history CSV")?;
    Ok(())
}

/// Write a bootstrap report as one row per statistic:
/// `statistic,mean,median,std,ci_lower,ci_upper`.
pub fn write_bootstrap_csv(path: &Path, report: &BootstrapReport) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create bootstrap CSV {}", path.display()))?;
    writer.write_record(["statistic", "mean", "median", "std", "ci_lower", "ci_upper"])?;

    let rows: [(&str, &StatisticDistribution); 6] = [
        ("average_return", &report.average_return),
        ("annual_return", &report.annual_return),
        ("annual_volatility", &report.annual_volatility),
        ("sharpe_ratio", &report.sharpe_ratio),
        ("total_return", &report.total_return),
        ("final_value", &report.final_value),
    ];
    for (name, dist) in rows {
        writer.write_record([
            name.to_string(),
            format!("{:.6}", dist.mean),
            format!("{:.6}", dist.median),
            format!("{:.6}", dist.std),
            format!("{:.6}", dist.ci_lower),
            format!("{:.6}", dist.ci_upper),
        ])?;
    }
    writer.flush().context("failed to flush bootstrap CSV")?;
    Ok(())
}
