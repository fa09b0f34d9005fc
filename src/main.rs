use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::{env, fs, path::PathBuf};
use tallyscan::{
    arith::evaluate_cells,
    assemble::{assemble, DataValueSet},
    dates::try_parse_date,
    dhis2::{Dhis2Client, Dhis2Config},
    metadata::{build_index, build_vocabularies},
    period::format_period,
    reconcile::reconcile,
    similarity::LevenshteinScorer,
    table::{clean_up, RawTable},
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// One upload job: where the server is, which data set / period / org unit
/// the sheets cover, and where the OCR step left the grids.
#[derive(Debug, Deserialize)]
struct JobConfig {
    server: Dhis2Config,
    data_set: String,
    org_unit: String,
    period_type: String,
    period_start: String,
    tables: PathBuf,
    #[serde(default)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) load job config ──────────────────────────────────────────
    let config_path = env::args().nth(1).unwrap_or_else(|| "config.yaml".into());
    let config_text = fs::read_to_string(&config_path)
        .with_context(|| format!("reading config {config_path}"))?;
    let config: JobConfig =
        serde_yaml::from_str(&config_text).with_context(|| format!("parsing {config_path}"))?;

    let iso_start = try_parse_date(&config.period_start)
        .with_context(|| format!("`{}` is not a recognizable date", config.period_start))?;
    let period_start = NaiveDate::parse_from_str(&iso_start, "%Y-%m-%d")?;
    let period = format_period(&config.period_type, period_start)?;
    info!(period, data_set = %config.data_set, org_unit = %config.org_unit, "job");

    // ─── 3) read the OCR grid export ─────────────────────────────────
    let grid_text = fs::read_to_string(&config.tables)
        .with_context(|| format!("reading grids {:?}", config.tables))?;
    let grids: Vec<RawTable> =
        serde_json::from_str(&grid_text).with_context(|| format!("parsing {:?}", config.tables))?;
    info!("{} table(s) to process", grids.len());

    // ─── 4) fetch form metadata, build index + vocabularies ──────────
    let client = Dhis2Client::new(Client::new(), config.server);
    let form = client
        .form(&config.data_set, &period, &config.org_unit)
        .await
        .context("fetching form description")?;
    let field_index = build_index(&form);
    let (row_vocab, col_vocab) = build_vocabularies(&form);
    info!(
        fields = field_index.len(),
        rows = row_vocab.len(),
        cols = col_vocab.len(),
        "metadata loaded"
    );

    // ─── 5) reconcile labels, evaluate cells, clean artifacts ────────
    let tables = reconcile(&grids, &row_vocab, &col_vocab, &LevenshteinScorer);
    let tables = evaluate_cells(&tables);
    let tables = clean_up(&tables);

    // ─── 6) assemble data values (fail-fast on unresolved labels) ────
    let mut data_values = Vec::new();
    for (idx, table) in tables.iter().enumerate() {
        let values = assemble(&table.promote_header(), &field_index)
            .with_context(|| format!("assembling table {idx}"))?;
        info!(table = idx, values = values.len(), "assembled");
        data_values.extend(values);
    }
    if data_values.is_empty() {
        warn!("no non-empty cells; nothing to submit");
        return Ok(());
    }

    // ─── 7) submit ────────────────────────────────────────────────────
    let payload = DataValueSet {
        data_set: config.data_set,
        period,
        org_unit: config.org_unit,
        data_values,
    };
    let summary = client
        .submit(&payload, config.dry_run)
        .await
        .context("submitting data values")?;
    info!(dry_run = config.dry_run, "server response: {summary}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn job_config_round_trips_through_yaml() -> Result<()> {
        let yaml = r#"
server:
  server_url: https://play.dhis2.org
  username: admin
  password: district
data_set: ds1
org_unit: ou1
period_type: Monthly
period_start: 25/06/2024
tables: grids.json
"#;
        let mut file = NamedTempFile::new()?;
        file.write_all(yaml.as_bytes())?;

        let text = fs::read_to_string(file.path())?;
        let config: JobConfig = serde_yaml::from_str(&text)?;
        assert_eq!(config.data_set, "ds1");
        assert_eq!(config.period_type, "Monthly");
        assert!(!config.dry_run);

        // the period start accepts any format the date normalizer knows
        let iso = try_parse_date(&config.period_start).unwrap();
        assert_eq!(iso, "2024-06-25");
        Ok(())
    }
}
