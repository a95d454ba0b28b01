//! One-shot dispatch: log the entry, import history, resolve the graph
//! window, query, fit, render.

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::cli::AppConfig;
use crate::data::{load_legacy_file, Storage};
use crate::error::Result;
use crate::graph;
use crate::range::{self, RangeSpec};
use crate::trend;

/// Run a single invocation against `config`.
pub fn run(config: AppConfig) -> Result<()> {
    let mut storage = Storage::open(&config.db_path)?;
    let today = Local::now().date_naive();

    if config.import_history {
        let entries = load_legacy_file(&config.legacy_path())?;
        let count = storage.import_legacy(&entries)?;
        println!("Imported {count} historical weight entries.");
        return Ok(());
    }

    if !config.graph_only {
        if let Some(weight) = config.weight {
            let date = config.date.unwrap_or(today);
            storage.upsert_entry(date, weight)?;
            println!("Logged weight: {weight} lbs on {date}");
        }
    }

    persist_default(&storage, &config)?;

    if config.graph_only || config.weight.is_some() {
        render_graph(&storage, &config, today)?;
    } else if !config.set_default {
        println!("No action specified. Use -h for help.");
    }

    Ok(())
}

/// Persist the explicitly chosen range token when `--set-default` is given.
///
/// The symbolic token is stored, never the computed start date. With
/// neither a range nor a from-date there is nothing to persist and the
/// flag is ignored.
fn persist_default(storage: &Storage, config: &AppConfig) -> Result<()> {
    if !config.set_default {
        return Ok(());
    }
    if let Some(date) = config.from_date {
        storage.set_default_range(&RangeSpec::From(date).token())?;
        println!("Set default graph range to start from: {date}");
    } else if let Some(spec) = config.range {
        storage.set_default_range(&spec.token())?;
        println!("Set default graph range to: {}", spec.token());
    }
    Ok(())
}

/// Resolve the window, query the entries, fit the trend, write the PNG.
fn render_graph(storage: &Storage, config: &AppConfig, today: NaiveDate) -> Result<()> {
    let stored = storage.get_default_range()?;
    let spec = range::resolve(config.from_date, config.range, stored.as_deref())?;
    let start = spec.start_date(today);
    debug!(?spec, ?start, "resolved graph window");

    let entries = storage.query_range(start)?;
    let trend = trend::fit(&entries);

    let png = graph::render_png(&entries, trend.as_ref(), today)?;
    graph::write_png(&config.output_path, &png)?;
    println!("Graph saved to: {}", config.output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_config(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            weight: None,
            date: None,
            range: None,
            from_date: None,
            set_default: false,
            import_history: false,
            graph_only: false,
            db_path: dir.join("weightlog.db"),
            output_path: dir.join("weight_progress.png"),
        }
    }

    #[test]
    fn test_import_flow_loads_the_legacy_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("legacy_weights.json"),
            r#"{"2023-05-01": 190.5, "2023-05-02": 190.1}"#,
        )
        .unwrap();

        let config = AppConfig {
            import_history: true,
            ..test_config(dir.path())
        };
        run(config.clone()).unwrap();

        let storage = Storage::open(&config.db_path).unwrap();
        let entries = storage.query_range(None).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].date, date(2023, 5, 1));
        assert_eq!(entries[0].weight, 190.5);
    }

    #[test]
    fn test_set_default_persists_the_token_not_the_date() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            set_default: true,
            range: Some(RangeSpec::LastSixMonths),
            ..test_config(dir.path())
        };

        let storage = Storage::open(&config.db_path).unwrap();
        persist_default(&storage, &config).unwrap();
        assert_eq!(storage.get_default_range().unwrap(), Some("6m".to_string()));

        let config = AppConfig {
            set_default: true,
            from_date: Some(date(2023, 6, 1)),
            ..test_config(dir.path())
        };
        persist_default(&storage, &config).unwrap();
        assert_eq!(
            storage.get_default_range().unwrap(),
            Some("from:2023-06-01".to_string())
        );
    }

    #[test]
    fn test_set_default_without_a_range_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            set_default: true,
            ..test_config(dir.path())
        };

        let storage = Storage::open(&config.db_path).unwrap();
        persist_default(&storage, &config).unwrap();
        assert_eq!(storage.get_default_range().unwrap(), None);
    }

    #[test]
    fn test_failed_import_leaves_stored_data_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("legacy_weights.json"), "not json").unwrap();

        let config = AppConfig {
            import_history: true,
            ..test_config(dir.path())
        };
        assert!(run(config.clone()).is_err());

        let storage = Storage::open(&config.db_path).unwrap();
        assert!(storage.query_range(None).unwrap().is_empty());
    }
}
