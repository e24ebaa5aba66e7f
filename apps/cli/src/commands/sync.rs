//! `venuesync sync`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use serde_json::Value;
use tracing::warn;
use venuesync_client::{ClientConfig, SyncEngine, SyncOptions, VenueApiClient};
use venuesync_core::validation::{validate_concurrency, validate_desired};
use venuesync_core::{Record, ResourceKind};

/// Parsed arguments of the `sync` command.
pub struct SyncArgs {
    pub kind: ResourceKind,
    pub venue: String,
    pub input: PathBuf,
    pub dry_run: bool,
    pub filters: Vec<String>,
    pub concurrency: Option<usize>,
}

pub async fn run(config: &ClientConfig, args: SyncArgs) -> anyhow::Result<()> {
    if !args.kind.is_venue_syncable() {
        bail!("{} cannot be synced by name", args.kind);
    }

    let contents = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not valid JSON", args.input.display()))?;
    let desired = Record::list_from_value(value)?;

    for problem in validate_desired(&desired) {
        warn!(%problem, "Desired record problem");
    }

    let conditions = parse_filters(&args.filters)?;

    let client = Arc::new(VenueApiClient::new(config)?);
    let mut engine = SyncEngine::from_config(client, config);
    if let Some(concurrency) = args.concurrency {
        validate_concurrency(concurrency)?;
        engine = engine.with_concurrency(concurrency);
    }

    let mut options = SyncOptions::new().dry_run(args.dry_run);
    if !conditions.is_empty() {
        options = options.with_filter(move |record| matches_all(record, &conditions));
    }

    let outcome = engine
        .sync(args.kind, &args.venue, &desired, options)
        .await?;

    println!("{}", outcome.counts);
    if outcome.dry_run {
        println!("dry run: nothing was changed");
    } else {
        for record in &outcome.created {
            println!(
                "created {}\t{}",
                record.id().unwrap_or("-"),
                record.name().unwrap_or("-")
            );
        }
    }

    Ok(())
}

/// Parses `field=value` conditions. Values are JSON; anything that does not
/// parse as JSON is taken as a plain string.
fn parse_filters(raw: &[String]) -> anyhow::Result<Vec<(String, Value)>> {
    raw.iter()
        .map(|condition| {
            let Some((field, value)) = condition.split_once('=') else {
                bail!("invalid --where '{condition}', expected FIELD=VALUE");
            };
            if field.is_empty() {
                bail!("invalid --where '{condition}', field is empty");
            }
            let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.into()));
            Ok((field.to_string(), value))
        })
        .collect()
}

fn matches_all(record: &Record, conditions: &[(String, Value)]) -> bool {
    conditions
        .iter()
        .all(|(field, expected)| record.get(field) == Some(expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_filters() {
        let parsed = parse_filters(&[
            "isPublished=true".to_string(),
            "floor=2".to_string(),
            "universe=staff".to_string(),
        ])
        .unwrap();

        assert_eq!(
            parsed,
            vec![
                ("isPublished".to_string(), json!(true)),
                ("floor".to_string(), json!(2)),
                ("universe".to_string(), json!("staff")),
            ]
        );
    }

    #[test]
    fn test_parse_filters_rejects_malformed() {
        assert!(parse_filters(&["isPublished".to_string()]).is_err());
        assert!(parse_filters(&["=true".to_string()]).is_err());
    }

    #[test]
    fn test_matches_all() {
        let record = Record::from_value(json!({"isPublished": true, "floor": 2})).unwrap();
        let conditions = parse_filters(&["isPublished=true".to_string()]).unwrap();
        assert!(matches_all(&record, &conditions));

        let conditions = parse_filters(&["isPublished=true".to_string(), "floor=3".to_string()]).unwrap();
        assert!(!matches_all(&record, &conditions));
    }
}
