use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::Value;
use tablet_store::{BucketLayout, JsonFormat, OsFileSystem, StoreConfig, Tablet};
use tablet_types::Digest;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    match cli.command {
        Command::Init => cmd_init(&config),
        Command::HashObject(args) => cmd_hash_object(&config, args),
        Command::CatObject(args) => cmd_cat_object(&config, args),
        Command::Push(args) => cmd_push(&config, args),
        Command::Get(args) => cmd_get(&config, args),
        Command::Config => cmd_config(&config),
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<StoreConfig> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => StoreConfig::default(),
    };
    if let Some(root) = &cli.root {
        config.root = root.clone();
    }
    if cli.consolidated {
        config.layout = BucketLayout::Consolidated;
    }
    debug!(root = %config.root.display(), layout = ?config.layout, "resolved config");
    Ok(config)
}

fn open(config: &StoreConfig) -> Tablet<JsonFormat> {
    Tablet::with_format(config.clone(), Arc::new(OsFileSystem), JsonFormat)
}

fn cmd_init(config: &StoreConfig) -> anyhow::Result<()> {
    let tablet = open(config);
    tablet.init()?;
    println!(
        "{} Initialized store in {}",
        "✓".green().bold(),
        tablet.root().store_dir().display().to_string().bold()
    );
    Ok(())
}

fn cmd_hash_object(config: &StoreConfig, args: HashObjectArgs) -> anyhow::Result<()> {
    let digest = open(config).hash_object(args.value.as_str())?;
    println!("{}", digest.to_hex().yellow());
    Ok(())
}

fn cmd_cat_object(config: &StoreConfig, args: CatObjectArgs) -> anyhow::Result<()> {
    let digest: Digest = args
        .digest
        .parse()
        .with_context(|| format!("invalid digest {:?}", args.digest))?;
    let value: String = open(config).read_object(&digest)?;
    println!("{value}");
    Ok(())
}

fn cmd_push(config: &StoreConfig, args: PushArgs) -> anyhow::Result<()> {
    let value: Value = serde_json::from_str(&args.value).context("value must be valid JSON")?;
    let tablet = open(config);
    let digest = match (args.key, args.field) {
        (Some(key), _) => tablet.push(value, key.as_str())?,
        (None, Some(field)) => {
            if value.get(&field).is_none() {
                bail!("value has no field {:?}", field);
            }
            tablet.push_by(value, |v| key_text(&v[field.as_str()]))?
        }
        (None, None) => bail!("either --key or --field is required"),
    };
    println!("{} {}", "pushed".green(), digest.to_hex().yellow());
    Ok(())
}

fn cmd_get(config: &StoreConfig, args: GetArgs) -> anyhow::Result<()> {
    let values: Vec<Value> = open(config).get(args.key.as_str())?;
    if values.is_empty() {
        println!("{}", "(empty)".dimmed());
    }
    for value in values {
        println!("{value}");
    }
    Ok(())
}

fn cmd_config(config: &StoreConfig) -> anyhow::Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}

/// Key text for a JSON field: strings unquoted, everything else as JSON.
fn key_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_text_matches_raw_key() {
        assert_eq!(key_text(&serde_json::json!(1)), "1");
        assert_eq!(key_text(&serde_json::json!("abc")), "abc");
        assert_eq!(key_text(&serde_json::json!(true)), "true");
    }

    #[test]
    fn field_push_then_get_by_key() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::at(dir.path());
        cmd_init(&config).unwrap();
        for _ in 0..2 {
            cmd_push(
                &config,
                PushArgs {
                    value: r#"{"value": 1}"#.into(),
                    key: None,
                    field: Some("value".into()),
                },
            )
            .unwrap();
        }
        let values: Vec<Value> = open(&config).get("1").unwrap();
        assert_eq!(values, vec![serde_json::json!({"value": 1}); 2]);
    }

    #[test]
    fn hash_object_and_field_push_share_one_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::at(dir.path());
        cmd_init(&config).unwrap();
        cmd_hash_object(&config, HashObjectArgs { value: "1".into() }).unwrap();
        cmd_push(
            &config,
            PushArgs {
                value: r#"{"value": 1}"#.into(),
                key: None,
                field: Some("value".into()),
            },
        )
        .unwrap();
        let values: Vec<Value> = open(&config).get("1").unwrap();
        assert_eq!(values, vec![serde_json::json!({"value": 1})]);
    }

    #[test]
    fn push_requires_a_key() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::at(dir.path());
        let err = cmd_push(
            &config,
            PushArgs {
                value: "1".into(),
                key: None,
                field: None,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("--key"));
    }

    #[test]
    fn hash_object_then_cat() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::at(dir.path());
        cmd_init(&config).unwrap();
        let tablet = open(&config);
        let digest = tablet.hash_object("1").unwrap();
        assert_eq!(digest.to_hex(), "356a192b7913b04c54574d18c28d46e6395428ab");
        assert_eq!(tablet.read_object::<String>(&digest).unwrap(), "1");
    }
}
