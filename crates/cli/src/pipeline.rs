//! `scorelit` subcommand handlers.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use scorelit_io::{SourceKey, TableCache};
use scorelit_recon::config::PipelineConfig;
use scorelit_recon::model::{Reconciliation, ReconResult, SourceTables};
use scorelit_recon::records::{composer_lookup, records_by_composer};

use crate::exit_codes::{EXIT_CONFIG_INVALID, EXIT_INCOMPLETE, EXIT_OUTPUT};
use crate::util::{Align, TextTable};
use crate::{resolve_config_path, CliError};

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn load_config(path: &Path) -> Result<PipelineConfig, CliError> {
    let config_str = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(EXIT_CONFIG_INVALID, format!("cannot read config {}: {e}", path.display()))
    })?;
    Ok(PipelineConfig::from_toml(&config_str)?)
}

fn base_dir(config_path: &Path) -> &Path {
    config_path.parent().unwrap_or_else(|| Path::new("."))
}

/// Config plus its tables, for the single-config subcommands.
fn load_one(config: Option<PathBuf>) -> Result<(PipelineConfig, SourceTables), CliError> {
    let path = resolve_config_path(config)?;
    let config = load_config(&path)?;
    let key = SourceKey::from_config(&config, base_dir(&path));
    let tables = scorelit_io::load_tables(&key.paths, key.max_rows, &key.columns)?;
    Ok((config, tables))
}

fn reconcile_one(config: Option<PathBuf>) -> Result<Reconciliation, CliError> {
    let (config, tables) = load_one(config)?;
    Ok(scorelit_recon::reconcile(&config, &tables)?)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))
}

fn write_output(path: &Path, json: &str) -> Result<(), CliError> {
    std::fs::write(path, json).map_err(|e| {
        CliError::new(EXIT_OUTPUT, format!("cannot write {}: {e}", path.display()))
    })?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// run / validate
// ---------------------------------------------------------------------------

pub fn cmd_run(
    configs: Vec<PathBuf>,
    json_output: bool,
    output_file: Option<PathBuf>,
    strict: bool,
) -> Result<(), CliError> {
    let config_paths = if configs.is_empty() {
        vec![resolve_config_path(None)?]
    } else {
        configs
    };

    // Configs that point at the same sources share one load
    let mut cache = TableCache::new();
    let mut results: Vec<ReconResult> = Vec::with_capacity(config_paths.len());
    let mut per_config_outputs: Vec<(PathBuf, usize)> = Vec::new();

    for path in &config_paths {
        let config = load_config(path)?;
        let key = SourceKey::from_config(&config, base_dir(path));
        let tables = cache.get_or_load(&key)?;
        let result = scorelit_recon::run(&config, tables)?;

        if let Some(ref json_path) = config.output.json {
            per_config_outputs.push((base_dir(path).join(json_path), results.len()));
        }
        results.push(result);
    }

    // Nothing is written unless every config reconciled
    for (json_path, idx) in &per_config_outputs {
        write_output(json_path, &to_json(&results[*idx])?)?;
    }

    let json_str = match results.as_slice() {
        [single] => to_json(single)?,
        many => to_json(many)?,
    };

    if let Some(ref path) = output_file {
        write_output(path, &json_str)?;
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    for result in &results {
        let s = &result.summary;
        eprintln!(
            "'{}': {} performances, {} composers ({} matched, {} unmatched, {} ambiguous)",
            result.meta.config_name,
            s.performances,
            s.unique_composers,
            s.matched,
            s.unmatched,
            s.ambiguous,
        );
        eprintln!(
            "  {} countries, {} with coordinates, {} without; {} problematic performances",
            s.countries, s.located, s.unlocated, s.problematic,
        );
    }

    if strict {
        let incomplete: Vec<&str> = results
            .iter()
            .filter(|r| !r.summary.is_complete())
            .map(|r| r.meta.config_name.as_str())
            .collect();
        if !incomplete.is_empty() {
            return Err(CliError::new(
                EXIT_INCOMPLETE,
                format!("incomplete reconciliation: {}", incomplete.join(", ")),
            )
            .with_hint("see `scorelit unmatched` and `scorelit countries`"));
        }
    }

    Ok(())
}

pub fn cmd_validate(config: Option<PathBuf>) -> Result<(), CliError> {
    let path = resolve_config_path(config)?;
    let config = load_config(&path)?;
    eprintln!(
        "valid: '{}' (on_duplicate = {}, max_rows = {})",
        config.name,
        config.matching.on_duplicate,
        config
            .sources
            .max_rows
            .map(|n| n.to_string())
            .unwrap_or_else(|| "all".into()),
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ComposerRow<'a> {
    composer: &'a str,
    performances: usize,
    country: Option<&'a str>,
    titles: Vec<&'a str>,
}

pub fn cmd_composers(config: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let (config, tables) = load_one(config)?;
    let r = scorelit_recon::reconcile(&config, &tables)?;

    let lookup = composer_lookup(&tables.performances);
    let countries: BTreeMap<&str, &str> = r
        .matched
        .iter()
        .map(|m| (m.composer.as_str(), m.country.as_str()))
        .collect();

    let rows: Vec<ComposerRow> = lookup
        .iter()
        .map(|(name, records)| ComposerRow {
            composer: name,
            performances: records.len(),
            country: countries.get(name.as_str()).copied(),
            titles: records.iter().map(|p| p.title.as_str()).collect(),
        })
        .collect();

    if json {
        println!("{}", to_json(&rows)?);
        return Ok(());
    }

    let mut table = TextTable::new(&[
        ("Composer", Align::Left),
        ("Performances", Align::Right),
        ("Country", Align::Left),
    ]);
    for row in &rows {
        table.push_row(vec![
            row.composer.to_string(),
            row.performances.to_string(),
            row.country.unwrap_or("-").to_string(),
        ]);
    }
    print!("{}", table.render());
    Ok(())
}

pub fn cmd_unmatched(config: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let r = reconcile_one(config)?;

    if json {
        println!("{}", to_json(&r.unmatched)?);
        return Ok(());
    }

    for name in &r.unmatched {
        println!("{name}");
    }
    eprintln!("{} of {} composers unmatched", r.unmatched.len(), r.unique_composers.len());
    Ok(())
}

#[derive(Serialize)]
struct CountriesOutput<'a> {
    located: &'a [scorelit_recon::model::LocationCount],
    unlocated: &'a [scorelit_recon::model::CountryComposerCount],
}

pub fn cmd_countries(config: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let r = reconcile_one(config)?;

    if json {
        let out = CountriesOutput {
            located: &r.locations,
            unlocated: &r.unlocated,
        };
        println!("{}", to_json(&out)?);
        return Ok(());
    }

    let mut table = TextTable::new(&[
        ("Country", Align::Left),
        ("Code", Align::Left),
        ("Composers", Align::Right),
        ("Latitude", Align::Right),
        ("Longitude", Align::Right),
    ]);
    for lc in &r.locations {
        table.push_row(vec![
            lc.country.clone(),
            lc.country_code.clone(),
            lc.composer_count.to_string(),
            format!("{:.4}", lc.latitude),
            format!("{:.4}", lc.longitude),
        ]);
    }
    print!("{}", table.render());

    for c in &r.unlocated {
        eprintln!("no coordinates: {} ({} composer(s))", c.country, c.composer_count);
    }
    Ok(())
}

pub fn cmd_problematic(config: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let r = reconcile_one(config)?;

    if json {
        println!("{}", to_json(&r.problematic)?);
        return Ok(());
    }

    let mut table = TextTable::new(&[("Composer", Align::Left), ("Title", Align::Left)]);
    for p in &r.problematic {
        table.push_row(vec![p.composer.clone(), p.title.clone()]);
    }
    print!("{}", table.render());
    Ok(())
}

pub fn cmd_records(config: Option<PathBuf>, composer: String, json: bool) -> Result<(), CliError> {
    let (_, tables) = load_one(config)?;
    let rows = records_by_composer(&tables.performances, &composer);

    if json {
        println!("{}", to_json(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        eprintln!("no performances for '{composer}'");
        return Ok(());
    }

    let mut table = TextTable::new(&[("Title", Align::Left), ("Problematic", Align::Left)]);
    for p in &rows {
        table.push_row(vec![
            p.title.clone(),
            if p.problematic { "yes" } else { "no" }.to_string(),
        ]);
    }
    print!("{}", table.render());
    Ok(())
}
