use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use rank_model::{RankHierarchy, load_catalog, resolve_station_references};
use rank_validate::{ProgressionPolicy, ValidationContext, ValidationResult, ValidationService};
use rank_xml::{generate_ranks_xml, read_ranks_file, write_ranks_file};

#[derive(Debug, Clone)]
pub struct ValidateOptions {
    pub catalog: Option<PathBuf>,
    /// JSON file holding a progression policy.
    pub policy: Option<PathBuf>,
    pub context: ValidationContext,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            catalog: None,
            policy: None,
            context: ValidationContext::Full,
        }
    }
}

/// One line of the `summary` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankSummary {
    pub name: String,
    pub summary: String,
    pub pay_bands: Vec<RankSummary>,
}

pub fn load_ranks(path: &Path) -> Result<Vec<RankHierarchy>> {
    read_ranks_file(path).with_context(|| format!("load ranks from {}", path.display()))
}

pub fn load_policy(path: &Path) -> Result<ProgressionPolicy> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read policy {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse policy {}", path.display()))
}

pub fn run_validate(path: &Path, options: &ValidateOptions) -> Result<ValidationResult> {
    let span = info_span!("validate", file = %path.display());
    let _guard = span.enter();

    let mut ranks = load_ranks(path)?;
    let policy = match &options.policy {
        Some(policy_path) => load_policy(policy_path)?,
        None => ProgressionPolicy::default(),
    };
    let mut service = ValidationService::with_policy(policy);

    if let Some(catalog_path) = &options.catalog {
        let catalog = load_catalog(catalog_path)
            .with_context(|| format!("load catalog {}", catalog_path.display()))?;
        let unresolved = resolve_station_references(&mut ranks, &catalog);
        if unresolved > 0 {
            warn!(unresolved, "station assignments not found in catalog");
        }
        service.set_catalog(Some(Arc::new(catalog)));
    }

    Ok(service.validate_ranks(&ranks, options.context))
}

pub fn run_summary(path: &Path) -> Result<Vec<RankSummary>> {
    let ranks = load_ranks(path)?;
    Ok(summarize(&ranks))
}

/// Summaries for top-level ranks, each band closed by the next band or the
/// next top-level rank.
pub fn summarize(ranks: &[RankHierarchy]) -> Vec<RankSummary> {
    ranks
        .iter()
        .enumerate()
        .map(|(index, rank)| {
            let next_rank = ranks.get(index + 1);
            let bands = rank.pay_bands();
            let pay_bands = bands
                .iter()
                .enumerate()
                .map(|(band_index, band)| RankSummary {
                    name: band.name.clone(),
                    summary: band.summary(bands.get(band_index + 1).or(next_rank)),
                    pay_bands: Vec::new(),
                })
                .collect();
            RankSummary {
                name: rank.name.clone(),
                summary: rank.summary(next_rank),
                pay_bands,
            }
        })
        .collect()
}

/// Parse and regenerate a ranks file. Returns the document when no output
/// path is given.
pub fn run_normalize(input: &Path, output: Option<&Path>) -> Result<Option<String>> {
    let ranks = load_ranks(input)?;
    match output {
        Some(path) => {
            write_ranks_file(path, &ranks)
                .with_context(|| format!("write ranks to {}", path.display()))?;
            info!(output = %path.display(), "normalized ranks written");
            Ok(None)
        }
        None => Ok(Some(generate_ranks_xml(&ranks)?)),
    }
}
