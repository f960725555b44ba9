//! Memoizing generator with bounded history.
//!
//! `TokenForge` wraps the pure pipeline with a bounded FIFO of
//! `GenerationRecord`s keyed by TokenSpec fingerprint. A repeated spec is
//! served from the record instead of being regenerated.

use serde::Serialize;
use std::collections::VecDeque;

use crate::catalog::FeatureCatalog;
use crate::emitter::GeneratedArtifact;
use crate::error::ForgeResult;
use crate::generator::generate;
use crate::types::{GeneratorConfig, TokenSpec};

// ── Generation Record ────────────────────────────────────────────────

/// Outcome of one generation request.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRecord {
    pub fingerprint: String,
    pub contract_name: String,
    pub artifact: Option<GeneratedArtifact>,
    pub error_message: Option<String>,
}

/// Counters over the tracked history.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgeSummary {
    pub tracked_records: usize,
    pub successful: usize,
    pub failed: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

// ── Token Forge ──────────────────────────────────────────────────────

/// Generator front end holding the catalog, config and history.
pub struct TokenForge {
    catalog: FeatureCatalog,
    config: GeneratorConfig,
    records: VecDeque<GenerationRecord>,
    max_records: usize,
    hits: u64,
    misses: u64,
}

impl TokenForge {
    /// Standard catalog, default configuration.
    pub fn new() -> Self {
        Self::with_config(FeatureCatalog::standard(), GeneratorConfig::default())
    }

    pub fn with_config(catalog: FeatureCatalog, config: GeneratorConfig) -> Self {
        let max = config.max_cached_artifacts;
        Self {
            catalog,
            config,
            records: VecDeque::new(),
            max_records: max,
            hits: 0,
            misses: 0,
        }
    }

    pub fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate, serving repeated specs from history.
    pub fn generate(&mut self, spec: &TokenSpec) -> ForgeResult<GeneratedArtifact> {
        let fingerprint = spec.fingerprint();
        if let Some(artifact) = self.cached(&fingerprint).cloned() {
            self.hits += 1;
            tracing::debug!(fingerprint = %fingerprint, "served from generation history");
            return Ok(artifact);
        }
        self.misses += 1;

        let result = generate(&self.catalog, spec, &self.config);
        self.record_result(fingerprint, spec, &result);
        result
    }

    fn cached(&self, fingerprint: &str) -> Option<&GeneratedArtifact> {
        self.records
            .iter()
            .rev()
            .find(|r| r.fingerprint == fingerprint)
            .and_then(|r| r.artifact.as_ref())
    }

    fn record_result(
        &mut self,
        fingerprint: String,
        spec: &TokenSpec,
        result: &ForgeResult<GeneratedArtifact>,
    ) {
        if self.max_records == 0 {
            return;
        }
        let record = match result {
            Ok(artifact) => GenerationRecord {
                fingerprint,
                contract_name: artifact.contract_name.clone(),
                artifact: Some(artifact.clone()),
                error_message: None,
            },
            Err(e) => GenerationRecord {
                fingerprint,
                contract_name: spec.contract_name(),
                artifact: None,
                error_message: Some(e.to_string()),
            },
        };

        // Bounded FIFO: evict oldest if at capacity
        if self.records.len() >= self.max_records {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Most recent record for a spec.
    pub fn find(&self, spec: &TokenSpec) -> Option<&GenerationRecord> {
        let fingerprint = spec.fingerprint();
        self.records.iter().rev().find(|r| r.fingerprint == fingerprint)
    }

    pub fn all_records(&self) -> &VecDeque<GenerationRecord> {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn summary(&self) -> ForgeSummary {
        let successful = self.records.iter().filter(|r| r.artifact.is_some()).count();
        ForgeSummary {
            tracked_records: self.records.len(),
            successful,
            failed: self.records.len() - successful,
            cache_hits: self.hits,
            cache_misses: self.misses,
        }
    }
}

impl Default for TokenForge {
    fn default() -> Self {
        Self::new()
    }
}
