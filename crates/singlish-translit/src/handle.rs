// TranslitHandle: the caller-facing entry point.
//
// Owns the rule table, the compiled engine, the fuzzy corrector and the
// options. Analyses that only borrow these (OOV detection, alignment) are
// created per call.

use std::path::{Path, PathBuf};

use singlish_core::{AlignedSegment, CorrectionResult, Hypothesis, OovReport};
use singlish_fst::{CompileError, Fst, FstError, Transducer};
use tracing::{debug, info};

use crate::TransductionFailure;
use crate::alignment::AlignmentExtractor;
use crate::config::{ConfigError, EngineOptions};
use crate::engine::TransductionEngine;
use crate::fuzzy::FuzzyCorrector;
use crate::oov::OovDetector;
use crate::preprocess::{normalize, restore};
use crate::rules::{RuleSourceError, RuleTable};

/// File name of the compiled transducer artifact.
pub const ARTIFACT_FILE: &str = "transliterate.fst";

/// File name of the JSON rule source.
pub const RULES_FILE: &str = "singlish_rules.json";

/// Error type for handle construction.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to load rule source: {0}")]
    RuleSource(#[from] RuleSourceError),

    #[error("failed to compile rules: {0}")]
    Compile(#[from] CompileError),

    #[error("failed to load transducer artifact: {0}")]
    Artifact(#[from] FstError),

    #[error("invalid engine options: {0}")]
    Config(#[from] ConfigError),

    #[error("transducer artifact {} not found; run `singlish-compile` first", path.display())]
    MissingArtifact { path: PathBuf },

    /// The artifact was compiled from a different rule source.
    #[error("transducer artifact has no symbol for {0:?}; recompile it from the current rule source")]
    StaleArtifact(char),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Transduction(#[from] TransductionFailure),
}

/// A loaded transliteration engine with all of its analyses.
///
/// Every method takes `&self`; a handle can be shared across threads.
#[derive(Debug)]
pub struct TranslitHandle {
    table: RuleTable,
    engine: TransductionEngine,
    corrector: FuzzyCorrector,
    options: EngineOptions,
}

impl TranslitHandle {
    fn assemble(table: RuleTable, engine: TransductionEngine, options: EngineOptions) -> Self {
        let engine = engine.with_search_iteration_limit(options.search_iteration_limit);
        let corrector = FuzzyCorrector::from_table(&table, &options);
        Self {
            table,
            engine,
            corrector,
            options,
        }
    }

    /// Compile a handle directly from a JSON rule source.
    pub fn from_rules_json(rules_json: &str, options: EngineOptions) -> Result<Self, EngineError> {
        options.validate()?;
        let table = RuleTable::from_json_str(rules_json)?;
        let engine = TransductionEngine::compile(&table)?;
        Ok(Self::assemble(table, engine, options))
    }

    /// Load a precompiled artifact together with the rule source it was
    /// compiled from.
    ///
    /// The rule source is still needed for OOV analysis, fuzzy correction
    /// and alignment. Every pattern character must have a symbol in the
    /// artifact.
    pub fn from_artifact(
        artifact: &[u8],
        rules_json: &str,
        options: EngineOptions,
    ) -> Result<Self, EngineError> {
        options.validate()?;
        let table = RuleTable::from_json_str(rules_json)?;
        let fst = Transducer::from_bytes(artifact)?;
        if let Some(c) = table
            .pattern_chars()
            .into_iter()
            .find(|&c| fst.symbols().symbol_for(c).is_none())
        {
            return Err(EngineError::StaleArtifact(c));
        }
        info!(
            states = fst.num_states(),
            rules = table.len(),
            "loaded transducer artifact"
        );
        Ok(Self::assemble(table, TransductionEngine::new(fst), options))
    }

    /// Load `transliterate.fst` and `singlish_rules.json` from `dir`.
    pub fn from_dir(dir: &Path, options: EngineOptions) -> Result<Self, EngineError> {
        let artifact_path = dir.join(ARTIFACT_FILE);
        if !artifact_path.is_file() {
            return Err(EngineError::MissingArtifact {
                path: artifact_path,
            });
        }
        let rules_path = dir.join(RULES_FILE);
        let artifact = read(&artifact_path)?;
        let rules = std::fs::read_to_string(&rules_path).map_err(|source| EngineError::Io {
            path: rules_path,
            source,
        })?;
        Self::from_artifact(&artifact, &rules, options)
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn engine(&self) -> &TransductionEngine {
        &self.engine
    }

    // =========================================================================
    // Transliteration
    // =========================================================================

    /// Transliterate `text` through the cheapest decomposition.
    ///
    /// With `spell_check`, tokens are first replaced by their nearest rule
    /// pattern where one clears the similarity floor. With `handle_oov`,
    /// each whitespace token is transliterated on its own and tokens with
    /// no decomposition are copied through unchanged; without it, any
    /// undecomposable input is an error.
    pub fn transliterate(
        &self,
        text: &str,
        handle_oov: bool,
        spell_check: bool,
    ) -> Result<String, TransductionFailure> {
        let corrected;
        let text = if spell_check {
            corrected = self.corrector.correct(text).corrected_text;
            corrected.as_str()
        } else {
            text
        };
        if handle_oov {
            Ok(self.transliterate_tolerant(text))
        } else {
            self.engine.best(text)
        }
    }

    fn transliterate_tolerant(&self, text: &str) -> String {
        let mut passed_through = 0;
        let out: Vec<String> = text
            .split_whitespace()
            .map(|token| {
                self.engine.best(token).unwrap_or_else(|_| {
                    passed_through += 1;
                    token.to_string()
                })
            })
            .collect();
        if passed_through > 0 {
            debug!(passed_through, "copied untransliterable tokens");
        }
        out.join(" ")
    }

    /// Up to `n` ranked hypotheses for `text`.
    ///
    /// Blank text has nothing to rank and yields an empty list.
    pub fn transliterate_nbest(
        &self,
        text: &str,
        n: usize,
    ) -> Result<Vec<Hypothesis>, TransductionFailure> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.engine.transduce(text, n)
    }

    /// Output strings of [`transliterate_nbest`](Self::transliterate_nbest),
    /// without scores.
    pub fn transliterate_nbest_outputs(
        &self,
        text: &str,
        n: usize,
    ) -> Result<Vec<String>, TransductionFailure> {
        Ok(self
            .transliterate_nbest(text, n)?
            .into_iter()
            .map(|h| h.output)
            .collect())
    }

    /// Raw user text in, Sinhala text out.
    ///
    /// Normalizes the text, optionally spell-corrects it, transliterates it
    /// with OOV tokens copied through, and puts detached punctuation and
    /// numbers back.
    pub fn transliterate_text(&self, raw: &str, spell_check: bool) -> String {
        let (clean, metadata) = normalize(raw);
        for warning in &metadata.warnings {
            debug!(warning = warning.as_str(), "preprocessing");
        }
        let clean = if spell_check {
            self.corrector.correct(&clean).corrected_text
        } else {
            clean
        };
        restore(&self.transliterate_tolerant(&clean), &metadata)
    }

    // =========================================================================
    // Analyses
    // =========================================================================

    pub fn detect_oov(&self, text: &str) -> OovReport {
        OovDetector::new(&self.engine, &self.table, &self.corrector, &self.options).detect(text)
    }

    /// Greedy segment alignment of `text` against the rule table.
    pub fn get_alignment(&self, text: &str) -> Vec<AlignedSegment> {
        AlignmentExtractor::new(&self.table, self.options.alignment_lookahead).align(text)
    }

    pub fn correct(&self, text: &str) -> CorrectionResult {
        self.corrector.correct(text)
    }
}

fn read(path: &Path) -> Result<Vec<u8>, EngineError> {
    std::fs::read(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })
}
