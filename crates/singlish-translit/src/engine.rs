// Transduction engine: best and n-best queries over the compiled rules.

use singlish_core::Hypothesis;
use singlish_core::hypothesis::normalize_confidences;
use singlish_fst::acceptor::LinearAcceptor;
use singlish_fst::compose::{Lattice, compose};
use singlish_fst::paths::{n_shortest_paths, shortest_path};
use singlish_fst::{CompileError, MAX_SEARCH_ITERATIONS, Transducer, compile};
use tracing::{debug, debug_span, info};

use crate::TransductionFailure;
use crate::rules::RuleTable;

/// Query interface over one immutable compiled transducer.
///
/// Queries allocate their own lattice and share nothing mutable, so one
/// engine can serve any number of threads.
#[derive(Debug, Clone)]
pub struct TransductionEngine {
    fst: Transducer,
    search_iteration_limit: usize,
}

impl TransductionEngine {
    /// Wrap an already compiled or loaded transducer.
    pub fn new(fst: Transducer) -> Self {
        Self {
            fst,
            search_iteration_limit: MAX_SEARCH_ITERATIONS,
        }
    }

    /// Compile a rule table.
    pub fn compile(table: &RuleTable) -> Result<Self, CompileError> {
        let fst = compile(table.rules())?;
        info!(
            rules = table.len(),
            transitions = fst.num_transitions(),
            "compiled transliteration rules"
        );
        Ok(Self::new(fst))
    }

    /// Set the queue-pop limit for n-best searches.
    pub fn with_search_iteration_limit(mut self, limit: usize) -> Self {
        self.search_iteration_limit = limit;
        self
    }

    pub fn transducer(&self) -> &Transducer {
        &self.fst
    }

    fn lattice(&self, text: &str) -> Result<Lattice, TransductionFailure> {
        let acceptor = LinearAcceptor::new(self.fst.symbols(), text)
            .map_err(|c| TransductionFailure::new(text, Some(c)))?;
        let lattice = compose(&acceptor, &self.fst);
        if lattice.is_empty() {
            return Err(TransductionFailure::new(text, None));
        }
        Ok(lattice)
    }

    /// Up to `n` hypotheses with distinct outputs, best first.
    ///
    /// With `n == 1` only the single cheapest path is extracted. Confidences
    /// are normalized so the first hypothesis reports 1.0. `n == 0` yields
    /// an empty list. The empty text decomposes into no rules at all, so it
    /// yields a single empty hypothesis at cost 0.
    pub fn transduce(&self, text: &str, n: usize) -> Result<Vec<Hypothesis>, TransductionFailure> {
        let _span = debug_span!("transduce", n, chars = text.chars().count()).entered();
        let lattice = self.lattice(text)?;
        let symbols = self.fst.symbols();

        let mut hypotheses: Vec<Hypothesis> = match n {
            0 => Vec::new(),
            1 => shortest_path(&lattice)
                .map(|p| Hypothesis::new(symbols.render(&p.output), p.cost as f64))
                .into_iter()
                .collect(),
            _ => n_shortest_paths(&lattice, n, self.search_iteration_limit)
                .paths
                .iter()
                .map(|p| Hypothesis::new(symbols.render(&p.output), p.cost as f64))
                .collect(),
        };
        normalize_confidences(&mut hypotheses);
        debug!(
            lattice_states = lattice.num_states(),
            hypotheses = hypotheses.len(),
            "transduced"
        );
        Ok(hypotheses)
    }

    /// The output of the cheapest decomposition of `text`.
    pub fn best(&self, text: &str) -> Result<String, TransductionFailure> {
        let lattice = self.lattice(text)?;
        let path = shortest_path(&lattice).ok_or_else(|| TransductionFailure::new(text, None))?;
        Ok(self.fst.symbols().render(&path.output))
    }

    /// Whether `text` decomposes into rule patterns.
    pub fn accepts(&self, text: &str) -> bool {
        self.lattice(text).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(json: &str) -> TransductionEngine {
        TransductionEngine::compile(&RuleTable::from_json_str(json).unwrap()).unwrap()
    }

    #[test]
    fn whole_words_beat_syllables() {
        let e = engine(r#"{"mama": "X", "ma": "m", "m": "n", "a": "a"}"#);
        assert_eq!(e.best("mama").unwrap(), "X");
        assert_eq!(e.best("mamama").unwrap(), "Xm");
    }

    #[test]
    fn sentences_keep_single_spaces() {
        let e = engine(r#"{"mama": "X", "gedara": "Y", "yanawa": "Z"}"#);
        assert_eq!(e.best("mama gedara yanawa").unwrap(), "X Y Z");
    }

    #[test]
    fn empty_input_is_empty_output() {
        let e = engine(r#"{"a": "x"}"#);
        assert_eq!(e.best("").unwrap(), "");
        let hs = e.transduce("", 3).unwrap();
        assert_eq!(hs.len(), 1);
        assert_eq!(hs[0].output, "");
    }

    #[test]
    fn unknown_character_fails_with_char() {
        let e = engine(r#"{"a": "x"}"#);
        let err = e.best("aqa").unwrap_err();
        assert_eq!(err.input, "aqa");
        assert_eq!(err.unknown_char, Some('q'));
    }

    #[test]
    fn undecomposable_input_fails() {
        let e = engine(r#"{"ab": "x", "c": "y"}"#);
        let err = e.best("abb").unwrap_err();
        assert_eq!(err.unknown_char, None);
        assert!(!e.accepts("abb"));
        assert!(e.accepts("abc"));
    }

    #[test]
    fn nbest_is_ranked_and_normalized() {
        let e = engine(r#"{"mama": "X", "ma": "m", "m": "n", "a": ""}"#);
        let hs = e.transduce("mama", 5).unwrap();
        assert_eq!(hs.len(), 5);
        assert_eq!(hs[0].output, "X");
        assert_eq!(hs[0].confidence, 1.0);
        for pair in hs.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
        assert_eq!(hs[1].cost, 2.0);
    }

    #[test]
    fn n_of_one_matches_best() {
        let e = engine(r#"{"ka": "K", "k": "k", "a": "A"}"#);
        let hs = e.transduce("kaka", 1).unwrap();
        assert_eq!(hs.len(), 1);
        assert_eq!(hs[0].output, e.best("kaka").unwrap());
        assert_eq!(hs[0].confidence, 1.0);
    }

    #[test]
    fn n_of_zero_is_empty() {
        let e = engine(r#"{"a": "x"}"#);
        assert!(e.transduce("a", 0).unwrap().is_empty());
    }
}
