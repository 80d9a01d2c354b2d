// Criterion benchmarks for singlish-translit.
//
// Uses the bundled rule source at ../../data/singlish_rules.json relative to
// the crate root.
//
// Run:
//   cargo bench -p singlish-translit

use criterion::{Criterion, criterion_group, criterion_main};
use singlish_translit::{EngineOptions, RuleTable, TransductionEngine, TranslitHandle};

const SENTENCES: &[&str] = &[
    "mama gedara yanawa",
    "eyala potha kiyawanawa",
    "oya bath kanawa",
    "amma watura bonawa",
    "thaththa iskole yanawa",
    "api gedara balla kade yanawa",
];

fn load_rules() -> String {
    let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../data/singlish_rules.json");
    std::fs::read_to_string(&path).expect("failed to read singlish_rules.json")
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Parse and compile the full rule source.
fn bench_compile(c: &mut Criterion) {
    let json = load_rules();
    c.bench_function("compile_rules", |b| {
        b.iter(|| {
            let table = RuleTable::from_json_str(&json).expect("rule table");
            std::hint::black_box(TransductionEngine::compile(&table).expect("compile"));
        });
    });
}

/// Load the compiled artifact back from bytes.
fn bench_load_artifact(c: &mut Criterion) {
    let table = RuleTable::from_json_str(&load_rules()).expect("rule table");
    let bytes = TransductionEngine::compile(&table)
        .expect("compile")
        .transducer()
        .to_bytes();
    c.bench_function("load_artifact", |b| {
        b.iter(|| std::hint::black_box(singlish_fst::Transducer::from_bytes(&bytes).expect("load")));
    });
}

/// Single-best transliteration of every sample sentence.
fn bench_best(c: &mut Criterion) {
    let handle =
        TranslitHandle::from_rules_json(&load_rules(), EngineOptions::default()).expect("handle");
    c.bench_function("best_sentences", |b| {
        b.iter(|| {
            for s in SENTENCES {
                std::hint::black_box(handle.transliterate(s, true, false).expect("best"));
            }
        });
    });
}

/// Five-best hypotheses for every sample sentence.
fn bench_nbest(c: &mut Criterion) {
    let handle =
        TranslitHandle::from_rules_json(&load_rules(), EngineOptions::default()).expect("handle");
    c.bench_function("nbest5_sentences", |b| {
        b.iter(|| {
            for s in SENTENCES {
                std::hint::black_box(handle.transliterate_nbest(s, 5).expect("nbest"));
            }
        });
    });
}

/// OOV analysis plus spelling correction on noisy input.
fn bench_oov_and_correct(c: &mut Criterion) {
    let handle =
        TranslitHandle::from_rules_json(&load_rules(), EngineOptions::default()).expect("handle");
    c.bench_function("oov_correct", |b| {
        b.iter(|| {
            std::hint::black_box(handle.detect_oov("mama gedra xyz yanwa"));
            std::hint::black_box(handle.correct("mama gedra yanwa"));
        });
    });
}

criterion_group!(
    benches,
    bench_compile,
    bench_load_artifact,
    bench_best,
    bench_nbest,
    bench_oov_and_correct
);
criterion_main!(benches);
