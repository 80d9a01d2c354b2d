// singlish-compile: Compile the JSON rule source into a transducer artifact.
//
// Reads singlish_rules.json (from the RULES argument or the data search
// path), compiles it and writes transliterate.fst next to it, or to the
// path given with -o.
//
// Usage:
//   singlish-compile [-d DATA_PATH] [-o OUTPUT] [--sort] [RULES]
//
// Options:
//   -d, --data-path PATH   Directory containing singlish_rules.json
//   -o, --output PATH      Artifact path (default: transliterate.fst beside the rules)
//   --sort                 Also rewrite the rule source in priority order
//   -h, --help             Print help

use std::path::PathBuf;

use singlish_fst::Fst;
use singlish_translit::handle::{ARTIFACT_FILE, RULES_FILE};
use singlish_translit::{RuleTable, TransductionEngine};
use tracing::info;

fn main() {
    singlish_cli::init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (data_path, args) = singlish_cli::parse_data_path(&args);
    let (output, args) = singlish_cli::take_option(&args, "--output", "-o");

    if singlish_cli::wants_help(&args) {
        println!("singlish-compile: Compile transliteration rules into a transducer artifact.");
        println!();
        println!("Usage: singlish-compile [-d DATA_PATH] [-o OUTPUT] [--sort] [RULES]");
        println!();
        println!("Options:");
        println!("  -d, --data-path PATH   Directory containing {RULES_FILE}");
        println!("  -o, --output PATH      Artifact path (default: {ARTIFACT_FILE} beside the rules)");
        println!("  --sort                 Also rewrite the rule source in priority order");
        println!("  -h, --help             Print this help");
        return;
    }

    let sort = args.iter().any(|a| a == "--sort");
    let rules_path = match args.iter().find(|a| !a.starts_with('-')) {
        Some(p) => PathBuf::from(p),
        None => singlish_cli::find_data_file(data_path.as_deref(), RULES_FILE)
            .unwrap_or_else(|e| singlish_cli::fatal(&e)),
    };

    let json = std::fs::read_to_string(&rules_path).unwrap_or_else(|e| {
        singlish_cli::fatal(&format!("failed to read {}: {e}", rules_path.display()))
    });
    let table = RuleTable::from_json_str(&json)
        .unwrap_or_else(|e| singlish_cli::fatal(&format!("{}: {e}", rules_path.display())));
    let engine = TransductionEngine::compile(&table)
        .unwrap_or_else(|e| singlish_cli::fatal(&format!("{}: {e}", rules_path.display())));

    let output = output
        .map(PathBuf::from)
        .unwrap_or_else(|| rules_path.with_file_name(ARTIFACT_FILE));
    let fst = engine.transducer();
    let bytes = fst.to_bytes();
    std::fs::write(&output, &bytes).unwrap_or_else(|e| {
        singlish_cli::fatal(&format!("failed to write {}: {e}", output.display()))
    });
    info!(path = %output.display(), bytes = bytes.len(), "wrote transducer artifact");

    if sort {
        let sorted = table
            .to_json_string()
            .unwrap_or_else(|e| singlish_cli::fatal(&format!("failed to serialize rules: {e}")));
        std::fs::write(&rules_path, sorted).unwrap_or_else(|e| {
            singlish_cli::fatal(&format!("failed to write {}: {e}", rules_path.display()))
        });
    }

    eprintln!(
        "compiled {} rules: {} states, {} transitions -> {}",
        table.len(),
        fst.num_states(),
        fst.num_transitions(),
        output.display()
    );
}
