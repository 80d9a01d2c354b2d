// singlish-oov: Report out-of-vocabulary words as JSON.
//
// Prints one JSON object per input line with the coverage ratio, the
// uncovered words and characters, and nearby patterns for each OOV word.
//
// Usage:
//   singlish-oov [-d DATA_PATH] [-c CONFIG] [--pretty] [TEXT...]

use std::io::{self, Write};

fn main() {
    singlish_cli::init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (data_path, args) = singlish_cli::parse_data_path(&args);
    let (config_path, args) = singlish_cli::parse_config_path(&args);

    if singlish_cli::wants_help(&args) {
        println!("singlish-oov: Report words the rule table cannot transliterate.");
        println!();
        println!("Usage: singlish-oov [-d DATA_PATH] [-c CONFIG] [--pretty] [TEXT...]");
        println!();
        println!("Options:");
        println!("  -d, --data-path PATH   Directory containing transliterate.fst");
        println!("  -c, --config PATH      Engine options (TOML)");
        println!("  --pretty               Pretty-print the JSON");
        println!("  -h, --help             Print this help");
        return;
    }

    let pretty = args.iter().any(|a| a == "--pretty");
    let texts: Vec<String> = args.iter().filter(|a| !a.starts_with('-')).cloned().collect();

    let handle = singlish_cli::load_handle(data_path.as_deref(), config_path.as_deref())
        .unwrap_or_else(|e| singlish_cli::fatal(&e));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for line in singlish_cli::inputs(texts) {
        let report = handle.detect_oov(&line);
        let json = if pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };
        match json {
            Ok(json) => {
                let _ = writeln!(out, "{json}");
            }
            Err(e) => singlish_cli::fatal(&format!("failed to serialize report: {e}")),
        }
    }
}
