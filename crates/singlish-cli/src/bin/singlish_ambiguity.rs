// singlish-ambiguity: Rule table and corpus diagnostics.
//
// Modes:
//   (default)    ambiguity summary over the words read from input
//   --conflicts  patterns that compete with their own prefixes
//   --usage      rule firing counts, unused rules and uncovered characters
//
// Output is JSON.
//
// Usage:
//   singlish-ambiguity [-d DATA_PATH] [-c CONFIG] [--conflicts | --usage] [--top K] [TEXT...]

use std::io::{self, Write};

use singlish_translit::analysis::{corpus_ambiguity, rule_conflicts, rule_usage};

fn main() {
    singlish_cli::init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (data_path, args) = singlish_cli::parse_data_path(&args);
    let (config_path, args) = singlish_cli::parse_config_path(&args);
    let (top, args) = singlish_cli::take_option(&args, "--top", "-k");

    if singlish_cli::wants_help(&args) {
        println!("singlish-ambiguity: Diagnose rule conflicts, ambiguity and rule usage.");
        println!();
        println!(
            "Usage: singlish-ambiguity [-d DATA_PATH] [-c CONFIG] [--conflicts | --usage] [--top K] [TEXT...]"
        );
        println!();
        println!("Options:");
        println!("  -d, --data-path PATH   Directory containing transliterate.fst");
        println!("  -c, --config PATH      Engine options (TOML)");
        println!("  --conflicts            List prefix conflicts in the rule table");
        println!("  --usage                Count rule usage over the input corpus");
        println!("  -k, --top K            Most ambiguous words to report (default 10)");
        println!("  -h, --help             Print this help");
        return;
    }

    let top: usize = match top {
        Some(k) => k
            .parse()
            .unwrap_or_else(|_| singlish_cli::fatal(&format!("invalid --top value: {k}"))),
        None => 10,
    };
    let conflicts = args.iter().any(|a| a == "--conflicts");
    let usage = args.iter().any(|a| a == "--usage");
    let texts: Vec<String> = args.iter().filter(|a| !a.starts_with('-')).cloned().collect();

    let handle = singlish_cli::load_handle(data_path.as_deref(), config_path.as_deref())
        .unwrap_or_else(|e| singlish_cli::fatal(&e));
    let options = handle.options();

    let json = if conflicts {
        serde_json::to_string_pretty(&rule_conflicts(handle.table()))
    } else {
        let lines: Vec<String> = singlish_cli::inputs(texts).collect();
        let lines = lines.iter().map(String::as_str);
        if usage {
            serde_json::to_string_pretty(&rule_usage(
                handle.table(),
                lines,
                options.alignment_lookahead,
            ))
        } else {
            serde_json::to_string_pretty(&corpus_ambiguity(
                handle.engine(),
                lines,
                options.nbest,
                top,
            ))
        }
    };

    let json = json.unwrap_or_else(|e| singlish_cli::fatal(&format!("failed to serialize: {e}")));
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let _ = writeln!(out, "{json}");
}
