// singlish-align: Show which rule produced each part of the output.
//
// For each input line prints one `input -> output` row per segment,
// marking characters no rule covers, followed by a blank line.
//
// Usage:
//   singlish-align [-d DATA_PATH] [-c CONFIG] [TEXT...]

use std::io::{self, Write};

fn main() {
    singlish_cli::init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (data_path, args) = singlish_cli::parse_data_path(&args);
    let (config_path, args) = singlish_cli::parse_config_path(&args);

    if singlish_cli::wants_help(&args) {
        println!("singlish-align: Align input segments with their rule outputs.");
        println!();
        println!("Usage: singlish-align [-d DATA_PATH] [-c CONFIG] [TEXT...]");
        println!();
        println!("Options:");
        println!("  -d, --data-path PATH   Directory containing transliterate.fst");
        println!("  -c, --config PATH      Engine options (TOML)");
        println!("  -h, --help             Print this help");
        return;
    }

    let texts: Vec<String> = args.iter().filter(|a| !a.starts_with('-')).cloned().collect();

    let handle = singlish_cli::load_handle(data_path.as_deref(), config_path.as_deref())
        .unwrap_or_else(|e| singlish_cli::fatal(&e));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for line in singlish_cli::inputs(texts) {
        let _ = writeln!(out, "{line}:");
        for segment in handle.get_alignment(&line) {
            if segment.input == " " {
                continue;
            }
            let marker = if handle.table().contains_pattern(&segment.input) {
                ""
            } else {
                "  (no rule)"
            };
            let _ = writeln!(out, "  {:<12} -> {}{marker}", segment.input, segment.output);
        }
        let _ = writeln!(out);
    }
}
