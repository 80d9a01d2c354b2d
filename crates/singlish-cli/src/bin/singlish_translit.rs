// singlish-translit: Transliterate Singlish text from stdin or arguments.
//
// Each input line is transliterated as a whole. With --nbest, every
// hypothesis is printed with its normalized confidence.
//
// Usage:
//   singlish-translit [-d DATA_PATH] [-c CONFIG] [OPTIONS] [TEXT...]
//
// Options:
//   -d, --data-path PATH   Directory containing transliterate.fst
//   -c, --config PATH      Engine options (TOML)
//   -n, --nbest N          Print the N best hypotheses
//   --oov                  Copy untransliterable words through
//   --spell                Spell-correct words before transliterating
//   --raw                  Normalize case, punctuation and numbers first
//   -h, --help             Print help

use std::io::{self, Write};

fn main() {
    singlish_cli::init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (data_path, args) = singlish_cli::parse_data_path(&args);
    let (config_path, args) = singlish_cli::parse_config_path(&args);
    let (nbest, args) = singlish_cli::take_option(&args, "--nbest", "-n");

    if singlish_cli::wants_help(&args) {
        println!("singlish-translit: Transliterate Singlish text to Sinhala.");
        println!();
        println!("Usage: singlish-translit [-d DATA_PATH] [-c CONFIG] [OPTIONS] [TEXT...]");
        println!();
        println!("If TEXT arguments are given, transliterates each one.");
        println!("Otherwise reads lines from stdin.");
        println!();
        println!("Options:");
        println!("  -d, --data-path PATH   Directory containing transliterate.fst");
        println!("  -c, --config PATH      Engine options (TOML)");
        println!("  -n, --nbest N          Print the N best hypotheses");
        println!("  --oov                  Copy untransliterable words through");
        println!("  --spell                Spell-correct words before transliterating");
        println!("  --raw                  Normalize case, punctuation and numbers first");
        println!("  -h, --help             Print this help");
        return;
    }

    let nbest: Option<usize> = nbest.map(|n| {
        n.parse()
            .unwrap_or_else(|_| singlish_cli::fatal(&format!("invalid --nbest value: {n}")))
    });
    let handle_oov = args.iter().any(|a| a == "--oov");
    let spell_check = args.iter().any(|a| a == "--spell");
    let raw = args.iter().any(|a| a == "--raw");
    let texts: Vec<String> = args.iter().filter(|a| !a.starts_with('-')).cloned().collect();

    let handle = singlish_cli::load_handle(data_path.as_deref(), config_path.as_deref())
        .unwrap_or_else(|e| singlish_cli::fatal(&e));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for line in singlish_cli::inputs(texts) {
        let text = line.trim();
        if let Some(n) = nbest {
            match handle.transliterate_nbest(text, n) {
                Ok(hypotheses) => {
                    let _ = writeln!(out, "{text}:");
                    for (i, h) in hypotheses.iter().enumerate() {
                        let _ = writeln!(out, "  {}. {}\t{:.3}", i + 1, h.output, h.confidence);
                    }
                }
                Err(e) => eprintln!("error: {e}"),
            }
        } else if raw {
            let _ = writeln!(out, "{}", handle.transliterate_text(text, spell_check));
        } else {
            match handle.transliterate(text, handle_oov, spell_check) {
                Ok(output) => {
                    let _ = writeln!(out, "{output}");
                }
                Err(e) => eprintln!("error: {e}"),
            }
        }
    }
}
