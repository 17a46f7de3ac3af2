//! Binding generator CLI.

use std::path::PathBuf;

use ffbgen::commands::{
    check_manifest, explain_error, generate_bindings, init_tracing, parse_generate_options,
    GenerateCliOptions,
};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "generate" => {
            if args.len() < 3 {
                eprintln!("Usage: ffbgen generate <manifest.json> [options]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  -o <dir>                Output directory (default: .)");
                eprintln!("  --pointer-width=<n>     Target pointer width in bytes (default: 8)");
                eprintln!("  --error-limit=<n>       Keep at most n errors (default: unlimited)");
                eprintln!("  -v, --verbose           Verbose output");
                std::process::exit(1);
            }

            // Parse options, handling -o specially (needs lookahead).
            let mut options = GenerateCliOptions::default();
            let mut i = 3;
            while i < args.len() {
                if args[i] == "-o" && i + 1 < args.len() {
                    options.out_dir = PathBuf::from(&args[i + 1]);
                    i += 2;
                } else {
                    if !parse_generate_options(&args[i], &mut options) {
                        eprintln!("error: unknown option `{}`", args[i]);
                        std::process::exit(1);
                    }
                    i += 1;
                }
            }

            init_tracing(options.verbose);
            generate_bindings(&args[2], &options);
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: ffbgen check <manifest.json>");
                std::process::exit(1);
            }
            init_tracing(args.iter().any(|a| a == "--verbose" || a == "-v"));
            check_manifest(&args[2]);
        }
        "explain" | "--explain" => {
            if args.len() < 3 {
                eprintln!("Usage: ffbgen explain <ERROR_CODE>");
                eprintln!("Example: ffbgen explain E2001");
                std::process::exit(1);
            }
            explain_error(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("ffbgen {}", env!("CARGO_PKG_VERSION"));
        }
        other => {
            eprintln!("error: unknown command `{other}`");
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    }
}

fn print_usage() {
    println!("ffbgen - native binding generator");
    println!();
    println!("Usage: ffbgen <command> [arguments]");
    println!();
    println!("Commands:");
    println!("  generate <manifest.json> [-o <dir>]   Emit binding artifacts");
    println!("  check <manifest.json>                 Validate without writing");
    println!("  explain <ERROR_CODE>                  Describe an error code");
    println!("  help                                  Show this help");
    println!("  version                               Show version");
}
