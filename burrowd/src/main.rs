//! # Burrow Host Daemon
//!
//! Main entry point for the burrowd demo runtime.

use burrowd::{Runtime, RuntimeConfig};
use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    let config = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(&args[0]);
        process::exit(1);
    });

    let mut runtime = Runtime::new(config);
    let report = runtime.run().unwrap_or_else(|e| {
        eprintln!("Runtime error: {}", e);
        process::exit(1);
    });

    print!("{}", runtime.render(&report));
}

fn parse_args(args: &[String]) -> Result<RuntimeConfig, String> {
    let mut config = RuntimeConfig::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--message" | "-m" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --message".to_string());
                }
                config.message = args[i].clone();
            }
            "--log" | "-l" => {
                config.dump_log = true;
            }
            "--json-log" => {
                config.dump_log = true;
                config.json_log = true;
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
        i += 1;
    }

    Ok(config)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -m, --message <TEXT>     Payload to write through the pseudo device");
    eprintln!("  -l, --log                Print the kernel log after the run");
    eprintln!("      --json-log           Print the kernel log as JSON");
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} --message 'bounded buffer' --log", program);
}
