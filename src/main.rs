mod config;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;

use apartint::{
    integrate::{integrate_with, Integration, IntegrationOptions},
    parser::parse,
    poly::Expression,
    printer::PrintOptions,
};

use crate::config::{load_config, show_config_path, Config, ExampleConfig};

const RULE: &str = "======================================================================";

#[derive(Parser)]
#[command(
    name = "apartint",
    version = env!("APARTINT_VERSION"),
    about = "Integration of rational functions by partial fractions"
)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Significant digits of printed coefficients
    #[arg(long, global = true)]
    precision: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Integrate NUMERATOR / DENOMINATOR
    Integrate {
        /// Numerator, e.g. "3x + 5"
        numerator: String,
        /// Denominator, e.g. "x^2 - 3x + 2" or "(x-1)(x-2)"
        denominator: String,
        /// Print the result record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the built-in and configured examples
    Examples {
        /// Print the result records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read integrals from stdin
    Interactive,
    /// Show the config path and the effective values
    Config,
}

#[derive(Serialize)]
struct ExampleReport<'a> {
    name: &'a str,
    numerator: &'a str,
    denominator: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    integration: Option<Integration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn builtin_examples() -> Vec<ExampleConfig> {
    [
        ("a) ∫ (x-1)/(x^2+2) dx", "x-1", "x^2+2"),
        ("b) ∫ 1/(x^2+2x+10) dx", "1", "x^2+2x+10"),
        ("c) ∫ (x^4+9x-1)/((x+1)(x^2+x+1)) dx", "x^4+9x-1", "(x+1)(x^2+x+1)"),
        ("e) ∫ 2x/(x^2+1) dx", "2x", "x^2+1"),
        ("f) ∫ 1/((x+2)(x-3)^2) dx", "1", "(x+2)(x-3)(x-3)"),
        ("g) ∫ 1/(x^4-x^2) dx", "1", "x^4-x^2"),
        ("h) ∫ (x+1)/(x(x+1)) dx", "x+1", "x(x+1)"),
        ("Example 1: linear factors", "3x + 5", "(x-1)(x-2)"),
        ("Example 2: general factored form", "3x + 27", "(3x-2)(x+5)"),
    ]
    .into_iter()
    .map(|(name, numerator, denominator)| ExampleConfig {
        name: name.into(),
        numerator: numerator.into(),
        denominator: denominator.into(),
    })
    .collect()
}

fn options(cli_precision: Option<usize>, config: &Config) -> IntegrationOptions {
    IntegrationOptions {
        print: PrintOptions::with_precision(cli_precision.unwrap_or(config.output.precision)),
        constant: config.output.constant.clone(),
    }
}

fn run(numerator: &str, denominator: &str, opts: &IntegrationOptions) -> Result<Integration> {
    let num = parse(numerator).with_context(|| format!("invalid numerator `{}`", numerator))?;
    let den =
        parse(denominator).with_context(|| format!("invalid denominator `{}`", denominator))?;
    integrate_with(&num, &den, opts).context("integration failed")
}

fn print_report(r: &Integration, opts: &IntegrationOptions) {
    println!("\n{}", RULE);
    println!("PARTIAL FRACTION INTEGRATION");
    println!("{}", RULE);

    println!("\n1. VALIDATION: {}", r.message);

    if !r.valid {
        return;
    }

    if let Some(f) = &r.factorization {
        println!("\n2. FACTORIZATION TYPE: {}", f.kind().as_str().to_uppercase());
        println!("   Description: {}", f.description());
        println!("   Factors: {}", f.format_factors(opts.print));
    }

    println!("\n3. PARTIAL FRACTION DECOMPOSITION:");
    for (i, t) in r.terms.iter().enumerate() {
        println!("   Term {}: {}", i + 1, t.format(opts.print));
    }

    println!("\n4. INTEGRAL OF EACH TERM:");
    for (i, integral) in r.integrals.iter().enumerate() {
        println!("   ∫ Term {} dx = {}", i + 1, integral);
    }

    println!("\n5. RESULT:");
    println!("   ∫ f(x) dx = {}", r.result);
    println!("\n{}\n", RULE);
}

fn describe(e: &Expression, opts: PrintOptions) -> String {
    match e {
        Expression::Factored(_) => format!("factored form {}", e),
        Expression::Expanded(p) => p.format(opts),
    }
}

fn run_examples(config: &Config, opts: &IntegrationOptions, json: bool) -> Result<()> {
    let examples: Vec<_> = builtin_examples()
        .into_iter()
        .chain(config.examples.iter().cloned())
        .collect();

    let mut reports = vec![];
    for ex in &examples {
        let outcome = run(&ex.numerator, &ex.denominator, opts);
        if let Err(e) = &outcome {
            debug!(example = %ex.name, error = %e, "example failed");
        }

        if json {
            let (integration, error) = match outcome {
                Ok(r) => (Some(r), None),
                Err(e) => (None, Some(format!("{:#}", e))),
            };
            reports.push(ExampleReport {
                name: &ex.name,
                numerator: &ex.numerator,
                denominator: &ex.denominator,
                integration,
                error,
            });
            continue;
        }

        println!("\n\n{}", "#".repeat(70));
        println!("EXAMPLE: {}", ex.name);
        println!("Numerator: {}", ex.numerator);
        println!("Denominator: {}", ex.denominator);
        println!("{}", "#".repeat(70));

        match outcome {
            Ok(r) => print_report(&r, opts),
            Err(e) => println!("Error while processing this example: {:#}", e),
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Ok(())
}

fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    text: &str,
) -> Result<Option<String>> {
    print!("{}", text);
    io::stdout().flush().context("flushing stdout")?;

    match lines.next() {
        Some(line) => Ok(Some(line.context("reading stdin")?.trim().to_owned())),
        None => Ok(None),
    }
}

fn interactive(opts: &IntegrationOptions) -> Result<()> {
    println!("\n{}", RULE);
    println!("PARTIAL FRACTION INTEGRATION");
    println!("{}", RULE);
    println!("\nIntegral form: ∫ (numerator) / (denominator) dx");
    println!("\nEnter the polynomials as expressions, for example:");
    println!("  - 3x + 5");
    println!("  - x^2 - 3x + 2");
    println!("  - (x-1)(x+2)  [factored form]");
    println!("{}", RULE);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("\n--- NUMERATOR ---");
        let Some(num_text) = prompt(&mut lines, "Numerator (e.g. 3x + 5): ")? else {
            break;
        };
        let num = match parse(&num_text) {
            Ok(e) => e,
            Err(e) => {
                println!("\nInvalid input: {}", e);
                continue;
            }
        };
        println!("Interpreted as: {}", describe(&num, opts.print));

        println!("\n--- DENOMINATOR ---");
        let Some(den_text) = prompt(&mut lines, "Denominator (e.g. x^2 - 3x + 2 or (x-1)(x-2)): ")?
        else {
            break;
        };
        let den = match parse(&den_text) {
            Ok(e) => e,
            Err(e) => {
                println!("\nInvalid input: {}", e);
                continue;
            }
        };
        println!("Interpreted as: {}", describe(&den, opts.print));

        match integrate_with(&num, &den, opts) {
            Ok(r) => print_report(&r, opts),
            Err(e) => println!("\nError: {}", e),
        }

        match prompt(&mut lines, "\nSolve another integral? (y/n): ")? {
            Some(answer) if answer.eq_ignore_ascii_case("y") => {}
            _ => break,
        }
    }

    println!("\nGoodbye!");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let config = load_config(cli.config.as_deref())?;
    let opts = options(cli.precision, &config);

    match cli.command {
        Commands::Integrate {
            numerator,
            denominator,
            json,
        } => {
            let r = run(&numerator, &denominator, &opts)?;
            if json || config.output.json {
                println!("{}", serde_json::to_string_pretty(&r)?);
            } else {
                print_report(&r, &opts);
            }
        }
        Commands::Examples { json } => run_examples(&config, &opts, json || config.output.json)?,
        Commands::Interactive => interactive(&opts)?,
        Commands::Config => {
            println!("Config: {}", show_config_path(cli.config.as_deref()));
            println!("\n{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_examples_run() {
        let opts = IntegrationOptions::default();
        let outcomes: Vec<_> = builtin_examples()
            .iter()
            .map(|ex| run(&ex.numerator, &ex.denominator, &opts))
            .collect();

        assert_eq!(outcomes.len(), 9);

        // x^4 - x^2 has no supported factorization
        assert!(outcomes[5].is_err());

        let e = outcomes[3].as_ref().unwrap();
        assert_eq!(e.result, "1·ln|x^2+1| + C");

        let c = outcomes[2].as_ref().unwrap();
        assert!(!c.valid);

        let ex1 = outcomes[7].as_ref().unwrap();
        assert_eq!(ex1.result, "-8·ln|x-1| + 11·ln|x-2| + C");
    }

    #[test]
    fn precision_flag_overrides_config() {
        let config = Config::default();
        assert_eq!(options(Some(6), &config).print.precision, 6);
        assert_eq!(options(None, &config).print.precision, 4);
        assert_eq!(options(None, &config).constant, "C");
    }

    #[test]
    fn cli_parses() {
        let cli = Cli::try_parse_from([
            "apartint",
            "-vv",
            "--precision",
            "6",
            "integrate",
            "1",
            "x^2+1",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.precision, Some(6));
        assert!(matches!(cli.command, Commands::Integrate { json: false, .. }));
    }
}
