/*
Copyright 2022 Volker Schwaberow <volker@schwaberow.de>
Permission is hereby granted, free of charge, to any person obtaining a
copy of this software and associated documentation files (the
"Software"), to deal in the Software without restriction, including without
limitation the rights to use, copy, modify, merge, publish, distribute,
sublicense, and/or sell copies of the Software, and to permit persons to whom the
Software is furnished to do so, subject to the following conditions:
The above copyright notice and this permission notice shall be
included in all copies or substantial portions of the Software.
THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS
OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT
SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR
OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE,
ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
DEALINGS IN THE SOFTWARE.
Author(s): Volker Schwaberow
*/

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use log::warn;
use simple_logger::SimpleLogger;

use rfcprobe::catalog::{self, Batch, CATALOG_VERSION};
use rfcprobe::cli::Cli;
use rfcprobe::config::ProbeConfig;
use rfcprobe::getstate::GetState;
use rfcprobe::runner::SuiteRunner;
use rfcprobe::sink::open_sink;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = SimpleLogger::new().with_level(cli.log_level()).init() {
        eprintln!("Failed to initialize logger: {}", e);
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.list {
        let host = cli.target.as_deref().unwrap_or("example.com");
        let batches = catalog::select(catalog::catalog(host), &cli.batches)?;
        print_catalog(&batches);
        return Ok(());
    }

    let config = cli.to_config()?;
    let batches = catalog::select(catalog::catalog(config.target()), config.batches())?;

    let extension = config.output_path().extension().and_then(|e| e.to_str());
    if extension != Some(config.format().file_extension()) {
        warn!(
            "Output file {} does not use the .{} extension",
            config.output_path().display(),
            config.format().file_extension()
        );
    }

    if !cli.quiet {
        print_banner(&config, &batches);
    }

    if !cli.i_have_authorization && !confirm_authorization()? {
        println!(
            "{}",
            "Authorization not confirmed. Exiting for safety.".red()
        );
        println!("   Use --i-have-authorization flag only if you have proper authorization.");
        return Ok(());
    }

    let mut sink = open_sink(config.output_path(), config.format())?;
    let runner = SuiteRunner::new(config.clone());
    let state = runner.run(&batches, &mut sink).await?;
    drop(sink);

    if !cli.quiet {
        print_summary(&config, &state);
    }
    Ok(())
}

fn confirm_authorization() -> Result<bool> {
    println!(
        "{}",
        "Do you have explicit written authorization to test this target? (yes/NO):"
            .bright_yellow()
    );
    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .context("Failed to read authorization answer")?;
    Ok(input.trim().eq_ignore_ascii_case("yes"))
}

fn print_banner(config: &ProbeConfig, batches: &[Batch]) {
    println!("{}", "=".repeat(80).bright_blue());
    println!(
        "{} {}",
        "RFC 7230 compliance probe".bright_blue().bold(),
        format!("(catalog {})", CATALOG_VERSION).dimmed()
    );
    println!("{}", "=".repeat(80).bright_blue());
    println!("Target:   {}:{}", config.target(), config.port());
    println!("Timeout:  {} ms", config.timeout_ms());
    println!(
        "Cases:    {} in {} batch(es)",
        catalog::total_cases(batches),
        batches.len()
    );
    println!("Output:   {}", config.output_path().display());
    println!();
}

fn print_catalog(batches: &[Batch]) {
    println!(
        "{} {}",
        "Test catalog".bold(),
        format!("(version {})", CATALOG_VERSION).dimmed()
    );
    for batch in batches {
        println!();
        println!("{} ({} cases)", batch.name.cyan().bold(), batch.len());
        for case in &batch.cases {
            println!(
                "  {:<40} {:>6} bytes  expected: {}",
                case.name,
                case.raw_payload.len(),
                case.expected_outcome
            );
        }
    }
}

fn print_summary(config: &ProbeConfig, state: &GetState) {
    println!();
    println!("Run Summary");
    println!("================");
    println!("Cases run:          {}", state.total_cases());
    println!(
        "Responses:          {} ({} with a status line)",
        state.responded().to_string().green(),
        state.status_lines()
    );
    println!("Silent (no bytes):  {}", state.silent().to_string().yellow());
    println!("Failed:             {}", state.failed().to_string().red());
    if let (Some(start), Some(end)) = (state.start_time(), state.end_time()) {
        println!("Started:            {}", start.format("%Y-%m-%d %H:%M:%S"));
        println!("Finished:           {}", end.format("%Y-%m-%d %H:%M:%S"));
    }
    println!("Elapsed:            {} ms", state.elapsed_ms());
    println!(
        "\nRecords appended to: {}",
        config.output_path().display()
    );
}
