use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use keg2table_rs::convert_keg_file;
use keg2table_rs::options::{ConvertOptions, ErrorPolicy};
use keg2table_rs::output::OutputFormat;

/// Parses '.keg' BRITE hierarchy files (htext) into tables.
#[derive(Parser, Debug)]
#[command(name = "keg2table-rs", version)]
struct Args {
    /// Input .keg files (.keg.gz is read transparently)
    #[arg(required = true)]
    keg_files: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Output file for a single input ('-' for stdout), or a directory for several
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip leaf lines that cannot be parsed instead of failing
    #[arg(long)]
    skip_malformed: bool,

    /// Log progress at info level
    #[arg(short, long)]
    verbose: bool,
}

enum Target {
    Stdout,
    File(PathBuf),
}

fn spinner(color: &str, message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let template = format!("{{spinner:.{color}}} {{msg}}");
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template(&template)
    {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner
}

/// `hsa00001.keg.gz` -> `hsa00001.<ext>`, next to the input unless `dir` is given.
fn default_output_path(input: &Path, dir: Option<&Path>, format: OutputFormat) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    let stem = name.strip_suffix(".keg").unwrap_or(name);
    let file_name = format!("{stem}.{}", format.extension());

    match dir.or_else(|| input.parent()) {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

fn resolve_targets(args: &Args) -> Result<Vec<Target>, String> {
    let single = args.keg_files.len() == 1;
    match &args.output {
        Some(out) if out.as_os_str() == "-" => {
            if single {
                Ok(vec![Target::Stdout])
            } else {
                Err("'-o -' needs exactly one input file".to_string())
            }
        }
        Some(out) if single => Ok(vec![Target::File(out.clone())]),
        Some(dir) => {
            fs::create_dir_all(dir)
                .map_err(|e| format!("cannot create output directory {}: {e}", dir.display()))?;
            Ok(args
                .keg_files
                .iter()
                .map(|input| Target::File(default_output_path(input, Some(dir), args.format)))
                .collect())
        }
        None => Ok(args
            .keg_files
            .iter()
            .map(|input| Target::File(default_output_path(input, None, args.format)))
            .collect()),
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let targets = resolve_targets(&args).unwrap_or_else(|e| {
        eprintln!("ERROR: {e}");
        process::exit(1);
    });

    let policy = if args.skip_malformed {
        ErrorPolicy::SkipRow
    } else {
        ErrorPolicy::Abort
    };
    let options = ConvertOptions::new().with_error_policy(policy);

    // 1. Convert every file; they are independent
    let progress = spinner(
        "green",
        format!("Converting {} file(s)...", args.keg_files.len()),
    );
    let rendered: Vec<Result<(String, usize), String>> = args
        .keg_files
        .par_iter()
        .map(|path| -> Result<(String, usize), String> {
            let results = convert_keg_file(path, args.format, &options)
                .map_err(|e| format!("{}: {e}", path.display()))?;
            for diagnostic in results.diagnostics() {
                log::warn!(
                    "{}: skipped line {}: {}",
                    path.display(),
                    diagnostic.line_number,
                    diagnostic.message
                );
            }
            let text = results
                .render(args.format)
                .map_err(|e| format!("{}: {e}", path.display()))?;
            Ok((text, results.record_count()))
        })
        .collect();
    progress.finish_with_message("Conversion finished.");

    // 2. Write outputs
    let progress = spinner("yellow", "Writing output...".to_string());
    let mut failed = 0;
    for ((input, target), result) in args.keg_files.iter().zip(&targets).zip(rendered) {
        let (text, records) = match result {
            Ok(done) => done,
            Err(e) => {
                progress.suspend(|| eprintln!("ERROR: {e}"));
                failed += 1;
                continue;
            }
        };
        match target {
            Target::Stdout => progress.suspend(|| print!("{text}")),
            Target::File(out) => {
                if let Err(e) = fs::write(out, text) {
                    progress.suspend(|| eprintln!("ERROR: could not write {}: {e}", out.display()));
                    failed += 1;
                    continue;
                }
                log::info!("{} -> {} ({records} records)", input.display(), out.display());
            }
        }
    }
    progress.finish_with_message(format!(
        "Done: {} converted, {failed} failed.",
        args.keg_files.len() - failed
    ));

    if failed > 0 {
        process::exit(1);
    }
}
