//! Fill a PDF form from a JSON file of field values.
//!
//! Usage:
//!   fill_form <input.pdf> <output.pdf> <values.json> [--trace] [--font <name>] [--font-size <pt>]
//!   fill_form --list <input.pdf>
//!
//! The JSON file maps fully-qualified field names to strings, booleans, numbers, null or
//! arrays of strings. `--list` prints the names the form accepts.

use pdf_form_fill::config::{FillOptions, DEFAULT_MAX_DEPTH};
use pdf_form_fill::form::list_fields;
use pdf_form_fill::layout::{StandardFont, StandardFontLayout};
use pdf_form_fill::lopdf_backend::{fill_pdf_file, PdfFile};
use pdf_form_fill::value::FieldValues;
use pdf_form_fill::{Error, Result};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_FONT_SIZE: f64 = 10.0;

enum Command {
    Fill {
        input: PathBuf,
        output: PathBuf,
        values: PathBuf,
        options: FillOptions,
    },
    List {
        input: PathBuf,
    },
}

struct CliArgs {
    command: Command,
    trace: bool,
}

impl CliArgs {
    fn from_args() -> std::result::Result<Self, String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut positional = Vec::new();
        let mut trace = false;
        let mut list = false;
        let mut font = None;
        let mut font_size = DEFAULT_FONT_SIZE;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--trace" => trace = true,
                "--list" => list = true,
                "--font" => {
                    i += 1;
                    let name = args.get(i).ok_or("--font needs a font name")?;
                    font = Some(
                        StandardFont::from_name(name)
                            .ok_or_else(|| format!("unknown font {:?} (Helvetica, Courier)", name))?,
                    );
                },
                "--font-size" => {
                    i += 1;
                    font_size = args
                        .get(i)
                        .and_then(|s| s.parse().ok())
                        .filter(|size: &f64| *size > 0.0)
                        .ok_or("--font-size needs a positive number")?;
                },
                flag if flag.starts_with("--") => return Err(format!("unknown option {}", flag)),
                _ => positional.push(PathBuf::from(&args[i])),
            }
            i += 1;
        }

        let command = match (list, positional.as_slice()) {
            (true, [input]) => Command::List {
                input: input.clone(),
            },
            (false, [input, output, values]) => {
                let options = match font {
                    Some(font) => {
                        FillOptions::with_standard_font(StandardFontLayout::new(font, font_size))
                    },
                    None => FillOptions::default(),
                };
                Command::Fill {
                    input: input.clone(),
                    output: output.clone(),
                    values: values.clone(),
                    options: options.with_trace(trace),
                }
            },
            _ => return Err(usage()),
        };

        Ok(Self { command, trace })
    }
}

fn usage() -> String {
    "usage: fill_form <input.pdf> <output.pdf> <values.json> [--trace] [--font <name>] \
     [--font-size <pt>]\n       fill_form --list <input.pdf>"
        .to_string()
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::List { input } => {
            let doc = PdfFile::open(&input)?.to_document();
            for field in list_fields(&doc, DEFAULT_MAX_DEPTH)? {
                println!(
                    "{}\t{}\t{}\t{}",
                    field.name,
                    field.field_type.as_deref().unwrap_or("-"),
                    field.flags.bits(),
                    field.value.as_deref().unwrap_or("")
                );
            }
            Ok(())
        },
        Command::Fill {
            input,
            output,
            values,
            options,
        } => {
            let json = fs::read_to_string(&values)?;
            let values: FieldValues = serde_json::from_str(&json)?;
            let outcome = fill_pdf_file(&input, &output, &values, &options)?;

            log::info!(
                "Filled {} of {} field(s), wrote {} object(s) to {}",
                outcome.matched.len(),
                values.len(),
                outcome.objects.len(),
                output.display()
            );
            let unmatched: Vec<_> = values
                .keys()
                .filter(|name| !outcome.matched.contains(*name))
                .collect();
            if !unmatched.is_empty() {
                eprintln!("Warning: no field named {:?}", unmatched);
            }
            Ok(())
        },
    }
}

fn main() -> ExitCode {
    let args = match CliArgs::from_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(2);
        },
    };

    let default_filter = if args.trace { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::MissingForm) => {
            eprintln!("Error: the document has no interactive form");
            ExitCode::FAILURE
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
