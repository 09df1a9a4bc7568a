use clap::builder::{NonEmptyStringValueParser, TypedValueParser};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use dto_gen::{context_to_json, generate_dto_file, DtoError};

#[derive(Parser, Debug)]
#[command(name = "dto-gen")]
#[command(about = "Generate a Go DTO struct and mapper function from a Go struct", long_about = None)]
struct Cli {
    /// Input Go file containing the struct declaration
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new().map(PathBuf::from))]
    input: PathBuf,

    /// Output Go file (created or truncated)
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new().map(PathBuf::from))]
    output: PathBuf,

    /// Name of the struct to convert (case-sensitive)
    #[arg(short = 't', long = "type", value_name = "NAME", value_parser = NonEmptyStringValueParser::new())]
    type_name: String,

    /// Also print the extracted fields as JSON to stdout
    #[arg(long)]
    emit_json: bool,
}

fn run(cli: &Cli, out: &mut impl Write) -> Result<(), DtoError> {
    let ctx = generate_dto_file(&cli.input, &cli.output, &cli.type_name)?;
    if cli.emit_json {
        writeln!(out, "{}", context_to_json(&ctx)?)?;
    }
    writeln!(out, "DTO generated at {}", cli.output.display())?;
    Ok(())
}

fn main() {
    // Logs go to stderr so --emit-json output stays clean
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let cli = Cli::parse();

    if let Err(err) = run(&cli, &mut io::stdout().lock()) {
        tracing::debug!(error = ?err, input = %cli.input.display(), "generation failed");
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("dto-gen-cli-{}-{}", process::id(), name))
    }

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_all_flags() {
        let cli = Cli::try_parse_from(["dto-gen", "-i", "in.go", "--output", "out.go", "-t", "User", "--emit-json"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("in.go"));
        assert_eq!(cli.output, PathBuf::from("out.go"));
        assert_eq!(cli.type_name, "User");
        assert!(cli.emit_json);
    }

    #[test]
    fn test_missing_flag_is_a_usage_error() {
        let err = Cli::try_parse_from(["dto-gen", "--input", "in.go", "--output", "out.go"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_empty_values_are_rejected() {
        let cases: [[&str; 7]; 3] = [
            ["dto-gen", "--input", "", "--output", "out.go", "--type", "User"],
            ["dto-gen", "--input", "in.go", "--output", "", "--type", "User"],
            ["dto-gen", "--input", "in.go", "--output", "out.go", "--type", ""],
        ];
        for args in cases {
            let err = Cli::try_parse_from(args).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidValue, "args: {:?}", args);
        }
    }

    #[test]
    fn test_run_reports_output_path() {
        let input = temp_path("model.go");
        let output = temp_path("model_dto.go");
        fs::write(&input, "package zoo\n\ntype Animal struct {\n\tSpecies string\n}\n").unwrap();

        let cli = Cli {
            input:     input.clone(),
            output:    output.clone(),
            type_name: "Animal".to_string(),
            emit_json: true,
        };
        let mut out = Vec::new();
        run(&cli, &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("\"dtoName\": \"AnimalDTO\""));
        assert!(printed.ends_with(&format!("DTO generated at {}\n", output.display())));
        assert!(output.exists());

        let _ = fs::remove_file(&input);
        let _ = fs::remove_file(&output);
    }

    #[test]
    fn test_run_missing_struct_writes_nothing() {
        let input = temp_path("empty.go");
        let output = temp_path("never_written.go");
        fs::write(&input, "package zoo\n").unwrap();

        let cli = Cli {
            input:     input.clone(),
            output:    output.clone(),
            type_name: "Animal".to_string(),
            emit_json: false,
        };
        let mut out = Vec::new();
        let err = run(&cli, &mut out).unwrap_err();
        assert!(matches!(err, DtoError::StructNotFound { .. }), "expected StructNotFound but got {:?}", err);
        assert!(out.is_empty());
        assert!(!output.exists());

        let _ = fs::remove_file(&input);
    }
}
