//! label-cli: render label sheets from a text file
//!
//! Each input line is `Barcode, Part Name, Rack`; the sheet is written to the
//! output directory under its generated name.

use clap::Parser;
use label_sheet::{FailurePolicy, LabelBatch, LabelConfig, LabelSheetGenerator, write_document};
use std::path::PathBuf;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(name = "label-cli", version, about = "Generate printable part label sheets")]
struct Args {
    /// Text file with one `Barcode, Part Name, Rack` line per label
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Directory receiving the PDF
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Logo drawn above the barcode
    #[arg(long, value_name = "FILE", env = "LOGO_PATH", default_value = "logo.png")]
    logo: PathBuf,

    /// Leave the logo block out even if the file exists
    #[arg(long)]
    no_logo: bool,

    /// Footer caption printed on every label
    #[arg(long, env = "LABEL_FOOTER")]
    footer: Option<String>,

    /// Skip records that cannot be encoded instead of failing the sheet
    #[arg(long)]
    skip_invalid: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

impl Args {
    fn label_config(&self) -> LabelConfig {
        let mut config = if self.no_logo {
            LabelConfig::default().without_logo()
        } else {
            LabelConfig::default().with_logo(&self.logo)
        };
        if let Some(footer) = &self.footer {
            config = config.with_footer(footer);
        }
        if self.skip_invalid {
            config = config.with_failure_policy(FailurePolicy::SkipRecord);
        }
        config
    }
}

/// Parse, render and write one sheet; returns the written path
fn run(args: &Args) -> Result<PathBuf, BoxError> {
    let text = std::fs::read_to_string(&args.input)
        .map_err(|e| format!("Failed to read {}: {e}", args.input.display()))?;
    let batch = LabelBatch::parse(&text)?;

    let generator = LabelSheetGenerator::new(args.label_config());
    let document = generator.generate(&batch)?;
    for skipped in &document.skipped {
        eprintln!("skipped {}: {}", skipped.identifier, skipped.reason);
    }

    Ok(write_document(&args.output_dir, &document)?)
}

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("label_sheet={level},label_cli={level}").into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<(), BoxError> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let path = run(&args)?;
    tracing::info!(path = %path.display(), "done");
    println!("{}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn args(dir: &Path, input: &str, extra: &[&str]) -> Args {
        let input_path = dir.join("labels.txt");
        std::fs::write(&input_path, input).unwrap();
        let mut argv = vec![
            "label-cli".to_string(),
            "--input".to_string(),
            input_path.display().to_string(),
            "--output-dir".to_string(),
            dir.join("out").display().to_string(),
            "--no-logo".to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_run_writes_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(
            dir.path(),
            "123456789012, Motor Gear, R12\n987654321098, Brake Unit, R34\n",
            &[],
        );

        let path = run(&args).unwrap();
        assert_eq!(
            path,
            dir.path()
                .join("out")
                .join("123456789012,987654321098_labels.pdf")
        );
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_run_rejects_bad_format() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), "123456789012, Motor Gear\n", &[]);

        let err = run(&args).unwrap_err();
        assert!(err.to_string().contains("expected 3 fields"));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_skip_invalid_flag() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), "OK-1, Gear, R1\nÜ-2, Gear, R2", &["--skip-invalid"]);
        assert_eq!(args.label_config().failure_policy, FailurePolicy::SkipRecord);

        let path = run(&args).unwrap();
        assert!(path.ends_with("OK-1_labels.pdf"));
    }

    #[test]
    fn test_footer_override() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), "1, A, B", &["--footer", "DOCK 4"]);
        let config = args.label_config();
        assert_eq!(config.footer_text, "DOCK 4");
        assert!(config.logo_path.is_none());
    }
}
