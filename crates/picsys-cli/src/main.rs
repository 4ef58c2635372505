//! picsys-cli: send an image through the processing service from a terminal.
//!
//! Builds the same multipart request as the web form, posts it with a
//! blocking HTTP client, writes the returned image to disk, and prints
//! the per-channel histogram of the result.
//!
//! # Usage
//!
//! ```text
//! cargo run --bin picsys-cli -- [OPTIONS] <IMAGE_PATH>
//! picsys-cli photo.jpg --method greyscale --method canny --param canny_threshold1=50
//! picsys-cli --list
//! ```
//!
//! Set `RUST_LOG=info` (or `debug`) to see request details.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use picsys_core::{
    Category, Channel, FieldValue, Histogram, Operation, PicsysError, RequestPayload, Selection,
    ServiceConfig, SourceImage, SourceImages, resolve_wire_key,
};
use reqwest::blocking::multipart::{Form, Part};

/// Command-line client for the picsys image processing service.
#[derive(Parser)]
#[command(name = "picsys-cli", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP, GIF).
    #[arg(required_unless_present = "list")]
    image_path: Option<PathBuf>,

    /// Operation to apply; repeat to chain operations in order.
    #[arg(long = "method", default_values_t = [Operation::Greyscale])]
    methods: Vec<Operation>,

    /// Parameter override as `FIELD=VALUE`, e.g. `gamma_gamma=2.2`.
    #[arg(long = "param", value_parser = parse_param)]
    params: Vec<(String, f64)>,

    /// Second image for combination operations (add, blend, ...).
    #[arg(long)]
    second: Option<PathBuf>,

    /// Processing endpoint URL.
    #[arg(long)]
    endpoint: Option<String>,

    /// Send every parameter, including untouched defaults.
    #[arg(long)]
    explicit_defaults: bool,

    /// Full service config as a JSON string.
    ///
    /// `--endpoint` and `--explicit-defaults` are applied on top of it.
    #[arg(long)]
    config_json: Option<String>,

    /// Where to write the processed image [default: `<stem>_processed.png`].
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Print the histogram as JSON instead of a summary.
    #[arg(long)]
    json: bool,

    /// List the operation catalog and parameter ranges, then exit.
    #[arg(long)]
    list: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Picsys(#[from] PicsysError),

    #[error("unknown parameter field: {0}")]
    UnknownField(String),

    #[error("error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service responded with {0}")]
    Status(reqwest::StatusCode),

    #[error("error serializing histogram: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a `FIELD=VALUE` pair.
fn parse_param(s: &str) -> Result<(String, f64), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got {s:?}"))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value for {key}: {e}"))?;
    Ok((key.trim().to_owned(), value))
}

/// Resolve the service config: JSON (or defaults), then flag overrides.
fn config_from_cli(cli: &Cli) -> Result<ServiceConfig, CliError> {
    let mut config = match cli.config_json {
        Some(ref json) => ServiceConfig::from_json(json)?,
        None => ServiceConfig::default(),
    };
    if let Some(ref endpoint) = cli.endpoint {
        config.endpoint.clone_from(endpoint);
    }
    if cli.explicit_defaults {
        config.explicit_defaults = true;
    }
    config.validate()?;
    Ok(config)
}

/// Build the selection from `--method` and `--param` flags.
///
/// Parameters are given by their wire field name; each must belong to
/// one of the selected operations.
fn selection_from_cli(methods: &[Operation], params: &[(String, f64)]) -> Result<Selection, CliError> {
    let mut selection = Selection::new(methods.to_vec());
    for (key, value) in params {
        let (op, spec) = resolve_wire_key(key).ok_or_else(|| CliError::UnknownField(key.clone()))?;
        let stored = selection.set_param(op, spec.name, *value)?;
        if (stored - value).abs() > f64::EPSILON {
            log::warn!("{key}: {value} adjusted to {stored}");
        }
    }
    Ok(selection)
}

/// The `--second` path, if a selected operation will use it.
fn second_image_path<'a>(selection: &Selection, second: Option<&'a Path>) -> Option<&'a Path> {
    let second = second?;
    if selection.needs_second_image() {
        Some(second)
    } else {
        log::warn!("--second ignored: no combination operation selected");
        None
    }
}

fn read_image(path: &Path) -> Result<SourceImage, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let filename = path
        .file_name()
        .map_or_else(|| "image".to_owned(), |n| n.to_string_lossy().into_owned());
    Ok(SourceImage::new(filename, bytes))
}

/// Translate the payload into a `reqwest` multipart form, keeping order.
fn to_multipart(payload: &RequestPayload<'_>) -> Result<Form, CliError> {
    let mut form = Form::new();
    for field in payload.fields() {
        form = match &field.value {
            FieldValue::Text(value) => form.text(field.name.clone(), value.clone()),
            FieldValue::File {
                filename,
                mime_type,
                bytes,
            } => {
                let part = Part::bytes(bytes.to_vec())
                    .file_name((*filename).to_owned())
                    .mime_str(mime_type)?;
                form.part(field.name.clone(), part)
            }
        };
    }
    Ok(form)
}

fn post(payload: &RequestPayload<'_>, config: &ServiceConfig) -> Result<Vec<u8>, CliError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("picsys-cli/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let response = client
        .post(&config.endpoint)
        .multipart(to_multipart(payload)?)
        .send()?;
    if !response.status().is_success() {
        return Err(CliError::Status(response.status()));
    }
    Ok(response.bytes()?.to_vec())
}

fn print_catalog() {
    for category in Category::ALL {
        println!("{}:", category.label());
        for op in category.operations() {
            let arity = if op.needs_second_image() {
                "  (needs --second)"
            } else {
                ""
            };
            println!("  {:<20} {}{arity}", op.name(), op.label());
            for spec in op.params() {
                println!(
                    "    --param {:<32} default {} range {}..={} step {}",
                    format!("{}=", op.field_name(spec)),
                    spec.display(spec.default),
                    spec.min,
                    spec.max,
                    spec.step,
                );
            }
        }
    }
}

fn print_histogram(histogram: &Histogram) {
    println!("Pixels: {}", histogram.pixel_count());
    for channel in Channel::ALL {
        match (histogram.mean(channel), histogram.range(channel)) {
            (Some(mean), Some((lo, hi))) => {
                println!("  {:<5} mean {mean:>7.2}  range {lo}..={hi}", channel.label());
            }
            _ => println!("  {:<5} -", channel.label()),
        }
    }
}

fn run(cli: &Cli, image_path: &Path) -> Result<(), CliError> {
    let config = config_from_cli(cli)?;
    let selection = selection_from_cli(&cli.methods, &cli.params)?;

    let images = SourceImages {
        primary: Some(read_image(image_path)?),
        secondary: second_image_path(&selection, cli.second.as_deref())
            .map(read_image)
            .transpose()?,
    };
    let payload = RequestPayload::build(&selection, &images, &config)?;

    log::info!("POST {} ({})", config.endpoint, selection.summary());
    for field in payload.fields() {
        if let FieldValue::Text(ref value) = field.value {
            log::debug!("  {} = {value}", field.name);
        }
    }

    let bytes = post(&payload, &config)?;
    log::info!("received {} bytes", bytes.len());

    let output = cli.output.clone().unwrap_or_else(|| {
        images
            .primary
            .as_ref()
            .map_or_else(|| PathBuf::from("processed.png"), |img| PathBuf::from(img.processed_filename()))
    });
    std::fs::write(&output, &bytes).map_err(|source| CliError::Write {
        path: output.clone(),
        source,
    })?;
    eprintln!("Wrote {}", output.display());

    let histogram = Histogram::from_encoded(&bytes)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&histogram)?);
    } else {
        eprintln!("Selections: {}", selection.summary());
        print_histogram(&histogram);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if cli.list {
        print_catalog();
        return ExitCode::SUCCESS;
    }

    let Some(ref image_path) = cli.image_path else {
        eprintln!("an image path is required");
        return ExitCode::FAILURE;
    };

    match run(&cli, image_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("picsys-cli").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn param_pairs_parse() {
        assert_eq!(parse_param("gamma_gamma=2.5").unwrap(), ("gamma_gamma".to_owned(), 2.5));
        assert_eq!(parse_param(" binary_thresh = 10 ").unwrap(), ("binary_thresh".to_owned(), 10.0));
        assert!(parse_param("gamma_gamma").is_err());
        assert!(parse_param("gamma_gamma=high").is_err());
    }

    #[test]
    fn methods_default_to_greyscale() {
        let cli = cli(&["in.png"]);
        assert_eq!(cli.methods, vec![Operation::Greyscale]);
    }

    #[test]
    fn repeated_methods_keep_order() {
        let cli = cli(&["in.png", "--method", "canny", "--method", "greyscale"]);
        assert_eq!(cli.methods, vec![Operation::Canny, Operation::Greyscale]);
    }

    #[test]
    fn unknown_method_is_rejected() {
        let parsed = Cli::try_parse_from(["picsys-cli", "in.png", "--method", "emboss"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn list_needs_no_image() {
        let cli = cli(&["--list"]);
        assert!(cli.list);
        assert!(cli.image_path.is_none());
    }

    #[test]
    fn params_apply_to_selected_operations() {
        let selection = selection_from_cli(
            &[Operation::Canny],
            &[("canny_threshold1".to_owned(), 50.0)],
        )
        .unwrap();
        assert_eq!(selection.param(Operation::Canny, "threshold1"), Some(50.0));
        assert_eq!(selection.param(Operation::Canny, "threshold2"), None);
    }

    #[test]
    fn params_are_normalized() {
        let selection = selection_from_cli(
            &[Operation::GaussianBlur],
            &[("gaussian_blur_kernel_size".to_owned(), 6.0)],
        )
        .unwrap();
        let value = selection.param(Operation::GaussianBlur, "kernel_size").unwrap();
        assert_eq!(value % 2.0, 1.0);
    }

    #[test]
    fn param_for_unselected_operation_fails() {
        let err = selection_from_cli(&[Operation::Greyscale], &[("gamma_gamma".to_owned(), 2.0)])
            .unwrap_err();
        assert!(matches!(err, CliError::Picsys(PicsysError::NotSelected(Operation::Gamma))));
    }

    #[test]
    fn unknown_field_fails() {
        let err = selection_from_cli(&[Operation::Greyscale], &[("nope".to_owned(), 1.0)]).unwrap_err();
        assert!(matches!(err, CliError::UnknownField(ref k) if k == "nope"));
    }

    #[test]
    fn endpoint_flag_overrides_json() {
        let cli = cli(&[
            "in.png",
            "--config-json",
            r#"{"endpoint":"http://a.example/process"}"#,
            "--endpoint",
            "https://b.example/run",
            "--explicit-defaults",
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.endpoint, "https://b.example/run");
        assert!(config.explicit_defaults);
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let cli = cli(&["in.png", "--endpoint", "ftp://example.com"]);
        assert!(config_from_cli(&cli).is_err());
    }

    #[test]
    fn second_image_only_read_for_combinations() {
        let second = Path::new("mask.png");
        let plain = Selection::new(vec![Operation::Greyscale]);
        assert_eq!(second_image_path(&plain, Some(second)), None);

        let blend = Selection::new(vec![Operation::Greyscale, Operation::Blend]);
        assert_eq!(second_image_path(&blend, Some(second)), Some(second));
        assert_eq!(second_image_path(&blend, None), None);
    }

    #[test]
    fn missing_image_file_reports_path() {
        let err = read_image(Path::new("/nonexistent/picsys/in.png")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/picsys/in.png"));
    }
}
