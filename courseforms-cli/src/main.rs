use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use courseforms::{
    AlertQueue, AppConfig, CourseForm, CreateService, DocumentFormat, FormController,
    MaterialForm, PlanForm, SubmitStatus, SubscriptionForm,
    domain::FieldKind,
    form::{FieldInput, FileUpload},
    money::{convert_to_amount, convert_to_money},
    parse_document_str, render_document,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormKind {
    Material,
    Plan,
    Subscription,
}

#[derive(Debug, Parser)]
#[command(
    name = "courseforms",
    version,
    about = "Validate course form input and print the request payload"
)]
struct Cli {
    /// Form to fill in
    #[arg(value_enum)]
    form: FormKind,

    /// Field values: file path, inline payload, or "-" for stdin
    #[arg(short = 'i', long = "input", value_name = "SPEC")]
    input: Option<String>,

    /// Attach a file to a file field, as FIELD=PATH
    #[arg(long = "file", value_name = "FIELD=PATH")]
    files: Vec<String>,

    /// Configuration document (.json/.yaml/.toml)
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the JSON Schema of the request payload and exit
    #[arg(long = "print-schema")]
    print_schema: bool,

    /// Make the dry-run backend answer with an empty response
    #[arg(long = "reject")]
    reject: bool,

    /// Emit compact JSON rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,
}

#[derive(Debug)]
enum InputSource {
    File(PathBuf),
    Stdin,
}

/// Backend stand-in that prints the payload instead of sending it.
struct DryRunService {
    pretty: bool,
    reject: bool,
}

#[async_trait]
impl<P> CreateService<P> for DryRunService
where
    P: Serialize + Send + 'static,
{
    async fn create(&self, payload: P) -> anyhow::Result<Option<Value>> {
        let value = serde_json::to_value(&payload)?;
        if self.reject {
            return Ok(None);
        }
        println!(
            "{}",
            render_document(&value, DocumentFormat::Json, self.pretty)?
        );
        Ok(Some(value))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::load(path).map_err(|err| eyre!("{err:#}"))?,
        None => AppConfig::default(),
    }
    .with_env_overrides();

    match cli.form {
        FormKind::Material => run(MaterialForm, &cli, &config).await,
        FormKind::Plan => run(PlanForm, &cli, &config).await,
        FormKind::Subscription => run(SubscriptionForm, &cli, &config).await,
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("courseforms=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run<F: CourseForm>(form: F, cli: &Cli, config: &AppConfig) -> Result<()> {
    if cli.print_schema {
        let contract = form
            .payload_contract()
            .ok_or_else(|| eyre!("this form sends a multipart body without a JSON Schema"))?;
        println!(
            "{}",
            render_document(contract.schema(), DocumentFormat::Json, !cli.no_pretty)
                .map_err(|err| eyre!("{err:#}"))?
        );
        return Ok(());
    }

    let values = match cli.input.as_deref() {
        Some(spec) => load_value(spec)?,
        None => Value::Object(Default::default()),
    };

    let alerts = Arc::new(AlertQueue::new());
    let service = Arc::new(DryRunService {
        pretty: !cli.no_pretty,
        reject: cli.reject,
    });
    let mut controller = FormController::new(form, service, alerts.clone())
        .with_initial_values(&values)
        .map_err(|err| eyre!("invalid input: {err}"))?;

    for spec in &cli.files {
        let (field, upload) = parse_file_arg(spec)?;
        controller
            .set_value(&field, FieldInput::File(upload))
            .map_err(|err| eyre!("invalid --file {spec}: {err}"))?;
    }

    let Some(status) = controller.submit().await else {
        let mut body = String::from("form is not valid:\n");
        for field in controller.state().fields() {
            if let Some(message) = field.displayed_error() {
                let _ = writeln!(body, "  {}: {message}", field.schema.display_label());
            }
        }
        return Err(eyre!(body));
    };

    for field in controller.state().fields() {
        if field.schema.kind == FieldKind::Money
            && let Some(amount) = field.text().and_then(convert_to_amount)
        {
            eprintln!(
                "{}: {}",
                field.schema.title,
                convert_to_money(amount, &config.currency)
            );
        }
    }

    for queued in alerts.drain() {
        eprintln!("[{}] {}", queued.alert.status.as_str(), queued.alert.text);
    }

    match status {
        SubmitStatus::Succeeded => Ok(()),
        other => Err(eyre!("submission ended as {other:?}")),
    }
}

fn parse_file_arg(spec: &str) -> Result<(String, FileUpload)> {
    let Some((field, raw_path)) = spec.split_once('=') else {
        return Err(eyre!("expected FIELD=PATH, got '{spec}'"));
    };
    let path = Path::new(raw_path);
    let bytes = fs::read(path).wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| raw_path.to_string());
    Ok((
        field.to_string(),
        FileUpload::new(file_name, guess_content_type(path), bytes),
    ))
}

fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "rar" => "application/x-rar-compressed",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

fn load_value(spec: &str) -> Result<Value> {
    if spec == "-" {
        let contents = read_from_source(&InputSource::Stdin)?;
        return parse_contents(&contents, DocumentFormat::Json, "input");
    }

    let path = PathBuf::from(spec);
    match read_from_source(&InputSource::File(path.clone())) {
        Ok(contents) => parse_contents(&contents, DocumentFormat::from_path(&path), "input"),
        Err(err) => {
            if is_not_found(&err) {
                return parse_contents(spec, DocumentFormat::Json, "inline input");
            }
            Err(err.wrap_err(format!("failed to load input from {}", path.display())))
        }
    }
}

fn read_from_source(source: &InputSource) -> Result<String> {
    match source {
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .wrap_err("failed to read from stdin")?;
            Ok(buffer)
        }
        InputSource::File(path) => fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read file {}", path.display())),
    }
}

fn is_not_found(err: &Report) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
}

fn parse_contents(contents: &str, format: DocumentFormat, label: &str) -> Result<Value> {
    parse_document_str(contents, format).map_err(|err| eyre!("failed to parse {label}: {err:#}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_argument_requires_field_name() {
        assert!(parse_file_arg("aula.pdf").is_err());
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(guess_content_type(Path::new("a.PDF")), "application/pdf");
        assert_eq!(guess_content_type(Path::new("a.rar")), "application/x-rar-compressed");
        assert_eq!(guess_content_type(Path::new("a")), "application/octet-stream");
    }
}
