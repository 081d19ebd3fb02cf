use clap::{Args, Parser, Subcommand};
use epc_qr::batch::{check_records, read_records, render_records, BatchReport};
use epc_qr::{
    generate_payload, logging, CharacterSet, EpcQrGenerator, EpcVersion, ErrorCorrection,
    PaymentRecord, RenderOptions,
};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "epc-qr")]
#[command(about = "EPC QR-Code generator for SEPA credit transfers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the EPC payload for a single transfer.
    Payload(PayloadArgs),
    /// Render a single transfer as an SVG QR-Code.
    Render(RenderArgs),
    /// Render every valid row of a CSV file.
    Batch(BatchArgs),
    /// Validate every row of a CSV file without rendering.
    Check(CheckArgs),
}

#[derive(Args)]
struct RecordArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    iban: String,
    #[arg(long)]
    amount: Decimal,
    #[arg(long)]
    bic: Option<String>,
    #[arg(long, default_value = "002")]
    version: EpcVersion,
    #[arg(long, default_value = "ISO-8859-1")]
    charset: CharacterSet,
    #[arg(long)]
    purpose: Option<String>,
    #[arg(long)]
    structured: Option<String>,
    #[arg(long)]
    unstructured: Option<String>,
    #[arg(long)]
    info: Option<String>,
}

impl RecordArgs {
    fn into_record(self) -> PaymentRecord {
        PaymentRecord {
            version: Some(self.version),
            character_set: Some(self.charset),
            beneficiary_bic: self.bic,
            purpose: self.purpose,
            remittance_structured: self.structured,
            remittance_unstructured: self.unstructured,
            beneficiary_to_originator_info: self.info,
            ..PaymentRecord::new(self.name, self.iban, self.amount)
        }
    }
}

#[derive(Args)]
struct SymbolArgs {
    #[arg(long, default_value = "medium")]
    ecc: ErrorCorrection,
    #[arg(long, default_value_t = 1)]
    border: u32,
}

impl SymbolArgs {
    fn options(&self) -> RenderOptions {
        RenderOptions {
            error_correction: self.ecc,
            border: self.border,
        }
    }
}

#[derive(Parser)]
struct PayloadArgs {
    #[command(flatten)]
    record: RecordArgs,
}

#[derive(Parser)]
struct RenderArgs {
    #[command(flatten)]
    record: RecordArgs,
    #[command(flatten)]
    symbol: SymbolArgs,
    #[arg(long, default_value = "generated/epc-qr.svg")]
    output: PathBuf,
}

#[derive(Parser)]
struct BatchArgs {
    #[arg(long, default_value = "data/payments.csv")]
    input: PathBuf,
    #[arg(long, default_value = "generated")]
    output_dir: PathBuf,
    #[command(flatten)]
    symbol: SymbolArgs,
}

#[derive(Parser)]
struct CheckArgs {
    #[arg(long, default_value = "data/payments.csv")]
    input: PathBuf,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    logging::init_logging("epc-qr")?;
    let cli = Cli::parse();
    match cli.command {
        Command::Payload(args) => run_payload(args),
        Command::Render(args) => run_render(args),
        Command::Batch(args) => run_batch(args),
        Command::Check(args) => run_check(args),
    }
}

fn run_payload(args: PayloadArgs) -> Result<(), String> {
    let record = args.record.into_record();
    let payload = generate_payload(&record).map_err(|err| describe(&err))?;
    print!("{payload}");
    Ok(())
}

fn run_render(args: RenderArgs) -> Result<(), String> {
    let options = args.symbol.options();
    let record = args.record.into_record();
    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent).map_err(|err| err.to_string())?;
    }

    let generator = EpcQrGenerator::new(options);
    generator
        .save_as_svg(&record, &args.output)
        .map_err(|err| describe(&err))?;
    log::info!(
        "Rendered with ecc={} border={} to {}",
        options.error_correction,
        options.border,
        args.output.display()
    );
    Ok(())
}

fn run_batch(args: BatchArgs) -> Result<(), String> {
    let start = Instant::now();
    let records = read_records(&args.input)?;
    let generator = EpcQrGenerator::new(args.symbol.options());
    let (outputs, report) =
        render_records(&records, &generator, &args.output_dir).map_err(|err| err.to_string())?;

    log::info!(
        "Batch: input={} rendered={} / {} output_dir={}",
        args.input.display(),
        outputs.len(),
        report.total_records,
        args.output_dir.display()
    );
    log_report("Batch", &report);
    log::info!("Batch time: {} ms", start.elapsed().as_millis());

    if !report.is_clean() {
        return Err(format!(
            "batch skipped {} invalid record(s)",
            report.issues.len()
        ));
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let records = read_records(&args.input)?;
    let report = check_records(&records);

    log::info!(
        "Check: records={} valid={} invalid={}",
        report.total_records,
        report.valid_records(),
        report.issues.len()
    );
    log_report("Check", &report);

    if !report.is_clean() {
        return Err(format!(
            "check failed with {} invalid record(s)",
            report.issues.len()
        ));
    }
    Ok(())
}

fn log_report(label: &str, report: &BatchReport) {
    let items = report.summary();
    let max_items = 5usize;
    for (message, count) in items.iter().take(max_items) {
        log::warn!("{} issues: {} = {}", label, message, count);
    }
    if items.len() > max_items {
        log::warn!(
            "{} issues: {} additional issue types not shown",
            label,
            items.len() - max_items
        );
    }
    for issue in report.issues.iter().take(max_items) {
        log::debug!("{} row {}: {}", label, issue.row, issue.message);
    }
}

fn describe(err: &epc_qr::EpcError) -> String {
    match err.validation() {
        Some(cause) => format!("{err}: {cause}"),
        None => err.to_string(),
    }
}
