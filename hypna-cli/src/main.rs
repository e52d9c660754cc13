use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hypna", version)]
struct Cli {
    /// Log filter (overrides `RUST_LOG`), e.g. `hypna=debug`.
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the default schema.
    Defaults(OutArgs),
    /// Migrate a stored or legacy document to the current schema.
    Migrate(InOutArgs),
    /// Check a document against the current contract without migrating it.
    Validate(InArgs),
    /// Compile the prompt for a document.
    Compile(CompileArgs),
    /// Interpolate a document at normalized time `t`.
    Sample(SampleArgs),
    /// Build the frame series and export it.
    Frames(FramesArgs),
    /// Wrap a migrated document in the storage envelope.
    Save(SaveArgs),
    /// Export only the enabled module blocks.
    ExportEnabled(InOutArgs),
}

#[derive(Parser, Debug)]
struct InArgs {
    /// Input JSON (envelope, schema or legacy document).
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct OutArgs {
    /// Output path. Defaults to stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InOutArgs {
    #[command(flatten)]
    input: InArgs,
    #[command(flatten)]
    output: OutArgs,
}

#[derive(Parser, Debug)]
struct CompileArgs {
    #[command(flatten)]
    input: InArgs,

    /// Also print the wizard's section notes to stderr.
    #[arg(long, default_value_t = false)]
    debug: bool,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    #[command(flatten)]
    input: InArgs,

    /// Normalized time.
    #[arg(long)]
    t: f64,

    /// Print only the value at this dotted path.
    #[arg(long)]
    path: Option<String>,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    #[command(flatten)]
    input: InArgs,

    /// Timeline JSON output. Printed to stdout when neither output is given.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Prompt sheet output.
    #[arg(long)]
    sheet: Option<PathBuf>,

    /// Cap on the sampling grid.
    #[arg(long, default_value_t = hypna::TimelineOpts::default().max_frames)]
    max_frames: usize,

    /// List disabled modules under each frame in the prompt sheet.
    #[arg(long, default_value_t = false)]
    annotate_disabled: bool,
}

#[derive(Parser, Debug)]
struct SaveArgs {
    #[command(flatten)]
    input: InArgs,

    /// Envelope output path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref())?;
    match cli.cmd {
        Command::Defaults(args) => cmd_defaults(args),
        Command::Migrate(args) => cmd_migrate(args),
        Command::Validate(args) => cmd_validate(args),
        Command::Compile(args) => cmd_compile(args),
        Command::Sample(args) => cmd_sample(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Save(args) => cmd_save(args),
        Command::ExportEnabled(args) => cmd_export_enabled(args),
    }
}

fn init_tracing(filter: Option<&str>) -> anyhow::Result<()> {
    let filter = match filter {
        Some(f) => EnvFilter::try_new(f).with_context(|| format!("parse log filter '{f}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
}

fn load(args: &InArgs) -> anyhow::Result<hypna::Schema> {
    let (schema, outcome) = hypna::load_schema_with_outcome(&read_text(&args.in_path)?);
    tracing::info!(?outcome, path = %args.in_path.display(), "loaded schema");
    Ok(schema)
}

fn write_output(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    let Some(path) = out else {
        println!("{text}");
        return Ok(());
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("write '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_defaults(args: OutArgs) -> anyhow::Result<()> {
    let text = hypna::default_schema().to_json_pretty()?;
    write_output(args.out.as_deref(), &text)
}

fn cmd_migrate(args: InOutArgs) -> anyhow::Result<()> {
    let payload = hypna::decode_stored_payload(&read_text(&args.input.in_path)?)?;
    let (schema, outcome) = hypna::migrate_with_outcome(&payload);
    eprintln!("outcome: {}", serde_json::to_string(&outcome)?);
    write_output(args.output.out.as_deref(), &schema.to_json_pretty()?)
}

fn cmd_validate(args: InArgs) -> anyhow::Result<()> {
    let payload = hypna::decode_stored_payload(&read_text(&args.in_path)?)?;
    let report = hypna::validate_schema(&payload);
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.valid {
        anyhow::bail!("{} validation error(s)", report.errors.len());
    }
    Ok(())
}

fn cmd_compile(args: CompileArgs) -> anyhow::Result<()> {
    let schema = load(&args.input)?;
    let compiled = hypna::compile_prompt(&schema);
    for w in &compiled.warnings {
        eprintln!("warning: {w}");
    }
    if args.debug {
        for section in hypna::compile_wizard_prompt(&schema).debug_sections {
            eprintln!("debug: {}: {}", section.title, section.text);
        }
    }
    println!("{}", compiled.text);
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let schema = load(&args.input)?;
    let text = match &args.path {
        Some(path) => {
            let value = hypna::interpolated_value(&schema, args.t, path)?
                .with_context(|| format!("no value at '{path}'"))?;
            serde_json::to_string_pretty(&value)?
        }
        None => hypna::interpolate_at_time(&schema, args.t)?.to_json_pretty()?,
    };
    println!("{text}");
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let schema = load(&args.input)?;
    let opts = hypna::TimelineOpts {
        max_frames: args.max_frames,
    };
    let series = hypna::build_frame_series(&schema, &hypna::DefaultCompiler, &opts)?;
    if series.is_disabled() {
        eprintln!("animation module is disabled; no frames");
    }

    if args.json.is_some() || args.sheet.is_none() {
        write_output(args.json.as_deref(), &hypna::export_timeline_json(&series)?)?;
    }
    if let Some(sheet) = &args.sheet {
        let sheet_opts = hypna::SheetOpts {
            annotate_disabled: args.annotate_disabled,
        };
        write_output(
            Some(sheet),
            &hypna::export_frame_prompt_sheet(&series, &sheet_opts),
        )?;
    }
    Ok(())
}

fn cmd_save(args: SaveArgs) -> anyhow::Result<()> {
    let schema = load(&args.input)?;
    let saved_at = chrono::Utc::now().to_rfc3339();
    let text = hypna::encode_stored_state(&schema, &saved_at)?;
    write_output(Some(&args.out), &text)
}

fn cmd_export_enabled(args: InOutArgs) -> anyhow::Result<()> {
    let schema = load(&args.input)?;
    let value = hypna::build_enabled_only_schema(&schema)?;
    write_output(
        args.output.out.as_deref(),
        &serde_json::to_string_pretty(&value)?,
    )
}
