use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use reframe::{
    BackgroundMode, FitMode, JsonFileStore, OutputFormat, Session, TargetSpec, clamp_target_dim,
    file_preset_store,
};

#[derive(Parser, Debug)]
#[command(name = "reframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Re-target an image and write the encoded result.
    Render(RenderArgs),
    /// Print the color under a pointer position on the rendered canvas.
    Sample(SampleArgs),
    /// Manage named configuration presets.
    Preset(PresetArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input image path.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    spec: SpecArgs,

    /// Apply a stored preset; explicit flags override its fields.
    #[arg(long)]
    preset: Option<String>,

    /// Output path. Defaults to `{stem}-{width}x{height}.{ext}` in the
    /// current directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Preset store directory.
    #[arg(long, default_value = ".reframe")]
    store: PathBuf,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Input image path.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    spec: SpecArgs,

    /// Pointer x in displayed (CSS) pixels.
    #[arg(long)]
    x: f64,

    /// Pointer y in displayed (CSS) pixels.
    #[arg(long)]
    y: f64,
}

/// Target-spec flags shared by the subcommands. Every flag is optional so
/// an applied preset (or the image's natural dimensions) shows through
/// where nothing was passed.
#[derive(Parser, Debug)]
struct SpecArgs {
    /// Target width in pixels.
    #[arg(long)]
    width: Option<f64>,

    /// Target height in pixels.
    #[arg(long)]
    height: Option<f64>,

    /// Fit policy.
    #[arg(long, value_enum)]
    fit: Option<FitChoice>,

    /// Output encoding.
    #[arg(long, value_enum)]
    format: Option<FormatChoice>,

    /// Background: "transparent" or a #rrggbb color.
    #[arg(long)]
    background: Option<String>,
}

#[derive(Parser, Debug)]
struct PresetArgs {
    /// Preset store directory.
    #[arg(long, default_value = ".reframe")]
    store: PathBuf,

    #[command(subcommand)]
    cmd: PresetCommand,
}

#[derive(Subcommand, Debug)]
enum PresetCommand {
    /// Save or replace a named preset.
    Save {
        #[arg(long)]
        name: String,

        #[command(flatten)]
        spec: SpecArgs,
    },
    /// Print a stored preset's spec as JSON.
    Apply {
        #[arg(long)]
        name: String,
    },
    /// Delete a preset.
    Delete {
        #[arg(long)]
        name: String,
    },
    /// List stored presets.
    List,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FitChoice {
    Fit,
    Fill,
}

impl From<FitChoice> for FitMode {
    fn from(value: FitChoice) -> Self {
        match value {
            FitChoice::Fit => FitMode::Fit,
            FitChoice::Fill => FitMode::Fill,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    Jpeg,
    Webp,
}

impl From<FormatChoice> for OutputFormat {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::Png => OutputFormat::Png,
            FormatChoice::Jpeg => OutputFormat::Jpeg,
            FormatChoice::Webp => OutputFormat::Webp,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Sample(args) => cmd_sample(args),
        Command::Preset(args) => cmd_preset(args),
    }
}

fn load_session(store_dir: &Path, in_path: &Path) -> anyhow::Result<Session<JsonFileStore>> {
    let bytes =
        fs::read(in_path).with_context(|| format!("read image '{}'", in_path.display()))?;
    let file_name = in_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());

    let mut session = Session::new(JsonFileStore::new(store_dir));
    session
        .load_image(&bytes, file_name.as_deref())
        .with_context(|| format!("decode image '{}'", in_path.display()))?;
    Ok(session)
}

fn apply_spec_args(session: &mut Session<JsonFileStore>, spec: &SpecArgs) {
    if let Some(width) = spec.width {
        session.set_target_width(width);
    }
    if let Some(height) = spec.height {
        session.set_target_height(height);
    }
    if let Some(fit) = spec.fit {
        session.set_fit(fit.into());
    }
    if let Some(format) = spec.format {
        session.set_format(format.into());
    }
    if let Some(background) = &spec.background {
        if background.eq_ignore_ascii_case("transparent") {
            session.set_background(BackgroundMode::Transparent);
        } else {
            session.set_background(BackgroundMode::Color);
            session.set_background_color(background.clone());
        }
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut session = load_session(&args.store, &args.in_path)?;

    if let Some(name) = &args.preset
        && !session.apply_preset(name)
    {
        anyhow::bail!("no preset named '{name}'");
    }
    apply_spec_args(&mut session, &args.spec);

    let artifact = session.export()?;
    let out_path = args
        .out
        .unwrap_or_else(|| PathBuf::from(&artifact.file_name));

    if let Some(parent) = out_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    fs::write(&out_path, &artifact.bytes)
        .with_context(|| format!("write '{}'", out_path.display()))?;

    eprintln!("wrote {}", out_path.display());
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let mut session = load_session(Path::new(".reframe"), &args.in_path)?;
    apply_spec_args(&mut session, &args.spec);

    let displayed = (
        f64::from(session.spec().width),
        f64::from(session.spec().height),
    );
    let picked = session.pick_color((args.x, args.y), displayed);
    println!("{}", picked.to_hex());
    Ok(())
}

fn spec_from_args(args: &SpecArgs) -> anyhow::Result<TargetSpec> {
    let width = args
        .width
        .context("--width is required to save a preset")?;
    let height = args
        .height
        .context("--height is required to save a preset")?;

    let mut spec = TargetSpec {
        width: clamp_target_dim(width),
        height: clamp_target_dim(height),
        ..TargetSpec::default()
    };
    if let Some(fit) = args.fit {
        spec.fit = fit.into();
    }
    if let Some(format) = args.format {
        spec.format = format.into();
    }
    if let Some(background) = &args.background {
        if background.eq_ignore_ascii_case("transparent") {
            spec.background = BackgroundMode::Transparent;
        } else {
            spec.background = BackgroundMode::Color;
            spec.background_color = background.clone();
        }
    }
    Ok(spec)
}

fn cmd_preset(args: PresetArgs) -> anyhow::Result<()> {
    let mut store = file_preset_store(&args.store);
    match args.cmd {
        PresetCommand::Save { name, spec } => {
            let spec = spec_from_args(&spec)?;
            if !store.save(&name, &spec) {
                anyhow::bail!("preset name must be non-empty");
            }
            eprintln!("saved preset '{}'", name.trim());
        }
        PresetCommand::Apply { name } => {
            let spec = store
                .apply(&name)
                .ok_or_else(|| anyhow::anyhow!("no preset named '{name}'"))?;
            println!("{}", serde_json::to_string_pretty(&spec)?);
        }
        PresetCommand::Delete { name } => {
            if !store.delete(&name) {
                anyhow::bail!("no preset named '{name}'");
            }
            eprintln!("deleted preset '{}'", name.trim());
        }
        PresetCommand::List => {
            for preset in store.presets().iter() {
                println!(
                    "{}\t{}x{}\t{}",
                    preset.name,
                    preset.width,
                    preset.height,
                    preset.apply().format.extension()
                );
            }
        }
    }
    Ok(())
}
