use anyhow::{Context, Result, bail};
use balance_chart::payload::fragment_from_url;
use balance_chart::{
    ChartOptions, ChartPayload, ChartSpec, PngFileHost, Rgba, SvgFileHost, encode_fragment, mount,
};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "balance-chart",
    version,
    about = "Render bot balance charts from URL-fragment payloads"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a chart to an SVG or PNG file.
    Render(RenderArgs),
    /// Turn a JSON payload into the fragment (or full URL) the bot would post.
    Encode(EncodeArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Input {
    /// Percent-encoded fragment, or a full chart URL containing one.
    #[arg(long)]
    fragment: Option<String>,
    /// JSON payload file (`{"baseAsset": ..., "chartData": [...]}`).
    #[arg(long)]
    payload: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: Input,
    /// Output file (.svg or .png).
    #[arg(short, long)]
    out: PathBuf,
    /// Canvas width in pixels.
    #[arg(long, default_value_t = 800)]
    width: u32,
    /// Canvas height in pixels.
    #[arg(long, default_value_t = 400)]
    height: u32,
    /// Backdrop color (CSS hex or rgb()/rgba()), or `none` for a transparent canvas.
    #[arg(long, default_value = "#181820")]
    backdrop: String,
    /// Locale for value labels (en, de, fr, es, it, pt, nl).
    #[arg(long, default_value = "en")]
    locale: String,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// JSON payload file.
    #[arg(long)]
    payload: PathBuf,
    /// Prefix the fragment with this page URL (adds the `#`).
    #[arg(long)]
    url: Option<String>,
}

fn read_payload(path: &Path) -> Result<ChartPayload> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading payload {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing payload {}", path.display()))
}

fn parse_backdrop(s: &str) -> Result<Option<Rgba>> {
    if s.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let color = s
        .parse::<Rgba>()
        .with_context(|| format!("--backdrop {s:?}"))?;
    Ok(Some(color))
}

fn report(out: &Path, spec: &ChartSpec) {
    println!(
        "Saved chart to {} ({} points, label {:?})",
        out.display(),
        spec.dataset.data.len(),
        spec.dataset.label
    );
}

fn render(args: RenderArgs) -> Result<()> {
    let fragment = match (args.input.fragment, args.input.payload) {
        (Some(f), _) => fragment_from_url(&f).map(str::to_string).unwrap_or(f),
        (None, Some(path)) => encode_fragment(&read_payload(&path)?)?,
        (None, None) => bail!("either --fragment or --payload is required"),
    };
    let backdrop = parse_backdrop(&args.backdrop)?;
    let options = ChartOptions {
        locale: args.locale,
        ..ChartOptions::default()
    };
    let size = (args.width, args.height);

    let ext = args
        .out
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("svg") => {
            let mut host = SvgFileHost::new(fragment, &args.out, size)
                .with_backdrop(backdrop)
                .with_options(options);
            let chart = mount(&mut host)?;
            report(&args.out, chart.spec());
        }
        Some("png") => {
            let mut host = PngFileHost::new(fragment, &args.out, size)
                .with_backdrop(backdrop)
                .with_options(options);
            let chart = mount(&mut host)?;
            report(&args.out, chart.spec());
        }
        _ => bail!(
            "unsupported output format for {} (use .svg or .png)",
            args.out.display()
        ),
    }
    Ok(())
}

fn encode(args: EncodeArgs) -> Result<()> {
    let fragment = encode_fragment(&read_payload(&args.payload)?)?;
    match args.url {
        Some(url) => println!("{url}#{fragment}"),
        None => println!("{fragment}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => render(args),
        Command::Encode(args) => encode(args),
    }
}
