//! Layout Composer CLI
//!
//! Usage:
//!   layout-composer [OPTIONS] --host <FILE>
//!
//! Options:
//!   -p, --preset <NAME>      Stock layout: landscape or portrait
//!   -t, --template <FILE>    Layout template (TOML format)
//!       --host <FILE>        Host maps and layers (TOML format)
//!       --theme <FILE>       Extra theme for style tokens (TOML format)
//!   -f, --format <FORMAT>    Output format: svg or json
//!       --proof              High resolution SVG without frame labels
//!       --ppi <N>            SVG pixels per page inch
//!   -h, --help               Print help

use std::path::PathBuf;
use std::process;

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use layout_composer::layout::find_similar;
use layout_composer::template::presets;
use layout_composer::{
    compose_and_present, ComposeConfig, ComposeError, InMemoryHost, JsonSurface, LayoutError,
    LayoutTemplate, RenderSurface, SvgConfig, SvgSurface, TemplateError, Theme, ThemeCatalog,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Svg,
    Json,
}

#[derive(Parser)]
#[command(name = "layout-composer")]
#[command(about = "Compose print layouts for map documents")]
struct Cli {
    /// Stock layout to compose
    #[arg(short, long, conflicts_with = "template")]
    preset: Option<String>,

    /// Layout template file (TOML format)
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Host description: maps, layers and source extents (TOML format)
    #[arg(long, required_unless_present = "list_presets")]
    host: Option<PathBuf>,

    /// Theme file added to the built-in themes (TOML format)
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Theme style tokens resolve in
    #[arg(long, default_value = "ArcGIS 2D")]
    theme_name: String,

    /// Project name for `{project.name}` bindings
    #[arg(long, default_value = "Untitled")]
    project: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Svg)]
    format: Format,

    /// SVG proof: 300 pixels per inch and no frame labels
    #[arg(long)]
    proof: bool,

    /// SVG pixels per page inch
    #[arg(long)]
    ppi: Option<f64>,

    /// Debug mode: print the composed element tree
    #[arg(short, long)]
    debug: bool,

    /// List the stock layouts and exit
    #[arg(long)]
    list_presets: bool,

    /// Log slot resolution
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.list_presets {
        for key in presets::KEYS {
            if let Some(template) = presets::by_key(key) {
                println!("{:<10} {}", key, template.name);
            }
        }
        return;
    }

    let template = match load_template(&cli) {
        Ok(loaded) => loaded,
        Err((err, source, path)) => {
            report_template_error(&err, source.as_deref(), &path);
            process::exit(1);
        }
    };

    let Some(host_path) = &cli.host else {
        eprintln!("Error: --host is required");
        process::exit(1);
    };
    let mut host = match InMemoryHost::from_file(host_path) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("Error loading host '{}': {}", host_path.display(), e);
            process::exit(1);
        }
    };
    tracing::debug!(maps = host.map_count(), path = %host_path.display(), "loaded host");

    let mut themes = ThemeCatalog::default();
    if let Some(path) = &cli.theme {
        match Theme::from_file(path) {
            Ok(theme) => themes = themes.with_theme(theme),
            Err(e) => {
                eprintln!("Error loading theme '{}': {}", path.display(), e);
                process::exit(1);
            }
        }
    }

    let mut svg = if cli.proof { SvgConfig::proof() } else { SvgConfig::new() };
    if let Some(ppi) = cli.ppi {
        svg = svg.with_pixels_per_inch(ppi);
    }

    let config = ComposeConfig::new()
        .with_svg(svg)
        .with_themes(themes)
        .with_theme(cli.theme_name.clone())
        .with_project(cli.project.clone())
        .with_debug(cli.debug);

    let result = match cli.format {
        Format::Svg => {
            let mut surface = SvgSurface::new(config.svg.clone());
            present(&template, &mut host, &config, &mut surface).map(|_| surface.into_output())
        }
        Format::Json => {
            let mut surface = JsonSurface::new();
            present(&template, &mut host, &config, &mut surface).map(|_| surface.into_output())
        }
    };

    match result {
        Ok(output) => println!("{}", output.unwrap_or_default()),
        Err(ComposeError::Layout(err)) => {
            report_layout_error(&err);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn present(
    template: &LayoutTemplate,
    host: &mut InMemoryHost,
    config: &ComposeConfig,
    surface: &mut dyn RenderSurface,
) -> Result<(), ComposeError> {
    let warnings = compose_and_present(template, host, config, surface)?;
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
    Ok(())
}

type LoadFailure = (TemplateError, Option<String>, String);

/// Load the template named on the command line
fn load_template(cli: &Cli) -> Result<LayoutTemplate, LoadFailure> {
    if let Some(path) = &cli.template {
        let display = path.display().to_string();
        let source = std::fs::read_to_string(path).map_err(|e| {
            (
                TemplateError::FileReadError {
                    path: path.clone(),
                    message: e.to_string(),
                },
                None,
                display.clone(),
            )
        })?;
        return LayoutTemplate::from_toml(&source).map_err(|e| (e, Some(source.clone()), display));
    }

    let key = cli.preset.as_deref().unwrap_or("landscape");
    presets::by_key(key).ok_or_else(|| {
        let suggestions = find_similar(presets::KEYS, key, 3);
        (
            TemplateError::NotFound {
                name: key.to_string(),
                suggestions,
            },
            None,
            "<preset>".to_string(),
        )
    })
}

fn report_template_error(err: &TemplateError, source: Option<&str>, path: &str) {
    match (err.span(), source) {
        (Some(span), Some(source)) => {
            let written = Report::build(ReportKind::Error, path, span.start)
                .with_message("invalid template")
                .with_label(
                    Label::new((path, span))
                        .with_message(err.to_string())
                        .with_color(Color::Red),
                )
                .finish()
                .eprint((path, Source::from(source)));
            if written.is_err() {
                eprintln!("Error: {}", err);
            }
        }
        _ => {
            eprintln!("Error: {}", err);
            if let Some(suggestions) = err.suggestions().filter(|s| !s.is_empty()) {
                eprintln!("  did you mean: {}?", suggestions.join(", "));
            }
        }
    }
}

fn report_layout_error(err: &LayoutError) {
    if let LayoutError::BindingSyntax {
        slot,
        content,
        errors,
    } = err
    {
        for error in errors {
            eprint!("{}", error.format(content, slot));
        }
        return;
    }
    eprintln!("Error: {}", err);
    if let Some(suggestions) = err.suggestions().filter(|s| !s.is_empty()) {
        eprintln!("  did you mean: {}?", suggestions.join(", "));
    }
    if let Some(slot) = err.slot() {
        eprintln!("  in slot '{}'", slot);
    }
}
