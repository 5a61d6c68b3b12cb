use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

mod defaults;
mod diagnostics;
mod error;
mod metadata;
mod metadata_json;
mod names;
mod normalize;
mod package;
mod plan;
mod renderer;
mod resolved_config;
mod resolver;
mod templates;

use metadata_json::{RawOptions, RawPlatforms, RawPort, RawProject, RawServices};
use normalize::MetadataSource;

#[derive(Parser)]
#[command(name = "chartgen")]
#[command(about = "Scaffolds a Helm chart and pipeline file for an application", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the chart into the output directory
    Generate {
        #[command(flatten)]
        input: InputArgs,
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
        /// Directory with a custom template set, the built-in set is used otherwise
        #[arg(long)]
        templates: Option<PathBuf>,
        /// Also archive the chart as <chart>-<version>.tgz
        #[arg(long)]
        package: bool,
        /// Render in memory and list the result without touching the disk
        #[arg(long, conflicts_with = "package")]
        dry_run: bool,
    },
    /// List the files that would be generated
    Plan {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print the resolved chart configuration
    Resolve {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Project metadata as JSON text
    #[arg(short, long)]
    metadata: Option<String>,
    /// Project file (json or yaml) with metadata and options
    #[arg(short = 'f', long)]
    metadata_file: Option<PathBuf>,
    /// Requested backing services as a JSON list
    #[arg(long)]
    services: Option<String>,
    /// Requested backing service, repeatable
    #[arg(short, long = "service")]
    service: Vec<String>,
    #[arg(long)]
    port: Option<String>,
    #[arg(long)]
    https_port: Option<String>,
    #[arg(long)]
    health_endpoint: Option<String>,
    #[arg(long)]
    use_context_root: bool,
    #[arg(long)]
    app_name: Option<String>,
    /// Comma separated deployment targets, generation is skipped unless kube is listed
    #[arg(long)]
    platforms: Option<String>,
    #[arg(long)]
    chart_version: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { input, output, templates, package, dry_run } => {
            generate_command(input, &output, templates.as_deref(), package, dry_run)?;
        }
        Commands::Plan { input } => {
            plan_command(input)?;
        }
        Commands::Resolve { input } => {
            resolve_command(input)?;
        }
    }
    Ok(())
}

fn load_metadata(input: InputArgs) -> Result<metadata::AppMetadata> {
    let project = match &input.metadata_file {
        Some(path) => normalize::load_project_file(path).context("Failed to load project file")?,
        None => RawProject::default(),
    };

    // command line flags win over the project file
    let source = match input.metadata {
        Some(text) => MetadataSource::Serialized(text),
        None => MetadataSource::Structured(project.metadata),
    };

    let file_options = project.options;
    let services = if !input.service.is_empty() {
        Some(RawServices::List(input.service))
    } else {
        input.services.map(RawServices::Serialized).or(file_options.services)
    };

    let options = RawOptions {
        port: input.port.map(RawPort::Text).or(file_options.port),
        https_port: input.https_port.map(RawPort::Text).or(file_options.https_port),
        health_endpoint: input.health_endpoint.or(file_options.health_endpoint),
        use_context_root: if input.use_context_root { Some(true) } else { file_options.use_context_root },
        app_name: input.app_name.or(file_options.app_name),
        chart_version: input.chart_version.or(file_options.chart_version),
        services,
        platforms: input.platforms.map(RawPlatforms::Csv).or(file_options.platforms),
    };

    normalize::normalize(source, options).context("Invalid metadata")
}

fn prepare(input: InputArgs) -> Result<(resolved_config::ResolvedConfig, plan::Plan)> {
    // 1. Normalize
    let metadata = load_metadata(input)?;

    // 2. Resolve
    let config = resolver::resolve(&metadata).context("Resolution failed")?;

    // 3. Plan
    let mut sink = diagnostics::ConsoleSink;
    let plan = plan::plan(&config, &metadata.services, &metadata.active_targets, &mut sink)
        .context("Planning failed")?;

    Ok((config, plan))
}

fn generate_command(
    input: InputArgs,
    output_dir: &Path,
    template_dir: Option<&Path>,
    create_package: bool,
    dry_run: bool,
) -> Result<()> {
    let (config, plan) = prepare(input)?;

    if plan.is_empty() {
        println!("Kubernetes is not an active target, no chart generated");
        return Ok(());
    }

    // 4. Render
    let engine = templates::HandlebarsEngine::new();
    let source: Box<dyn templates::TemplateSource> = match template_dir {
        Some(dir) => Box::new(templates::DirTemplates::new(dir)),
        None => Box::new(templates::EmbeddedTemplates),
    };

    if dry_run {
        let mut memory = renderer::MemoryOutput::default();
        renderer::execute(&plan, &config, source.as_ref(), &engine, &mut memory).context("Generation failed")?;
        for (path, content) in &memory.files {
            println!("{:>8} {}", content.len(), path.display());
        }
        return Ok(());
    }

    let mut disk = renderer::DiskOutput::new(output_dir);
    let report = renderer::execute(&plan, &config, source.as_ref(), &engine, &mut disk).context("Generation failed")?;

    println!(
        "Generated {} files for chart {} in {:?}",
        report.written.len(),
        config.chart_name,
        output_dir.join(&plan.chart_dir)
    );

    if create_package {
        let archive = package::package_chart(output_dir, &plan, &config).context("Packaging failed")?;
        println!("Created chart archive: {:?}", archive);
    }

    Ok(())
}

fn plan_command(input: InputArgs) -> Result<()> {
    let (_, plan) = prepare(input)?;

    if plan.is_empty() {
        println!("Kubernetes is not an active target, nothing to generate");
        return Ok(());
    }

    for entry in &plan.entries {
        let mode = if entry.render { "render" } else { "copy" };
        println!("{:<16} {:<6} {:<32} -> {}", entry.slot.to_string(), mode, entry.source, entry.destination.display());
    }
    Ok(())
}

fn resolve_command(input: InputArgs) -> Result<()> {
    let metadata = load_metadata(input)?;
    let config = resolver::resolve(&metadata).context("Resolution failed")?;
    print!("{}", serde_yaml::to_string(&config).context("Failed to serialize configuration")?);
    Ok(())
}
