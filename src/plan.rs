use crate::defaults::{is_supported_service, platform_defaults, KUBE_TARGET};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{GenerateError, Result};
use crate::metadata::ActiveTargets;
use crate::names::create_unique_name;
use crate::resolved_config::ResolvedConfig;
use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};

const CHART_ROOT: &str = "chart";
const SERVICE_TEMPLATE_DIR: &str = "services";
const SERVICE_SUFFIX: &str = ".deploy.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Chart,
    Deployment,
    Service,
    Hpa,
    Istio,
    BaseDeployment,
    Values,
    Bindings,
    Pipeline,
    BackingService,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Slot::Chart => "chart",
            Slot::Deployment => "deployment",
            Slot::Service => "service",
            Slot::Hpa => "hpa",
            Slot::Istio => "istio",
            Slot::BaseDeployment => "basedeployment",
            Slot::Values => "values",
            Slot::Bindings => "bindings",
            Slot::Pipeline => "jenkinsfile",
            Slot::BackingService => "backing-service",
        };
        f.write_str(name)
    }
}

/// Where an entry lands: relative to the output root, or inside the chart
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Root(PathBuf),
    Chart(PathBuf),
}

impl Destination {
    fn resolve(&self, chart_dir: &Path) -> Result<PathBuf> {
        let path = match self {
            Destination::Root(rel) => rel.clone(),
            Destination::Chart(rel) => chart_dir.join(rel),
        };
        let escapes = path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(GenerateError::PathEscape(path));
        }
        Ok(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFragment {
    #[serde(skip)]
    pub service: String,
    pub unique_service_suffix: String,
}

impl ServiceFragment {
    pub fn new(service: &str, application_name: &str) -> ServiceFragment {
        ServiceFragment {
            service: service.to_string(),
            unique_service_suffix: format!("{}-{}", service, create_unique_name(application_name)),
        }
    }
}

/// What a rendered entry is fed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderData {
    Config,
    Service(ServiceFragment),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileManifestEntry {
    pub slot: Slot,
    // logical template path
    pub source: String,
    // relative to the output root
    pub destination: PathBuf,
    pub render: bool,
    pub data: RenderData,
}

#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub chart_dir: PathBuf,
    // applied in order, a later entry overwrites an earlier one with the same destination
    pub entries: Vec<FileManifestEntry>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const BASELINE: [(Slot, &str, &str); 8] = [
    (Slot::Chart, "Chart.yaml", "Chart.yaml"),
    (Slot::Deployment, "deployment.yaml", "templates/deployment.yaml"),
    (Slot::Service, "service.yaml", "templates/service.yaml"),
    (Slot::Hpa, "hpa.yaml", "templates/hpa.yaml"),
    (Slot::Istio, "istio.yaml", "templates/istio.yaml"),
    (Slot::BaseDeployment, "basedeployment.yaml", "templates/basedeployment.yaml"),
    (Slot::Values, "values.yaml", "values.yaml"),
    (Slot::Bindings, "bindings.yaml", "bindings.yaml"),
];

pub fn plan(
    config: &ResolvedConfig,
    services: &[String],
    targets: &ActiveTargets,
    diagnostics: &mut dyn DiagnosticSink,
) -> Result<Plan> {
    let chart_dir = Path::new(CHART_ROOT).join(&config.chart_name);

    if !targets.includes(KUBE_TARGET) {
        log::info!("Target {} is not active, skipping chart generation", KUBE_TARGET);
        return Ok(Plan { chart_dir, entries: vec![] });
    }

    let defaults = platform_defaults(&config.platform);
    let mut entries = Vec::new();

    // 1. Baseline chart files
    for (slot, source, target) in BASELINE {
        let source = if slot == Slot::Values { defaults.values_template } else { source };
        entries.push(FileManifestEntry {
            slot,
            source: source.to_string(),
            destination: Destination::Chart(PathBuf::from(target)).resolve(&chart_dir)?,
            render: true,
            data: RenderData::Config,
        });
    }

    // 2. Pipeline definition
    if let Some(source) = defaults.pipeline_template {
        entries.push(FileManifestEntry {
            slot: Slot::Pipeline,
            source: source.to_string(),
            destination: Destination::Root(PathBuf::from("Jenkinsfile")).resolve(&chart_dir)?,
            render: true,
            data: RenderData::Config,
        });
    }

    // 3. Backing services, in request order
    for service in services {
        if !is_supported_service(service) {
            diagnostics.report(Diagnostic::UnsupportedService(service.clone()));
            continue;
        }

        let file_name = format!("{}{}", service, SERVICE_SUFFIX);
        let target = Path::new("templates").join(&file_name);
        entries.push(FileManifestEntry {
            slot: Slot::BackingService,
            source: format!("{}/{}", SERVICE_TEMPLATE_DIR, file_name),
            destination: Destination::Chart(target).resolve(&chart_dir)?,
            render: true,
            data: RenderData::Service(ServiceFragment::new(service, &config.application_name)),
        });
    }

    log::debug!("Planned {} files under {:?}", entries.len(), chart_dir);
    Ok(Plan { chart_dir, entries })
}
