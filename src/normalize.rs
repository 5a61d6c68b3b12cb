use crate::defaults::DEFAULT_CHART_VERSION;
use crate::error::{GenerateError, Result};
use crate::metadata::*;
use crate::metadata_json::*;
use std::fs;
use std::path::Path;

/// Metadata as handed over by the caller: already structured, or serialized.
#[derive(Debug, Clone)]
pub enum MetadataSource {
    Structured(RawMetadata),
    Serialized(String),
}

pub fn normalize(source: MetadataSource, options: RawOptions) -> Result<AppMetadata> {
    let raw = match source {
        MetadataSource::Structured(raw) => raw,
        MetadataSource::Serialized(text) => parse_metadata_text(&text)?,
    };
    convert_metadata(raw, options)
}

pub fn parse_metadata_text(text: &str) -> Result<RawMetadata> {
    if text.trim().is_empty() {
        return Ok(RawMetadata::default());
    }
    serde_json::from_str(text).map_err(|e| GenerateError::malformed("metadata", e))
}

pub fn parse_services_text(text: &str) -> Result<Vec<String>> {
    if text.trim().is_empty() {
        return Ok(vec![]);
    }
    serde_json::from_str(text).map_err(|e| GenerateError::malformed("services", e))
}

/// Loads a project file holding metadata and options together. JSON unless
/// the extension says yaml.
pub fn load_project_file(path: &Path) -> Result<RawProject> {
    let field = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| GenerateError::malformed(field.clone(), e))?;

    let is_yaml = path
        .extension()
        .map(|ext| ext == "yaml" || ext == "yml")
        .unwrap_or(false);

    if content.trim().is_empty() {
        Ok(RawProject::default())
    } else if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| GenerateError::malformed(field, e))
    } else {
        serde_json::from_str(&content).map_err(|e| GenerateError::malformed(field, e))
    }
}

fn convert_metadata(raw: RawMetadata, options: RawOptions) -> Result<AppMetadata> {
    let platform = Platform::from_raw(raw.backend_platform.as_deref().unwrap_or_default());

    let port = convert_port("port", options.port)?;
    let https_port = convert_port("httpsPort", options.https_port)?;

    let chart_version = match non_blank(options.chart_version) {
        Some(version) => semver::Version::parse(&version)
            .map_err(|e| GenerateError::malformed("chartVersion", e))?,
        None => semver::Version::parse(DEFAULT_CHART_VERSION)
            .map_err(|e| GenerateError::malformed("chartVersion", e))?,
    };

    let services = match options.services {
        Some(RawServices::List(list)) => list,
        Some(RawServices::Serialized(text)) => parse_services_text(&text)?,
        None => vec![],
    };
    let services = services
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let active_targets = match options.platforms {
        Some(RawPlatforms::List(list)) => ActiveTargets::Only(convert_targets(list)),
        Some(RawPlatforms::Csv(csv)) => {
            ActiveTargets::Only(convert_targets(csv.split(',').map(|s| s.to_string()).collect()))
        }
        None => ActiveTargets::All,
    };

    let server = raw.server.map(|server| {
        let cloud = server.cloud_deployment_options.unwrap_or_default();
        DeploymentContext {
            domain: non_blank(server.domain),
            image_registry_namespace: non_blank(cloud.image_registry_namespace),
            kube_cluster_namespace: non_blank(cloud.kube_cluster_namespace),
        }
    });

    Ok(AppMetadata {
        name: raw.name.unwrap_or_default(),
        platform,
        port,
        https_port,
        health_endpoint: non_blank(options.health_endpoint),
        use_context_root: options.use_context_root.unwrap_or(false),
        app_name: non_blank(options.app_name),
        chart_version,
        server,
        docker_registry: non_blank(raw.docker_registry),
        services,
        active_targets,
    })
}

fn convert_port(field: &str, raw: Option<RawPort>) -> Result<Option<u16>> {
    let value = match raw {
        None => return Ok(None),
        Some(RawPort::Number(n)) => n,
        Some(RawPort::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<u64>()
                .map_err(|_| GenerateError::malformed(field, format!("{:?} is not a port number", text)))?
        }
    };

    match u16::try_from(value) {
        Ok(port) if port > 0 => Ok(Some(port)),
        _ => Err(GenerateError::malformed(field, format!("{} is outside 1-65535", value))),
    }
}

fn convert_targets(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
