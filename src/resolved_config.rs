use crate::metadata::Platform;
use serde::Serialize;

// Field names are what chart templates reference, e.g. {{servicePorts.http}}
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    // alphanumeric, case preserved
    pub application_name: String,

    // alphanumeric lowercase, also names the chart directory
    pub chart_name: String,

    pub chart_version: String,

    #[serde(rename = "language")]
    pub platform: Platform,

    pub service_ports: ServicePorts,

    // rooted url paths, e.g. /health
    pub health_endpoint: String,
    pub readiness_endpoint: String,

    // always ends with '/', image name is appended by the templates
    #[serde(rename = "repositoryURL")]
    pub repository_url: String,

    pub kube_cluster_namespace: String,

    pub helm: HelmFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServicePorts {
    pub http: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub https: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HelmFlags {
    pub prometheus: bool,
    pub istio: bool,
    pub strategy: bool,
    pub liveness: bool,
    pub readiness: bool,
}
