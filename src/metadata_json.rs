use serde::{Deserialize, Serialize};

// Raw project metadata, key names follow the project descriptor the
// scaffolding front ends emit. Unknown keys are ignored.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMetadata {
    pub name: Option<String>,
    pub backend_platform: Option<String>,
    pub server: Option<RawServer>,
    pub docker_registry: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawServer {
    pub domain: Option<String>,
    pub cloud_deployment_options: Option<RawCloudDeploymentOptions>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCloudDeploymentOptions {
    pub image_registry_namespace: Option<String>,
    pub kube_cluster_namespace: Option<String>,
}

// Generation options that accompany the metadata
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOptions {
    pub port: Option<RawPort>,
    pub https_port: Option<RawPort>,
    pub health_endpoint: Option<String>,
    pub use_context_root: Option<bool>,
    pub app_name: Option<String>,
    pub chart_version: Option<String>,
    pub services: Option<RawServices>,
    pub platforms: Option<RawPlatforms>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPort {
    Number(u64),
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawServices {
    List(Vec<String>),
    // JSON text of a list, as passed through string-only option channels
    Serialized(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPlatforms {
    List(Vec<String>),
    // comma separated
    Csv(String),
}

// Project file: metadata and options side by side in one document
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RawProject {
    #[serde(flatten)]
    pub metadata: RawMetadata,
    #[serde(flatten)]
    pub options: RawOptions,
}
