use crate::metadata::Platform;
use crate::resolved_config::HelmFlags;

// Deployment target this generator answers to when targets are restricted
pub const KUBE_TARGET: &str = "kube";

pub const DEFAULT_HEALTH_ENDPOINT: &str = "health";
pub const DEFAULT_CLUSTER_NAMESPACE: &str = "default";
pub const DEFAULT_CHART_VERSION: &str = "1.0.0";

pub const FALLBACK_DOMAIN: &str = "ng.bluemix.net";
pub const FALLBACK_REGISTRY_NAMESPACE: &str = "replace-me-namespace";
pub const FALLBACK_REPOSITORY_URL: &str = "registry.ng.bluemix.net/replace-me-namespace/";

pub const SUPPORTED_SERVICES: [&str; 3] = ["mongodb", "postgresql", "redis"];

pub const BASE_VALUES_TEMPLATE: &str = "values.yaml";

/// Everything that varies by platform. `platform_defaults` is the only place
/// these values are decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformDefaults {
    pub http_port: Option<u16>,
    pub https_port: Option<u16>,
    pub helm: HelmFlags,
    pub values_template: &'static str,
    pub pipeline_template: Option<&'static str>,
}

const JAVA_HELM_FLAGS: HelmFlags = HelmFlags {
    prometheus: false,
    istio: true,
    strategy: false,
    liveness: false,
    readiness: true,
};

const DEFAULT_HELM_FLAGS: HelmFlags = HelmFlags {
    prometheus: true,
    istio: false,
    strategy: true,
    liveness: true,
    readiness: false,
};

const JAVA: PlatformDefaults = PlatformDefaults {
    http_port: Some(9080),
    https_port: Some(9443),
    helm: JAVA_HELM_FLAGS,
    values_template: "java/values.yaml",
    pipeline_template: Some("java/Jenkinsfile"),
};

const SPRING: PlatformDefaults = PlatformDefaults {
    http_port: Some(8080),
    https_port: None,
    ..JAVA
};

const NODE: PlatformDefaults = PlatformDefaults {
    http_port: Some(3000),
    https_port: None,
    helm: DEFAULT_HELM_FLAGS,
    values_template: BASE_VALUES_TEMPLATE,
    pipeline_template: Some("node/Jenkinsfile"),
};

const PYTHON: PlatformDefaults = PlatformDefaults {
    pipeline_template: None,
    ..NODE
};

const SWIFT: PlatformDefaults = PlatformDefaults {
    http_port: Some(8080),
    pipeline_template: Some("swift/Jenkinsfile"),
    ..NODE
};

const DJANGO: PlatformDefaults = PYTHON;

const UNKNOWN: PlatformDefaults = PlatformDefaults {
    http_port: None,
    https_port: None,
    helm: DEFAULT_HELM_FLAGS,
    values_template: BASE_VALUES_TEMPLATE,
    pipeline_template: None,
};

pub fn platform_defaults(platform: &Platform) -> PlatformDefaults {
    match platform {
        Platform::Java => JAVA,
        Platform::Spring => SPRING,
        Platform::Node => NODE,
        Platform::Python => PYTHON,
        Platform::Swift => SWIFT,
        Platform::Django => DJANGO,
        Platform::Other(_) => UNKNOWN,
    }
}

pub fn is_supported_service(service: &str) -> bool {
    SUPPORTED_SERVICES.iter().any(|s| *s == service)
}
