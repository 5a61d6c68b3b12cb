use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Java,
    Spring,
    Node,
    Python,
    Swift,
    Django,
    // Anything else lands in the generic bucket, keeping the name for diagnostics
    Other(String),
}

impl Platform {
    pub fn from_raw(raw: &str) -> Platform {
        let language = raw.trim().to_lowercase();
        match language.as_str() {
            "java" => Platform::Java,
            "spring" => Platform::Spring,
            "node" => Platform::Node,
            "python" => Platform::Python,
            "swift" => Platform::Swift,
            "django" => Platform::Django,
            _ => Platform::Other(language),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Platform::Java => "java",
            Platform::Spring => "spring",
            Platform::Node => "node",
            Platform::Python => "python",
            Platform::Swift => "swift",
            Platform::Django => "django",
            Platform::Other(name) => name,
        }
    }

    /// java and spring share chart defaults (probes, mesh, values file).
    pub fn is_java_family(&self) -> bool {
        matches!(self, Platform::Java | Platform::Spring)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Platform {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentContext {
    pub domain: Option<String>,
    pub image_registry_namespace: Option<String>,
    pub kube_cluster_namespace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveTargets {
    All,
    Only(Vec<String>),
}

impl ActiveTargets {
    pub fn includes(&self, target: &str) -> bool {
        match self {
            ActiveTargets::All => true,
            ActiveTargets::Only(targets) => targets.iter().any(|t| t == target),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppMetadata {
    pub name: String,
    pub platform: Platform,
    pub port: Option<u16>,
    pub https_port: Option<u16>,
    pub health_endpoint: Option<String>,
    pub use_context_root: bool,
    // explicit application name, honoured for the java bucket only
    pub app_name: Option<String>,
    pub chart_version: semver::Version,
    pub server: Option<DeploymentContext>,
    pub docker_registry: Option<String>,
    pub services: Vec<String>,
    pub active_targets: ActiveTargets,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_is_case_folded() {
        assert_eq!(Platform::from_raw("NODE"), Platform::Node);
        assert_eq!(Platform::from_raw(" Spring "), Platform::Spring);
        assert_eq!(Platform::from_raw("Go"), Platform::Other("go".to_string()));
        assert_eq!(Platform::from_raw("GO").name(), "go");
    }

    #[test]
    fn test_java_family() {
        assert!(Platform::Java.is_java_family());
        assert!(Platform::Spring.is_java_family());
        for platform in [Platform::Node, Platform::Python, Platform::Swift, Platform::Django, Platform::Other("go".into())] {
            assert!(!platform.is_java_family(), "{} is not in the java bucket", platform);
        }
    }

    #[test]
    fn test_active_targets() {
        assert!(ActiveTargets::All.includes("kube"));
        let only = ActiveTargets::Only(vec!["kube".to_string(), "docker".to_string()]);
        assert!(only.includes("kube"));
        assert!(!ActiveTargets::Only(vec!["docker".to_string()]).includes("kube"));
        assert!(!ActiveTargets::Only(vec![]).includes("kube"));
    }
}
