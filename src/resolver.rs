use crate::defaults::*;
use crate::error::{GenerateError, Result};
use crate::metadata::{AppMetadata, Platform};
use crate::names::{sanitize_alpha_num, sanitize_alpha_num_lower_case};
use crate::resolved_config::*;

pub fn resolve(metadata: &AppMetadata) -> Result<ResolvedConfig> {
    let platform = metadata.platform.clone();
    let defaults = platform_defaults(&platform);

    // 1. Names
    let application_name = resolve_application_name(metadata)?;
    let chart_name = sanitize_alpha_num_lower_case(&application_name);

    // 2. Ports, each kind on its own
    let http = metadata
        .port
        .or(defaults.http_port)
        .ok_or_else(|| GenerateError::UnsupportedPlatform(platform.name().to_string()))?;
    let https = metadata.https_port.or(defaults.https_port);

    // 3. Health endpoints
    let health_path = metadata
        .health_endpoint
        .as_deref()
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_HEALTH_ENDPOINT);
    let health_endpoint = format!("/{}", health_path);
    let readiness_endpoint = if platform == Platform::Java && metadata.use_context_root {
        format!("/{}{}", application_name, health_endpoint)
    } else {
        health_endpoint.clone()
    };

    // 4. Registry and namespace
    let repository_url = resolve_repository_url(metadata);
    let kube_cluster_namespace = metadata
        .server
        .as_ref()
        .and_then(|s| s.kube_cluster_namespace.clone())
        .unwrap_or_else(|| DEFAULT_CLUSTER_NAMESPACE.to_string());

    log::debug!(
        "Resolved {} ({}): http={} https={:?} registry={}",
        chart_name, platform, http, https, repository_url
    );

    Ok(ResolvedConfig {
        application_name,
        chart_name,
        chart_version: metadata.chart_version.to_string(),
        platform,
        service_ports: ServicePorts { http, https },
        health_endpoint,
        readiness_endpoint,
        repository_url,
        kube_cluster_namespace,
        helm: defaults.helm,
    })
}

fn resolve_application_name(metadata: &AppMetadata) -> Result<String> {
    let raw = match &metadata.app_name {
        Some(app_name) if metadata.platform.is_java_family() => app_name,
        _ => &metadata.name,
    };

    let sanitized = sanitize_alpha_num(raw);
    if sanitized.is_empty() {
        return Err(GenerateError::InvalidName(raw.clone()));
    }
    Ok(sanitized)
}

fn resolve_repository_url(metadata: &AppMetadata) -> String {
    if let Some(server) = &metadata.server {
        let domain = server.domain.as_deref().unwrap_or(FALLBACK_DOMAIN);
        let namespace = server
            .image_registry_namespace
            .as_deref()
            .unwrap_or(FALLBACK_REGISTRY_NAMESPACE);
        format!("registry.{}/{}/", domain, namespace)
    } else if let Some(registry) = &metadata.docker_registry {
        format!("{}/", registry.trim_end_matches('/'))
    } else {
        FALLBACK_REPOSITORY_URL.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ActiveTargets, DeploymentContext};

    fn metadata(name: &str, platform: &str) -> AppMetadata {
        AppMetadata {
            name: name.to_string(),
            platform: Platform::from_raw(platform),
            port: None,
            https_port: None,
            health_endpoint: None,
            use_context_root: false,
            app_name: None,
            chart_version: semver::Version::new(1, 0, 0),
            server: None,
            docker_registry: None,
            services: vec![],
            active_targets: ActiveTargets::All,
        }
    }

    #[test]
    fn test_node_defaults() {
        let config = resolve(&metadata("MyApp", "node")).unwrap();
        assert_eq!(config.application_name, "MyApp");
        assert_eq!(config.chart_name, "myapp");
        assert_eq!(config.service_ports, ServicePorts { http: 3000, https: None });
        assert_eq!(config.repository_url, FALLBACK_REPOSITORY_URL);
        assert_eq!(config.kube_cluster_namespace, "default");
        assert_eq!(config.health_endpoint, "/health");
        assert_eq!(config.readiness_endpoint, "/health");
        assert_eq!(config.chart_version, "1.0.0");
        assert!(config.helm.prometheus && config.helm.strategy && config.helm.liveness);
        assert!(!config.helm.istio && !config.helm.readiness);
    }

    #[test]
    fn test_http_port_defaults_and_override() {
        let expected = [
            ("java", 9080),
            ("spring", 8080),
            ("node", 3000),
            ("python", 3000),
            ("swift", 8080),
            ("django", 3000),
        ];
        for (platform, port) in expected {
            let mut md = metadata("app", platform);
            assert_eq!(resolve(&md).unwrap().service_ports.http, port, "{}", platform);

            md.port = Some(4567);
            assert_eq!(resolve(&md).unwrap().service_ports.http, 4567, "{}", platform);
        }
    }

    #[test]
    fn test_https_port_independent_of_http() {
        let mut md = metadata("app", "java");
        assert_eq!(resolve(&md).unwrap().service_ports, ServicePorts { http: 9080, https: Some(9443) });

        md.https_port = Some(8443);
        let ports = resolve(&md).unwrap().service_ports;
        assert_eq!(ports, ServicePorts { http: 9080, https: Some(8443) });

        let mut md = metadata("app", "node");
        md.https_port = Some(3443);
        assert_eq!(resolve(&md).unwrap().service_ports, ServicePorts { http: 3000, https: Some(3443) });
    }

    #[test]
    fn test_unknown_platform() {
        let md = metadata("app", "cobol");
        match resolve(&md) {
            Err(GenerateError::UnsupportedPlatform(name)) => assert_eq!(name, "cobol"),
            other => panic!("unexpected result {:?}", other),
        }

        let mut md = metadata("app", "cobol");
        md.port = Some(8000);
        let config = resolve(&md).unwrap();
        assert_eq!(config.service_ports, ServicePorts { http: 8000, https: None });
        assert!(config.helm.prometheus && !config.helm.istio);
    }

    #[test]
    fn test_java_context_root() {
        let mut md = metadata("Svc", "java");
        md.use_context_root = true;
        let config = resolve(&md).unwrap();
        assert_eq!(config.readiness_endpoint, "/Svc/health");
        assert!(config.helm.istio);
        assert!(config.helm.readiness);
        assert!(!config.helm.prometheus);
        assert!(!config.helm.strategy);
        assert!(!config.helm.liveness);

        // spring ignores the context root
        let mut md = metadata("Svc", "spring");
        md.use_context_root = true;
        assert_eq!(resolve(&md).unwrap().readiness_endpoint, "/health");
    }

    #[test]
    fn test_custom_health_endpoint() {
        let mut md = metadata("Svc", "java");
        md.health_endpoint = Some("/status/".to_string());
        md.use_context_root = true;
        let config = resolve(&md).unwrap();
        assert_eq!(config.health_endpoint, "/status");
        assert_eq!(config.readiness_endpoint, "/Svc/status");
    }

    #[test]
    fn test_names() {
        let config = resolve(&metadata("My Cool-App 2", "swift")).unwrap();
        assert_eq!(config.application_name, "MyCoolApp2");
        assert_eq!(config.chart_name, "mycoolapp2");

        let mut md = metadata("My App", "java");
        md.app_name = Some("Catalog".to_string());
        assert_eq!(resolve(&md).unwrap().application_name, "Catalog");

        let mut md = metadata("My App", "node");
        md.app_name = Some("Catalog".to_string());
        assert_eq!(resolve(&md).unwrap().application_name, "MyApp");

        assert!(matches!(resolve(&metadata("???", "node")), Err(GenerateError::InvalidName(_))));
    }

    #[test]
    fn test_registry_precedence() {
        let mut md = metadata("app", "node");
        md.docker_registry = Some("my.registry.io/ns".to_string());
        md.server = Some(DeploymentContext {
            domain: Some("eu-gb.bluemix.net".to_string()),
            image_registry_namespace: Some("team".to_string()),
            kube_cluster_namespace: Some("prod".to_string()),
        });
        let config = resolve(&md).unwrap();
        assert_eq!(config.repository_url, "registry.eu-gb.bluemix.net/team/");
        assert_eq!(config.kube_cluster_namespace, "prod");

        md.server = None;
        let config = resolve(&md).unwrap();
        assert_eq!(config.repository_url, "my.registry.io/ns/");
        assert_eq!(config.kube_cluster_namespace, "default");

        md.docker_registry = None;
        assert_eq!(resolve(&md).unwrap().repository_url, "registry.ng.bluemix.net/replace-me-namespace/");
    }

    #[test]
    fn test_server_fallbacks() {
        let mut md = metadata("app", "node");
        md.server = Some(DeploymentContext::default());
        let config = resolve(&md).unwrap();
        assert_eq!(config.repository_url, "registry.ng.bluemix.net/replace-me-namespace/");
        assert_eq!(config.kube_cluster_namespace, "default");
    }
}
