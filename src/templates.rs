use crate::error::{GenerateError, Result};
use handlebars::Handlebars;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Read access to templates by logical path, e.g. `java/values.yaml`.
pub trait TemplateSource {
    fn read(&self, path: &str) -> Result<Vec<u8>>;
}

/// Substitutes a data object into template text.
pub trait TemplateEngine {
    fn render(&self, path: &str, template: &str, data: &serde_json::Value) -> Result<String>;
}

macro_rules! embedded {
    ($($path:literal),* $(,)?) => {
        &[$(($path, include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/", $path)))),*]
    };
}

const EMBEDDED: &[(&str, &str)] = embedded![
    "Chart.yaml",
    "deployment.yaml",
    "service.yaml",
    "hpa.yaml",
    "istio.yaml",
    "basedeployment.yaml",
    "values.yaml",
    "bindings.yaml",
    "java/values.yaml",
    "java/Jenkinsfile",
    "node/Jenkinsfile",
    "swift/Jenkinsfile",
    "services/mongodb.deploy.yaml",
    "services/postgresql.deploy.yaml",
    "services/redis.deploy.yaml",
];

/// Templates compiled into the binary.
pub struct EmbeddedTemplates;

impl TemplateSource for EmbeddedTemplates {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        EMBEDDED
            .iter()
            .find(|(name, _)| *name == path)
            .map(|(_, content)| content.as_bytes().to_vec())
            .ok_or_else(|| GenerateError::TemplateNotFound(path.to_string()))
    }
}

/// Templates read from a directory, for custom template sets.
pub struct DirTemplates {
    root: PathBuf,
}

impl DirTemplates {
    pub fn new(root: impl Into<PathBuf>) -> DirTemplates {
        DirTemplates { root: root.into() }
    }
}

impl TemplateSource for DirTemplates {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.root.join(path);
        match fs::read(&full_path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(GenerateError::TemplateNotFound(full_path.display().to_string()))
            }
            Err(e) => Err(GenerateError::TemplateRender {
                path: full_path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

pub struct HandlebarsEngine {
    registry: Handlebars<'static>,
}

impl HandlebarsEngine {
    pub fn new() -> HandlebarsEngine {
        let mut registry = Handlebars::new();
        // output is yaml and groovy, not html
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(false);
        HandlebarsEngine { registry }
    }
}

impl Default for HandlebarsEngine {
    fn default() -> Self {
        HandlebarsEngine::new()
    }
}

impl TemplateEngine for HandlebarsEngine {
    fn render(&self, path: &str, template: &str, data: &serde_json::Value) -> Result<String> {
        self.registry
            .render_template(template, data)
            .map_err(|e| GenerateError::TemplateRender {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }
}
