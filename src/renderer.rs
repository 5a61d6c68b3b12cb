use crate::error::{GenerateError, Result};
use crate::plan::{Plan, RenderData};
use crate::resolved_config::ResolvedConfig;
use crate::templates::{TemplateEngine, TemplateSource};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Destination for generated files, paths are relative to the output root.
pub trait OutputSink {
    fn write(&mut self, path: &Path, content: &[u8]) -> Result<()>;
}

pub struct DiskOutput {
    root: PathBuf,
}

impl DiskOutput {
    pub fn new(root: impl Into<PathBuf>) -> DiskOutput {
        DiskOutput { root: root.into() }
    }
}

impl OutputSink for DiskOutput {
    fn write(&mut self, path: &Path, content: &[u8]) -> Result<()> {
        let full_path = self.root.join(path);
        let write_failure = |source| GenerateError::WriteFailure {
            path: full_path.clone(),
            source,
        };

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(write_failure)?;
        }
        fs::write(&full_path, content).map_err(write_failure)
    }
}

#[derive(Debug, Default)]
pub struct MemoryOutput {
    pub files: BTreeMap<PathBuf, Vec<u8>>,
}

impl OutputSink for MemoryOutput {
    fn write(&mut self, path: &Path, content: &[u8]) -> Result<()> {
        self.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RenderReport {
    // in write order, a path shows up again when it was overwritten
    pub written: Vec<PathBuf>,
}

/// Executes a plan in order. The first failure aborts the run, files already
/// written stay in place.
pub fn execute(
    plan: &Plan,
    config: &ResolvedConfig,
    templates: &dyn TemplateSource,
    engine: &dyn TemplateEngine,
    output: &mut dyn OutputSink,
) -> Result<RenderReport> {
    let config_data = to_data(&plan.chart_dir, config)?;
    let mut report = RenderReport::default();

    for entry in &plan.entries {
        let source = templates.read(&entry.source)?;

        let content = if entry.render {
            let template = String::from_utf8(source).map_err(|e| GenerateError::TemplateRender {
                path: entry.source.clone(),
                reason: e.to_string(),
            })?;
            let rendered = match &entry.data {
                RenderData::Config => engine.render(&entry.source, &template, &config_data)?,
                RenderData::Service(fragment) => {
                    log::debug!("Rendering {} as {}", fragment.service, fragment.unique_service_suffix);
                    engine.render(&entry.source, &template, &to_data(&entry.destination, fragment)?)?
                }
            };
            rendered.into_bytes()
        } else {
            source
        };

        log::debug!("Writing {} -> {:?}", entry.source, entry.destination);
        output.write(&entry.destination, &content)?;
        report.written.push(entry.destination.clone());
    }

    Ok(report)
}

fn to_data<T: serde::Serialize>(path: &Path, value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| GenerateError::TemplateRender {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
