use crate::error::{GenerateError, Result};
use crate::plan::Plan;
use crate::resolved_config::ResolvedConfig;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Archives the generated chart directory as `<chart>-<version>.tgz` in the
/// output root, with the chart name as the top level folder.
pub fn package_chart(output_root: &Path, plan: &Plan, config: &ResolvedConfig) -> Result<PathBuf> {
    let archive_path = output_root.join(format!("{}-{}.tgz", config.chart_name, config.chart_version));
    let chart_dir = output_root.join(&plan.chart_dir);

    let package_failure = |source| GenerateError::Package {
        path: archive_path.clone(),
        source,
    };

    let file = File::create(&archive_path).map_err(package_failure)?;
    let enc = GzEncoder::new(file, Compression::default());
    let mut tar = tar::Builder::new(enc);

    tar.append_dir_all(&config.chart_name, &chart_dir).map_err(package_failure)?;
    let enc = tar.into_inner().map_err(package_failure)?;
    enc.finish().map_err(package_failure)?;

    log::info!("Packaged {:?} into {:?}", chart_dir, archive_path);
    Ok(archive_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ActiveTargets, AppMetadata, Platform};
    use crate::plan::plan;
    use crate::renderer::{execute, DiskOutput};
    use crate::resolver::resolve;
    use crate::templates::{EmbeddedTemplates, HandlebarsEngine};
    use flate2::read::GzDecoder;
    use tar::Archive;

    #[test]
    fn test_package_chart() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let md = AppMetadata {
            name: "Orders".to_string(),
            platform: Platform::Spring,
            port: None,
            https_port: None,
            health_endpoint: None,
            use_context_root: false,
            app_name: None,
            chart_version: semver::Version::new(0, 2, 0),
            server: None,
            docker_registry: None,
            services: vec!["redis".to_string()],
            active_targets: ActiveTargets::All,
        };
        let config = resolve(&md)?;
        let plan = plan(&config, &md.services, &md.active_targets, &mut Vec::new())?;
        execute(&plan, &config, &EmbeddedTemplates, &HandlebarsEngine::new(), &mut DiskOutput::new(dir.path()))?;

        let archive_path = package_chart(dir.path(), &plan, &config)?;
        assert_eq!(archive_path, dir.path().join("orders-0.2.0.tgz"));

        let mut archive = Archive::new(GzDecoder::new(File::open(&archive_path)?));
        let mut names = Vec::new();
        for entry in archive.entries()? {
            let entry = entry?;
            names.push(entry.path()?.to_string_lossy().to_string());
        }
        assert!(names.iter().any(|n| n == "orders/Chart.yaml"));
        assert!(names.iter().any(|n| n == "orders/templates/redis.deploy.yaml"));
        // the pipeline file sits outside the chart
        assert!(!names.iter().any(|n| n.ends_with("Jenkinsfile")));
        Ok(())
    }

    #[test]
    fn test_package_missing_chart() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let md = AppMetadata {
            name: "Ghost".to_string(),
            platform: Platform::Node,
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
        };
        let config = resolve(&md)?;
        let plan = plan(&config, &md.services, &md.active_targets, &mut Vec::new())?;

        let err = package_chart(dir.path(), &plan, &config).unwrap_err();
        assert!(matches!(err, GenerateError::Package { .. }));
        Ok(())
    }
}
