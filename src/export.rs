//! CSV export to disk for the master table and the detail window

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use demand_engine::{
    aggregates_file_name, series_file_name, write_aggregates_csv, write_series_csv, EngineError,
};
use demand_types::{ComputedAggregate, HierarchyLevel, SeriesPoint, VolumeType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to create {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

fn create(path: &Path) -> Result<BufWriter<File>, ExportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ExportError::Create {
            path: path.to_path_buf(),
            source,
        })
}

/// Write `demand-analysis-<volume>-level<N>.csv` into `dir`
pub fn export_aggregates(
    dir: &Path,
    aggregates: &[ComputedAggregate],
    volume_type: VolumeType,
    level: HierarchyLevel,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(aggregates_file_name(volume_type, level));
    write_aggregates_csv(create(&path)?, aggregates)?;
    tracing::info!(path = %path.display(), rows = aggregates.len(), "exported aggregates");
    Ok(path)
}

/// Write `timeseries-<elementId>.csv` into `dir`
pub fn export_series(
    dir: &Path,
    element_id: &str,
    points: &[SeriesPoint],
    volume_type: VolumeType,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(series_file_name(element_id));
    write_series_csv(create(&path)?, points, volume_type)?;
    tracing::info!(path = %path.display(), rows = points.len(), "exported time series");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use demand_types::{AbcClass, XyzClass};
    use pretty_assertions::assert_eq;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("demand-lens-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_export_aggregates_file() {
        let dir = scratch_dir("aggregates");
        let aggregates = vec![ComputedAggregate {
            element_id: "Footwear".into(),
            hierarchy_path: "Footwear".into(),
            volume_total: 10.0,
            variance_percent: 5.0,
            abc_class: AbcClass::A,
            xyz_class: XyzClass::X,
            aggregates: BTreeMap::new(),
        }];

        let path =
            export_aggregates(&dir, &aggregates, VolumeType::Monetary, HierarchyLevel::L1).unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("demand-analysis-monetary-level1.csv")
        );
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().nth(1), Some("Footwear,10,5.00,A,X"));
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_directory_is_create_error() {
        let dir = scratch_dir("missing").join("does-not-exist");
        let err = export_series(&dir, "A-B", &[], VolumeType::Quantity).unwrap_err();
        assert!(matches!(err, ExportError::Create { .. }));
    }
}
