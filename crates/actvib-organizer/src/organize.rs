//! Sample discovery and grouping by wear level.

use crate::error::{Error, Result};
use crate::naming::{NamingConvention, PathFormatError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Labels of one sample file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleLabel {
    /// Sample file path.
    pub path: PathBuf,
    /// Sample name.
    pub name: String,
    /// Wear level of the beam.
    pub wear_level: u32,
    /// Actuator that excited the beam.
    pub actuator: u8,
}

impl SampleLabel {
    /// Read every label of `path` under a naming convention.
    pub fn from_path<N>(path: &Path, naming: &N) -> std::result::Result<Self, PathFormatError>
    where
        N: NamingConvention + ?Sized,
    {
        Ok(Self {
            path: path.to_path_buf(),
            name: naming.sample_name(path)?,
            wear_level: naming.wear_level(path)?,
            actuator: naming.actuator(path)?,
        })
    }
}

/// Recursively list the sample files under `root`, sorted by path.
///
/// Symbolic links to directories are skipped.
pub fn discover_samples<N>(root: &Path, naming: &N) -> Result<Vec<PathBuf>>
where
    N: NamingConvention + ?Sized,
{
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = std::fs::read_dir(&dir).map_err(|source| Error::Discovery {
            path: dir.clone(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| Error::Discovery {
                path: dir.clone(),
                source,
            })?;
            let file_type = entry.file_type().map_err(|source| Error::Discovery {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            // Directory links are not followed, so link cycles cannot recurse.
            if file_type.is_dir() {
                pending.push(path);
            } else if naming.is_sample_file(&path) {
                found.push(path);
            }
        }
    }

    found.sort();
    tracing::debug!(root = %root.display(), samples = found.len(), "discovered samples");
    Ok(found)
}

/// Sample names grouped by wear level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WearGroups {
    groups: BTreeMap<u32, Vec<String>>,
    rejected: Vec<(PathBuf, PathFormatError)>,
}

impl WearGroups {
    /// Sample names at a wear level, empty when the level is absent.
    pub fn get(&self, wear_level: u32) -> &[String] {
        self.groups.get(&wear_level).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Wear levels present, ascending.
    pub fn levels(&self) -> impl Iterator<Item = u32> + '_ {
        self.groups.keys().copied()
    }

    /// Iterate `(wear level, sample names)` in ascending level order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[String])> {
        self.groups.iter().map(|(level, names)| (*level, names.as_slice()))
    }

    /// Paths that did not follow the naming convention.
    pub fn rejected(&self) -> &[(PathBuf, PathFormatError)] {
        &self.rejected
    }

    /// Number of grouped samples.
    pub fn sample_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Returns `true` if no sample was grouped.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Group sample paths by wear level.
///
/// A path whose wear level cannot be read is recorded in
/// [`WearGroups::rejected`] and does not affect the others. Names inside a
/// group are sorted.
pub fn organize_by_wear<I, P, N>(paths: I, naming: &N) -> WearGroups
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
    N: NamingConvention + ?Sized,
{
    let mut result = WearGroups::default();

    for path in paths {
        let path = path.as_ref();
        let labelled = naming
            .wear_level(path)
            .and_then(|level| Ok((level, naming.sample_name(path)?)));
        match labelled {
            Ok((level, name)) => result.groups.entry(level).or_default().push(name),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping sample");
                result.rejected.push((path.to_path_buf(), e));
            }
        }
    }

    for names in result.groups.values_mut() {
        names.sort();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::ActVibNaming;

    #[test]
    fn groups_by_level() {
        let paths = [
            "d/VigaIntacta/run_d1_b.csv",
            "d/VigaIntacta/run_d1_a.csv",
            "d/Viga 2/run_d2_a.csv",
            "d/Viga 5/run_d3_a.csv",
        ];
        let groups = organize_by_wear(paths, &ActVibNaming::default());

        assert_eq!(groups.levels().collect::<Vec<_>>(), vec![0, 2, 5]);
        assert_eq!(groups.get(0), &["run_d1_a".to_string(), "run_d1_b".to_string()]);
        assert_eq!(groups.get(5), &["run_d3_a".to_string()]);
        assert!(groups.get(3).is_empty());
        assert_eq!(groups.sample_count(), 4);
        assert!(groups.rejected().is_empty());
    }

    #[test]
    fn bad_path_is_isolated() {
        let paths = ["d/Viga 1/run_d1_a.csv", "d/misc/run_d1_a.csv"];
        let groups = organize_by_wear(paths, &ActVibNaming::default());

        assert_eq!(groups.get(1).len(), 1);
        assert_eq!(groups.rejected().len(), 1);
        assert!(matches!(
            groups.rejected()[0].1,
            PathFormatError::NoBeamDirectory { .. }
        ));
    }

    #[test]
    fn empty_input() {
        let groups = organize_by_wear(Vec::<PathBuf>::new(), &ActVibNaming::default());
        assert!(groups.is_empty());
        assert_eq!(groups.iter().count(), 0);
    }

    #[test]
    fn label_reads_all_fields() {
        let label =
            SampleLabel::from_path(Path::new("x/Viga 3/run_d2_z.csv"), &ActVibNaming::default())
                .unwrap();
        assert_eq!(label.name, "run_d2_z");
        assert_eq!(label.wear_level, 3);
        assert_eq!(label.actuator, 2);
    }
}
