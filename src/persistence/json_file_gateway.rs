use crate::domain::Location;
use crate::extensions::path_ext::FileName;
use crate::persistence::{PersistenceError, PersistenceGateway};
use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

/// Stores the collection as a JSON array. Writes go to a temporary file next to the target which is
/// then renamed over it, so the previous file survives a crash mid-write. On Unix the temporary file
/// is created readable by the owner only.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonFileGateway;

impl PersistenceGateway for JsonFileGateway {
    #[instrument(skip(self), fields(file = path.string_file_name()))]
    fn read_all(&self, path: &Path) -> Result<Vec<Location>, PersistenceError> {
        let content = fs::read(path).map_err(|source| PersistenceError::Io {
            source,
            path: path.to_path_buf(),
        })?;

        let locations = serde_json::from_slice::<Vec<Location>>(&content).map_err(|source| PersistenceError::Decode {
            source,
            path: path.to_path_buf(),
        })?;
        debug!("💾 Read {} location(s)", locations.len());

        Ok(locations)
    }

    #[instrument(skip(self, locations), fields(file = path.string_file_name(), count = locations.len()))]
    fn write_all(&self, path: &Path, locations: &[Location]) -> Result<(), PersistenceError> {
        // JSON has no representation for NaN or infinity, serde_json would write them as null
        if let Some(location) = locations.iter().find(|l| !(l.latitude.is_finite() && l.longitude.is_finite())) {
            return Err(PersistenceError::InvalidCoordinate {
                id: location.id,
                latitude: location.latitude,
                longitude: location.longitude,
            });
        }

        let data = serde_json::to_vec(locations).map_err(PersistenceError::Encode)?;
        let io_error = |source: io::Error| PersistenceError::Io {
            source,
            path: path.to_path_buf(),
        };

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(directory).map_err(io_error)?;

        let mut file = NamedTempFile::new_in(directory).map_err(io_error)?;
        file.write_all(&data).map_err(io_error)?;
        file.as_file().sync_all().map_err(io_error)?;
        file.persist(path).map_err(|e| PersistenceError::Persist {
            source: e.error,
            path: path.to_path_buf(),
        })?;
        sync_directory(directory).map_err(io_error)?;
        debug!("💾 Wrote {} location(s)", locations.len());

        Ok(())
    }
}

/// Flushes the directory entry so a completed rename survives a crash.
#[cfg(unix)]
fn sync_directory(directory: &Path) -> io::Result<()> {
    fs::File::open(directory)?.sync_all()
}

#[cfg(not(unix))]
fn sync_directory(_directory: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    fn assert_same_fields(actual: &[Location], expected: &[Location]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_eq!(a.id, e.id);
            assert_eq!(a.name, e.name);
            assert_eq!(a.description, e.description);
            assert_eq!(a.latitude, e.latitude);
            assert_eq!(a.longitude, e.longitude);
        }
    }

    #[test_log::test]
    fn read_all_restores_what_write_all_wrote() -> Result<(), PersistenceError> {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("SavedPlaces.json");
        let locations = vec![
            Location::example(),
            Location::new("Edinburgh Castle", "", Coordinate::new(55.95, -3.19)),
            Location::new("Tower of London", "Ravens \"live\" here\n", Coordinate::new(51.508, -0.076)),
        ];

        JsonFileGateway.write_all(&path, &locations)?;
        let restored = JsonFileGateway.read_all(&path)?;

        assert_same_fields(&restored, &locations);
        Ok(())
    }

    #[test_log::test]
    fn read_all_restores_an_empty_collection() -> Result<(), PersistenceError> {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("SavedPlaces.json");

        JsonFileGateway.write_all(&path, &[])?;

        assert!(JsonFileGateway.read_all(&path)?.is_empty());
        assert_eq!(fs::read_to_string(&path).expect("readable file"), "[]");
        Ok(())
    }

    #[test_log::test]
    fn write_all_replaces_the_previous_collection() -> Result<(), PersistenceError> {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("SavedPlaces.json");
        let replacement = vec![Location::at(Coordinate::new(1.0, 2.0))];

        JsonFileGateway.write_all(&path, &[Location::example(), Location::example()])?;
        JsonFileGateway.write_all(&path, &replacement)?;

        assert_same_fields(&JsonFileGateway.read_all(&path)?, &replacement);
        let leftovers = fs::read_dir(dir.path()).expect("readable dir").count();
        assert_eq!(leftovers, 1, "expected no temporary files to be left behind");
        Ok(())
    }

    #[test_log::test]
    fn write_all_creates_missing_directories() -> Result<(), PersistenceError> {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("places").join("SavedPlaces.json");

        JsonFileGateway.write_all(&path, &[Location::example()])?;

        assert_eq!(JsonFileGateway.read_all(&path)?.len(), 1);
        Ok(())
    }

    #[test_log::test]
    fn read_all_fails_for_a_missing_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("missing.json");

        let result = JsonFileGateway.read_all(&path);

        assert!(matches!(result, Err(PersistenceError::Io { .. })), "unexpected result: {:?}", result);
    }

    #[test_log::test]
    fn read_all_fails_for_malformed_content() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("SavedPlaces.json");
        fs::write(&path, r#"[{"id":"not-a-uuid","name":"x"}]"#).expect("writable file");

        let result = JsonFileGateway.read_all(&path);

        assert!(matches!(result, Err(PersistenceError::Decode { .. })), "unexpected result: {:?}", result);
    }

    #[rstest]
    #[case(f64::NAN, -3.0)]
    #[case(56.0, f64::INFINITY)]
    #[case(f64::NEG_INFINITY, f64::NAN)]
    fn write_all_rejects_non_finite_coordinates_and_keeps_the_previous_file(#[case] latitude: f64, #[case] longitude: f64) {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("SavedPlaces.json");
        let saved = vec![Location::at(Coordinate::new(56.0, -3.0))];
        JsonFileGateway.write_all(&path, &saved).expect("initial write");

        let invalid = Location::at(Coordinate::new(latitude, longitude));
        let result = JsonFileGateway.write_all(&path, &[saved[0].clone(), invalid.clone()]);

        match result {
            Err(PersistenceError::InvalidCoordinate { id, .. }) => assert_eq!(id, invalid.id),
            other => panic!("Expected an invalid coordinate error, found {:?}", other),
        }
        assert_same_fields(&JsonFileGateway.read_all(&path).expect("readable file"), &saved);
    }

    #[test_log::test]
    fn sync_directory_succeeds_for_an_existing_directory() -> io::Result<()> {
        let dir = tempdir()?;

        sync_directory(dir.path())
    }

    #[test_log::test]
    fn sync_directory_fails_for_a_missing_directory() {
        let dir = tempdir().expect("temp dir");

        let result = sync_directory(&dir.path().join("missing"));

        if cfg!(unix) {
            assert!(result.is_err(), "expected a missing directory to fail");
        }
    }

    #[cfg(unix)]
    #[test_log::test]
    fn write_all_restricts_the_file_to_its_owner() -> Result<(), PersistenceError> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("SavedPlaces.json");

        JsonFileGateway.write_all(&path, &[Location::example()])?;

        let mode = fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        Ok(())
    }
}
