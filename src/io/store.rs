use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use super::IoError;
use crate::{
    filter::FilterExpr,
    observability::{log_info, log_warn},
    option::MatrixOption,
};

const EXTENSION: &str = "json";

/// Reads one saved filter file.
///
/// # Errors
/// [`IoError::FilterNotFound`] for a missing file, [`IoError::Json`] for a
/// malformed one.
pub fn read_filter(path: impl AsRef<Path>) -> Result<FilterExpr, IoError> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(IoError::FilterNotFound(path.to_path_buf()))
        }
        Err(err) => return Err(err.into()),
    };
    let expr: FilterExpr = serde_json::from_reader(BufReader::new(file))?;
    log_info!(
        component = "store",
        event = "filter_loaded",
        path = %path.display(),
        clauses = expr.clauses.len(),
    );
    Ok(expr)
}

/// Directory of saved filter expressions, one JSON file each.
#[derive(Debug, Clone)]
pub struct FilterStore {
    dir: PathBuf,
}

impl FilterStore {
    /// Store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the configured filter directory.
    pub fn from_option(option: &MatrixOption) -> Self {
        Self::new(option.filter_dir.clone())
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_of(&self, name: &str) -> PathBuf {
        let suffix = format!(".{EXTENSION}");
        if name.ends_with(&suffix) {
            self.dir.join(name)
        } else {
            self.dir.join(format!("{name}{suffix}"))
        }
    }

    /// Sorted file names of the saved filters. A missing directory lists
    /// nothing.
    ///
    /// # Errors
    /// Filesystem errors other than a missing directory.
    pub fn list(&self) -> Result<Vec<String>, IoError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Loads the filter `name`, with or without the `.json` suffix.
    ///
    /// # Errors
    /// [`IoError::FilterNotFound`] for an unknown name, [`IoError::Json`] for a
    /// malformed file.
    pub fn load(&self, name: &str) -> Result<FilterExpr, IoError> {
        read_filter(self.path_of(name))
    }

    /// Saves `expr` as `name`, replacing an existing filter of that name.
    /// Returns the written path.
    ///
    /// # Errors
    /// Filesystem and encoding errors.
    pub fn save(&self, name: &str, expr: &FilterExpr) -> Result<PathBuf, IoError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_of(name);
        let mut out = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut out, expr)?;
        out.flush()?;
        log_info!(
            component = "store",
            event = "filter_saved",
            path = %path.display(),
            clauses = expr.clauses.len(),
        );
        Ok(path)
    }

    /// Loads the configured default filter when it exists. A default filter
    /// that fails to load is reported and skipped.
    pub fn load_default(&self, option: &MatrixOption) -> Option<FilterExpr> {
        match self.load(&option.default_filter) {
            Ok(expr) => Some(expr),
            Err(IoError::FilterNotFound(_)) => None,
            Err(err) => {
                log_warn!(
                    component = "store",
                    event = "default_filter_failed",
                    name = %option.default_filter,
                    error = %err,
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::filter::{Clause, Operator, Predicate};

    fn sample() -> FilterExpr {
        FilterExpr::new(Operator::Or).with(
            Clause::new(Operator::And)
                .named("lab machines")
                .with(Predicate::pattern("Hostname", "^lab-"))
                .with(Predicate::membership("Name", ["Foo"])),
        )
    }

    #[test]
    fn save_then_list_and_load() {
        let dir = TempDir::new().unwrap();
        let store = FilterStore::new(dir.path().join("saved_filters"));
        assert!(store.list().unwrap().is_empty());

        let path = store.save("my_filters", &sample()).unwrap();
        assert!(path.ends_with("my_filters.json"));
        fs::write(store.dir().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.list().unwrap(), ["my_filters.json"]);
        assert_eq!(store.load("my_filters").unwrap(), sample());
        assert_eq!(store.load("my_filters.json").unwrap(), sample());
    }

    #[test]
    fn missing_filter() {
        let dir = TempDir::new().unwrap();
        let store = FilterStore::new(dir.path());
        assert!(matches!(
            store.load("nope"),
            Err(IoError::FilterNotFound(_))
        ));
    }

    #[test]
    fn default_filter_is_optional() {
        let dir = TempDir::new().unwrap();
        let option = MatrixOption::default().filter_dir(dir.path());
        let store = FilterStore::from_option(&option);
        assert!(store.load_default(&option).is_none());

        fs::write(dir.path().join("Default Filter.json"), "{not json").unwrap();
        assert!(store.load_default(&option).is_none());

        store.save("Default Filter", &sample()).unwrap();
        assert_eq!(store.load_default(&option), Some(sample()));
    }
}
