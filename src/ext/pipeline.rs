//! Model discovery and the end-to-end batch driver.
//!
//! Discovery is sequential and depth-first, descending into a subdirectory
//! before moving on to its siblings. Entries are sorted by name at every
//! level so encoding indices do not depend on filesystem listing order.

use std::fs;
use std::path::{Path, PathBuf};

use super::encoding::{EncodingOracle, Extensions, TableCompiler};
use super::error::ExtError;
use super::model::{CcIntrospector, Model, SourceIntrospector};

pub struct Pipeline<'a> {
    introspector: &'a dyn SourceIntrospector,
    oracle: &'a dyn EncodingOracle,
    models: Vec<Model>,
}

impl<'a> Pipeline<'a> {
    pub fn new(introspector: &'a dyn SourceIntrospector, oracle: &'a dyn EncodingOracle) -> Self {
        Self {
            introspector,
            oracle,
            models: Vec::new(),
        }
    }

    /// Parses the reference implementation(s) at `path` — a single `.cc`
    /// file or a directory walked recursively — then appends the two
    /// built-in register-access models.
    pub fn parse_models(&mut self, path: &Path) -> Result<(), ExtError> {
        if path.is_dir() {
            self.treewalk(path)?;
        } else {
            self.models.push(Model::from_file(path, self.introspector)?);
        }

        self.models.push(Model::read_custreg()?);
        self.models.push(Model::write_custreg()?);
        Ok(())
    }

    fn treewalk(&mut self, dir: &Path) -> Result<(), ExtError> {
        let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()?;
        entries.sort();

        for path in entries {
            if path.is_dir() {
                self.treewalk(&path)?;
            } else if path.extension().is_some_and(|ext| ext == "cc") {
                self.models.push(Model::from_file(&path, self.introspector)?);
            }
        }
        Ok(())
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// Runs the encoding batch over everything parsed so far.
    pub fn generate(&self) -> Result<Extensions, ExtError> {
        Extensions::generate(&self.models, self.oracle)
    }
}

/// Convenience entry point wiring up the default collaborators.
pub fn process(path: &Path) -> Result<Extensions, ExtError> {
    let introspector = CcIntrospector;
    let oracle = TableCompiler;
    let mut pipeline = Pipeline::new(&introspector, &oracle);
    pipeline.parse_models(path)?;
    pipeline.generate()
}
