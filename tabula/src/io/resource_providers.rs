//! Resource providers resolve the inputs of a read call to readers.
//!
//! This separates *where bytes come from* (the file system, the bundled
//! sample directory, a test fixture) from *how they are parsed*.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::Error;

/// Allows resolving resources to readers.
///
/// An implementation can decide whether it wants to handle the given
/// resource; otherwise it returns `None` and the next provider is
/// consulted.
pub trait ResourceProvider: std::fmt::Debug {
    /// Resolve and open a resource.
    fn open_resource(&self, resource: &str) -> Result<Option<Box<dyn Read>>, Error>;
}

/// A list of [ResourceProvider]s sorted by decreasing priority.
#[derive(Debug, Clone)]
pub struct ResourceProviders(Rc<Vec<Box<dyn ResourceProvider>>>);

impl ResourceProviders {
    /// Construct from a list of providers.
    pub fn from(providers: Vec<Box<dyn ResourceProvider>>) -> Self {
        Self(Rc::new(providers))
    }

    /// Returns an instance which is unable to resolve any resource.
    pub fn empty() -> Self {
        Self(Rc::new(vec![]))
    }

    /// Resolves a resource against the providers, first hit wins.
    pub fn open_resource(&self, resource: &str) -> Result<Box<dyn Read>, Error> {
        for provider in self.0.iter() {
            if let Some(reader) = provider.open_resource(resource)? {
                return Ok(reader);
            }
        }
        Err(Error::ResourceNotProvided {
            resource: resource.to_string(),
        })
    }
}

impl Default for ResourceProviders {
    fn default() -> Self {
        Self(Rc::new(vec![
            Box::<FileResourceProvider>::default(),
            Box::<SampleResourceProvider>::default(),
        ]))
    }
}

/// Resolves resources from the OS-provided file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileResourceProvider {}

impl ResourceProvider for FileResourceProvider {
    fn open_resource(&self, resource: &str) -> Result<Option<Box<dyn Read>>, Error> {
        let path = PathBuf::from(resource);
        if !path.is_file() {
            // not present: hand over to the next provider
            return Ok(None);
        }
        let file = File::open(&path).map_err(|error| Error::IoReading {
            error,
            resource: resource.to_string(),
        })?;
        Ok(Some(Box::new(file)))
    }
}

/// Resolves bare names against the bundled sample-file directory, trying
/// the name as given and with `.txt` appended.
#[derive(Debug, Clone)]
pub struct SampleResourceProvider {
    directory: PathBuf,
}

impl SampleResourceProvider {
    /// A provider serving samples from the given directory.
    pub fn with_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl Default for SampleResourceProvider {
    fn default() -> Self {
        Self::with_directory(concat!(env!("CARGO_MANIFEST_DIR"), "/samples"))
    }
}

impl ResourceProvider for SampleResourceProvider {
    fn open_resource(&self, resource: &str) -> Result<Option<Box<dyn Read>>, Error> {
        // only bare names can refer to samples
        if resource.contains(['/', '\\']) {
            return Ok(None);
        }
        let candidates = [
            self.directory.join(resource),
            self.directory.join(format!("{resource}.txt")),
        ];
        for path in candidates {
            if path.is_file() {
                let file = File::open(&path).map_err(|error| Error::IoReading {
                    error,
                    resource: resource.to_string(),
                })?;
                return Ok(Some(Box::new(file)));
            }
        }
        Ok(None)
    }
}
