use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::index::{OrthoIndex, PhoneIndex, index_by_orthography, index_by_phones};
use crate::parse::ParseOptions;
use crate::source::Source;
use crate::stream::log_diagnostic;

/// Indexes computed once per source and reused on later requests.
///
/// The cache is an ordinary value owned by the caller; share the returned
/// `Arc`s for read-only access from elsewhere. A source that cannot be read
/// to the end is an error and nothing is cached for it.
#[derive(Debug, Default)]
pub struct IndexCache {
    options: ParseOptions,
    orthography: HashMap<String, Arc<OrthoIndex>>,
    phones: HashMap<String, Arc<PhoneIndex>>,
}

impl IndexCache {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Orthography index for `source`, built on first request.
    pub fn orthography(&mut self, source: &Source) -> Result<Arc<OrthoIndex>> {
        let id = source.id();
        if let Some(hit) = self.orthography.get(&id) {
            debug!("orthography index cache hit for {id}");
            return Ok(Arc::clone(hit));
        }
        let mut stream = source.stream(self.options, log_diagnostic)?;
        let index = index_by_orthography(&mut stream);
        stream.lines_mut().finish()?;
        let index = Arc::new(index);
        self.orthography.insert(id, Arc::clone(&index));
        Ok(index)
    }

    /// Phone index for `source`, built on first request.
    pub fn phones(&mut self, source: &Source) -> Result<Arc<PhoneIndex>> {
        let id = source.id();
        if let Some(hit) = self.phones.get(&id) {
            debug!("phone index cache hit for {id}");
            return Ok(Arc::clone(hit));
        }
        let mut stream = source.stream(self.options, log_diagnostic)?;
        let index = index_by_phones(&mut stream);
        stream.lines_mut().finish()?;
        let index = Arc::new(index);
        self.phones.insert(id, Arc::clone(&index));
        Ok(index)
    }

    /// Number of cached indexes of either kind.
    pub fn len(&self) -> usize {
        self.orthography.len() + self.phones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.orthography.clear();
        self.phones.clear();
    }
}
