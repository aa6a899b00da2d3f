//! One editing session and its lazily rebuilt program model.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use enumgen_parser::backend::ParserBackend;
use enumgen_parser::cancel::CancelToken;
use enumgen_parser::compilation::{Compilation, Diagnostic};

use crate::errors::SessionError;

/// A source rewrite applied across a session's files.
pub trait SessionTransform {
    fn name(&self) -> &str;

    /// Returns the replacement text, or `None` to leave the file untouched.
    fn apply(&self, path: &str, source: &str) -> Option<String>;
}

/// Serializable session state for persistence and restore. Diagnostics are
/// the ones current at capture time, so a restored session can answer
/// [`CodeSession::diagnostics`] before its first rebuild.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub files: BTreeMap<String, String>,
    pub references: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

/// A mutable set of sources and references with a cached compilation.
///
/// Every mutation invalidates the cache eagerly; the next call to
/// [`CodeSession::compilation`] rebuilds it. Callers observing the same
/// unmutated session share one `Arc<Compilation>`.
pub struct CodeSession {
    id: String,
    backend: Arc<dyn ParserBackend>,
    files: BTreeMap<String, String>,
    references: Vec<PathBuf>,
    compiled: Option<Arc<Compilation>>,
    diagnostics: Vec<Diagnostic>,
    valid: bool,
    last_used: Instant,
}

impl CodeSession {
    #[must_use]
    pub fn new(id: impl Into<String>, backend: Arc<dyn ParserBackend>) -> Self {
        Self {
            id: id.into(),
            backend,
            files: BTreeMap::new(),
            references: Vec::new(),
            compiled: None,
            diagnostics: Vec::new(),
            valid: true,
            last_used: Instant::now(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn idle_for(&self) -> Duration {
        self.last_used.elapsed()
    }

    pub fn touch(&mut self) {
        self.last_used = Instant::now();
    }

    /// Diagnostics from the last compile, or the ones a restored snapshot
    /// carried in. Empty before the first compile.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Marks the session unusable. Every later operation returns
    /// [`SessionError::Disposed`].
    pub fn dispose(&mut self) {
        self.valid = false;
        self.compiled = None;
        self.diagnostics.clear();
        self.files.clear();
        self.references.clear();
    }

    fn guard(&self) -> Result<(), SessionError> {
        if self.valid {
            Ok(())
        } else {
            Err(SessionError::Disposed {
                id: self.id.clone(),
            })
        }
    }

    fn invalidate(&mut self) {
        self.compiled = None;
        self.touch();
    }

    /// Adds or replaces one source file.
    pub fn update_source(
        &mut self,
        path: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.guard()?;
        self.files.insert(path.into(), text.into());
        self.invalidate();
        Ok(())
    }

    pub fn remove_source(&mut self, path: &str) -> Result<(), SessionError> {
        self.guard()?;
        if self.files.remove(path).is_none() {
            return Err(SessionError::UnknownFile {
                path: path.to_string(),
            });
        }
        self.invalidate();
        Ok(())
    }

    pub fn add_reference(&mut self, path: impl Into<PathBuf>) -> Result<(), SessionError> {
        self.guard()?;
        self.references.push(path.into());
        self.invalidate();
        Ok(())
    }

    /// The current program model, rebuilt if a mutation invalidated it.
    pub fn compilation(&mut self) -> Result<Arc<Compilation>, SessionError> {
        self.compilation_impl(None)
    }

    /// Like [`CodeSession::compilation`] but honoring a cancellation token
    /// during the rebuild.
    pub fn compilation_with_cancel(
        &mut self,
        token: &CancelToken,
    ) -> Result<Arc<Compilation>, SessionError> {
        self.compilation_impl(Some(token))
    }

    fn compilation_impl(
        &mut self,
        token: Option<&CancelToken>,
    ) -> Result<Arc<Compilation>, SessionError> {
        self.guard()?;
        self.touch();
        if let Some(compiled) = &self.compiled {
            return Ok(Arc::clone(compiled));
        }

        let sources: Vec<(String, String)> = self
            .files
            .iter()
            .map(|(path, text)| (path.clone(), text.clone()))
            .collect();
        let compiled = match token {
            Some(token) => Compilation::new_with_cancel(
                &self.id,
                &sources,
                &self.references,
                &self.backend,
                token,
            )?,
            None => Compilation::new(&self.id, &sources, &self.references, &self.backend)?,
        };
        debug!(session = %self.id, files = sources.len(), "session recompiled");
        self.diagnostics = compiled.diagnostics().to_vec();
        let compiled = Arc::new(compiled);
        self.compiled = Some(Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Applies a transform to every file, returning how many changed.
    pub fn apply_transform(
        &mut self,
        transform: &dyn SessionTransform,
    ) -> Result<usize, SessionError> {
        self.guard()?;
        let mut changed = 0;
        let mut updates = Vec::new();
        for (path, source) in &self.files {
            if let Some(rewritten) = transform.apply(path, source) {
                if rewritten != *source {
                    updates.push((path.clone(), rewritten));
                }
            }
        }
        for (path, rewritten) in updates {
            self.files.insert(path, rewritten);
            changed += 1;
        }
        if changed > 0 {
            debug!(session = %self.id, transform = transform.name(), changed, "transform applied");
            self.invalidate();
        }
        Ok(changed)
    }

    /// Compiles and writes the module index artifact.
    pub fn compile_to(&mut self, path: &Path) -> Result<(), SessionError> {
        let compiled = self.compilation()?;
        compiled.write_index(path)?;
        Ok(())
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        self.guard()?;
        Ok(SessionSnapshot {
            files: self.files.clone(),
            references: self.references.clone(),
            diagnostics: self.diagnostics.clone(),
        })
    }

    /// Replaces the session state wholesale from a snapshot.
    pub fn restore(&mut self, snapshot: SessionSnapshot) -> Result<(), SessionError> {
        self.guard()?;
        self.files = snapshot.files;
        self.references = snapshot.references;
        self.diagnostics = snapshot.diagnostics;
        self.invalidate();
        Ok(())
    }
}
