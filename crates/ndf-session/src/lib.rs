//! One open NDF file: its text, tokens and tree, and the declarations
//! changed since it was loaded.

use std::fs::File;

use camino::{Utf8Path, Utf8PathBuf};
use ndf_errors::{Diagnostic, LexError, PathError};
use ndf_model::{Declaration, SourceFile, Value};
use ndf_path::Path;
use ndf_tokenizer::Tokens;
use ndf_writer::{DirtySet, FileProfile, WriterOptions};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to read `{path}`")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: LexError,
    },
    #[error("failed to write `{path}`")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no declaration named `{0}`")]
    UnknownDeclaration(String),
    #[error("the session was not loaded from a file")]
    NoPath,
    #[error(transparent)]
    Path(#[from] PathError),
}

pub struct Session {
    path: Option<Utf8PathBuf>,
    tokens: Tokens,
    file: SourceFile,
    diagnostics: Vec<Diagnostic>,
    dirty: DirtySet,
    options: WriterOptions,
}

impl Session {
    pub fn load(path: impl Into<Utf8PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let tokens = File::open(&path)
            .map_err(LexError::from)
            .and_then(ndf_tokenizer::tokenize_reader)
            .map_err(|source| SessionError::Read { path: path.clone(), source })?;

        let mut session = Self::from_tokens(tokens);
        tracing::debug!(%path, declarations = session.file.len(), "loaded");
        session.path = Some(path);
        Ok(session)
    }

    pub fn from_text(text: &str) -> Self {
        Self::from_tokens(ndf_tokenizer::tokenize(text))
    }

    fn from_tokens(tokens: Tokens) -> Self {
        let parse = ndf_parse::parse(&tokens);
        let options =
            WriterOptions { profile: Some(FileProfile::detect(&parse.file)), ..WriterOptions::default() };
        Self {
            path: None,
            tokens,
            file: parse.file,
            diagnostics: parse.diagnostics,
            dirty: DirtySet::default(),
            options,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: WriterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    pub fn text(&self) -> &str {
        self.tokens.text()
    }

    pub fn tokens(&self) -> &Tokens {
        &self.tokens
    }

    pub fn file(&self) -> &SourceFile {
        &self.file
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Indices of declarations edited through this session.
    pub fn dirty(&self) -> &DirtySet {
        &self.dirty
    }

    pub fn is_modified(&self) -> bool {
        !self.dirty.is_empty() || !self.file.is_contiguous()
    }

    fn position(&self, name: &str) -> Result<usize, SessionError> {
        self.file.position(name).ok_or_else(|| SessionError::UnknownDeclaration(name.to_owned()))
    }

    pub fn declaration(&self, name: &str) -> Result<&Declaration, SessionError> {
        Ok(&self.file.declarations[self.position(name)?])
    }

    pub fn get(&self, decl: &str, path: &Path) -> Result<&Value, SessionError> {
        Ok(ndf_path::locate(self.declaration(decl)?.value(), path)?)
    }

    /// Every concrete path `path` expands to inside `decl`.
    pub fn expand(&self, decl: &str, path: &Path) -> Result<Vec<Path>, SessionError> {
        Ok(ndf_path::expand(self.declaration(decl)?.value(), path))
    }

    pub fn set(&mut self, decl: &str, path: &Path, value: Value) -> Result<Value, SessionError> {
        self.checked_edit(decl, path, |root| ndf_path::set(root, path, value))
    }

    pub fn insert(&mut self, decl: &str, path: &Path, value: Value) -> Result<(), SessionError> {
        self.checked_edit(decl, path, |root| ndf_path::insert(root, path, value))
    }

    pub fn remove(&mut self, decl: &str, path: &Path) -> Result<Value, SessionError> {
        self.checked_edit(decl, path, |root| ndf_path::remove(root, path))
    }

    /// Runs a path edit, marking the declaration only when it succeeds.
    fn checked_edit<T>(
        &mut self,
        decl: &str,
        path: &Path,
        f: impl FnOnce(&mut Value) -> Result<T, PathError>,
    ) -> Result<T, SessionError> {
        let index = self.position(decl)?;
        let mut value = self.file.declarations[index].value().clone();
        let result = f(&mut value)?;
        self.file.declarations[index].set_value(value);
        self.dirty.insert(index);
        tracing::debug!(decl, %path, "edited");
        Ok(result)
    }

    /// Gives `f` the declaration's value and marks the declaration dirty.
    pub fn edit<R>(&mut self, decl: &str, f: impl FnOnce(&mut Value) -> R) -> Result<R, SessionError> {
        let index = self.position(decl)?;
        self.dirty.insert(index);
        Ok(f(self.file.declarations[index].value_mut()))
    }

    /// Appends a declaration and returns its index.
    pub fn add_declaration(&mut self, decl: Declaration) -> usize {
        let index = self.file.len();
        tracing::debug!(index, name = decl.name(), "declaration added");
        self.file.declarations.push(decl);
        self.dirty.insert(index);
        index
    }

    pub fn remove_declaration(&mut self, name: &str) -> Result<Declaration, SessionError> {
        let index = self.position(name)?;
        let removed = self.file.declarations.remove(index);
        self.dirty = self
            .dirty
            .iter()
            .filter(|&&dirty| dirty != index)
            .map(|&dirty| if dirty > index { dirty - 1 } else { dirty })
            .collect();
        tracing::debug!(index, name, "declaration removed");
        Ok(removed)
    }

    /// The current text of the file.
    pub fn render(&self) -> String {
        ndf_writer::write(&self.file, &self.tokens, &self.dirty, &self.options)
    }

    /// Writes the file back to where it was loaded from.
    pub fn save(&mut self) -> Result<(), SessionError> {
        let path = self.path.clone().ok_or(SessionError::NoPath)?;
        self.save_as(path)
    }

    /// Writes the file to `path` and continues from the written text, so
    /// every declaration is clean again.
    pub fn save_as(&mut self, path: impl Into<Utf8PathBuf>) -> Result<(), SessionError> {
        let path = path.into();
        let text = self.render();
        std::fs::write(&path, &text)
            .map_err(|source| SessionError::Write { path: path.clone(), source })?;
        tracing::debug!(%path, bytes = text.len(), "saved");

        let options = std::mem::take(&mut self.options);
        *self = Self::from_text(&text).with_options(options);
        self.path = Some(path);
        Ok(())
    }
}
