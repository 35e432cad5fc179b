// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::{Projection, Projector};
use crate::errors::{ProjectionError, ProjectionResult};
use crate::observability::messages::document::DocumentFileAccess;
use crate::observability::messages::StructuredLog;
use crate::types::Value;

const FILE_SCHEME: &str = "file:";

/// Document I/O for a projector. Local files only.
pub struct ProjectorIo<'p> {
    projector: &'p Projector,
}

impl<'p> ProjectorIo<'p> {
    pub(crate) fn new(projector: &'p Projector) -> Self {
        Self { projector }
    }

    pub fn file<P: AsRef<Path>>(&self, path: P) -> FileIo<'p> {
        FileIo {
            projector: self.projector,
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read the document named by the interface's document origin.
    ///
    /// The origin template is rendered with `args` like a selector. Plain paths and
    /// `file:` locations are supported.
    pub fn read_origin(&self, interface: &str, args: &[Value]) -> ProjectionResult<Projection> {
        let descriptor = self.projector.interface(interface).ok_or_else(|| {
            ProjectionError::IllegalArgument(format!("unknown projection interface '{}'", interface))
        })?;
        let origin = descriptor.render_document_origin(args).ok_or_else(|| {
            ProjectionError::IllegalArgument(format!(
                "projection interface '{}' declares no document origin",
                interface
            ))
        })?;
        let path = origin.strip_prefix(FILE_SCHEME).unwrap_or(&origin);
        if path.contains("://") {
            return Err(ProjectionError::IllegalArgument(format!(
                "only local document origins can be read, got '{}'",
                origin
            )));
        }
        self.file(path).read(interface)
    }
}

/// A file to read a projection from or write one to.
pub struct FileIo<'p> {
    projector: &'p Projector,
    path: PathBuf,
}

impl FileIo<'_> {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the file and bind `interface` to the document.
    pub fn read(&self, interface: &str) -> ProjectionResult<Projection> {
        let content = fs::read_to_string(&self.path)?;
        DocumentFileAccess {
            path: &self.path.to_string_lossy(),
            operation: "read",
            bytes: content.len(),
        }
        .log();
        self.projector.parse(&content, interface)
    }

    /// Write the whole document behind `projection` as UTF-8 XML, replacing the file.
    pub fn write(&self, projection: &Projection) -> ProjectionResult<()> {
        let content = self.projector.render(&projection.owner_document().root());
        fs::write(&self.path, &content)?;
        DocumentFileAccess {
            path: &self.path.to_string_lossy(),
            operation: "write",
            bytes: content.len(),
        }
        .log();
        Ok(())
    }
}
