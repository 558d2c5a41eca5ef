// Light filesystem abstractions
//
//  Copyright (C) 2014-2021 Ryan Specialty Group, LLC.
//
//  This file is part of CIDIDL.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Lightweight filesystem abstraction for generated output.
//!
//!   - [`OutputSink`] provides a trait for writing whole files by path;
//!   - [`FsSink`] writes to the filesystem;
//!   - [`MemorySink`] retains files in memory,
//!       for tests and for callers that post-process output; and
//!   - [`WriteOnceSink`] rejects a second write to the same path.
//!
//! Code generators buffer their output and hand complete files to a sink,
//!   so a sink is never asked to append.
//!
//!
//! Writing Files Once
//! ==================
//! Two outputs of a single run may resolve to the same path,
//!   e.g. a client and server given the same directory and name.
//! [`WriteOnceSink`] fails the second write with
//!   [`ErrorKind::AlreadyExists`] rather than silently replacing the first
//!   file.

use fxhash::FxHashSet;
use log::debug;
use std::{
    fs,
    io::{Error, ErrorKind, Result},
    path::{Path, PathBuf},
};

/// A destination for generated files.
pub trait OutputSink {
    /// Write `contents` as the complete file at `path`.
    fn write_file(&mut self, path: &Path, contents: &str) -> Result<()>;
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn write_file(&mut self, path: &Path, contents: &str) -> Result<()> {
        (**self).write_file(path, contents)
    }
}

/// Vanilla filesystem output.
///
/// Missing parent directories are created.
#[derive(Debug, Default)]
pub struct FsSink;

impl OutputSink for FsSink {
    fn write_file(&mut self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
        {
            fs::create_dir_all(parent)?;
        }

        debug!("writing {} ({} bytes)", path.display(), contents.len());
        fs::write(path, contents)
    }
}

/// Files retained in memory,
///   in the order that they were written.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MemorySink {
    files: Vec<(PathBuf, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[(PathBuf, String)] {
        &self.files
    }

    /// Contents of the most recent write to `path`.
    pub fn get<P: AsRef<Path>>(&self, path: P) -> Option<&str> {
        self.files
            .iter()
            .rev()
            .find(|(p, _)| p == path.as_ref())
            .map(|(_, contents)| contents.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl OutputSink for MemorySink {
    fn write_file(&mut self, path: &Path, contents: &str) -> Result<()> {
        self.files.push((path.to_path_buf(), contents.to_string()));
        Ok(())
    }
}

/// Writes each path at most once.
///
/// A path will not be marked as written if the write fails.
#[derive(Debug, Default)]
pub struct WriteOnceSink<S: OutputSink> {
    inner: S,
    written: FxHashSet<PathBuf>,
}

impl<S: OutputSink> WriteOnceSink<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            written: Default::default(),
        }
    }

    /// Number of written paths.
    pub fn written_len(&self) -> usize {
        self.written.len()
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: OutputSink> OutputSink for WriteOnceSink<S> {
    fn write_file(&mut self, path: &Path, contents: &str) -> Result<()> {
        if self.written.contains(path) {
            return Err(Error::new(
                ErrorKind::AlreadyExists,
                format!("{} was already generated by this run", path.display()),
            ));
        }

        self.inner.write_file(path, contents).map(|()| {
            self.written.insert(path.to_path_buf());
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct FailingSink;

    impl OutputSink for FailingSink {
        fn write_file(&mut self, _path: &Path, _contents: &str) -> Result<()> {
            Err(Error::new(ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn memory_sink_retains_order() {
        let mut sink = MemorySink::new();

        sink.write_file(Path::new("b.hpp"), "b").unwrap();
        sink.write_file(Path::new("a.hpp"), "a").unwrap();

        assert_eq!(
            vec![
                (PathBuf::from("b.hpp"), "b".to_string()),
                (PathBuf::from("a.hpp"), "a".to_string()),
            ],
            sink.files()
        );
        assert_eq!(Some("a"), sink.get("a.hpp"));
        assert_eq!(None, sink.get("c.hpp"));
    }

    #[test]
    fn write_once_rejects_second_write() {
        let mut sink = WriteOnceSink::new(MemorySink::new());

        sink.write_file(Path::new("out/Foo.hpp"), "first").unwrap();

        let err = sink
            .write_file(Path::new("out/Foo.hpp"), "second")
            .unwrap_err();
        assert_eq!(ErrorKind::AlreadyExists, err.kind());

        sink.write_file(Path::new("out/Foo.cpp"), "other").unwrap();
        assert_eq!(2, sink.written_len());
        assert_eq!(Some("first"), sink.into_inner().get("out/Foo.hpp"));
    }

    #[test]
    fn write_once_does_not_mark_failed_write() {
        let mut sink = WriteOnceSink::new(FailingSink);

        assert!(sink.write_file(Path::new("x"), "").is_err());
        assert_eq!(0, sink.written_len());
    }

    #[test]
    fn fs_sink_creates_parent_dirs() {
        let dir = std::env::temp_dir()
            .join(format!("cididl-fs-test-{}", std::process::id()));
        let path = dir.join("nested").join("Out.hpp");

        FsSink.write_file(&path, "contents").unwrap();
        assert_eq!("contents", fs::read_to_string(&path).unwrap());

        fs::remove_dir_all(&dir).unwrap();
    }
}
