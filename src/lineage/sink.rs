use std::fmt::{self, Write as _};
use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Separator placed between nodes of a rendered path.
pub const PATH_SEPARATOR: &str = "→";

/// Render a path as `root→...→leaf`.
pub fn format_path<N: fmt::Display>(path: &[N]) -> String {
    let mut line = String::new();
    for (i, node) in path.iter().enumerate() {
        if i > 0 {
            line.push_str(PATH_SEPARATOR);
        }
        // Writing into a String cannot fail.
        let _ = write!(line, "{}", node);
    }
    line
}

/// Receives every completed root-to-leaf path found by a traversal.
pub trait PathSink<N> {
    fn on_path_found(&mut self, path: &[N]) -> io::Result<()>;
}

impl<N, S: PathSink<N> + ?Sized> PathSink<N> for Box<S> {
    fn on_path_found(&mut self, path: &[N]) -> io::Result<()> {
        (**self).on_path_found(path)
    }
}

impl<N, S: PathSink<N> + ?Sized> PathSink<N> for &mut S {
    fn on_path_found(&mut self, path: &[N]) -> io::Result<()> {
        (**self).on_path_found(path)
    }
}

/// Prints each path to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl<N: fmt::Display> PathSink<N> for ConsoleSink {
    fn on_path_found(&mut self, path: &[N]) -> io::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{}", format_path(path))
    }
}

/// Appends each path as one line to a text file.
///
/// The file is opened once in append mode and closed when the sink is
/// dropped; existing content is never truncated.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    writer: LineWriter<File>,
}

impl FileSink {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        debug!("Opened path log at {:?}", path);
        Ok(Self {
            path,
            writer: LineWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<N: fmt::Display> PathSink<N> for FileSink {
    fn on_path_found(&mut self, path: &[N]) -> io::Result<()> {
        writeln!(self.writer, "{}", format_path(path))
    }
}

/// Keeps every path in memory.
#[derive(Debug, Clone)]
pub struct PathCollector<N> {
    paths: Vec<Vec<N>>,
}

impl<N> Default for PathCollector<N> {
    fn default() -> Self {
        Self { paths: Vec::new() }
    }
}

impl<N> PathCollector<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> &[Vec<N>] {
        &self.paths
    }

    pub fn into_paths(self) -> Vec<Vec<N>> {
        self.paths
    }
}

impl<N: Clone> PathSink<N> for PathCollector<N> {
    fn on_path_found(&mut self, path: &[N]) -> io::Result<()> {
        self.paths.push(path.to_vec());
        Ok(())
    }
}

/// Accepts and drops every path.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl<N> PathSink<N> for DiscardSink {
    fn on_path_found(&mut self, _path: &[N]) -> io::Result<()> {
        Ok(())
    }
}

/// Forwards each path to two sinks, first to `A`.
#[derive(Debug)]
pub struct Tee<A, B> {
    first: A,
    second: B,
}

impl<A, B> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<N, A: PathSink<N>, B: PathSink<N>> PathSink<N> for Tee<A, B> {
    fn on_path_found(&mut self, path: &[N]) -> io::Result<()> {
        self.first.on_path_found(path)?;
        self.second.on_path_found(path)
    }
}

/// Sink backed by a closure.
pub struct FnSink<F>(F);

/// Wrap a closure as a [`PathSink`].
pub fn from_fn<N, F>(f: F) -> FnSink<F>
where
    F: FnMut(&[N]) -> io::Result<()>,
{
    FnSink(f)
}

impl<N, F> PathSink<N> for FnSink<F>
where
    F: FnMut(&[N]) -> io::Result<()>,
{
    fn on_path_found(&mut self, path: &[N]) -> io::Result<()> {
        (self.0)(path)
    }
}
