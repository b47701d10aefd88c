use crate::backend::{GpuContext, ShaderStage, UniformValue};
use crate::source::{FsSourceLoader, SourceLoader, SourcePaths};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Errors from loading or using a shader program.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader source {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{stage} shader {} failed to compile:\n{log}", .path.display())]
    Compile {
        stage: ShaderStage,
        path: PathBuf,
        log: String,
    },
    #[error("shader program failed to link:\n{log}")]
    Link { log: String },
    #[error("shader program used before a successful load")]
    NotLoaded,
}

impl ShaderError {
    /// IO, compile and link failures can be fixed by editing the sources and
    /// reloading. `NotLoaded` is a caller bug.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::NotLoaded)
    }
}

/// Observable lifecycle state. `Loading` is never observable because loads
/// are synchronous, and `Destroyed` is represented by the value being gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramState {
    Unloaded,
    Ready,
    /// Ready, but a source file changed since it was last seen.
    Stale,
}

/// Outcome of [`ShaderProgram::reload_if_changed`].
#[derive(Debug)]
pub enum ReloadStatus {
    Unchanged,
    Reloaded,
    /// The edit did not build. The previous program is still installed.
    Failed(ShaderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceStamps {
    vertex: SystemTime,
    fragment: SystemTime,
}

/// Everything that belongs to one linked program. Replaced as a unit.
struct ActiveProgram<G: GpuContext> {
    handle: G::Program,
    paths: SourcePaths,
    stamps: SourceStamps,
    /// `None` entries record names the driver reported as absent.
    locations: HashMap<String, Option<G::Location>>,
}

/// One vertex/fragment program with a uniform-location cache and hot reload.
///
/// GPU handles are not released on drop because that needs the context;
/// call [`ShaderProgram::destroy`] while the context is still current.
pub struct ShaderProgram<G: GpuContext, L: SourceLoader = FsSourceLoader> {
    loader: L,
    active: Option<ActiveProgram<G>>,
}

impl<G: GpuContext> ShaderProgram<G> {
    /// An unloaded program reading sources from the filesystem.
    pub fn new() -> Self {
        Self::with_loader(FsSourceLoader)
    }

    /// Builds a program from two files on disk.
    pub fn from_files(
        gpu: &G,
        vertex: impl AsRef<Path>,
        fragment: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let mut program = Self::new();
        program.load(gpu, vertex, fragment)?;
        Ok(program)
    }
}

impl<G: GpuContext> Default for ShaderProgram<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: GpuContext, L: SourceLoader> ShaderProgram<G, L> {
    pub fn with_loader(loader: L) -> Self {
        Self {
            loader,
            active: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.active.is_some()
    }

    pub fn handle(&self) -> Option<G::Program> {
        self.active.as_ref().map(|active| active.handle)
    }

    pub fn paths(&self) -> Option<&SourcePaths> {
        self.active.as_ref().map(|active| &active.paths)
    }

    pub fn state(&self) -> ProgramState {
        match &self.active {
            None => ProgramState::Unloaded,
            Some(_) if self.check_for_source_change() => ProgramState::Stale,
            Some(_) => ProgramState::Ready,
        }
    }

    /// Reads, compiles and links both stages, then swaps the result in.
    ///
    /// On error nothing changes: the previous program (if any) stays
    /// installed with its location cache.
    pub fn load(
        &mut self,
        gpu: &G,
        vertex: impl AsRef<Path>,
        fragment: impl AsRef<Path>,
    ) -> Result<(), ShaderError> {
        let paths = SourcePaths::new(vertex.as_ref(), fragment.as_ref());
        // Stamps are taken before reading so an edit racing the read is seen
        // as a change on the next poll.
        let stamps = self.read_stamps(&paths)?;
        self.install(gpu, paths, stamps)
    }

    /// Builds from `paths` and swaps the result in, recording `stamps`.
    fn install(
        &mut self,
        gpu: &G,
        paths: SourcePaths,
        stamps: SourceStamps,
    ) -> Result<(), ShaderError> {
        let handle = self.build(gpu, &paths)?;

        tracing::info!(
            vertex = %paths.vertex.display(),
            fragment = %paths.fragment.display(),
            program = ?handle,
            "shader program loaded"
        );

        let previous = self.active.replace(ActiveProgram {
            handle,
            paths,
            stamps,
            locations: HashMap::new(),
        });
        if let Some(previous) = previous {
            tracing::debug!(program = ?previous.handle, "releasing replaced shader program");
            gpu.delete_program(previous.handle);
        }
        Ok(())
    }

    pub fn bind(&self, gpu: &G) -> Result<(), ShaderError> {
        let active = self.active.as_ref().ok_or(ShaderError::NotLoaded)?;
        gpu.use_program(Some(active.handle));
        Ok(())
    }

    pub fn unbind(&self, gpu: &G) {
        gpu.use_program(None);
    }

    /// Uploads `value` to the uniform called `name` of the bound program.
    ///
    /// A name the driver does not know (typically optimized out) is warned
    /// about once and then ignored.
    pub fn set_uniform(
        &mut self,
        gpu: &G,
        name: &str,
        value: impl Into<UniformValue>,
    ) -> Result<(), ShaderError> {
        let active = self.active.as_mut().ok_or(ShaderError::NotLoaded)?;
        let location = match active.locations.get(name) {
            Some(cached) => cached.clone(),
            None => {
                let resolved = gpu.uniform_location(active.handle, name);
                if resolved.is_none() {
                    tracing::warn!(
                        uniform = name,
                        program = ?active.handle,
                        "uniform does not exist in shader program"
                    );
                }
                active.locations.insert(name.to_owned(), resolved.clone());
                resolved
            }
        };
        if let Some(location) = location {
            gpu.upload_uniform(&location, value.into());
        }
        Ok(())
    }

    /// Whether either source file's modification time differs from the one
    /// last seen. Files that cannot be queried (mid-save, deleted) count as
    /// unchanged.
    pub fn check_for_source_change(&self) -> bool {
        let Some(active) = &self.active else {
            return false;
        };
        [
            (&active.paths.vertex, active.stamps.vertex),
            (&active.paths.fragment, active.stamps.fragment),
        ]
        .into_iter()
        .any(|(path, seen)| match self.loader.modified(path) {
            Ok(current) => current != seen,
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "cannot stat shader source");
                false
            }
        })
    }

    /// Polls for edits and rebuilds the program when one is found.
    ///
    /// A broken edit is reported and remembered, so it is not retried until
    /// the files change again; rendering continues with the old program.
    pub fn reload_if_changed(&mut self, gpu: &G) -> ReloadStatus {
        if !self.check_for_source_change() {
            return ReloadStatus::Unchanged;
        }
        let Some(paths) = self.paths().cloned() else {
            return ReloadStatus::Unchanged;
        };

        tracing::info!(
            vertex = %paths.vertex.display(),
            fragment = %paths.fragment.display(),
            "hot-reloading shader"
        );
        let stamps = match self.read_stamps(&paths) {
            Ok(stamps) => stamps,
            Err(err) => {
                tracing::error!("shader hot reload failed, keeping previous program: {err}");
                return ReloadStatus::Failed(err);
            }
        };
        match self.install(gpu, paths, stamps) {
            Ok(()) => ReloadStatus::Reloaded,
            Err(err) => {
                tracing::error!("shader hot reload failed, keeping previous program: {err}");
                // Record the stamps of the revision that was read, not what is
                // on disk now, so a save finishing mid-read is still seen.
                if let Some(active) = self.active.as_mut() {
                    active.stamps = stamps;
                }
                ReloadStatus::Failed(err)
            }
        }
    }

    /// Releases the GPU program.
    pub fn destroy(mut self, gpu: &G) {
        if let Some(active) = self.active.take() {
            tracing::debug!(program = ?active.handle, "destroying shader program");
            gpu.delete_program(active.handle);
        }
    }

    fn read_stamps(&self, paths: &SourcePaths) -> Result<SourceStamps, ShaderError> {
        Ok(SourceStamps {
            vertex: self.modified(&paths.vertex)?,
            fragment: self.modified(&paths.fragment)?,
        })
    }

    fn modified(&self, path: &Path) -> Result<SystemTime, ShaderError> {
        self.loader.modified(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn read(&self, path: &Path) -> Result<String, ShaderError> {
        self.loader
            .read_to_string(path)
            .map_err(|source| ShaderError::Io {
                path: path.to_path_buf(),
                source,
            })
    }

    fn build(&self, gpu: &G, paths: &SourcePaths) -> Result<G::Program, ShaderError> {
        let vertex_src = self.read(&paths.vertex)?;
        let fragment_src = self.read(&paths.fragment)?;

        let vertex = gpu
            .compile_stage(ShaderStage::Vertex, &vertex_src)
            .map_err(|log| ShaderError::Compile {
                stage: ShaderStage::Vertex,
                path: paths.vertex.clone(),
                log,
            })?;
        let fragment = match gpu.compile_stage(ShaderStage::Fragment, &fragment_src) {
            Ok(fragment) => fragment,
            Err(log) => {
                gpu.delete_stage(vertex);
                return Err(ShaderError::Compile {
                    stage: ShaderStage::Fragment,
                    path: paths.fragment.clone(),
                    log,
                });
            }
        };

        let linked = gpu.link_program(vertex, fragment);
        gpu.delete_stage(vertex);
        gpu.delete_stage(fragment);
        linked.map_err(|log| ShaderError::Link { log })
    }
}
