//! Archive assembly, toolchain invocation and the rebuild loop.

pub mod archive;
pub mod checksum;
pub mod settings;
pub mod toolchain;
pub mod watch;

// Re-export the types the pipelines are built from
pub use archive::{ArchiveEntry, AssembleError};
pub use settings::{ArchiveSpec, Settings};
pub use toolchain::{BuildError, BuildRequest, ToolchainRunner, WasmPack};
