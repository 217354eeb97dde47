pub mod filesystem;
pub mod output;

pub use filesystem::{FileSystem, MockFileSystem, RealFileSystem};
pub use output::{MockOutput, Output, OutputMessage, TerminalOutput};
