/// Reference tree dump command.
pub mod dump;
/// File-level information command.
pub mod info;
/// Package link command.
pub mod link;
/// Object listing command.
pub mod objects;

mod util;
