pub mod common;
pub mod directories;
pub mod dump;
pub mod headers;
pub mod relocs;
pub mod sections;
