//! Knowledge base adapters

mod directory;

pub use directory::DirectoryKnowledgeBase;
