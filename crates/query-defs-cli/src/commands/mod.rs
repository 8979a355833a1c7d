pub mod format;
pub mod info;
pub mod list;
pub mod show;
pub mod uri;
