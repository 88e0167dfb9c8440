pub mod prompt;
pub mod settings;
pub mod tables;
