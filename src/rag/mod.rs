pub mod knowledge;

pub use knowledge::select_knowledge;
