pub mod ups;

pub use ups::UpsAdapter;
