pub mod connectors;
pub mod fit;
pub mod overlay;
pub mod slots;
