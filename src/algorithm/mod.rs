/// Preview and high-resolution mosaic composition
pub mod compositor;
/// Nearest-colour tile matching
pub mod matcher;
/// Generation sequencing, display toggle and export guards
pub mod session;
