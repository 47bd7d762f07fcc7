//! Collaborators the grid drives: palettes that spawn tiles and observers
//! that react to changes

/// Change notification
pub mod events;
/// Palette trait and the headless `LevelSet`
pub mod palette;
