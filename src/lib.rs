/// Gravity Bird — a side-scrolling avoidance game for the terminal.
///
/// The library is the pure simulation: entities, physics, timers, fades,
/// and resource handles.  The binary wires it to crossterm for drawing and
/// key input.  Nothing in here touches the terminal.

pub mod config;
pub mod entities;
pub mod fade;
pub mod resources;
pub mod scheduler;
pub mod sim;
