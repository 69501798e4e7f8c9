mod intent;
mod tick;

pub use intent::{Direction, InputEvent, Intent};
pub use tick::{Simulation, TickCounter};
