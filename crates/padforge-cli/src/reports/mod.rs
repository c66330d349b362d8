mod grid;
mod tables;

pub use self::grid::print_pitch_grid;
pub use self::tables::{print_moments, print_onion_skin, print_solve_summary, print_transitions};
