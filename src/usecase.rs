mod resolve;
mod workspace;

pub use resolve::resolve_pins;
pub use workspace::process_workspace;
