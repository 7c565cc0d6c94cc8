mod filter;
mod report;

pub use filter::*;
pub use report::*;

pub use catalog_parser::PNPM_WORKSPACE;
