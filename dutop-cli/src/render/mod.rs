mod progress;
mod table;
mod tree;

pub use progress::ProgressLine;
pub use table::render_table;
pub use tree::render_tree;
