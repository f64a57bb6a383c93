pub mod draft;
pub mod expansion;
pub mod search;
pub mod sort;
pub mod tree_ops;
