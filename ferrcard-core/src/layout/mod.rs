pub mod element;
pub mod export;
pub mod tree;
