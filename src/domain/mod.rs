pub mod entity;
pub mod grid;
pub mod path;
pub mod push;
pub mod rules;
pub mod tile;
