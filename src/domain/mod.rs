pub mod ai;
pub mod collision;
pub mod entity;
pub mod rules;
pub mod tile;
