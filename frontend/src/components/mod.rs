pub mod controls;
pub mod map_component;
