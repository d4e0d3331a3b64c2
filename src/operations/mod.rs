pub mod accessory;
pub mod classify;
pub mod emit;
pub mod extract;
pub mod frame;
pub mod props;
pub mod tile;
