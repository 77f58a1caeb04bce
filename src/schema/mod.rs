pub mod asset;
pub mod emotion;
