pub mod db;
pub mod deck;
pub mod engine;
pub mod error;
pub mod render;
pub mod shitsumon;
