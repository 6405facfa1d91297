pub mod engine;

pub use engine::TransferEngine;
