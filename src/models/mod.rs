pub mod domain;
pub mod dto;
pub mod duration;
pub mod serde_helpers;
