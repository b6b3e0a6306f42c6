pub mod audit;
pub mod classify;
pub mod emotion;
pub mod pipeline;
pub mod sanitize;
pub mod transform;
pub mod voice;
