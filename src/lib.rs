pub mod error;
pub mod join;
pub mod observation;
pub mod output;
pub mod pipeline;
pub mod sources;
pub mod stats;
