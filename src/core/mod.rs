pub mod distribution;
pub mod gate;
pub mod lexicon;
pub mod pipeline;
pub mod resolver;
pub mod scorer;
pub mod tuning;
pub mod uniform;
