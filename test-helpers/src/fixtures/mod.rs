//! Instance graph fixtures.

mod learning_problems;
mod mini_carcinogenesis;

pub use learning_problems::LEARNING_PROBLEMS;
pub use mini_carcinogenesis::MINI_CARCINOGENESIS;
