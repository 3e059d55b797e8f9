pub mod traits;

// External service implementations
pub mod deepseek;
pub mod yahoo_finance;
