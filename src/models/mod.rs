pub mod market;
pub mod price;
pub mod report;

pub use market::*;
pub use price::*;
pub use report::*;
