pub mod challenge;
pub mod deployment;
pub mod payment;

pub use challenge::*;
pub use deployment::*;
pub use payment::*;
