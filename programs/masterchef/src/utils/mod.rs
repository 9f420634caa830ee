pub mod token;
pub use token::*;

pub mod pool_accounts;
pub use pool_accounts::*;
