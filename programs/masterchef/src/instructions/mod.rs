pub mod initialise_chef;
pub use initialise_chef::*;

pub mod add_pool;
pub use add_pool::*;

pub mod deposit;
pub use deposit::*;

pub mod withdraw;
pub use withdraw::*;

pub mod harvest;
pub use harvest::*;

pub mod update_pool;
pub use update_pool::*;

pub mod fund_rewards;
pub use fund_rewards::*;

pub mod update_admin;
pub use update_admin::*;

pub mod queries;
pub use queries::*;
