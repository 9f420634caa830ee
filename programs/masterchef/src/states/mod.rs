pub mod chef_config;
pub use chef_config::*;

pub mod pool;
pub use pool::*;

pub mod user_position;
pub use user_position::*;

pub mod events;
pub use events::*;
