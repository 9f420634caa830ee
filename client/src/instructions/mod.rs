pub mod chef_instructions;
pub mod rpc;
pub mod utils;
