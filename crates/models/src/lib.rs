pub mod caller;
pub mod credit_load;
pub mod days;
pub mod reachability;
pub mod status;
pub mod time_slot;
