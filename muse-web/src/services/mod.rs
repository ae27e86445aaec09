pub mod identity;
pub mod providers;
