pub mod expand;
pub mod show;
