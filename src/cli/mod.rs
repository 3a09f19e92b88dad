pub mod check;
pub mod hook;
pub mod list;
pub mod search;
pub mod session;
pub mod show;
pub mod stats;
pub mod sync;
