pub mod balance_history;
pub mod io;
pub mod streaks;
pub mod summary;
