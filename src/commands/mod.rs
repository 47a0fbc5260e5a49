pub mod access;
pub mod calendar;
pub mod invitation;
pub mod list;
pub mod modify;
pub mod new;
pub mod watch;
