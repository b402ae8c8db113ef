mod not_found;
mod user_box;

pub use not_found::{NotFoundPage, not_found};
pub use user_box::{MenuEntry, MenuIcon, Redirect, UserMenu, display_name};
