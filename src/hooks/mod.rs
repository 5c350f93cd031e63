pub mod use_animated_value;
pub mod use_fetch;
pub mod use_selection;
pub mod use_sites;
