pub mod slug;

pub use slug::generate_slug;
