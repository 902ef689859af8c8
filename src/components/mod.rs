pub mod markdown;
pub mod message_bubble;
pub mod navbar;
pub mod search;
pub mod search_page;
pub mod source_sidebar;
