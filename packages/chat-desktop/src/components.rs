//! UI components rendered inline within the root view

pub mod element_sidebar;
pub mod info_panel;
pub mod search;
pub mod sidebar;
pub mod starter;
pub mod thread_history;
