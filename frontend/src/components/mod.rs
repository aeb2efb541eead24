pub mod goal_card;
pub mod header;
pub mod journal_card;
pub mod loader;
pub mod notice;
pub mod topic_row;
