pub mod capture;
pub mod checklist;
pub mod dispatch;
pub mod document;
pub mod init;
pub mod link;
pub mod shared;
pub mod status;
