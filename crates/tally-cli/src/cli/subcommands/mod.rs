mod capture;
mod checklist;
mod document;
mod link;

pub use capture::CaptureCommands;
pub use checklist::ChecklistCommands;
pub use document::DocumentCommands;
pub use link::LinkCommands;
