pub mod forms;

pub use forms::{IssueForm, LoginForm, NewIssue, NewTechnician, NewTool, TechnicianForm, ToolForm};
