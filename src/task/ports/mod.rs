//! Port contracts for the task service and the remote backend APIs.

mod card_board;
mod issue_tracker;
mod remote;
mod service;

pub use card_board::{BoardList, CardBoardApi, CardChecklist, CardChecklistItem, CardLabel, CardRecord};
pub use issue_tracker::{IssueTrackerApi, IssueTransition, RemoteIssue};
pub use remote::{RemoteApiError, RemoteApiResult};
pub use service::{TaskService, TaskServiceError, TaskServiceResult};
