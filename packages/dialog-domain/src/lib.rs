pub mod authorization;
pub mod dialog;
pub mod identity;
pub mod merge;
pub mod pruning;
pub mod time_serde;

pub use authorization::{
	AuthorizedParty, DialogSearchAuthorizationResult, InstanceDelegation,
	SearchAuthorizationConstraints, SubjectResource, flatten, resolve_search_authorization,
};
pub use dialog::{
	ApiAction, ApiActionEndpoint, Attachment, AttachmentUrl, Dialog, DialogActivity,
	DialogContent, DialogStatus, DialogTransmission, GuiAction, LocalizedValue, SystemLabel,
};
pub use identity::Actor;
pub use merge::{
	CreateBehavior, DeleteBehavior, MergeChild, MergeDelegates, UpdateBehavior, ValidationIssue,
	append_children, ensure_ids, merge_children, merge_children_with,
};
