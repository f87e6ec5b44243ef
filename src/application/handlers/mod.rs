//! Command and query handlers.
//!
//! Each handler takes its ports as `Arc<dyn ...>` and exposes a single
//! `handle(command, metadata)` entry point.

pub mod document;
pub mod notification;
pub mod proposal;

#[cfg(test)]
pub(crate) mod test_support;

pub use document::{
    CreateDocumentCommand, CreateDocumentHandler, GetDocumentHandler, GetDocumentQuery,
    ListDocumentsHandler, ListDocumentsQuery,
};
pub use notification::{
    DeleteNotificationsCommand, DeleteNotificationsHandler, ListNotificationsHandler,
    ListNotificationsQuery, MarkReadCommand, MarkReadHandler, UnreadCountHandler,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use proposal::{
    ApproveProposalCommand, ApproveProposalHandler, ApproveProposalResult, GetProposalHandler,
    GetProposalQuery, ListProposalsHandler, ListProposalsQuery, ProposalScope, ProposalView,
    RejectProposalCommand, RejectProposalHandler, RejectProposalResult, SubmitProposalCommand,
    SubmitProposalHandler, SubmitProposalResult,
};
