//! Document command and query handlers.

mod create_document;
mod get_document;
mod list_documents;

pub use create_document::{CreateDocumentCommand, CreateDocumentHandler};
pub use get_document::{GetDocumentHandler, GetDocumentQuery};
pub use list_documents::{ListDocumentsHandler, ListDocumentsQuery};
