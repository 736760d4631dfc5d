//! File payload domain models.
mod kind;
mod mime;
mod origin;
mod stored;

pub use kind::MediaKind;
pub use mime::MimeType;
pub use origin::SelectionOrigin;
pub use stored::StoredFile;
