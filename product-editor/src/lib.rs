//! Product editor core for the catalog admin
//!
//! Headless implementation of the product form: category flattening,
//! draft state, thumbnail upload, AI description and the submission gate.
//! Transports are injected through the traits in [`transport`]; the
//! `catalog-client` crate provides the HTTP implementations.
//!
//! ## Example
//!
//! ```ignore
//! use product_editor::{EditorConfig, EditorServices, ProductEditor, ProductDraft};
//!
//! let services = EditorServices::from_client(client, navigator);
//! let initial = Arc::new(ProductDraft::empty());
//! let editor = ProductEditor::mount(EditorConfig::default(), services, initial).await;
//! editor.set_field("title", "Ceramic mug".into());
//! editor.select_thumbnail(MediaFile::from_path("mug.png").await?)?;
//! editor.upload_thumbnail().await?;
//! editor.submit().await?;
//! ```

pub mod assistant;
pub mod category;
pub mod config;
pub mod editor;
pub mod error;
pub mod fields;
pub mod form;
pub mod logger;
pub mod submission;
pub mod transport;
pub mod upload;

pub use category::{
    CategoryOption, DEFAULT_INDENT, NOT_SPECIFIED, count_nodes, flatten, flatten_with, name_of,
};
pub use config::{AdminConfig, EditorConfig, NavigationPolicy, UploadConfig};
pub use editor::{FieldControl, ProductEditor, Submission};
pub use error::{EditorError, EditorResult, GenerationError, UploadError, ValidationError};
pub use fields::{FieldDefinition, FieldKind, SelectOption, product_form_controls};
pub use form::{FormState, ProductDraft};
pub use submission::{Dispatch, prepare, submit_label};
pub use transport::{
    CategorySource, DescriptionGenerator, EditorServices, LogNavigator, Navigator,
    ProductMutations, UploadTransport,
};
pub use upload::{MediaFile, ProgressTracker, UploadPhase};
