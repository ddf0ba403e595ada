mod rendered_document;

pub use rendered_document::*;
