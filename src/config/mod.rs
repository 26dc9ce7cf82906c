//! JSON filter documents.

pub(crate) mod document;
