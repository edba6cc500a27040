//! Doc-comment resolution from source-code info.
//!
//! Each descriptor element is addressed by its path in the descriptor tree:
//! a sequence of field tags and indexes. The location list of a file's
//! `SourceCodeInfo` maps such paths to the comments written around the
//! element; resolving a doc is a pure lookup.

use std::collections::HashMap;

use model::Doc;
use prost_types::SourceCodeInfo;

/// Field tags used in descriptor paths.
pub(crate) mod tag {
    /// `FileDescriptorProto.message_type`.
    pub const FILE_MESSAGE_TYPE: i32 = 4;
    /// `FileDescriptorProto.enum_type`.
    pub const FILE_ENUM_TYPE: i32 = 5;
    /// `FileDescriptorProto.service`.
    pub const FILE_SERVICE: i32 = 6;
    /// `DescriptorProto.field`.
    pub const MESSAGE_FIELD: i32 = 2;
    /// `DescriptorProto.nested_type`.
    pub const MESSAGE_NESTED_TYPE: i32 = 3;
    /// `DescriptorProto.enum_type`.
    pub const MESSAGE_ENUM_TYPE: i32 = 4;
    /// `EnumDescriptorProto.value`.
    pub const ENUM_VALUE: i32 = 2;
    /// `ServiceDescriptorProto.method`.
    pub const SERVICE_METHOD: i32 = 2;
}

/// Comments of one proto file, indexed by descriptor path.
#[derive(Debug, Default)]
pub(crate) struct DocMap {
    locations: HashMap<Vec<i32>, Doc>,
}

impl DocMap {
    /// Index the location list of a file.
    pub(crate) fn new(info: Option<&SourceCodeInfo>) -> Self {
        let mut locations = HashMap::new();
        let Some(info) = info else {
            return Self { locations };
        };
        for location in &info.location {
            let leading = location.leading_comments().trim();
            let trailing = location.trailing_comments().trim();
            if leading.is_empty() && trailing.is_empty() {
                continue;
            }
            locations.insert(location.path.clone(), Doc::new(leading, trailing));
        }
        Self { locations }
    }

    /// The doc recorded for the element at `path`, or an empty doc.
    pub(crate) fn doc_for(&self, path: &[i32]) -> Doc {
        self.locations.get(path).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use prost_types::source_code_info::Location;

    use super::*;

    #[test]
    fn resolves_comments_by_path() {
        let info = SourceCodeInfo {
            location: vec![
                Location {
                    path: vec![tag::FILE_MESSAGE_TYPE, 0],
                    leading_comments: Some(" A journey. ".into()),
                    trailing_comments: None,
                    ..Default::default()
                },
                Location {
                    path: vec![tag::FILE_MESSAGE_TYPE, 0, tag::MESSAGE_FIELD, 1],
                    leading_comments: None,
                    trailing_comments: Some(" km ".into()),
                    ..Default::default()
                },
            ],
        };
        let docs = DocMap::new(Some(&info));
        assert_eq!(docs.doc_for(&[4, 0]), Doc::new("A journey.", ""));
        assert_eq!(docs.doc_for(&[4, 0, 2, 1]), Doc::new("", "km"));
        assert!(docs.doc_for(&[4, 1]).is_empty());
    }
}
