//! Context menu actions for outliner rows.

use object_outliner_core::{ObjectId, ObjectRegistry};

/// An action offered in a row's context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextAction {
    /// Copy the object's full path name to the clipboard.
    CopyObjectPath { path: String },
}

impl ContextAction {
    /// Stable identifier of the menu entry.
    pub fn id(&self) -> &'static str {
        match self {
            Self::CopyObjectPath { .. } => "CopyObjectPath",
        }
    }

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CopyObjectPath { .. } => "Copy Object Path",
        }
    }

    /// Text handed to the clipboard collaborator, if the action copies anything.
    pub fn clipboard_text(&self) -> Option<&str> {
        match self {
            Self::CopyObjectPath { path } => Some(path),
        }
    }
}

/// Actions available for `object`. Empty if it no longer exists.
pub fn context_actions(registry: &ObjectRegistry, object: ObjectId) -> Vec<ContextAction> {
    let Some(object) = registry.get(object) else {
        return Vec::new();
    };
    vec![ContextAction::CopyObjectPath {
        path: object.path_name(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_object_path() {
        let mut registry = ObjectRegistry::new();
        let class = registry.register_class("Object", None).unwrap();
        let map = registry.spawn(class, "/Game/Map", None).unwrap();
        let level = registry.spawn(class, "PersistentLevel", Some(map)).unwrap();

        let actions = context_actions(&registry, level);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].id(), "CopyObjectPath");
        assert_eq!(actions[0].label(), "Copy Object Path");
        assert_eq!(actions[0].clipboard_text(), Some("/Game/Map.PersistentLevel"));

        registry.destroy(map).unwrap();
        assert!(context_actions(&registry, level).is_empty());
    }
}
