//! Extension loader: resolves extension types by implementation class name.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::types::ExtensionType;

/// Class-loading handle of a context.
///
/// Plans reference extension types only by class name; the loader decides
/// which classes are available to the deserializing side.
#[derive(Debug, Clone, Default)]
pub struct ExtensionLoader {
    classes: FxHashMap<String, Arc<ExtensionType>>,
}

impl ExtensionLoader {
    /// Create a loader that knows no classes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a class loadable; replaces a previous class with the same name.
    pub fn register(&mut self, extension: ExtensionType) -> Arc<ExtensionType> {
        let extension = Arc::new(extension);
        self.classes
            .insert(extension.class_name().to_string(), Arc::clone(&extension));
        extension
    }

    /// Load a class by name.
    pub fn load(&self, class_name: &str) -> Option<Arc<ExtensionType>> {
        self.classes.get(class_name).cloned()
    }

    /// Whether exactly this extension type is loadable.
    pub fn contains(&self, extension: &ExtensionType) -> bool {
        self.classes
            .get(extension.class_name())
            .is_some_and(|e| e.as_ref() == extension)
    }

    /// All loadable class names, sorted.
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
