//! Dotted method names to a tree of method groups.
//!
//! `math.add` becomes the leaf `add` inside the child group `math`, which is
//! what lets generated clients expose `client.math.add(...)`.

use crate::error::{CodegenError, CodegenResult};
use crate::ir::RpcMethod;
use crate::naming::{PLACEHOLDER_IDENTIFIER, sanitize_identifier};
use indexmap::IndexMap;

/// A namespace in the generated client.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodGroup {
    /// The sanitized segment, or the client name for the root
    pub name: String,
    /// Sanitized segments from the root down to this group
    pub path: Vec<String>,
    pub methods: IndexMap<String, RpcMethod>,
    pub child_groups: IndexMap<String, MethodGroup>,
}

impl MethodGroup {
    fn new(name: impl Into<String>, path: Vec<String>) -> Self {
        Self {
            name: name.into(),
            path,
            methods: IndexMap::new(),
            child_groups: IndexMap::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Dotted location used in error messages
    pub fn display_path(&self) -> String {
        if self.is_root() {
            self.name.clone()
        } else {
            self.path.join(".")
        }
    }

    /// Number of methods in this group and all of its descendants
    pub fn method_count(&self) -> usize {
        self.methods.len()
            + self
                .child_groups
                .values()
                .map(MethodGroup::method_count)
                .sum::<usize>()
    }

    /// This group followed by every descendant, depth first
    pub fn descendants(&self) -> Vec<&MethodGroup> {
        let mut groups = vec![self];
        for child in self.child_groups.values() {
            groups.extend(child.descendants());
        }
        groups
    }

    fn child_group_mut(&mut self, segment: String) -> CodegenResult<&mut MethodGroup> {
        if self.methods.contains_key(&segment) {
            return Err(CodegenError::name_collision(
                self.display_path(),
                segment,
                "a method already uses this name, so it cannot also be a group",
            ));
        }

        let mut path = self.path.clone();
        path.push(segment.clone());
        Ok(self
            .child_groups
            .entry(segment.clone())
            .or_insert_with(|| MethodGroup::new(segment, path)))
    }

    fn insert_method(&mut self, key: String, method: &RpcMethod) -> CodegenResult<()> {
        if self.child_groups.contains_key(&key) {
            return Err(CodegenError::name_collision(
                self.display_path(),
                key,
                format!("method '{}' clashes with a group of the same name", method.name),
            ));
        }
        if let Some(existing) = self.methods.get(&key) {
            return Err(CodegenError::name_collision(
                self.display_path(),
                key,
                format!(
                    "methods '{}' and '{}' map to the same identifier",
                    existing.name, method.name
                ),
            ));
        }

        self.methods.insert(key, method.clone());
        Ok(())
    }
}

/// Build the group tree for `methods` under a root named `client_root_name`
pub fn group_methods(client_root_name: &str, methods: &[RpcMethod]) -> CodegenResult<MethodGroup> {
    let mut root = MethodGroup::new(client_root_name, Vec::new());

    for method in methods {
        let mut segments: Vec<String> = method.name.split('.').map(sanitize_identifier).collect();
        let leaf = segments
            .pop()
            .unwrap_or_else(|| PLACEHOLDER_IDENTIFIER.to_string());

        let mut group = &mut root;
        for segment in segments {
            group = group.child_group_mut(segment)?;
        }
        group.insert_method(leaf, method)?;
    }

    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Param, ParamStructure};
    use crate::schema_node::{PrimitiveKind, SchemaNode};

    fn method(name: &str) -> RpcMethod {
        RpcMethod {
            name: name.to_string(),
            summary: None,
            description: None,
            params: vec![],
            result: Param {
                name: "result".to_string(),
                schema: SchemaNode::primitive(PrimitiveKind::Null),
                required: true,
                description: None,
            },
            param_structure: ParamStructure::ByPosition,
            deprecated: false,
        }
    }

    fn methods(names: &[&str]) -> Vec<RpcMethod> {
        names.iter().map(|name| method(name)).collect()
    }

    #[test]
    fn test_groups_by_dotted_prefix() {
        let root = group_methods("Calc", &methods(&["math.add", "math.subtract", "ping"])).unwrap();

        assert_eq!(root.name, "Calc");
        assert!(root.is_root());
        assert_eq!(root.methods.keys().collect::<Vec<_>>(), vec!["ping"]);
        assert_eq!(root.child_groups.keys().collect::<Vec<_>>(), vec!["math"]);

        let math = &root.child_groups["math"];
        assert_eq!(math.path, vec!["math".to_string()]);
        assert_eq!(math.methods.keys().collect::<Vec<_>>(), vec!["add", "subtract"]);
        assert_eq!(math.methods["add"].name, "math.add");
        assert!(math.child_groups.is_empty());
        assert_eq!(root.method_count(), 3);
    }

    #[test]
    fn test_deep_nesting() {
        let root = group_methods("Api", &methods(&["a.b.c", "a.d"])).unwrap();
        let a = &root.child_groups["a"];
        let b = &a.child_groups["b"];
        assert_eq!(b.path, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(b.display_path(), "a.b");
        assert!(b.methods.contains_key("c"));
        assert!(a.methods.contains_key("d"));

        let paths: Vec<String> = root.descendants().iter().map(|g| g.display_path()).collect();
        assert_eq!(paths, vec!["Api", "a", "a.b"]);
    }

    #[test]
    fn test_segments_are_sanitized() {
        let root = group_methods("Api", &methods(&["speed.2Fast", "speed.!!!", "get-user"])).unwrap();
        let speed = &root.child_groups["speed"];
        assert!(speed.methods.contains_key("n2Fast"));
        assert!(speed.methods.contains_key(PLACEHOLDER_IDENTIFIER));
        assert!(root.methods.contains_key("getuser"));
    }

    #[test]
    fn test_method_group_collision_is_an_error() {
        let err = group_methods("Api", &methods(&["math", "math.add"])).unwrap_err();
        assert!(matches!(err, CodegenError::NameCollision { ref name, .. } if name == "math"));

        let err = group_methods("Api", &methods(&["math.add", "math"])).unwrap_err();
        assert!(matches!(err, CodegenError::NameCollision { ref group, .. } if group == "Api"));
    }

    #[test]
    fn test_duplicate_sanitized_leaf_is_an_error() {
        let err = group_methods("Api", &methods(&["get-user", "getuser"])).unwrap_err();
        match err {
            CodegenError::NameCollision { name, message, .. } => {
                assert_eq!(name, "getuser");
                assert!(message.contains("get-user"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_method_list() {
        let root = group_methods("Empty", &[]).unwrap();
        assert_eq!(root.method_count(), 0);
        assert_eq!(root.descendants().len(), 1);
    }
}
