// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ProjectionInterface;

/// Registry mapping interface names to their descriptors.
///
/// Sub-projection types (`projection<Name>`) are resolved through this map, so every
/// interface a projection can return must be registered with the projector.
/// Descriptors are shared through `Arc`; bound projections keep the descriptor
/// they were created with even if the name is re-registered later.
///
/// # Examples
///
/// ```rust
/// use the_projector::config::{InterfaceMap, ProjectionInterface};
///
/// let mut interfaces = InterfaceMap::new();
/// interfaces.insert(ProjectionInterface::new("Book"));
/// interfaces.insert(ProjectionInterface::new("Author"));
///
/// assert!(interfaces.contains_key("Book"));
/// assert_eq!(interfaces.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct InterfaceMap(pub HashMap<String, Arc<ProjectionInterface>>);

impl InterfaceMap {
    /// Create a new empty interface map
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Insert an interface under its own name, replacing any previous one
    pub fn insert(&mut self, interface: ProjectionInterface) -> Arc<ProjectionInterface> {
        let interface = Arc::new(interface);
        self.0.insert(interface.name.clone(), Arc::clone(&interface));
        interface
    }

    /// Get an interface by name
    pub fn get(&self, name: &str) -> Option<&Arc<ProjectionInterface>> {
        self.0.get(name)
    }

    /// Check if an interface exists
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Get all interface names
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Get the number of interfaces in the map
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the interface map is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for InterfaceMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.0.keys().collect();
        names.sort();
        f.debug_struct("InterfaceMap")
            .field("interface_count", &self.0.len())
            .field("interface_names", &names)
            .finish()
    }
}

impl From<Vec<ProjectionInterface>> for InterfaceMap {
    fn from(interfaces: Vec<ProjectionInterface>) -> Self {
        let mut map = Self::new();
        for interface in interfaces {
            map.insert(interface);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_table_driven() {
        struct TestCase {
            name: &'static str,
            interfaces: Vec<ProjectionInterface>,
            expected_names: Vec<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "empty",
                interfaces: vec![],
                expected_names: vec![],
            },
            TestCase {
                name: "two interfaces",
                interfaces: vec![
                    ProjectionInterface::new("Book"),
                    ProjectionInterface::new("Author"),
                ],
                expected_names: vec!["Author", "Book"],
            },
            TestCase {
                name: "later registration wins",
                interfaces: vec![
                    ProjectionInterface::new("Book"),
                    ProjectionInterface::new("Book").extending("Comparable"),
                ],
                expected_names: vec!["Book"],
            },
        ];

        for test_case in test_cases {
            let map = InterfaceMap::from(test_case.interfaces);
            let mut names: Vec<&str> = map.keys().map(String::as_str).collect();
            names.sort();
            assert_eq!(names, test_case.expected_names, "Test case '{}'", test_case.name);
        }

        let map = InterfaceMap::from(vec![
            ProjectionInterface::new("Book"),
            ProjectionInterface::new("Book").extending("Comparable"),
        ]);
        assert_eq!(map.get("Book").unwrap().extends, vec!["Comparable".to_string()]);
    }
}
