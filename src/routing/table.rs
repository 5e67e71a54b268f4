//! Per-method route tables.
//!
//! # Responsibilities
//! - Hold static routes in an exact-match map
//! - Hold dynamic routes in a list ordered by priority
//!
//! # Design Decisions
//! - Entries are indices into the router's route list
//! - Sorting happens once, at freeze; the sort is stable so equal
//!   priorities resolve in registration order

use std::cmp::Reverse;
use std::collections::HashMap;

use axum::http::Method;

/// Routes registered for a single HTTP method.
#[derive(Debug, Default, Clone)]
pub struct MethodRoutes {
    statics: HashMap<String, usize>,
    dynamics: Vec<usize>,
}

impl MethodRoutes {
    /// Static route index for a normalized path.
    pub fn lookup_static(&self, path: &str) -> Option<usize> {
        self.statics.get(path).copied()
    }

    /// Dynamic route indices in match order.
    pub fn dynamics(&self) -> &[usize] {
        &self.dynamics
    }

    pub fn static_count(&self) -> usize {
        self.statics.len()
    }

    /// Static route indices, unordered.
    pub fn statics(&self) -> impl Iterator<Item = usize> + '_ {
        self.statics.values().copied()
    }
}

/// All routes, keyed by method.
#[derive(Debug, Default, Clone)]
pub struct RouteTable {
    methods: HashMap<Method, MethodRoutes>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a static route. Returns the index it displaced, if any.
    pub fn insert_static(&mut self, method: Method, key: String, index: usize) -> Option<usize> {
        self.methods.entry(method).or_default().statics.insert(key, index)
    }

    /// Append a dynamic route.
    pub fn insert_dynamic(&mut self, method: Method, index: usize) {
        self.methods.entry(method).or_default().dynamics.push(index);
    }

    /// Order every method's dynamic routes by descending priority.
    pub fn sort_by_priority(&mut self, priority: impl Fn(usize) -> i32) {
        for routes in self.methods.values_mut() {
            routes.dynamics.sort_by_key(|&index| Reverse(priority(index)));
        }
    }

    pub fn get(&self, method: &Method) -> Option<&MethodRoutes> {
        self.methods.get(method)
    }

    /// Methods with at least one route.
    pub fn methods(&self) -> impl Iterator<Item = (&Method, &MethodRoutes)> {
        self.methods.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_overwrite() {
        let mut table = RouteTable::new();
        assert_eq!(table.insert_static(Method::GET, "/a".into(), 0), None);
        assert_eq!(table.insert_static(Method::GET, "/a".into(), 1), Some(0));
        assert_eq!(table.get(&Method::GET).unwrap().lookup_static("/a"), Some(1));
        assert!(table.get(&Method::POST).is_none());
    }

    #[test]
    fn test_sort_is_stable_and_descending() {
        let priorities = [10, 30, 10, 20, 30];
        let mut table = RouteTable::new();
        for index in 0..priorities.len() {
            table.insert_dynamic(Method::GET, index);
        }

        table.sort_by_priority(|index| priorities[index]);

        assert_eq!(table.get(&Method::GET).unwrap().dynamics(), &[1, 4, 3, 0, 2]);
    }
}
