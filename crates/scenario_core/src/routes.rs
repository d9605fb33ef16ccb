//! Static route table: route id to ordered list of path segments.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named route over one or more segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub segments: Vec<String>,
}

impl Route {
    pub fn new(id: impl Into<String>, segments: &[&str]) -> Self {
        Self {
            id: id.into(),
            segments: segments.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Segments joined by spaces, as written in `edges` attributes.
    pub fn edges(&self) -> String {
        self.segments.join(" ")
    }
}

/// Why a route could not be resolved to its first segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route `{0}` not found in route table")]
    UnknownRoute(String),
    #[error("route `{0}` has no segments")]
    EmptyRoute(String),
}

/// Ordered route table. Order is preserved in the demand document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl Default for RouteTable {
    /// Four-arm crossroads: `-E<n>` enters from an arm, `E<n>` leaves towards it
    /// (0 = east, 1 = south, 2 = west, 3 = north).
    fn default() -> Self {
        Self::new(vec![
            Route::new("ntos", &["-E3", "E1"]),
            Route::new("ntow", &["-E3", "E2"]),
            Route::new("ntoe", &["-E3", "E0"]),
            Route::new("ston", &["-E1", "E3"]),
            Route::new("stow", &["-E1", "E2"]),
            Route::new("stoe", &["-E1", "E0"]),
            Route::new("wtoe", &["-E2", "E0"]),
            Route::new("wton", &["-E2", "E3"]),
            Route::new("etow", &["-E0", "E2"]),
            Route::new("eton", &["-E0", "E3"]),
            Route::new("etos", &["-E0", "E1"]),
        ])
    }
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn get(&self, id: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// First segment of a route; this is where disruptions take effect.
    pub fn first_segment(&self, id: &str) -> Result<&str, RouteError> {
        let route = self
            .get(id)
            .ok_or_else(|| RouteError::UnknownRoute(id.to_string()))?;
        route
            .segments
            .first()
            .map(String::as_str)
            .ok_or_else(|| RouteError::EmptyRoute(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_segment_of_known_route() {
        let table = RouteTable::default();
        assert_eq!(table.first_segment("ston"), Ok("-E1"));
        assert_eq!(table.first_segment("ntos"), Ok("-E3"));
    }

    #[test]
    fn first_segment_reports_unknown_and_empty_routes() {
        let table = RouteTable::new(vec![Route::new("dead_end", &[])]);
        assert_eq!(
            table.first_segment("wtos"),
            Err(RouteError::UnknownRoute("wtos".to_string()))
        );
        assert_eq!(
            table.first_segment("dead_end"),
            Err(RouteError::EmptyRoute("dead_end".to_string()))
        );
    }

    #[test]
    fn edges_are_space_separated() {
        let table = RouteTable::default();
        assert_eq!(table.get("etos").unwrap().edges(), "-E0 E1");
        assert_eq!(table.len(), 11);
    }
}
