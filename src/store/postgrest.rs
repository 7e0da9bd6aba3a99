// ABOUTME: Request-description builder for the hosted store's PostgREST dialect
// ABOUTME: Produces method, path, query pairs, and headers deterministically for unit testing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

//! # PostgREST Request Builder
//!
//! The hosted store speaks the PostgREST dialect: filters, ordering, and
//! limits travel as query-string pairs, and writes ask for the affected
//! rows back via the `Prefer: return=representation` header. This module
//! builds a plain description of such a request so the wire layer stays a
//! one-liner and the query assembly is testable without a network.

use serde_json::Value;

/// HTTP method of a store request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

/// A fully described store request
#[derive(Debug, Clone)]
pub struct TableRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    want_representation: bool,
}

impl TableRequest {
    /// Read rows from a table
    pub fn select(table: &str) -> Self {
        Self::new(Method::Get, table).query_pair("select", "*")
    }

    /// Read rows with an explicit select list (for embedded resources)
    pub fn select_columns(table: &str, columns: &str) -> Self {
        Self::new(Method::Get, table).query_pair("select", columns)
    }

    /// Insert rows, returning the created representation
    pub fn insert(table: &str, body: Value) -> Self {
        let mut request = Self::new(Method::Post, table);
        request.body = Some(body);
        request.want_representation = true;
        request
    }

    /// Update rows matching the attached filters, returning the new representation
    pub fn update(table: &str, body: Value) -> Self {
        let mut request = Self::new(Method::Patch, table);
        request.body = Some(body);
        request.want_representation = true;
        request
    }

    /// Delete rows matching the attached filters
    pub fn delete(table: &str) -> Self {
        Self::new(Method::Delete, table)
    }

    /// Call a store-side procedure
    pub fn rpc(function: &str, body: Value) -> Self {
        let mut request = Self::new(Method::Post, &format!("rpc/{function}"));
        request.body = Some(body);
        request
    }

    fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_owned(),
            query: Vec::new(),
            body: None,
            want_representation: false,
        }
    }

    fn query_pair(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_owned(), value.to_owned()));
        self
    }

    /// Equality filter: `column=eq.value`
    #[must_use]
    pub fn eq(self, column: &str, value: &str) -> Self {
        let filter = format!("eq.{value}");
        self.query_pair(column, &filter)
    }

    /// Greater-or-equal filter: `column=gte.value`
    #[must_use]
    pub fn gte(self, column: &str, value: &str) -> Self {
        let filter = format!("gte.{value}");
        self.query_pair(column, &filter)
    }

    /// Less-or-equal filter: `column=lte.value`
    #[must_use]
    pub fn lte(self, column: &str, value: &str) -> Self {
        let filter = format!("lte.{value}");
        self.query_pair(column, &filter)
    }

    /// Case-insensitive substring filter: `column=ilike.*value*`
    #[must_use]
    pub fn ilike_contains(self, column: &str, value: &str) -> Self {
        let filter = format!("ilike.*{value}*");
        self.query_pair(column, &filter)
    }

    /// Sort order: `order=column.asc|desc`
    #[must_use]
    pub fn order(self, column: &str, descending: bool) -> Self {
        let direction = if descending { "desc" } else { "asc" };
        let value = format!("{column}.{direction}");
        self.query_pair("order", &value)
    }

    /// Row cap: `limit=n`
    #[must_use]
    pub fn limit(self, n: u32) -> Self {
        let value = n.to_string();
        self.query_pair("limit", &value)
    }

    /// HTTP method of the described request
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Path relative to the store's `/rest/v1/` root
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query pairs in the order they were attached
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// JSON body, when the request carries one
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Whether the request asks for the affected rows back
    #[must_use]
    pub const fn wants_representation(&self) -> bool {
        self.want_representation
    }
}
