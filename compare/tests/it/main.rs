//! Integration tests exercising search and lookup against a real index.

mod search;
