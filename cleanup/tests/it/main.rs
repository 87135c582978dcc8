//! Integration tests exercising the cleanup operations end to end.

mod scenarios;
