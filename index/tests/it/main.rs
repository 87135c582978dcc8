//! Integration tests exercising the index store through its public API only.

mod lifecycle;
