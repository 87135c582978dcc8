//! Integration tests exercising the scanner against real directory and
//! archive fixtures.

mod archives;
