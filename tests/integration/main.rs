//! Integration tests for the Portal session and authorization stack.


mod auth_test;
mod guard_test;
mod session_test;
