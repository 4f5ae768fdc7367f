//! HTTP-level tests of the POS server wired with in-memory backends.

mod auth_test;
mod helpers;
