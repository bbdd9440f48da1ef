//! Channel primitive tests.

mod pipe_test;
mod stream_test;
