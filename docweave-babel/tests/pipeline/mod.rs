//! End-to-end pipeline scenarios against recording fakes.

mod comments;
mod pull;
mod push;
mod styling;
