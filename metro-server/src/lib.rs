//! Metro route planner server.
//!
//! A web application that answers: "What is the fastest way across the
//! metro from here to there, given the day, the hour and the weather?"

pub mod config;
pub mod domain;
pub mod network;
pub mod planner;
pub mod web;
