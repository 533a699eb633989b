mod common;

mod config;
mod crud;
mod properties;
mod relation;
mod stubs;
