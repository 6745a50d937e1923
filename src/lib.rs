//! schoolsite - admin console and public content for a small school website
//!
//! Everything runs against a hosted backend (auth, tables, object storage)
//! reached through the collaborator traits in [`auth`], [`db`] and
//! [`storage`], bundled into a [`backend::Backend`].

pub mod admin;
pub mod auth;
pub mod backend;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod render;
pub mod services;
pub mod storage;
pub mod supabase;
pub mod views;

#[cfg(test)]
mod testing;
