//! Weather-aware outfit recommendations for a personal closet.
//!
//! The engine in [`services`] is pure: given garments, a [`models::Weather`]
//! reading and a dress code it derives warmth targets, filters candidates
//! and ranks complete outfits. [`db`] and [`services::weather`] supply the
//! closet and the weather; [`routes`] serves it all over HTTP.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
