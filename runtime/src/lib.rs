//! Yubimoji: recognise Japanese finger-alphabet signs from hand landmarks.
//!
//! A browser tracks 21 hand joints and posts them to `/predict_sign`; the
//! service flattens them into a 63-value feature vector, evaluates a
//! pre-trained SVM exported as JSON, and answers with the recognised label.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod recognition;
pub mod server;
